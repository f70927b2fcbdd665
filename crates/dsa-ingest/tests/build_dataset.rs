use dsa_core::{Dataset, DsaError, MappingMode, ACTIVITY_LABELS, CHANNEL_COUNT};
use dsa_ingest::{DatasetBuilder, IngestConfig, MappingSource, SubsetConfig};
use std::path::Path;

fn write_segment(path: &Path, rows: usize, seed: f64) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut text = String::new();
    for r in 0..rows {
        let cells: Vec<String> = (0..CHANNEL_COUNT)
            .map(|c| format!("{}", seed + r as f64 + c as f64 * 0.01))
            .collect();
        text.push_str(&cells.join(","));
        text.push('\n');
    }
    std::fs::write(path, text).unwrap();
}

/// A activities x S subjects x F segment files x R rows
fn write_tree(root: &Path, activities: &[&str], subjects: usize, files: usize, rows: usize) {
    for (a, activity) in activities.iter().enumerate() {
        for s in 1..=subjects {
            for f in 1..=files {
                let path = root
                    .join(activity)
                    .join(format!("p{}", s))
                    .join(format!("s{:02}.txt", f));
                write_segment(&path, rows, (a * 100 + s * 10 + f) as f64);
            }
        }
    }
}

fn header_width(path: &Path) -> usize {
    let text = std::fs::read_to_string(path).unwrap();
    text.lines().next().unwrap().split(',').count()
}

#[test]
fn test_row_and_column_counts() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("data");
    write_tree(&root, &["a01", "a02", "a03"], 2, 3, 4);
    let output = dir.path().join("out.csv");

    let builder = DatasetBuilder::new(IngestConfig::new(&root).with_output(&output)).unwrap();
    let report = builder.run().unwrap();

    assert_eq!(report.rows, 3 * 2 * 3 * 4);
    assert_eq!(report.activities, 3);
    assert_eq!(report.subjects, 2);
    assert_eq!(report.segments, 3 * 2 * 3);
    assert_eq!(header_width(&output), CHANNEL_COUNT + 4);

    let dataset = Dataset::read_csv(&output).unwrap();
    assert_eq!(dataset.len(), 72);
}

#[test]
fn test_segment_is_file_stem() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("data");
    write_tree(&root, &["a05"], 1, 2, 3);

    let dataset = DatasetBuilder::new(IngestConfig::new(&root)).unwrap().build().unwrap();
    for row in dataset.rows() {
        assert!(["s01", "s02"].contains(&&*row.segment), "segment {}", row.segment);
    }
    assert_eq!(&*dataset.rows()[0].segment, "s01");
    assert_eq!(&*dataset.rows()[5].segment, "s02");
    assert_eq!(&*dataset.rows()[0].activity_name, "Ascending Stairs");
}

#[test]
fn test_positional_labels_follow_sorted_listing() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("data");
    let folders = ["Walking", "Cycling", "Rowing"];
    write_tree(&root, &folders, 1, 1, 2);

    let config = IngestConfig::new(&root).with_mapping(MappingSource::Mode(MappingMode::Positional));
    let dataset = DatasetBuilder::new(config).unwrap().build().unwrap();

    let mut sorted = folders.to_vec();
    sorted.sort();
    for row in dataset.rows() {
        let position = sorted.iter().position(|f| *f == &*row.activity).unwrap();
        assert_eq!(&*row.activity_name, ACTIVITY_LABELS[position]);
    }
    // Activities are concatenated in listing order
    assert_eq!(&*dataset.rows()[0].activity, "Cycling");
}

#[test]
fn test_two_segment_walking_example() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("data");
    let zeros = vec!["0"; CHANNEL_COUNT].join(",");
    std::fs::create_dir_all(root.join("Walking/p1")).unwrap();
    std::fs::write(root.join("Walking/p1/seg1.csv"), format!("{}\n", zeros)).unwrap();
    std::fs::write(root.join("Walking/p1/seg2.csv"), format!("{}\n", zeros)).unwrap();
    let output = dir.path().join("walking.csv");

    let config = IngestConfig::new(&root)
        .with_output(&output)
        .with_mapping(MappingSource::Mode(MappingMode::Positional));
    DatasetBuilder::new(config).unwrap().run().unwrap();

    let dataset = Dataset::read_csv(&output).unwrap();
    assert_eq!(dataset.len(), 2);
    let mut segments = Vec::new();
    for row in dataset.rows() {
        assert_eq!(&*row.subject, "p1");
        assert_eq!(&*row.activity, "Walking");
        // "Walking" is the only folder, so it takes the first label
        assert_eq!(&*row.activity_name, ACTIVITY_LABELS[0]);
        assert!(row.channels.iter().all(|v| *v == 0.0));
        segments.push(row.segment.to_string());
    }
    segments.sort();
    assert_eq!(segments, vec!["seg1", "seg2"]);
}

#[test]
fn test_declared_mapping_rejects_unknown_folder() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("data");
    write_tree(&root, &["a01", "Walking"], 1, 1, 1);

    let err = DatasetBuilder::new(IngestConfig::new(&root)).unwrap().build().unwrap_err();
    assert!(matches!(err, DsaError::UnmappedActivity { folder } if folder == "Walking"));
}

#[test]
fn test_malformed_segment_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("data");
    write_tree(&root, &["a01"], 1, 2, 2);
    std::fs::write(root.join("a01/p1/s02.txt"), "1,2,3\n").unwrap();
    let output = dir.path().join("out.csv");

    let builder = DatasetBuilder::new(IngestConfig::new(&root).with_output(&output)).unwrap();
    let err = builder.run().unwrap_err();

    assert!(matches!(err, DsaError::ColumnCount { found: 3, .. }));
    assert!(!output.exists());
}

#[test]
fn test_subset_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("data");
    write_tree(&root, &["a01", "a02"], 1, 1, 10);
    let output = dir.path().join("full.csv");
    let subset_output = dir.path().join("full_subset.csv");

    let config = IngestConfig::new(&root).with_output(&output).with_subset(SubsetConfig {
        every: 4,
        output: subset_output.clone(),
    });
    let report = DatasetBuilder::new(config).unwrap().run().unwrap();

    assert_eq!(report.subset, Some((subset_output.clone(), 5)));
    let subset = Dataset::read_csv(&subset_output).unwrap();
    let full = Dataset::read_csv(&output).unwrap();
    assert_eq!(subset.rows()[1], full.rows()[4]);
}

#[test]
fn test_sensor_values_are_written_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("data");
    let pool = ["0.123456789", "16777217", "-9.80665012345", "123456.7890123", "0.000012345678901"];
    let cells: Vec<&str> = (0..CHANNEL_COUNT).map(|c| pool[c % pool.len()]).collect();
    std::fs::create_dir_all(root.join("a01/p1")).unwrap();
    std::fs::write(root.join("a01/p1/s01.txt"), format!("{}\n", cells.join(","))).unwrap();
    let output = dir.path().join("precise.csv");

    DatasetBuilder::new(IngestConfig::new(&root).with_output(&output))
        .unwrap()
        .run()
        .unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    let written: Vec<&str> = text.lines().nth(1).unwrap().split(',').take(CHANNEL_COUNT).collect();
    assert_eq!(written, cells);

    let dataset = Dataset::read_csv(&output).unwrap();
    let expected: Vec<f64> = cells.iter().map(|c| c.parse().unwrap()).collect();
    assert_eq!(dataset.rows()[0].channels.to_vec(), expected);
}
