//! Folder-to-table ingestion
//!
//! Walks `<root>/<activity>/<subject>/<segment file>`, reads every segment and
//! concatenates bottom-up: segments per subject, subjects per activity,
//! activities into the final table. Labels are attached last, from a mapping
//! built once before the walk.

use crate::config::{IngestConfig, MappingSource};
use crate::segment::{read_segment, segment_id};
use dsa_core::{ActivityMapping, Dataset, DsaError, DsaResult, RecordingRow, Samples};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Samples of one segment file
#[derive(Debug, Clone)]
pub struct SegmentTable {
    pub segment: Arc<str>,
    pub samples: Vec<Samples>,
}

/// Segments of one subject, in listing order
#[derive(Debug, Clone)]
pub struct SubjectTable {
    pub subject: Arc<str>,
    pub segments: Vec<SegmentTable>,
}

impl SubjectTable {
    pub fn row_count(&self) -> usize {
        self.segments.iter().map(|s| s.samples.len()).sum()
    }
}

/// Subjects of one activity folder, in listing order
#[derive(Debug, Clone)]
pub struct ActivityTable {
    pub activity: Arc<str>,
    pub subjects: Vec<SubjectTable>,
}

impl ActivityTable {
    pub fn row_count(&self) -> usize {
        self.subjects.iter().map(SubjectTable::row_count).sum()
    }
}

/// Summary of a finished build
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub rows: usize,
    pub activities: usize,
    pub subjects: usize,
    pub segments: usize,
    pub output: PathBuf,
    /// Subset file and its row count, when one was written
    pub subset: Option<(PathBuf, usize)>,
}

/// Offline batch job producing the flat dataset file
pub struct DatasetBuilder {
    config: IngestConfig,
}

impl DatasetBuilder {
    pub fn new(config: IngestConfig) -> DsaResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Activity folders under the root, sorted by name
    pub fn activity_folders(&self) -> DsaResult<Vec<String>> {
        list_entries(&self.config.root, EntryKind::Directory)
    }

    /// Resolve the mapping for this run and check every folder is covered
    pub fn mapping(&self, folders: &[String]) -> DsaResult<ActivityMapping> {
        let mapping = match &self.config.mapping {
            MappingSource::Mode(mode) => ActivityMapping::for_mode(*mode, folders)?,
            MappingSource::Table(table) => table.clone(),
        };
        mapping.check_covers(folders)?;
        Ok(mapping)
    }

    /// Read the whole tree into one labelled table
    pub fn build(&self) -> DsaResult<Dataset> {
        let folders = self.activity_folders()?;
        let mapping = self.mapping(&folders)?;
        info!(
            root = %self.config.root.display(),
            activities = folders.len(),
            "building dataset"
        );

        let activities = folders
            .iter()
            .map(|folder| read_activity(&self.config.root, folder))
            .collect::<DsaResult<Vec<_>>>()?;

        assemble(activities, &mapping)
    }

    /// Build and write the output (and the subset, if configured)
    pub fn run(&self) -> DsaResult<BuildReport> {
        let dataset = self.build()?;

        info!(path = %self.config.output.display(), rows = dataset.len(), "writing complete dataset to file");
        dataset.write_csv(&self.config.output)?;

        let subset = match &self.config.subset {
            Some(subset) => {
                let reduced = dataset.every_nth(subset.every);
                info!(
                    path = %subset.output.display(),
                    rows = reduced.len(),
                    every = subset.every,
                    "writing subset dataset"
                );
                reduced.write_csv(&subset.output)?;
                Some((subset.output.clone(), reduced.len()))
            }
            None => None,
        };

        let report = BuildReport {
            rows: dataset.len(),
            activities: dataset.activity_names().len(),
            subjects: dataset.subjects().len(),
            segments: count_segments(&dataset),
            output: self.config.output.clone(),
            subset,
        };
        info!(rows = report.rows, segments = report.segments, "completed");
        Ok(report)
    }
}

/// Read every subject of one activity folder
pub fn read_activity(root: &Path, activity: &str) -> DsaResult<ActivityTable> {
    info!(activity, "reading activity");
    let dir = root.join(activity);

    let subjects = list_entries(&dir, EntryKind::Directory)?
        .iter()
        .map(|subject| read_subject(&dir, activity, subject))
        .collect::<DsaResult<Vec<_>>>()?;

    Ok(ActivityTable {
        activity: Arc::from(activity),
        subjects,
    })
}

/// Read every segment file of one subject folder
pub fn read_subject(activity_dir: &Path, activity: &str, subject: &str) -> DsaResult<SubjectTable> {
    info!(activity, subject, "reading subject");
    let dir = activity_dir.join(subject);

    let mut segments = Vec::new();
    for file in list_entries(&dir, EntryKind::File)? {
        let path = dir.join(&file);
        let samples = read_segment(&path)?;
        debug!(activity, subject, segment = %file, rows = samples.len(), "read segment");
        segments.push(SegmentTable {
            segment: Arc::from(segment_id(&path)),
            samples,
        });
    }

    Ok(SubjectTable {
        subject: Arc::from(subject),
        segments,
    })
}

/// Concatenate the activity tables and attach display labels
pub fn assemble(activities: Vec<ActivityTable>, mapping: &ActivityMapping) -> DsaResult<Dataset> {
    let total = activities.iter().map(ActivityTable::row_count).sum();
    let mut rows = Vec::with_capacity(total);

    for table in activities {
        let activity_name: Arc<str> = Arc::from(mapping.require(&table.activity)?);
        for subject in table.subjects {
            for segment in subject.segments {
                rows.extend(segment.samples.into_iter().map(|channels| RecordingRow {
                    channels,
                    segment: segment.segment.clone(),
                    subject: subject.subject.clone(),
                    activity: table.activity.clone(),
                    activity_name: activity_name.clone(),
                }));
            }
        }
    }

    Ok(Dataset::new(rows))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Directory,
    File,
}

/// Sorted names of the directory's children of `kind`, hidden entries skipped
fn list_entries(dir: &Path, kind: EntryKind) -> DsaResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| DsaError::io(dir, e))? {
        let entry = entry.map_err(|e| DsaError::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        let matches = match kind {
            EntryKind::Directory => path.is_dir(),
            EntryKind::File => path.is_file(),
        };
        if matches {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Distinct (activity, subject, segment) triples
fn count_segments(dataset: &Dataset) -> usize {
    let mut count = 0;
    let mut previous: Option<&RecordingRow> = None;
    for row in dataset.rows() {
        let same = previous.map_or(false, |p| {
            Arc::ptr_eq(&p.segment, &row.segment)
                && Arc::ptr_eq(&p.subject, &row.subject)
                && Arc::ptr_eq(&p.activity, &row.activity)
        });
        if !same {
            count += 1;
        }
        previous = Some(row);
    }
    count
}
