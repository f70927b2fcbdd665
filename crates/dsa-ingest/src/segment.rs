//! Segment file parsing
//!
//! A segment file is one recording session: header-less, comma-delimited,
//! exactly [`CHANNEL_COUNT`] numeric columns per line, one line per sample.

use dsa_core::{column_names, DsaError, DsaResult, Samples, CHANNEL_COUNT};
use std::io::Read;
use std::path::Path;

/// Segment identifier: the file name with its extension removed
pub fn segment_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn read_segment(path: &Path) -> DsaResult<Vec<Samples>> {
    let file = std::fs::File::open(path).map_err(|e| DsaError::io(path, e))?;
    parse_segment(std::io::BufReader::new(file), path)
}

/// Parse segment samples; any malformed line fails the whole segment
pub fn parse_segment<R: Read>(reader: R, path: &Path) -> DsaResult<Vec<Samples>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    let mut record = csv::StringRecord::new();
    let mut names: Option<Vec<String>> = None;

    while reader.read_record(&mut record).map_err(|e| DsaError::csv(path, e))? {
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != CHANNEL_COUNT {
            return Err(DsaError::ColumnCount {
                path: path.to_path_buf(),
                line,
                expected: CHANNEL_COUNT,
                found: record.len(),
            });
        }

        let mut sample = [0.0f64; CHANNEL_COUNT];
        for (i, (slot, raw)) in sample.iter_mut().zip(record.iter()).enumerate() {
            *slot = match raw.parse() {
                Ok(value) => value,
                Err(_) => {
                    let names = names.get_or_insert_with(column_names);
                    return Err(DsaError::InvalidValue {
                        path: path.to_path_buf(),
                        line,
                        column: names[i].clone(),
                        value: raw.to_string(),
                    });
                }
            };
        }
        samples.push(sample);
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(value: &str) -> String {
        vec![value; CHANNEL_COUNT].join(",")
    }

    #[test]
    fn test_segment_id_strips_extension() {
        assert_eq!(segment_id(Path::new("a01/p1/s01.txt")), "s01");
        assert_eq!(segment_id(Path::new("seg2.csv")), "seg2");
        assert_eq!(segment_id(Path::new("noext")), "noext");
    }

    #[test]
    fn test_parse_rows_in_order() {
        let text = format!("{}\n{}\n{}\n", line("1"), line("-2.5"), line("3e-1"));
        let samples = parse_segment(text.as_bytes(), Path::new("s01.txt")).unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0][0], 1.0);
        assert_eq!(samples[1][44], -2.5);
        assert_eq!(samples[2][10], 0.3);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let text = vec![" 0.5"; CHANNEL_COUNT].join(",");
        let samples = parse_segment(text.as_bytes(), Path::new("s01.txt")).unwrap();
        assert_eq!(samples[0][7], 0.5);
    }

    #[test]
    fn test_wrong_column_count() {
        let short = vec!["0"; CHANNEL_COUNT - 1].join(",");
        let text = format!("{}\n{}\n", line("0"), short);
        let err = parse_segment(text.as_bytes(), Path::new("s07.txt")).unwrap_err();
        assert!(matches!(
            err,
            DsaError::ColumnCount { line: 2, expected: 45, found: 44, .. }
        ));
    }

    #[test]
    fn test_non_numeric_value() {
        let mut cells = vec!["0"; CHANNEL_COUNT];
        cells[20] = "x";
        let text = cells.join(",");
        let err = parse_segment(text.as_bytes(), Path::new("s01.txt")).unwrap_err();
        assert!(matches!(err, DsaError::InvalidValue { column, .. } if column == "LA_zacc"));
    }

    #[test]
    fn test_empty_segment() {
        let samples = parse_segment(&b""[..], Path::new("empty.txt")).unwrap();
        assert!(samples.is_empty());
    }
}
