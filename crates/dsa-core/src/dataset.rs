//! Dataset: the flat table of recording rows shared by builder and explorer

use crate::channels::{column_names, ChannelId, CHANNEL_COUNT};
use crate::error::{DsaError, DsaResult};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// One time sample of the 45 sensor channels
pub type Samples = [f64; CHANNEL_COUNT];

/// Provenance columns appended after the sensor channels, in file order
pub const PROVENANCE_COLUMNS: [&str; 4] = ["segment", "subject", "activity", "activity_name"];

/// Default file written by the builder and read by the explorer
pub const DEFAULT_DATASET_FILE: &str = "sports_science_dataset.csv";

/// Reduced file the explorer falls back to
pub const DEFAULT_SUBSET_FILE: &str = "sports_science_dataset_subset.csv";

/// One recording row with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingRow {
    pub channels: Samples,
    /// Source file name without extension
    pub segment: Arc<str>,
    pub subject: Arc<str>,
    /// Raw activity folder name
    pub activity: Arc<str>,
    /// Mapped display label
    pub activity_name: Arc<str>,
}

impl RecordingRow {
    pub fn value(&self, channel: ChannelId) -> f64 {
        self.channels[channel.index]
    }
}

/// Full header: 45 channels followed by the provenance columns
pub fn header() -> Vec<String> {
    let mut header = column_names();
    header.extend(PROVENANCE_COLUMNS.iter().map(|c| c.to_string()));
    header
}

/// Flat, insertion-ordered table of recording rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<RecordingRow>,
}

impl Dataset {
    pub fn new(rows: Vec<RecordingRow>) -> Self {
        Self { rows }
    }

    /// Row-wise concatenation preserving part order
    pub fn concat<I: IntoIterator<Item = Dataset>>(parts: I) -> Self {
        let mut rows = Vec::new();
        for part in parts {
            rows.extend(part.rows);
        }
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[RecordingRow] {
        &self.rows
    }

    /// Distinct subjects in first-appearance order
    pub fn subjects(&self) -> Vec<&str> {
        distinct(self.rows.iter().map(|row| &*row.subject))
    }

    /// Distinct activity labels in first-appearance order
    pub fn activity_names(&self) -> Vec<&str> {
        distinct(self.rows.iter().map(|row| &*row.activity_name))
    }

    pub fn filter<P>(&self, predicate: P) -> DatasetView<'_>
    where
        P: Fn(&RecordingRow) -> bool,
    {
        DatasetView {
            rows: self.rows.iter().filter(|row| predicate(row)).collect(),
        }
    }

    /// Rows of one subject performing one activity
    pub fn for_subject_activity(&self, subject: &str, activity_name: &str) -> DatasetView<'_> {
        self.filter(|row| &*row.subject == subject && &*row.activity_name == activity_name)
    }

    /// Rows of one subject across a set of activities
    pub fn for_subject_activities(&self, subject: &str, activity_names: &[String]) -> DatasetView<'_> {
        self.filter(|row| {
            &*row.subject == subject && activity_names.iter().any(|name| **name == *row.activity_name)
        })
    }

    /// Every `step`-th row, starting with the first
    pub fn every_nth(&self, step: usize) -> Dataset {
        let step = step.max(1);
        Dataset {
            rows: self.rows.iter().step_by(step).cloned().collect(),
        }
    }

    /// Write with header row and no index column
    pub fn write_csv(&self, path: impl AsRef<Path>) -> DsaResult<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| DsaError::io(path, e))?;
        self.write_to(std::io::BufWriter::new(file), path)
    }

    pub fn write_to<W: Write>(&self, writer: W, path: &Path) -> DsaResult<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer
            .write_record(header())
            .map_err(|e| DsaError::csv(path, e))?;

        let mut record = csv::StringRecord::with_capacity(1024, CHANNEL_COUNT + PROVENANCE_COLUMNS.len());
        for row in &self.rows {
            record.clear();
            for value in &row.channels {
                record.push_field(&value.to_string());
            }
            record.push_field(&row.segment);
            record.push_field(&row.subject);
            record.push_field(&row.activity);
            record.push_field(&row.activity_name);
            writer.write_record(&record).map_err(|e| DsaError::csv(path, e))?;
        }

        writer.flush().map_err(|e| DsaError::io(path, e))
    }

    pub fn read_csv(path: impl AsRef<Path>) -> DsaResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| DsaError::io(path, e))?;
        Self::read_from(std::io::BufReader::new(file), path)
    }

    /// Read a dataset file, locating columns by header name
    pub fn read_from<R: Read>(reader: R, path: &Path) -> DsaResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = reader.headers().map_err(|e| DsaError::csv(path, e))?.clone();
        let locate = |name: &str| -> DsaResult<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DsaError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };

        let channel_columns = column_names();
        let channel_positions = channel_columns
            .iter()
            .map(|name| locate(name))
            .collect::<DsaResult<Vec<_>>>()?;
        let [segment_at, subject_at, activity_at, name_at] = [
            locate(PROVENANCE_COLUMNS[0])?,
            locate(PROVENANCE_COLUMNS[1])?,
            locate(PROVENANCE_COLUMNS[2])?,
            locate(PROVENANCE_COLUMNS[3])?,
        ];

        let mut interner = Interner::default();
        let mut rows = Vec::new();
        let mut record = csv::StringRecord::new();

        while reader.read_record(&mut record).map_err(|e| DsaError::csv(path, e))? {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let field = |at: usize| record.get(at).unwrap_or("");

            let mut channels = [0.0f64; CHANNEL_COUNT];
            for (slot, (&at, name)) in channels
                .iter_mut()
                .zip(channel_positions.iter().zip(channel_columns.iter()))
            {
                let raw = field(at).trim();
                *slot = raw.parse().map_err(|_| DsaError::InvalidValue {
                    path: path.to_path_buf(),
                    line,
                    column: name.clone(),
                    value: raw.to_string(),
                })?;
            }

            rows.push(RecordingRow {
                channels,
                segment: interner.intern(field(segment_at)),
                subject: interner.intern(field(subject_at)),
                activity: interner.intern(field(activity_at)),
                activity_name: interner.intern(field(name_at)),
            });
        }

        Ok(Self { rows })
    }
}

/// Borrowed subset of a dataset's rows, in dataset order
#[derive(Debug, Clone, Default)]
pub struct DatasetView<'a> {
    rows: Vec<&'a RecordingRow>,
}

impl<'a> DatasetView<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[&'a RecordingRow] {
        &self.rows
    }

    /// Values of one channel in row order
    pub fn column(&self, channel: ChannelId) -> Vec<f64> {
        self.rows.iter().map(|row| row.value(channel)).collect()
    }

    /// One channel split by activity label, groups in first-appearance order
    pub fn column_by_activity(&self, channel: ChannelId) -> Vec<(&'a str, Vec<f64>)> {
        let mut groups: Vec<(&'a str, Vec<f64>)> = Vec::new();
        for &row in &self.rows {
            let name: &'a str = &row.activity_name;
            match groups.iter_mut().find(|(label, _)| *label == name) {
                Some((_, values)) => values.push(row.value(channel)),
                None => groups.push((name, vec![row.value(channel)])),
            }
        }
        groups
    }
}

/// Outcome of [`load_with_fallback`]
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Arc<Dataset>,
    pub source: PathBuf,
    pub used_fallback: bool,
}

/// Load `primary`; on any failure (missing or corrupt) load `subset` instead.
pub fn load_with_fallback(primary: impl AsRef<Path>, subset: impl AsRef<Path>) -> DsaResult<LoadedDataset> {
    let primary = primary.as_ref();
    let subset = subset.as_ref();

    let primary_err = match Dataset::read_csv(primary) {
        Ok(dataset) => {
            info!(path = %primary.display(), rows = dataset.len(), "loaded dataset");
            return Ok(LoadedDataset {
                dataset: Arc::new(dataset),
                source: primary.to_path_buf(),
                used_fallback: false,
            });
        }
        Err(e) => e,
    };

    warn!(path = %primary.display(), error = %primary_err, "full dataset unavailable, trying subset");

    match Dataset::read_csv(subset) {
        Ok(dataset) => {
            info!(path = %subset.display(), rows = dataset.len(), "loaded subset dataset");
            Ok(LoadedDataset {
                dataset: Arc::new(dataset),
                source: subset.to_path_buf(),
                used_fallback: true,
            })
        }
        Err(subset_err) => Err(DsaError::DatasetUnavailable {
            primary: primary.to_path_buf(),
            primary_reason: primary_err.to_string(),
            subset: subset.to_path_buf(),
            subset_reason: subset_err.to_string(),
        }),
    }
}

fn distinct<'a, I: Iterator<Item = &'a str>>(values: I) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Shares one allocation per distinct provenance string
#[derive(Default)]
struct Interner {
    strings: HashMap<String, Arc<str>>,
}

impl Interner {
    fn intern(&mut self, value: &str) -> Arc<str> {
        if let Some(shared) = self.strings.get(value) {
            return shared.clone();
        }
        let shared: Arc<str> = Arc::from(value);
        self.strings.insert(value.to_string(), shared.clone());
        shared
    }
}
