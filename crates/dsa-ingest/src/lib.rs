//! DSA-Ingest: builds the flat recording table from the per-activity folder tree
//!
//! The input layout is `<root>/<activity>/<subject>/<segment file>`; the
//! output is one delimited file with the 45 sensor channels plus
//! `segment`, `subject`, `activity` and `activity_name`.

pub mod builder;
pub mod config;
pub mod segment;

pub use builder::{assemble, read_activity, read_subject, ActivityTable, BuildReport, DatasetBuilder, SegmentTable, SubjectTable};
pub use config::{IngestConfig, MappingSource, SubsetConfig};
pub use segment::{parse_segment, read_segment, segment_id};
