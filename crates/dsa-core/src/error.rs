//! Error handling for the dataset builder and explorer
//!
//! Every variant carries enough context (file, line, column) to point an
//! operator at the offending input without re-running under a debugger.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dataset operations
pub type DsaResult<T> = Result<T, DsaError>;

/// Error type for all dataset operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DsaError {
    /// Filesystem access failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Delimited-file reader/writer failure
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A segment record does not have the fixed channel count
    #[error("{path}, line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A cell could not be parsed as a number
    #[error("{path}, line {line}: column '{column}' has non-numeric value '{value}'")]
    InvalidValue {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    /// A dataset file lacks one of the required columns
    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    /// Activity folder has no label in the active mapping
    #[error("activity folder '{folder}' has no label in the activity mapping")]
    UnmappedActivity { folder: String },

    /// Positional mapping asked to label more folders than there are labels
    #[error("found {folders} activity folders but only {labels} activity labels")]
    TooManyActivities { folders: usize, labels: usize },

    /// The current selection matches no rows
    #[error("no recordings for subject '{subject}' and activity '{activity}'")]
    EmptySelection { subject: String, activity: String },

    /// Neither the full dataset nor the subset could be loaded
    #[error("no dataset available: {primary} ({primary_reason}); {subset} ({subset_reason})")]
    DatasetUnavailable {
        primary: PathBuf,
        primary_reason: String,
        subset: PathBuf,
        subset_reason: String,
    },

    /// Invalid configuration value
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl DsaError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DsaError::Io { path: path.into(), source }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        DsaError::Csv { path: path.into(), source }
    }
}

/// Convenience macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::error::DsaError::Configuration {
            message: format!($($arg)*),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DsaError::ColumnCount {
            path: PathBuf::from("a01/p1/s01.txt"),
            line: 7,
            expected: 45,
            found: 44,
        };
        let display = format!("{}", error);
        assert!(display.contains("s01.txt"));
        assert!(display.contains("line 7"));
        assert!(display.contains("45"));
        assert!(display.contains("44"));
    }

    #[test]
    fn test_config_error_macro() {
        let error = config_error!("prominence {} out of range", 25.0);
        assert_eq!(error.to_string(), "configuration error: prominence 25 out of range");
    }

    #[test]
    fn test_io_source_is_kept() {
        let error = DsaError::io(
            "missing.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(std::error::Error::source(&error).is_some());
    }
}
