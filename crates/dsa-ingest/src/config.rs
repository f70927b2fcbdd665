//! Configuration for a dataset build

use dsa_core::{ActivityMapping, DsaError, DsaResult, MappingMode, DEFAULT_DATASET_FILE, DEFAULT_SUBSET_FILE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where activity labels come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingSource {
    /// Built-in declared or positional mapping
    Mode(MappingMode),
    /// Explicit folder -> label table
    Table(ActivityMapping),
}

impl Default for MappingSource {
    fn default() -> Self {
        MappingSource::Mode(MappingMode::Declared)
    }
}

/// Reduced copy of the dataset for the explorer's fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetConfig {
    /// Keep every N-th row
    pub every: usize,
    pub output: PathBuf,
}

impl SubsetConfig {
    pub fn new(every: usize) -> Self {
        Self {
            every,
            output: PathBuf::from(DEFAULT_SUBSET_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Directory whose children are the activity folders
    pub root: PathBuf,
    /// Output file for the complete table
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default)]
    pub mapping: MappingSource,
    #[serde(default)]
    pub subset: Option<SubsetConfig>,
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_DATASET_FILE)
}

impl IngestConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output: default_output(),
            mapping: MappingSource::default(),
            subset: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_mapping(mut self, mapping: MappingSource) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn with_subset(mut self, subset: SubsetConfig) -> Self {
        self.subset = Some(subset);
        self
    }

    pub fn validate(&self) -> DsaResult<()> {
        if !self.root.is_dir() {
            return Err(DsaError::Configuration {
                message: format!("root {} is not a directory", self.root.display()),
            });
        }

        if self.output.as_os_str().is_empty() {
            return Err(DsaError::Configuration {
                message: "output path must not be empty".to_string(),
            });
        }

        if let MappingSource::Table(table) = &self.mapping {
            if table.is_empty() {
                return Err(DsaError::Configuration {
                    message: "activity label table is empty".to_string(),
                });
            }
        }

        if let Some(subset) = &self.subset {
            if subset.every < 2 {
                return Err(DsaError::Configuration {
                    message: format!("subset step must be at least 2, got {}", subset.every),
                });
            }
            if subset.output == self.output {
                return Err(DsaError::Configuration {
                    message: "subset output would overwrite the full dataset".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Export configuration to JSON
    pub fn to_json(&self) -> DsaResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DsaError::Configuration {
            message: format!("Failed to serialize configuration: {}", e),
        })
    }

    /// Import configuration from JSON
    pub fn from_json(json: &str) -> DsaResult<Self> {
        serde_json::from_str(json).map_err(|e| DsaError::Configuration {
            message: format!("Failed to deserialize configuration: {}", e),
        })
    }
}
