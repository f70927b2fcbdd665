//! Dashboard configuration, read from `dsa-dashboard.json` when present

use dsa_analysis::ChartConfig;
use dsa_core::{
    DsaError, DsaResult, DEFAULT_DATASET_FILE, DEFAULT_PROMINENCE, DEFAULT_SUBSET_FILE,
    PROMINENCE_RANGE, SUBJECTS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_FILE: &str = "dsa-dashboard.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Complete dataset, tried first
    pub dataset: PathBuf,
    /// Reduced dataset used when the complete one cannot be loaded
    pub subset: PathBuf,
    pub default_subject: String,
    pub default_prominence: f32,
    pub charts: ChartConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET_FILE),
            subset: PathBuf::from(DEFAULT_SUBSET_FILE),
            default_subject: SUBJECTS[0].to_string(),
            default_prominence: DEFAULT_PROMINENCE,
            charts: ChartConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Read `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> DsaResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path).map_err(|e| DsaError::io(path, e))?;
        let config = Self::from_json(&json)?;
        config.validate()?;
        info!(path = %path.display(), "loaded dashboard configuration");
        Ok(config)
    }

    pub fn validate(&self) -> DsaResult<()> {
        if !SUBJECTS.contains(&self.default_subject.as_str()) {
            return Err(DsaError::Configuration {
                message: format!("unknown default subject '{}'", self.default_subject),
            });
        }

        let (low, high) = PROMINENCE_RANGE;
        if !(low..=high).contains(&self.default_prominence) {
            return Err(DsaError::Configuration {
                message: format!(
                    "default prominence {} outside {}..={}",
                    self.default_prominence, low, high
                ),
            });
        }

        self.charts.validate()
    }

    /// Export configuration to JSON
    pub fn to_json(&self) -> DsaResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DsaError::Configuration {
            message: format!("Failed to serialize dashboard configuration: {}", e),
        })
    }

    /// Import configuration from JSON
    pub fn from_json(json: &str) -> DsaResult<Self> {
        serde_json::from_str(json).map_err(|e| DsaError::Configuration {
            message: format!("Failed to deserialize dashboard configuration: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.dataset, PathBuf::from("sports_science_dataset.csv"));
        assert_eq!(config.subset, PathBuf::from("sports_science_dataset_subset.csv"));
        assert_eq!(config.default_prominence, 0.01);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = DashboardConfig::load_or_default(Path::new("/nonexistent/dsa-dashboard.json")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_validation() {
        let mut config = DashboardConfig::default();
        config.default_subject = "p10".to_string();
        assert!(config.validate().is_err());

        config.default_subject = "p3".to_string();
        config.default_prominence = 25.0;
        assert!(config.validate().is_err());

        config.default_prominence = 2.0;
        config.charts.max_bins = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let config = DashboardConfig::from_json(
            r#"{"dataset": "data/full.csv", "charts": {"kde_points": 64}}"#,
        )
        .unwrap();
        assert_eq!(config.dataset, PathBuf::from("data/full.csv"));
        assert_eq!(config.subset, PathBuf::from(DEFAULT_SUBSET_FILE));
        assert_eq!(config.charts.kde_points, 64);
        assert_eq!(config.charts.max_bins, 100);

        let json = config.to_json().unwrap();
        assert_eq!(DashboardConfig::from_json(&json).unwrap(), config);
    }
}
