//! Chart derivation settings

use dsa_core::{DsaError, DsaResult};
use serde::{Deserialize, Serialize};

/// RGB colour as stored in configuration files
pub type Rgb = [u8; 3];

/// Parameters shared by every chart builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Grid points of the density curve
    pub kde_points: usize,
    /// Upper bound on histogram bins
    pub max_bins: usize,
    /// Whisker reach in IQR units
    pub whisker: f64,
    /// Line colours for the X, Y and Z panels
    pub axis_colors: [Rgb; 3],
    /// Peak marker colour
    pub peak_color: Rgb,
    /// Points in the 3D scatter; longer views are decimated evenly
    pub max_scatter_points: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            kde_points: 200,
            max_bins: 100,
            whisker: 1.5,
            axis_colors: [[31, 119, 180], [255, 127, 14], [44, 160, 44]],
            peak_color: [214, 39, 40],
            max_scatter_points: 20_000,
        }
    }
}

impl ChartConfig {
    pub fn validate(&self) -> DsaResult<()> {
        if self.kde_points < 2 {
            return Err(DsaError::Configuration {
                message: "KDE needs at least 2 grid points".to_string(),
            });
        }

        if self.max_bins == 0 {
            return Err(DsaError::Configuration {
                message: "Histogram bin limit must be greater than 0".to_string(),
            });
        }

        if !(self.whisker.is_finite() && self.whisker >= 0.0) {
            return Err(DsaError::Configuration {
                message: format!("Whisker factor must be a non-negative number, got {}", self.whisker),
            });
        }

        if self.max_scatter_points == 0 {
            return Err(DsaError::Configuration {
                message: "Scatter point limit must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Export configuration to JSON
    pub fn to_json(&self) -> DsaResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DsaError::Configuration {
            message: format!("Failed to serialize chart configuration: {}", e),
        })
    }

    /// Import configuration from JSON
    pub fn from_json(json: &str) -> DsaResult<Self> {
        serde_json::from_str(json).map_err(|e| DsaError::Configuration {
            message: format!("Failed to deserialize chart configuration: {}", e),
        })
    }
}
