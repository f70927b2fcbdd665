//! Dashboard selection state
//!
//! A [`Selection`] is an immutable snapshot of every control value. It is
//! rebuilt from the widgets on each interaction and handed explicitly to the
//! chart builders, which read nothing else.

use crate::activity::ACTIVITY_LABELS;
use crate::channels::{resolve_channels, Axis, BodyUnit, ChannelSelection, SensorCategory, UnitGroup};
use crate::error::{DsaError, DsaResult};
use serde::{Deserialize, Serialize};

/// Subject identifiers offered by the subject picker
pub const SUBJECTS: [&str; 9] = ["p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8", "p9"];

/// Peak prominence slider bounds
pub const PROMINENCE_RANGE: (f32, f32) = (0.0, 20.0);

/// Initial peak prominence
pub const DEFAULT_PROMINENCE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashboardMode {
    #[default]
    Exploratory,
    MachineLearning,
}

impl DashboardMode {
    pub const ALL: [DashboardMode; 2] = [DashboardMode::Exploratory, DashboardMode::MachineLearning];
}

impl std::fmt::Display for DashboardMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardMode::Exploratory => write!(f, "Exploratory Data Analysis"),
            DashboardMode::MachineLearning => write!(f, "Machine Learning"),
        }
    }
}

/// Snapshot of all dashboard controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub subject: String,
    pub mode: DashboardMode,
    /// Activity label for the single-activity charts
    pub activity: String,
    pub unit_group: UnitGroup,
    pub sensor: SensorCategory,
    /// Minimum peak prominence for the line chart
    pub prominence: f32,
    /// Activity labels compared in the boxplot
    pub activities: Vec<String>,
    /// Channel compared in the boxplot
    pub boxplot_axis: Axis,
}

impl Selection {
    /// Channels for every unit the selected group renders
    pub fn channel_sets(&self) -> Vec<ChannelSelection> {
        self.unit_group
            .units()
            .iter()
            .map(|&unit| resolve_channels(self.sensor, unit))
            .collect()
    }

    pub fn channels_for(&self, unit: BodyUnit) -> ChannelSelection {
        resolve_channels(self.sensor, unit)
    }

    /// Label of the boxplot axis picker, e.g. "X Accelerometers"
    pub fn boxplot_label(&self) -> String {
        format!("{} {}", self.boxplot_axis, self.sensor)
    }

    /// Reject values no widget can produce
    pub fn validate(&self) -> DsaResult<()> {
        let (low, high) = PROMINENCE_RANGE;
        if !(low..=high).contains(&self.prominence) {
            return Err(DsaError::Configuration {
                message: format!(
                    "prominence {} outside {}..={}",
                    self.prominence, low, high
                ),
            });
        }
        if self.subject.is_empty() {
            return Err(DsaError::Configuration {
                message: "no subject selected".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            subject: SUBJECTS[0].to_string(),
            mode: DashboardMode::Exploratory,
            activity: ACTIVITY_LABELS[0].to_string(),
            unit_group: UnitGroup::Torso,
            sensor: SensorCategory::Accelerometer,
            prominence: DEFAULT_PROMINENCE,
            activities: ACTIVITY_LABELS.iter().map(|s| s.to_string()).collect(),
            boxplot_axis: Axis::X,
        }
    }
}
