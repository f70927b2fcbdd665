//! Activity folder to display label mapping

use crate::error::{DsaError, DsaResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The 19 canonical activity labels, in dataset order
pub const ACTIVITY_LABELS: [&str; 19] = [
    "Sitting",
    "Standing",
    "Lying on Back",
    "Lying on Right Side",
    "Ascending Stairs",
    "Descending Stairs",
    "Standing in an Elevator",
    "Moving in an Elevator",
    "Walking in a Parking Lot",
    "Walking on a Treadmill",
    "Walking on a Treadmill with an Incline",
    "Running on a Treadmill",
    "Exercising on a Stepper",
    "Exercising on a Cross Trainer",
    "Cycling on an Exercise Bike in a Horizontal Position",
    "Cycling on an Exercise Bike in a Vertical Position",
    "Rowing",
    "Jumping",
    "Playing Basketball",
];

/// How folder names are turned into labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingMode {
    /// Folder `aNN` maps to label NN of [`ACTIVITY_LABELS`]
    #[default]
    Declared,
    /// Sorted folder N maps to label N, whatever the folder is called
    Positional,
}

/// Explicit folder -> label table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityMapping {
    labels: BTreeMap<String, String>,
}

impl ActivityMapping {
    /// Mapping for the published folder layout `a01` .. `a19`
    pub fn declared() -> Self {
        let labels = ACTIVITY_LABELS
            .iter()
            .enumerate()
            .map(|(i, label)| (format!("a{:02}", i + 1), label.to_string()))
            .collect();
        Self { labels }
    }

    /// Label folders by their position in `folders`.
    ///
    /// The caller is responsible for passing a stable (sorted) listing.
    pub fn positional(folders: &[String]) -> DsaResult<Self> {
        if folders.len() > ACTIVITY_LABELS.len() {
            return Err(DsaError::TooManyActivities {
                folders: folders.len(),
                labels: ACTIVITY_LABELS.len(),
            });
        }

        let labels = folders
            .iter()
            .zip(ACTIVITY_LABELS.iter())
            .map(|(folder, label)| (folder.clone(), label.to_string()))
            .collect();
        Ok(Self { labels })
    }

    pub fn from_pairs<I, F, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, L)>,
        F: Into<String>,
        L: Into<String>,
    {
        let labels = pairs
            .into_iter()
            .map(|(folder, label)| (folder.into(), label.into()))
            .collect();
        Self { labels }
    }

    /// Build the mapping for `mode` over an activity-folder listing
    pub fn for_mode(mode: MappingMode, folders: &[String]) -> DsaResult<Self> {
        match mode {
            MappingMode::Declared => Ok(Self::declared()),
            MappingMode::Positional => Self::positional(folders),
        }
    }

    pub fn label_for(&self, folder: &str) -> Option<&str> {
        self.labels.get(folder).map(String::as_str)
    }

    /// Label lookup that fails instead of leaving a row unlabelled
    pub fn require(&self, folder: &str) -> DsaResult<&str> {
        self.label_for(folder).ok_or_else(|| DsaError::UnmappedActivity {
            folder: folder.to_string(),
        })
    }

    /// Every folder of `folders` must have a label
    pub fn check_covers(&self, folders: &[String]) -> DsaResult<()> {
        for folder in folders {
            self.require(folder)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(f, l)| (f.as_str(), l.as_str()))
    }

    /// Load a `{ "folder": "label" }` JSON object
    pub fn from_json(json: &str) -> DsaResult<Self> {
        let labels: BTreeMap<String, String> =
            serde_json::from_str(json).map_err(|e| DsaError::Configuration {
                message: format!("invalid activity label table: {}", e),
            })?;
        Ok(Self { labels })
    }
}

impl Default for ActivityMapping {
    fn default() -> Self {
        Self::declared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_mapping() {
        let mapping = ActivityMapping::declared();
        assert_eq!(mapping.len(), 19);
        assert_eq!(mapping.label_for("a01"), Some("Sitting"));
        assert_eq!(mapping.label_for("a10"), Some("Walking on a Treadmill"));
        assert_eq!(mapping.label_for("a19"), Some("Playing Basketball"));
        assert_eq!(mapping.label_for("a20"), None);
    }

    #[test]
    fn test_unknown_folder_is_an_error() {
        let mapping = ActivityMapping::declared();
        let err = mapping.require("Walking").unwrap_err();
        assert!(matches!(err, DsaError::UnmappedActivity { folder } if folder == "Walking"));
    }

    #[test]
    fn test_positional_mapping() {
        let folders: Vec<String> = ["Jumping", "Rowing", "Walking"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mapping = ActivityMapping::positional(&folders).unwrap();
        for (i, folder) in folders.iter().enumerate() {
            assert_eq!(mapping.label_for(folder), Some(ACTIVITY_LABELS[i]));
        }
    }

    #[test]
    fn test_positional_rejects_extra_folders() {
        let folders: Vec<String> = (0..20).map(|i| format!("f{:02}", i)).collect();
        assert!(matches!(
            ActivityMapping::positional(&folders),
            Err(DsaError::TooManyActivities { folders: 20, labels: 19 })
        ));
    }

    #[test]
    fn test_label_table_from_json() {
        let mapping = ActivityMapping::from_json(r#"{"walk": "Walking in a Parking Lot"}"#).unwrap();
        assert_eq!(mapping.label_for("walk"), Some("Walking in a Parking Lot"));
        assert!(ActivityMapping::from_json("[1, 2]").is_err());
    }
}
