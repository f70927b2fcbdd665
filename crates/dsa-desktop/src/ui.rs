//! UI state and the control panel

use crate::config::DashboardConfig;
use dsa_analysis::Camera;
use dsa_core::{
    Axis, DashboardMode, SensorCategory, Selection, UnitGroup, ACTIVITY_LABELS, PROMINENCE_RANGE, SUBJECTS,
};

/// Widget values; turned into a [`Selection`] snapshot for the chart builders
#[derive(Debug, Clone)]
pub struct UiState {
    // Panel visibility
    pub show_controls: bool,
    pub show_about: bool,

    // Control values
    pub subject: String,
    pub mode: DashboardMode,
    pub activity: String,
    pub unit_group: UnitGroup,
    pub sensor: SensorCategory,
    pub prominence: f32,
    pub activities: Vec<String>,
    pub boxplot_axis: Axis,

    // 3D view
    pub camera: Camera,
}

impl UiState {
    /// Initial state; the boxplot compares every activity present in the data
    pub fn new(config: &DashboardConfig, available_activities: &[String]) -> Self {
        let defaults = Selection::default();
        Self {
            show_controls: true,
            show_about: true,

            subject: config.default_subject.clone(),
            mode: defaults.mode,
            activity: defaults.activity,
            unit_group: defaults.unit_group,
            sensor: defaults.sensor,
            prominence: config.default_prominence,
            activities: available_activities.to_vec(),
            boxplot_axis: defaults.boxplot_axis,

            camera: Camera::default(),
        }
    }

    pub fn selection(&self) -> Selection {
        Selection {
            subject: self.subject.clone(),
            mode: self.mode,
            activity: self.activity.clone(),
            unit_group: self.unit_group,
            sensor: self.sensor,
            prominence: self.prominence,
            activities: self.activities.clone(),
            boxplot_axis: self.boxplot_axis,
        }
    }

    /// Add or remove `activity` from the boxplot set, keeping `available` order
    pub fn set_activity_selected(&mut self, activity: &str, selected: bool, available: &[String]) {
        let mut chosen: Vec<String> = available
            .iter()
            .filter(|name| {
                if name.as_str() == activity {
                    selected
                } else {
                    self.activities.contains(*name)
                }
            })
            .cloned()
            .collect();
        if selected && !chosen.iter().any(|name| name == activity) {
            chosen.push(activity.to_string());
        }
        self.activities = chosen;
    }
}

/// Control panel UI
pub struct ControlPanel;

impl ControlPanel {
    pub fn show(ui: &mut egui::Ui, state: &mut UiState, available_activities: &[String]) {
        ui.heading("Controls");
        ui.separator();

        ui.group(|ui| {
            ui.label("Which person would you like to select?");
            egui::ComboBox::from_id_source("subject_combo")
                .selected_text(state.subject.clone())
                .show_ui(ui, |ui| {
                    for subject in SUBJECTS {
                        ui.selectable_value(&mut state.subject, subject.to_string(), subject);
                    }
                });

            ui.label("Dashboard");
            for mode in DashboardMode::ALL {
                ui.radio_value(&mut state.mode, mode, mode.to_string());
            }
        });

        if state.mode != DashboardMode::Exploratory {
            return;
        }

        ui.separator();

        ui.group(|ui| {
            ui.label("Which activity would you like to analyze?");
            egui::ComboBox::from_id_source("activity_combo")
                .selected_text(state.activity.clone())
                .width(260.0)
                .show_ui(ui, |ui| {
                    for activity in ACTIVITY_LABELS {
                        ui.selectable_value(&mut state.activity, activity.to_string(), activity);
                    }
                });

            ui.label("What body unit do you want to specify on?");
            egui::ComboBox::from_id_source("unit_combo")
                .selected_text(state.unit_group.to_string())
                .show_ui(ui, |ui| {
                    for group in UnitGroup::ALL {
                        ui.selectable_value(&mut state.unit_group, group, group.to_string());
                    }
                });

            ui.label("Which sensors would you like to focus on?");
            egui::ComboBox::from_id_source("sensor_combo")
                .selected_text(state.sensor.to_string())
                .show_ui(ui, |ui| {
                    for sensor in SensorCategory::ALL {
                        ui.selectable_value(&mut state.sensor, sensor, sensor.to_string());
                    }
                });

            ui.label("Select the prominence to identify peaks:");
            let (low, high) = PROMINENCE_RANGE;
            ui.add(egui::Slider::new(&mut state.prominence, low..=high).step_by(0.01));
        });

        ui.separator();

        ui.group(|ui| {
            ui.label("Boxplot");

            ui.horizontal(|ui| {
                for axis in Axis::ALL {
                    ui.selectable_value(&mut state.boxplot_axis, axis, format!("{} {}", axis, state.sensor));
                }
            });

            egui::CollapsingHeader::new(format!("Activities ({} selected)", state.activities.len()))
                .id_source("boxplot_activities")
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui.small_button("All").clicked() {
                            state.activities = available_activities.to_vec();
                        }
                        if ui.small_button("None").clicked() {
                            state.activities.clear();
                        }
                    });

                    for activity in available_activities {
                        let mut selected = state.activities.contains(activity);
                        if ui.checkbox(&mut selected, activity.as_str()).changed() {
                            state.set_activity_selected(activity, selected, available_activities);
                        }
                    }
                });
        });

        ui.separator();
        ui.collapsing("Help", |ui| {
            ui.label("Controls:");
            ui.label("• Pick a subject and an activity to plot its recordings");
            ui.label("• Arms and Legs show the left and right units side by side");
            ui.label("• Raise the prominence to keep only pronounced peaks");
            ui.label("• The boxplot compares one axis across the checked activities");
            ui.label("• File → Open dataset loads another prebuilt table");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn available() -> Vec<String> {
        ["Sitting", "Jumping", "Rowing"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_initial_selection() {
        let mut config = DashboardConfig::default();
        config.default_subject = "p4".to_string();
        config.default_prominence = 1.5;

        let state = UiState::new(&config, &available());
        let selection = state.selection();
        assert_eq!(selection.subject, "p4");
        assert_eq!(selection.prominence, 1.5);
        assert_eq!(selection.activities, available());
        assert_eq!(selection.activity, "Sitting");
        assert!(selection.validate().is_ok());
    }

    #[test]
    fn test_activity_toggle_keeps_order() {
        let available = available();
        let mut state = UiState::new(&DashboardConfig::default(), &available);

        state.set_activity_selected("Sitting", false, &available);
        assert_eq!(state.activities, vec!["Jumping".to_string(), "Rowing".to_string()]);

        state.set_activity_selected("Sitting", true, &available);
        assert_eq!(state.activities, available);

        state.activities.clear();
        state.set_activity_selected("Rowing", true, &available);
        state.set_activity_selected("Sitting", true, &available);
        assert_eq!(state.activities, vec!["Sitting".to_string(), "Rowing".to_string()]);
    }

    #[test]
    fn test_selection_snapshot_is_independent() {
        let mut state = UiState::new(&DashboardConfig::default(), &available());
        let before = state.selection();
        state.unit_group = UnitGroup::Legs;
        state.prominence = 4.0;
        assert_ne!(state.selection(), before);
        assert_eq!(before.unit_group, UnitGroup::Torso);
    }
}
