//! Main application state and logic

use crate::config::DashboardConfig;
use crate::plots;
use crate::ui::{ControlPanel, UiState};
use dsa_analysis::{build_charts, UnitCharts};
use dsa_core::{load_with_fallback, DashboardMode, Dataset, LoadedDataset, Selection};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

const ABOUT: &str = "This dataset contains eight subjects (4 males, 4 females, between the ages \
of 20 and 30) that performed 19 activities for 5 minutes at the Bilkent University Sports Hall, \
in the Electrical and Electronics Engineering Building and in a flat outdoor area on campus. \
The subjects performed the activities in their own style, so expect variation between subjects \
for the same activity. Each recording is split into segments s01..s60.\n\n\
Units: T - Torso, LA & RA - Left Arm & Right Arm, LL & RL - Left Leg & Right Leg. \
Sensors: accelerometers, gyroscopes and magnetometers in the x, y and z directions.";

/// Main application state
pub struct ExplorerApp {
    config: DashboardConfig,
    loaded: Option<LoadedDataset>,
    /// Last load failure, shown in place of the charts
    load_error: Option<String>,

    pub ui_state: UiState,

    // Charts for `charts_for`; rebuilt when the selection changes
    charts: Vec<UnitCharts>,
    charts_for: Option<Selection>,
}

impl ExplorerApp {
    /// Load the configured dataset, falling back to the subset file
    pub fn new(config: DashboardConfig) -> Self {
        let (loaded, load_error) = match load_with_fallback(&config.dataset, &config.subset) {
            Ok(loaded) => (Some(loaded), None),
            Err(e) => {
                warn!(error = %e, "no dataset loaded");
                (None, Some(e.to_string()))
            }
        };

        let available = loaded
            .as_ref()
            .map(|l| activity_names(&l.dataset))
            .unwrap_or_default();
        let ui_state = UiState::new(&config, &available);

        Self {
            config,
            loaded,
            load_error,
            ui_state,
            charts: Vec::new(),
            charts_for: None,
        }
    }

    /// Replace the current dataset with a prebuilt table picked by the user
    pub fn open_dataset(&mut self, path: PathBuf) {
        match Dataset::read_csv(&path) {
            Ok(dataset) => {
                info!(path = %path.display(), rows = dataset.len(), "opened dataset");
                self.ui_state.activities = activity_names(&dataset);
                self.loaded = Some(LoadedDataset {
                    dataset: Arc::new(dataset),
                    source: path,
                    used_fallback: false,
                });
                self.load_error = None;
                self.charts_for = None;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to open dataset");
                self.load_error = Some(e.to_string());
            }
        }
    }

    fn pick_dataset(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_directory(".")
            .pick_file();
        if let Some(path) = picked {
            self.open_dataset(path);
        }
    }

    /// Rebuild the charts if the selection changed since the last frame
    fn refresh_charts(&mut self) {
        let Some(loaded) = &self.loaded else {
            return;
        };

        let selection = self.ui_state.selection();
        if self.charts_for.as_ref() == Some(&selection) || selection.mode != DashboardMode::Exploratory {
            return;
        }

        if let Err(e) = selection.validate() {
            warn!(error = %e, "ignoring invalid selection");
            return;
        }

        debug!(
            subject = %selection.subject,
            activity = %selection.activity,
            group = %selection.unit_group,
            sensor = %selection.sensor,
            "rebuilding charts"
        );
        self.charts = build_charts(&loaded.dataset, &selection, &self.config.charts);
        self.charts_for = Some(selection);
    }

    fn show_menu(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open dataset…").clicked() {
                        ui.close_menu();
                        self.pick_dataset();
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.ui_state.show_controls, "Show Controls");
                    ui.checkbox(&mut self.ui_state.show_about, "Show About");
                });

                ui.separator();
                ui.label(self.ui_state.mode.to_string());
            });
        });
    }

    fn show_status(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| match &self.loaded {
                Some(loaded) => {
                    ui.label(format!("File: {}", loaded.source.display()));
                    ui.separator();
                    ui.label(format!("Rows: {}", loaded.dataset.len()));
                    if loaded.used_fallback {
                        ui.separator();
                        ui.colored_label(egui::Color32::YELLOW, "● Subset dataset");
                    }
                }
                None => {
                    ui.colored_label(egui::Color32::RED, "● No dataset");
                }
            });
        });
    }
}

fn activity_names(dataset: &Dataset) -> Vec<String> {
    dataset.activity_names().into_iter().map(String::from).collect()
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show_menu(ctx);
        self.show_status(ctx);

        let available = self
            .loaded
            .as_ref()
            .map(|l| activity_names(&l.dataset))
            .unwrap_or_default();

        if self.ui_state.show_controls {
            egui::SidePanel::left("control_panel")
                .resizable(true)
                .default_width(300.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ControlPanel::show(ui, &mut self.ui_state, &available);
                    });
                });
        }

        self.refresh_charts();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Biomechanics Analysis for Daily and Sports Activities");

                if self.ui_state.show_about {
                    ui.label(ABOUT);
                    if self.loaded.as_ref().map_or(false, |l| l.used_fallback) {
                        ui.colored_label(
                            egui::Color32::YELLOW,
                            "Running on the reduced subset because the full dataset could not be loaded.",
                        );
                    }
                }
                ui.separator();

                if let Some(error) = &self.load_error {
                    ui.colored_label(egui::Color32::RED, error);
                }
                if self.loaded.is_none() {
                    return;
                }

                if self.ui_state.mode == DashboardMode::MachineLearning {
                    ui.heading(DashboardMode::MachineLearning.to_string());
                    ui.label("In Progress...");
                    return;
                }

                let config = &self.config.charts;
                let camera = &mut self.ui_state.camera;
                for unit_charts in &self.charts {
                    ui.heading(unit_charts.unit.title());

                    plots::show_chart(ui, &unit_charts.line, |ui, chart| plots::line_chart(ui, chart, config));
                    ui.add_space(12.0);

                    ui.columns(2, |columns| {
                        plots::show_chart(&mut columns[0], &unit_charts.trajectory, |ui, chart| {
                            plots::trajectory(ui, chart, camera)
                        });
                        plots::show_chart(&mut columns[1], &unit_charts.heatmap, plots::heatmap);
                    });
                    ui.add_space(12.0);

                    plots::show_chart(ui, &unit_charts.distribution, |ui, chart| {
                        plots::distribution(ui, chart, config)
                    });
                    ui.add_space(12.0);

                    plots::show_chart(ui, &unit_charts.boxplot, |ui, chart| plots::boxplot(ui, chart, config));
                    ui.separator();
                }
            });
        });
    }
}
