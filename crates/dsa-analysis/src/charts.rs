//! Chart models derived from a dataset and a selection snapshot
//!
//! Every builder takes the same inputs, `(&Dataset, &Selection, BodyUnit)`,
//! and is called once per unit of the selected group. The models are plain
//! data; drawing happens in the desktop crate.

use crate::boxplot::BoxStats;
use crate::config::ChartConfig;
use crate::correlation::correlation_block;
use crate::density::{DensityCurve, Histogram};
use crate::peaks::{find_peaks, Peak};
use dsa_core::{
    column_names, Axis, BodyUnit, ChannelId, Dataset, DatasetView, DsaError, DsaResult, Selection,
    CHANNEL_COUNT,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rows for the selection's subject and single activity, or `EmptySelection`
fn subject_activity_view<'a>(dataset: &'a Dataset, selection: &Selection) -> DsaResult<DatasetView<'a>> {
    let view = dataset.for_subject_activity(&selection.subject, &selection.activity);
    if view.is_empty() {
        return Err(DsaError::EmptySelection {
            subject: selection.subject.clone(),
            activity: selection.activity.clone(),
        });
    }
    Ok(view)
}

/// One axis of a line chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSeries {
    pub axis: Axis,
    pub label: String,
    pub column: String,
    pub values: Vec<f64>,
    /// Peaks at or above the selected prominence, indices into `values`
    pub peaks: Vec<Peak>,
}

/// Three stacked time-series panels with peak markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    pub title: String,
    pub unit: BodyUnit,
    pub series: Vec<AxisSeries>,
}

impl LineChart {
    pub fn build(dataset: &Dataset, selection: &Selection, unit: BodyUnit) -> DsaResult<Self> {
        let view = subject_activity_view(dataset, selection)?;
        let channels = selection.channels_for(unit);
        let threshold = selection.prominence as f64;

        let series = Axis::ALL
            .iter()
            .map(|&axis| {
                let channel = channels.channel(axis);
                let values = view.column(channel);
                let peaks = find_peaks(&values, threshold);
                AxisSeries {
                    axis,
                    label: channels.label(axis).to_string(),
                    column: channel.column_name(),
                    values,
                    peaks,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            unit = %unit,
            rows = view.len(),
            peaks = series.iter().map(|s| s.peaks.len()).sum::<usize>(),
            "line chart"
        );

        Ok(LineChart {
            title: format!("{} on {} while {}", selection.sensor, unit.title(), selection.activity),
            unit,
            series,
        })
    }
}

/// View direction for the 3D scatter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Rotation about the vertical axis, radians
    pub yaw: f64,
    /// Elevation, radians
    pub pitch: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            yaw: -0.8,
            pitch: 0.5,
        }
    }
}

impl Camera {
    /// Orthographic projection of a point in the unit cube onto the screen plane
    pub fn project(&self, point: [f64; 3]) -> [f64; 2] {
        let [x, y, z] = point;
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();

        let rx = x * cos_yaw - y * sin_yaw;
        let depth = x * sin_yaw + y * cos_yaw;
        let ry = z * cos_pitch - depth * sin_pitch;
        [rx, ry]
    }
}

/// The three channels as one point per sample, coloured by time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub title: String,
    pub unit: BodyUnit,
    pub labels: [String; 3],
    pub points: Vec<[f64; 3]>,
    /// Row ordinal of each point within the full view
    pub ordinals: Vec<usize>,
    /// Rows in the view before decimation
    pub total_rows: usize,
    /// Per-axis (min, max) over the kept points
    pub bounds: [(f64, f64); 3],
}

impl Trajectory {
    pub fn build(dataset: &Dataset, selection: &Selection, unit: BodyUnit, config: &ChartConfig) -> DsaResult<Self> {
        let view = subject_activity_view(dataset, selection)?;
        let channels = selection.channels_for(unit);
        let [cx, cy, cz] = channels.channels;

        let step = view.len().div_ceil(config.max_scatter_points.max(1)).max(1);
        let mut points = Vec::with_capacity(view.len() / step + 1);
        let mut ordinals = Vec::with_capacity(view.len() / step + 1);
        for (ordinal, row) in view.rows().iter().enumerate().step_by(step) {
            points.push([row.value(cx), row.value(cy), row.value(cz)]);
            ordinals.push(ordinal);
        }

        let mut bounds = [(f64::INFINITY, f64::NEG_INFINITY); 3];
        for point in &points {
            for (bound, &value) in bounds.iter_mut().zip(point) {
                if value.is_finite() {
                    bound.0 = bound.0.min(value);
                    bound.1 = bound.1.max(value);
                }
            }
        }

        Ok(Trajectory {
            title: format!("{} on {} in 3D Space Over Time", selection.sensor, unit.title()),
            unit,
            labels: channels.labels.map(String::from),
            points,
            ordinals,
            total_rows: view.len(),
            bounds,
        })
    }

    /// Points scaled into [-1, 1] per axis
    pub fn normalized(&self) -> Vec<[f64; 3]> {
        let scale = self.bounds.map(|(low, high)| {
            let mid = (low + high) / 2.0;
            let half = (high - low) / 2.0;
            (mid, if half > 0.0 { half } else { 1.0 })
        });
        self.points
            .iter()
            .map(|p| {
                [
                    (p[0] - scale[0].0) / scale[0].1,
                    (p[1] - scale[1].0) / scale[1].1,
                    (p[2] - scale[2].0) / scale[2].1,
                ]
            })
            .collect()
    }

    /// Screen positions of the normalized points
    pub fn project(&self, camera: &Camera) -> Vec<[f64; 2]> {
        self.normalized().into_iter().map(|p| camera.project(p)).collect()
    }

    /// Position of each point along the recording, 0 at the first row and 1 at the last
    pub fn time_fraction(&self, point: usize) -> f64 {
        match (self.ordinals.get(point), self.total_rows) {
            (Some(&ordinal), total) if total > 1 => ordinal as f64 / (total - 1) as f64,
            _ => 0.0,
        }
    }
}

/// Correlations of all channels against the selected three
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationHeatmap {
    pub title: String,
    pub unit: BodyUnit,
    /// All channel names, one per heatmap row
    pub row_labels: Vec<String>,
    /// Selected channel names, one per heatmap column
    pub column_labels: [String; 3],
    /// `values[row][column]`, `None` where a channel has zero variance
    pub values: Vec<[Option<f64>; 3]>,
}

impl CorrelationHeatmap {
    pub fn build(dataset: &Dataset, selection: &Selection, unit: BodyUnit) -> DsaResult<Self> {
        let view = subject_activity_view(dataset, selection)?;
        let channels = selection.channels_for(unit);

        let columns: Vec<Vec<f64>> = (0..CHANNEL_COUNT)
            .filter_map(ChannelId::from_index)
            .map(|channel| view.column(channel))
            .collect();
        let targets = channels.channels.map(|c| c.index);

        let values = correlation_block(&columns, &targets)
            .into_iter()
            .map(|row| [row[0], row[1], row[2]])
            .collect();

        Ok(CorrelationHeatmap {
            title: format!("Pearson Correlation of {} {}", unit.title(), selection.sensor),
            unit,
            row_labels: column_names(),
            column_labels: channels.column_names(),
            values,
        })
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(column).copied().flatten())
    }
}

/// Density histogram with KDE overlay for one channel; both integrate to one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDistribution {
    pub axis: Axis,
    pub label: String,
    pub histogram: Histogram,
    pub density: Option<DensityCurve>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub title: String,
    pub unit: BodyUnit,
    pub channels: Vec<ChannelDistribution>,
}

impl Distribution {
    pub fn build(dataset: &Dataset, selection: &Selection, unit: BodyUnit, config: &ChartConfig) -> DsaResult<Self> {
        let view = subject_activity_view(dataset, selection)?;
        let selected = selection.channels_for(unit);

        let channels = Axis::ALL
            .iter()
            .filter_map(|&axis| {
                let values = view.column(selected.channel(axis));
                let histogram = Histogram::compute(&values, config.max_bins)?;
                Some(ChannelDistribution {
                    axis,
                    label: selected.label(axis).to_string(),
                    histogram,
                    density: DensityCurve::estimate(&values, config.kde_points),
                })
            })
            .collect();

        Ok(Distribution {
            title: format!("Distribution of {} {}", unit.title(), selection.sensor),
            unit,
            channels,
        })
    }
}

/// One box per selected activity for a single channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityBoxplot {
    pub title: String,
    pub unit: BodyUnit,
    /// Y-axis label, e.g. "X Acceleration"
    pub value_label: String,
    /// (activity label, statistics) in first-appearance order
    pub boxes: Vec<(String, BoxStats)>,
}

impl ActivityBoxplot {
    pub fn build(dataset: &Dataset, selection: &Selection, unit: BodyUnit, config: &ChartConfig) -> DsaResult<Self> {
        let view = dataset.for_subject_activities(&selection.subject, &selection.activities);
        if view.is_empty() {
            return Err(DsaError::EmptySelection {
                subject: selection.subject.clone(),
                activity: selection.activities.join(", "),
            });
        }

        let channels = selection.channels_for(unit);
        let channel = channels.channel(selection.boxplot_axis);

        let boxes = view
            .column_by_activity(channel)
            .into_iter()
            .filter_map(|(activity, values)| {
                BoxStats::compute(&values, config.whisker).map(|stats| (activity.to_string(), stats))
            })
            .collect();

        Ok(ActivityBoxplot {
            title: format!(
                "Boxplot Analysis of {} {} Across Multiple Activities",
                unit.title(),
                selection.boxplot_label()
            ),
            unit,
            value_label: channels.label(selection.boxplot_axis).to_string(),
            boxes,
        })
    }
}

/// Every chart for one body unit; each chart fails independently
#[derive(Debug)]
pub struct UnitCharts {
    pub unit: BodyUnit,
    pub line: DsaResult<LineChart>,
    pub trajectory: DsaResult<Trajectory>,
    pub heatmap: DsaResult<CorrelationHeatmap>,
    pub distribution: DsaResult<Distribution>,
    pub boxplot: DsaResult<ActivityBoxplot>,
}

impl UnitCharts {
    pub fn build(dataset: &Dataset, selection: &Selection, unit: BodyUnit, config: &ChartConfig) -> Self {
        UnitCharts {
            unit,
            line: LineChart::build(dataset, selection, unit),
            trajectory: Trajectory::build(dataset, selection, unit, config),
            heatmap: CorrelationHeatmap::build(dataset, selection, unit),
            distribution: Distribution::build(dataset, selection, unit, config),
            boxplot: ActivityBoxplot::build(dataset, selection, unit, config),
        }
    }
}

/// Charts for every unit the selected group renders, left side first
pub fn build_charts(dataset: &Dataset, selection: &Selection, config: &ChartConfig) -> Vec<UnitCharts> {
    selection
        .unit_group
        .units()
        .iter()
        .map(|&unit| UnitCharts::build(dataset, selection, unit, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsa_core::{RecordingRow, SensorCategory, UnitGroup};
    use rand::{Rng, SeedableRng};
    use std::sync::Arc;

    fn dataset() -> Dataset {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut rows = Vec::new();
        for (activity, name, n) in [("a01", "Sitting", 60), ("a18", "Jumping", 40)] {
            let activity: Arc<str> = Arc::from(activity);
            let name: Arc<str> = Arc::from(name);
            for subject in ["p1", "p2"] {
                let subject: Arc<str> = Arc::from(subject);
                for i in 0..n {
                    let mut channels = [0.0f64; CHANNEL_COUNT];
                    for (c, value) in channels.iter_mut().enumerate() {
                        *value = (i as f64 * 0.3 + c as f64).sin() * 5.0 + rng.gen_range(-1.0..1.0);
                    }
                    rows.push(RecordingRow {
                        channels,
                        segment: Arc::from("s01"),
                        subject: subject.clone(),
                        activity: activity.clone(),
                        activity_name: name.clone(),
                    });
                }
            }
        }
        Dataset::new(rows)
    }

    fn selection() -> Selection {
        Selection {
            activity: "Sitting".to_string(),
            ..Selection::default()
        }
    }

    #[test]
    fn test_titles() {
        let data = dataset();
        let mut selection = selection();
        selection.unit_group = UnitGroup::Arms;
        selection.sensor = SensorCategory::Gyroscope;
        let config = ChartConfig::default();

        let line = LineChart::build(&data, &selection, BodyUnit::LeftArm).unwrap();
        assert_eq!(line.title, "Gyroscopes on Left Arms while Sitting");

        let trajectory = Trajectory::build(&data, &selection, BodyUnit::RightArm, &config).unwrap();
        assert_eq!(trajectory.title, "Gyroscopes on Right Arms in 3D Space Over Time");

        let heatmap = CorrelationHeatmap::build(&data, &selection, BodyUnit::LeftArm).unwrap();
        assert_eq!(heatmap.title, "Pearson Correlation of Left Arms Gyroscopes");

        let distribution = Distribution::build(&data, &selection, BodyUnit::Torso, &config).unwrap();
        assert_eq!(distribution.title, "Distribution of Torso Gyroscopes");

        let boxplot = ActivityBoxplot::build(&data, &selection, BodyUnit::RightArm, &config).unwrap();
        assert_eq!(
            boxplot.title,
            "Boxplot Analysis of Right Arms X Gyroscopes Across Multiple Activities"
        );
    }

    #[test]
    fn test_line_chart_series() {
        let data = dataset();
        let mut selection = selection();
        selection.prominence = 0.0;

        let chart = LineChart::build(&data, &selection, BodyUnit::Torso).unwrap();
        assert_eq!(chart.series.len(), 3);
        assert_eq!(chart.series[0].column, "T_xacc");
        assert_eq!(chart.series[2].label, "Z Acceleration");
        for series in &chart.series {
            assert_eq!(series.values.len(), 60);
            assert!(!series.peaks.is_empty());
            assert!(series.peaks.iter().all(|p| p.index > 0 && p.index < 59));
        }

        selection.prominence = 20.0;
        let chart = LineChart::build(&data, &selection, BodyUnit::Torso).unwrap();
        assert!(chart.series.iter().all(|s| s.peaks.is_empty()));
    }

    #[test]
    fn test_empty_selection() {
        let data = dataset();
        let mut selection = selection();
        selection.subject = "p9".to_string();

        let err = LineChart::build(&data, &selection, BodyUnit::Torso).unwrap_err();
        assert!(matches!(err, DsaError::EmptySelection { subject, .. } if subject == "p9"));

        let charts = build_charts(&data, &selection, &ChartConfig::default());
        assert_eq!(charts.len(), 1);
        assert!(charts[0].heatmap.is_err());
        assert!(charts[0].boxplot.is_err());
    }

    #[test]
    fn test_heatmap_symmetric_bounded_unit_diagonal() {
        let data = dataset();
        for unit in BodyUnit::ALL {
            for sensor in SensorCategory::ALL {
                let mut selection = selection();
                selection.sensor = sensor;
                let heatmap = CorrelationHeatmap::build(&data, &selection, unit).unwrap();
                let targets = selection.channels_for(unit).channels.map(|c| c.index);

                assert_eq!(heatmap.values.len(), CHANNEL_COUNT);
                assert_eq!(heatmap.row_labels.len(), CHANNEL_COUNT);
                for (k, &row) in targets.iter().enumerate() {
                    assert_eq!(heatmap.get(row, k), Some(1.0));
                    for (m, &other) in targets.iter().enumerate() {
                        assert_eq!(heatmap.get(row, m), heatmap.get(other, k));
                    }
                }
                for row in &heatmap.values {
                    for r in row {
                        let r = r.unwrap();
                        assert!((-1.0..=1.0).contains(&r));
                    }
                }
            }
        }
    }

    #[test]
    fn test_trajectory_projection() {
        let data = dataset();
        let mut config = ChartConfig::default();
        let trajectory = Trajectory::build(&data, &selection(), BodyUnit::Torso, &config).unwrap();
        assert_eq!(trajectory.points.len(), 60);
        assert_eq!(trajectory.time_fraction(0), 0.0);
        assert_eq!(trajectory.time_fraction(59), 1.0);

        for p in trajectory.normalized() {
            assert!(p.iter().all(|v| v.abs() <= 1.0 + 1e-9));
        }
        let projected = trajectory.project(&Camera::default());
        assert_eq!(projected.len(), 60);

        config.max_scatter_points = 25;
        let decimated = Trajectory::build(&data, &selection(), BodyUnit::Torso, &config).unwrap();
        assert!(decimated.points.len() <= 25);
        assert_eq!(decimated.total_rows, 60);
    }

    #[test]
    fn test_camera_identity_view() {
        let camera = Camera { yaw: 0.0, pitch: 0.0 };
        assert_eq!(camera.project([0.5, 0.2, -0.3]), [0.5, -0.3]);
    }

    #[test]
    fn test_distribution_channels() {
        let data = dataset();
        let distribution =
            Distribution::build(&data, &selection(), BodyUnit::LeftLeg, &ChartConfig::default()).unwrap();
        assert_eq!(distribution.channels.len(), 3);
        for channel in &distribution.channels {
            assert_eq!(channel.histogram.total(), 60);

            let bar_area: f64 = channel.histogram.density().iter().sum::<f64>() * channel.histogram.bin_width();
            assert!((bar_area - 1.0).abs() < 1e-9, "bar area {}", bar_area);

            let curve = channel.density.as_ref().unwrap();
            assert_eq!(curve.xs.len(), 200);
            let peak_bar = channel.histogram.density().into_iter().fold(0.0, f64::max);
            let peak_curve = curve.density.iter().copied().fold(0.0, f64::max);
            // Same scale: neither is tens of times the other
            assert!(peak_curve < peak_bar * 5.0 && peak_bar < peak_curve * 5.0);
        }
    }

    #[test]
    fn test_boxplot_follows_selected_activities() {
        let data = dataset();
        let config = ChartConfig::default();
        let mut selection = selection();

        let boxplot = ActivityBoxplot::build(&data, &selection, BodyUnit::Torso, &config).unwrap();
        let labels: Vec<&str> = boxplot.boxes.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, vec!["Sitting", "Jumping"]);
        assert_eq!(boxplot.boxes[0].1.count, 60);
        assert_eq!(boxplot.value_label, "X Acceleration");

        selection.activities = vec!["Jumping".to_string()];
        selection.boxplot_axis = Axis::Z;
        let boxplot = ActivityBoxplot::build(&data, &selection, BodyUnit::Torso, &config).unwrap();
        assert_eq!(boxplot.boxes.len(), 1);
        assert_eq!(boxplot.boxes[0].1.count, 40);
        assert_eq!(boxplot.value_label, "Z Acceleration");

        selection.activities.clear();
        assert!(ActivityBoxplot::build(&data, &selection, BodyUnit::Torso, &config).is_err());
    }
}
