//! Drawing of the chart models

use dsa_analysis::{
    ActivityBoxplot, Camera, ChartConfig, CorrelationHeatmap, Distribution, LineChart, Rgb, Trajectory,
};
use dsa_core::DsaResult;
use egui::{Align2, Color32, FontId, Rect, RichText, Sense, Stroke};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points,
    Text,
};

/// Number of discrete colours used for the time scale of the 3D scatter
const TIME_COLOR_BINS: usize = 24;

const MAGMA: [(f64, [u8; 3]); 9] = [
    (0.0, [0, 0, 4]),
    (0.125, [28, 16, 68]),
    (0.25, [79, 18, 123]),
    (0.375, [129, 37, 129]),
    (0.5, [181, 54, 122]),
    (0.625, [229, 80, 100]),
    (0.75, [251, 135, 97]),
    (0.875, [254, 194, 135]),
    (1.0, [252, 253, 191]),
];

const DIVERGING: [(f64, [u8; 3]); 5] = [
    (-1.0, [59, 76, 192]),
    (-0.5, [141, 176, 254]),
    (0.0, [221, 221, 221]),
    (0.5, [244, 154, 123]),
    (1.0, [180, 4, 38]),
];

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 80, 80);

fn interpolate(stops: &[(f64, [u8; 3])], t: f64) -> Color32 {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Color32::GRAY,
    };
    if !t.is_finite() || t <= first.0 {
        return rgb(first.1);
    }
    if t >= last.0 {
        return rgb(last.1);
    }

    for pair in stops.windows(2) {
        let ((t0, c0), (t1, c1)) = (pair[0], pair[1]);
        if t <= t1 {
            let f = (t - t0) / (t1 - t0);
            let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
            return Color32::from_rgb(channel(c0[0], c1[0]), channel(c0[1], c1[1]), channel(c0[2], c1[2]));
        }
    }
    rgb(last.1)
}

pub fn rgb(color: Rgb) -> Color32 {
    Color32::from_rgb(color[0], color[1], color[2])
}

/// Sequential dark-to-light scale, `t` in [0, 1]
pub fn magma(t: f64) -> Color32 {
    interpolate(&MAGMA, t)
}

/// Blue-grey-red scale for correlations, fixed to [-1, 1]
pub fn diverging(r: f64) -> Color32 {
    interpolate(&DIVERGING, r)
}

/// Black or white, whichever reads better on `background`
pub fn contrast_text(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32 + 0.587 * background.g() as f32 + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

/// Draw `chart`, or its error in place of it
pub fn show_chart<T>(ui: &mut egui::Ui, chart: &DsaResult<T>, draw: impl FnOnce(&mut egui::Ui, &T)) {
    match chart {
        Ok(chart) => draw(ui, chart),
        Err(e) => {
            ui.colored_label(ERROR_COLOR, e.to_string());
        }
    }
}

fn title(ui: &mut egui::Ui, text: &str) {
    ui.label(RichText::new(text).strong().size(16.0));
}

/// Three stacked panels, one per axis, with peak markers
pub fn line_chart(ui: &mut egui::Ui, chart: &LineChart, config: &ChartConfig) {
    title(ui, &chart.title);

    for (series, color) in chart.series.iter().zip(config.axis_colors) {
        Plot::new(("line", chart.unit, series.axis))
            .height(150.0)
            .x_axis_label("Sample")
            .y_axis_label(series.label.clone())
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                let values: PlotPoints = series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| [i as f64, v])
                    .collect();
                plot_ui.line(Line::new(values).name(&series.label).color(rgb(color)).width(1.2));

                let peaks: PlotPoints = series
                    .peaks
                    .iter()
                    .filter_map(|peak| {
                        let value = series.values.get(peak.index)?;
                        Some([peak.index as f64, *value])
                    })
                    .collect();
                plot_ui.points(
                    Points::new(peaks)
                        .name("Peaks")
                        .radius(3.0)
                        .color(rgb(config.peak_color)),
                );
            });
    }
}

/// Rotatable orthographic view of the trajectory, coloured by sample order
pub fn trajectory(ui: &mut egui::Ui, chart: &Trajectory, camera: &mut Camera) {
    title(ui, &chart.title);

    ui.horizontal(|ui| {
        ui.add(egui::Slider::new(&mut camera.yaw, -std::f64::consts::PI..=std::f64::consts::PI).text("Yaw"));
        ui.add(egui::Slider::new(&mut camera.pitch, -1.5..=1.5).text("Pitch"));
        if ui.small_button("Reset view").clicked() {
            *camera = Camera::default();
        }
    });

    let projected = chart.project(camera);
    let mut bins: Vec<Vec<[f64; 2]>> = vec![Vec::new(); TIME_COLOR_BINS];
    for (i, point) in projected.iter().enumerate() {
        if point.iter().all(|v| v.is_finite()) {
            let bin = (chart.time_fraction(i) * (TIME_COLOR_BINS - 1) as f64).round() as usize;
            bins[bin.min(TIME_COLOR_BINS - 1)].push(*point);
        }
    }

    let corner = [-1.0, -1.0, -1.0];
    let axes = [[1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, 1.0]];
    let camera = *camera;

    Plot::new(("trajectory", chart.unit))
        .height(360.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show(ui, |plot_ui| {
            let origin = camera.project(corner);
            for (end, label) in axes.iter().zip(&chart.labels) {
                let tip = camera.project(*end);
                plot_ui.line(
                    Line::new(PlotPoints::new(vec![origin, tip]))
                        .color(Color32::GRAY)
                        .width(1.0),
                );
                plot_ui.text(Text::new(PlotPoint::new(tip[0], tip[1]), label.clone()).color(Color32::GRAY));
            }

            for (bin, points) in bins.into_iter().enumerate() {
                if points.is_empty() {
                    continue;
                }
                let t = bin as f64 / (TIME_COLOR_BINS - 1) as f64;
                plot_ui.points(Points::new(PlotPoints::new(points)).radius(1.5).color(magma(t)));
            }
        });

    ui.horizontal(|ui| {
        ui.label("Sample order:");
        gradient_bar(ui, 160.0, magma, 0.0, 1.0);
        if chart.points.len() < chart.total_rows {
            ui.label(format!("{} of {} samples shown", chart.points.len(), chart.total_rows));
        }
    });
}

/// Annotated grid of correlations against the three selected channels
pub fn heatmap(ui: &mut egui::Ui, chart: &CorrelationHeatmap) {
    title(ui, &chart.title);

    let row_height = 16.0;
    let label_width = 80.0;
    let cell_width = 72.0;
    let font = FontId::monospace(11.0);
    let text_color = ui.visuals().text_color();

    let rows = chart.row_labels.len();
    let size = egui::vec2(
        label_width + cell_width * chart.column_labels.len() as f32,
        row_height * (rows + 1) as f32,
    );
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;

    for (k, label) in chart.column_labels.iter().enumerate() {
        let center = egui::pos2(
            origin.x + label_width + cell_width * (k as f32 + 0.5),
            origin.y + row_height * 0.5,
        );
        painter.text(center, Align2::CENTER_CENTER, label, font.clone(), text_color);
    }

    for (r, label) in chart.row_labels.iter().enumerate() {
        let top = origin.y + row_height * (r + 1) as f32;
        painter.text(
            egui::pos2(origin.x + label_width - 6.0, top + row_height * 0.5),
            Align2::RIGHT_CENTER,
            label,
            font.clone(),
            text_color,
        );

        for k in 0..chart.column_labels.len() {
            let cell = Rect::from_min_size(
                egui::pos2(origin.x + label_width + cell_width * k as f32, top),
                egui::vec2(cell_width, row_height),
            )
            .shrink(0.5);

            match chart.get(r, k) {
                Some(value) => {
                    let fill = diverging(value);
                    painter.rect_filled(cell, 0.0, fill);
                    painter.text(
                        cell.center(),
                        Align2::CENTER_CENTER,
                        format!("{:.2}", value),
                        font.clone(),
                        contrast_text(fill),
                    );
                }
                None => {
                    painter.rect_stroke(cell, 0.0, Stroke::new(0.5, Color32::GRAY));
                }
            }
        }
    }

    ui.horizontal(|ui| {
        ui.label("-1");
        gradient_bar(ui, 160.0, diverging, -1.0, 1.0);
        ui.label("1");
    });
}

/// Density histogram with KDE overlay, one panel per axis
pub fn distribution(ui: &mut egui::Ui, chart: &Distribution, config: &ChartConfig) {
    title(ui, &chart.title);

    let panels = chart.channels.len().max(1);
    ui.columns(panels, |columns| {
        for (column, (channel, color)) in columns
            .iter_mut()
            .zip(chart.channels.iter().zip(config.axis_colors))
        {
            let color = rgb(color);
            let width = channel.histogram.bin_width();
            let bars: Vec<Bar> = channel
                .histogram
                .centers()
                .into_iter()
                .zip(channel.histogram.density())
                .map(|(center, height)| Bar::new(center, height).width(width))
                .collect();

            Plot::new(("distribution", chart.unit, channel.axis))
                .height(220.0)
                .x_axis_label(channel.label.clone())
                .y_axis_label("Density")
                .show(column, |plot_ui| {
                    plot_ui.bar_chart(
                        BarChart::new(bars)
                            .color(color.gamma_multiply(0.6))
                            .name(&channel.label),
                    );
                    if let Some(curve) = &channel.density {
                        let points: PlotPoints = curve
                            .xs
                            .iter()
                            .zip(&curve.density)
                            .map(|(&x, &y)| [x, y])
                            .collect();
                        plot_ui.line(Line::new(points).color(color).width(2.0).name("KDE"));
                    }
                });
        }
    });
}

/// One box per activity for the chosen axis channel
pub fn boxplot(ui: &mut egui::Ui, chart: &ActivityBoxplot, config: &ChartConfig) {
    title(ui, &chart.title);

    let fill = rgb(config.axis_colors[0]).gamma_multiply(0.5);
    let elements: Vec<BoxElem> = chart
        .boxes
        .iter()
        .enumerate()
        .map(|(i, (label, stats))| {
            let spread = BoxSpread::new(
                stats.lower_whisker,
                stats.q1,
                stats.median,
                stats.q3,
                stats.upper_whisker,
            );
            BoxElem::new(i as f64, spread)
                .name(format!("{} (n={})", label, stats.count))
                .box_width(0.6)
                .fill(fill)
        })
        .collect();

    let outliers: PlotPoints = chart
        .boxes
        .iter()
        .enumerate()
        .flat_map(|(i, (_, stats))| stats.outliers.iter().map(move |&v| [i as f64, v]))
        .collect();

    let labels: Vec<String> = chart.boxes.iter().map(|(label, _)| label.clone()).collect();
    let boxes = labels.len();

    Plot::new(("boxplot", chart.unit))
        .height(320.0)
        .x_axis_label("Activity")
        .y_axis_label(chart.value_label.clone())
        .x_grid_spacer(move |_input| {
            (0..boxes)
                .map(|i| GridMark {
                    value: i as f64,
                    step_size: 1.0,
                })
                .collect()
        })
        .x_axis_formatter(move |mark, _range| category_tick(mark.value, &labels))
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(elements).name(&chart.value_label));
            plot_ui.points(Points::new(outliers).radius(1.5).color(Color32::GRAY).name("Outliers"));
        });
}

/// Category name for a tick at an integer position; blank between categories
fn category_tick(value: f64, labels: &[String]) -> String {
    let nearest = value.round();
    if (value - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    labels.get(nearest as usize).cloned().unwrap_or_default()
}

fn gradient_bar(ui: &mut egui::Ui, width: f32, scale: fn(f64) -> Color32, low: f64, high: f64) {
    let steps = 32;
    let (response, painter) = ui.allocate_painter(egui::vec2(width, 12.0), Sense::hover());
    let step_width = width / steps as f32;
    for i in 0..steps {
        let t = low + (high - low) * (i as f64 + 0.5) / steps as f64;
        let rect = Rect::from_min_size(
            egui::pos2(response.rect.min.x + step_width * i as f32, response.rect.min.y),
            egui::vec2(step_width + 0.5, 12.0),
        );
        painter.rect_filled(rect, 0.0, scale(t));
    }
}
