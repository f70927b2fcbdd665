//! DSA-Analysis: chart derivation for the motion dataset explorer
//!
//! Peak finding, correlation, density and box statistics, and the chart
//! models built from a dataset plus a selection snapshot.

pub mod boxplot;
pub mod charts;
pub mod config;
pub mod correlation;
pub mod density;
pub mod peaks;

pub use boxplot::{quantile, BoxStats};
pub use charts::{
    build_charts, ActivityBoxplot, AxisSeries, Camera, ChannelDistribution, CorrelationHeatmap,
    Distribution, LineChart, Trajectory, UnitCharts,
};
pub use config::{ChartConfig, Rgb};
pub use correlation::{correlation_block, pearson};
pub use density::{DensityCurve, Histogram};
pub use peaks::{find_peaks, Peak};
