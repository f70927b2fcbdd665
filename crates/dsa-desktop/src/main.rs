//! DSA Desktop: explorer for the Daily and Sports Activities motion dataset

mod app;
mod config;
mod plots;
mod ui;

use anyhow::Context;
use app::ExplorerApp;
use config::{DashboardConfig, CONFIG_FILE};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE))
        .with_context(|| format!("reading {}", CONFIG_FILE))?;
    tracing::info!(
        dataset = %config.dataset.display(),
        subset = %config.subset.display(),
        "starting dashboard"
    );

    // Configure egui
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Biomechanics Analysis for Daily and Sports Activities",
        options,
        Box::new(|_cc| Ok(Box::new(ExplorerApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run native app: {}", e))?;

    Ok(())
}
