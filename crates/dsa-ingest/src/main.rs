//! build-dataset: offline builder for the Daily and Sports Activities table

use anyhow::Context;
use clap::{Parser, ValueEnum};
use dsa_core::{ActivityMapping, MappingMode, DEFAULT_DATASET_FILE, DEFAULT_SUBSET_FILE};
use dsa_ingest::{DatasetBuilder, IngestConfig, MappingSource, SubsetConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build one CSV table from <root>/<activity>/<subject>/<segment> recordings
#[derive(Parser, Debug)]
#[command(name = "build-dataset")]
#[command(version, about)]
struct Args {
    /// Directory whose children are the activity folders
    #[arg(long, required_unless_present = "config")]
    root: Option<PathBuf>,

    /// Output file for the complete table
    #[arg(long, default_value = DEFAULT_DATASET_FILE)]
    output: PathBuf,

    /// How activity folders are mapped to labels
    #[arg(long, value_enum, default_value_t = MappingArg::Declared)]
    mapping: MappingArg,

    /// JSON object of folder -> label, overrides --mapping
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Also write every N-th row to the subset file
    #[arg(long)]
    subset_every: Option<usize>,

    /// Subset output file
    #[arg(long, default_value = DEFAULT_SUBSET_FILE)]
    subset_output: PathBuf,

    /// Load the whole build configuration from a JSON file
    #[arg(long, conflicts_with_all = ["root", "labels", "subset_every"])]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MappingArg {
    /// Folders a01..a19 map to the canonical labels
    Declared,
    /// Sorted folder N maps to label N
    Positional,
}

impl Args {
    fn into_config(self) -> anyhow::Result<IngestConfig> {
        if let Some(path) = &self.config {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            return Ok(IngestConfig::from_json(&json)?);
        }

        let root = self.root.context("--root is required")?;

        let mapping = match &self.labels {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading label table {}", path.display()))?;
                MappingSource::Table(ActivityMapping::from_json(&json)?)
            }
            None => MappingSource::Mode(match self.mapping {
                MappingArg::Declared => MappingMode::Declared,
                MappingArg::Positional => MappingMode::Positional,
            }),
        };

        let mut config = IngestConfig::new(root)
            .with_output(self.output)
            .with_mapping(mapping);
        if let Some(every) = self.subset_every {
            config = config.with_subset(SubsetConfig {
                every,
                output: self.subset_output,
            });
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Args::parse().into_config()?;
    tracing::debug!(config = %config.to_json()?, "effective configuration");

    let builder = DatasetBuilder::new(config).context("invalid build configuration")?;
    let report = builder.run().context("dataset build failed")?;

    println!(
        "Wrote {} rows ({} activities, {} subjects, {} segments) to {}",
        report.rows,
        report.activities,
        report.subjects,
        report.segments,
        report.output.display()
    );
    if let Some((path, rows)) = report.subset {
        println!("Wrote {} subset rows to {}", rows, path.display());
    }

    Ok(())
}
