//! musym-cad - cadence corpus loader
//!
//! Loads scores and cadence annotations for a source ("msq", "mps", "hsq",
//! "wtc", "mozart", "quartets", "piano", "mix") and writes them to stdout as
//! JSON for the training pipeline. Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use musym_cad::config::{CadConfig, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
use musym_cad::provision::OfflineProvisioner;
use musym_cad::{CorpusResult, Dispatcher, FetchPolicy, Source};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Command-line arguments for musym-cad
#[derive(Parser, Debug)]
#[command(name = "musym-cad")]
#[command(about = "Load scores and cadence annotations for cadence detection")]
#[command(version)]
struct Args {
    /// Source to load (msq, mps, hsq, wtc, mozart, quartets, piano, mix)
    source: String,

    /// Configuration file
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Parent directory of all corpora
    #[arg(short, long, env = "MUSYM_DATA_ROOT")]
    data_root: Option<PathBuf>,

    /// Pair each cadence with its type label
    #[arg(long)]
    include_type: bool,

    /// Handling of pieces whose remote annotations cannot be fetched
    #[arg(long, value_enum)]
    policy: Option<FetchPolicy>,

    /// Maximum concurrent label requests
    #[arg(long)]
    concurrency: Option<usize>,

    /// HTTP timeout per label request, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Never clone repositories or run generation scripts
    #[arg(long)]
    offline: bool,

    /// Print a per-piece summary instead of JSON
    #[arg(long)]
    summary: bool,
}

impl Args {
    /// Apply command-line overrides on top of the file configuration
    fn apply(&self, mut config: CadConfig) -> CadConfig {
        if let Some(data_root) = &self.data_root {
            config.data_root = Some(data_root.clone());
        }
        if self.include_type {
            config.include_type = true;
        }
        if let Some(policy) = self.policy {
            config.fetch.policy = policy;
        }
        if let Some(concurrency) = self.concurrency {
            config.fetch.concurrency = concurrency;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.fetch.timeout_secs = timeout_secs;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Reject unknown sources before touching configuration, disk or network
    let source: Source = args.source.parse()?;

    let config_path = musym_common::config::resolve_config_path(
        args.config.as_deref(),
        CONFIG_ENV_VAR,
        CONFIG_FILE_NAME,
    );
    let config = load_config(&args, config_path.as_deref())?;

    musym_common::logging::init_tracing(&config.logging)?;

    info!("Starting musym-cad v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &config_path {
        info!("Configuration: {}", path.display());
    }
    info!("Source: {}", source);

    let dispatcher = if args.offline {
        let labels = musym_cad::fetch::HttpLabelSource::new(&config.fetch)?;
        Dispatcher::new(config, Box::new(labels), Box::new(OfflineProvisioner))
    } else {
        Dispatcher::from_config(config)?
    };

    let result = dispatcher
        .load_source(source)
        .await
        .with_context(|| format!("Failed to load source '{}'", source))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.summary {
        write_summary(&mut out, &result)?;
    } else {
        serde_json::to_writer_pretty(&mut out, &result)?;
        writeln!(out)?;
    }

    Ok(())
}

/// File configuration with command-line overrides, validated once
fn load_config(args: &Args, path: Option<&Path>) -> Result<CadConfig> {
    let config = args.apply(CadConfig::load(path).context("Failed to load configuration")?);
    config.validate()?;
    Ok(config)
}

fn write_summary(out: &mut impl Write, result: &CorpusResult) -> Result<()> {
    writeln!(out, "{:<24} {:>9}  score", "piece", "cadences")?;
    for (key, path) in &result.scores {
        let cadences = result
            .annotations
            .get(key)
            .map(|c| c.len().to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(out, "{:<24} {:>9}  {}", key, cadences, path.display())?;
    }
    for failure in &result.failures {
        writeln!(out, "FAILED {}: {}", failure.key, failure.reason)?;
    }
    writeln!(
        out,
        "{} scores, {} annotated, {} cadences, {} failures",
        result.scores.len(),
        result.annotations.len(),
        result.cadence_count(),
        result.failures.len()
    )?;
    Ok(())
}
