//! Batch Stream Inspector
//!
//! Opens a run the way the training loop does, pulls a number of batches
//! and reports their shapes. Useful for checking a run before a long
//! training job.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use catan_rl_data::data::{
    estimate_sample_count, BatchStream, DataLayout, LearningMode, StreamConfig,
};

/// Pull batches from a game-record run.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Learning-mode key of the run (Q, V or P); anything else reads random_games
    #[arg(long, value_name = "KEY")]
    key: Option<String>,

    /// Run version
    #[arg(long, default_value_t = 0, value_name = "N")]
    version: u32,

    /// Root of the run directory tree
    #[arg(long, default_value = "data", value_name = "DIR")]
    data_root: PathBuf,

    /// JSON stream configuration; overrides the flags below
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Rewards column used as label
    #[arg(long, default_value = "DISCOUNTED_RETURN", value_name = "NAME")]
    label_column: String,

    /// Learning mode used to shape rows (Q, V or P)
    #[arg(long, default_value = "Q", value_name = "MODE")]
    mode: LearningMode,

    /// Batch size (each batch holds batch_size + 1 rows)
    #[arg(long, default_value_t = 255, value_name = "N")]
    batch_size: usize,

    /// Skip rows whose label is below this value
    #[arg(long, value_name = "FLOAT")]
    threshold: Option<f64>,

    /// Number of batches to pull
    #[arg(long, default_value_t = 100, value_name = "N")]
    batches: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let dir = DataLayout::new(&cli.data_root).run_directory(cli.key.as_deref(), cli.version);

    let config = match &cli.config {
        Some(path) => StreamConfig::from_json_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => {
            let mut config = StreamConfig::new(cli.batch_size, cli.label_column.clone())
                .with_learning_mode(cli.mode);
            config.label_threshold = cli.threshold;
            config
        }
    };

    let per_batch = config.batch_size as u64 + 1;
    match estimate_sample_count(&dir) {
        Ok(estimate) => info!(
            "Streaming {} in mode {}: ~{} batches per pass",
            dir.display(),
            config.learning_mode,
            estimate / per_batch
        ),
        Err(e) => warn!(
            "Could not estimate sample count for {}: {}",
            dir.display(),
            e
        ),
    }

    let start = Instant::now();
    let progress = ProgressBar::new(cli.batches as u64);
    progress.set_style(ProgressStyle::with_template(
        "{bar:40} {pos}/{len} batches ({per_sec})",
    )?);

    let mut stream = BatchStream::new(&dir, config)?;
    let mut rows = 0usize;
    let mut shapes = None;
    for batch in stream.by_ref().take(cli.batches) {
        let batch = batch?;
        rows += batch.len();
        if shapes.is_none() {
            let label_shape = match batch.labels.as_vector() {
                Some(labels) => format!("{:?}", labels.dim()),
                None => format!("({},)", batch.labels.len()),
            };
            shapes = Some((batch.inputs.dim(), label_shape));
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    if let Some((inputs, labels)) = shapes {
        println!("inputs {:?}, labels {}", inputs, labels);
    }
    println!(
        "{} rows in {:.2}s, {} full passes",
        rows,
        start.elapsed().as_secs_f64(),
        stream.passes()
    );
    Ok(())
}
