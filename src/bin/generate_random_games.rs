//! Random Games Generator
//!
//! Plays seeded random games and appends them to the `random_games` run,
//! which bootstraps the first round of training.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use catan_rl_data::data::{DataLayout, DISCOUNT_FACTOR};
use catan_rl_data::games::random_games::{record_games, simulate_many};

/// Play random games and store them as training records.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value_t = 1000, value_name = "N")]
    games: usize,

    /// Seed of the first game; game i uses seed + i
    #[arg(long, default_value_t = 0, value_name = "SEED")]
    seed: u64,

    /// Games simulated and written per chunk
    #[arg(long, default_value_t = 100, value_name = "N")]
    chunk: usize,

    /// Discount factor for the return columns
    #[arg(long, default_value_t = DISCOUNT_FACTOR, value_name = "FLOAT")]
    discount: f64,

    /// Root of the run directory tree
    #[arg(long, default_value = "data", value_name = "DIR")]
    data_root: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let dir = DataLayout::new(&cli.data_root).random_games_directory();
    info!("Writing {} random games to {}", cli.games, dir.display());

    let start = Instant::now();
    let progress = ProgressBar::new(cli.games as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} games ({per_sec}, eta {eta})")?,
    );

    let chunk = cli.chunk.max(1);
    let mut written = 0usize;
    let mut rows = 0usize;
    while written < cli.games {
        let n = chunk.min(cli.games - written);
        let games = simulate_many(n, cli.seed.wrapping_add(written as u64));
        let frames = record_games(&games, cli.discount);
        frames.write(&dir)?;

        written += n;
        rows += frames.len();
        progress.inc(n as u64);
    }
    progress.finish_and_clear();

    info!(
        "Wrote {} games ({} rows) in {:.2}s",
        written,
        rows,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
