//! # Catan RL Data
//!
//! Offline reinforcement-learning data pipeline for a board-game agent:
//! where game records live on disk, how finished games become scalar
//! training labels, and how the records are streamed back as batches.
//!
//! ## Features
//!
//! - **Deterministic Layout**: One directory per (learning mode, version) run
//! - **Return Labels**: Discounted, tournament and victory-point returns
//! - **Endless Streaming**: Restarting batch iterator over compressed CSV files
//! - **Random Games**: Seeded simulator to bootstrap the first run
//!
//! ## Quick Start
//!
//! ```ignore
//! use catan_rl_data::data::{BatchStream, DataLayout, LearningMode, StreamConfig};
//!
//! // 1. Pick a run
//! let dir = DataLayout::default().run_directory(Some("Q"), 1);
//!
//! // 2. Configure the stream
//! let config = StreamConfig::new(255, "DISCOUNTED_RETURN");
//!
//! // 3. Pull batches forever
//! for batch in BatchStream::new(dir, config)? {
//!     train_step(batch?);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`data`]: Layout, returns, persistence and batch streaming
//! - [`games`]: Game simulators producing records
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  GameRecord   ┌────────────────┐  Frame x4   ┌──────────────────┐
//! │ game engine  │ ────────────▶ │ return labels  │ ──────────▶ │ populate_matrices│
//! │ (or games::) │               └────────────────┘             └────────┬─────────┘
//! └──────────────┘                                                        │ csv.gzip
//!                                                                         ▼
//!                          ┌─────────────┐     Batch (f32)     ┌──────────────────┐
//!                          │ training    │ ◀────────────────── │   BatchStream    │
//!                          └─────────────┘                     └──────────────────┘
//! ```

#![warn(missing_docs)]

/// Game-record layout, labels, persistence and streaming.
pub mod data;

/// Game simulators.
///
/// Contains the random-play simulator used to bootstrap training data.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use data::{Batch, BatchStream, DataError, DataLayout, LearningMode, StreamConfig};
