//! Game-record data pipeline.
//!
//! This module turns finished games into training data and streams that data
//! back out in batches.
//!
//! # Overview
//!
//! 1. A run directory is picked with [`DataLayout::run_directory`]
//! 2. Each finished game is scored with one of the return functions
//!    ([`discounted_return`], [`tournament_return`], [`victory_points_return`])
//! 3. Per-decision rows are appended to the run with [`populate_matrices`]
//! 4. Training pulls batches from a [`BatchStream`] over the same run
//!
//! # Example
//!
//! ```no_run
//! use catan_rl_data::data::{
//!     estimate_sample_count, DataLayout, LearningMode, BatchStream, StreamConfig,
//! };
//!
//! let dir = DataLayout::default().run_directory_for(LearningMode::V, 3);
//! let per_epoch = estimate_sample_count(&dir).unwrap();
//!
//! let config = StreamConfig::new(255, "VICTORY_POINTS_RETURN")
//!     .with_learning_mode(LearningMode::V);
//! let batches = BatchStream::new(&dir, config).unwrap();
//! for batch in batches.take((per_epoch / 256) as usize) {
//!     let batch = batch.unwrap();
//!     println!("{:?} -> {}", batch.inputs.dim(), batch.labels.len());
//! }
//! ```
//!
//! # Returns
//!
//! Only the terminal outcome is rewarded, so every return has the form
//! ```text
//! G = d^T * r_T
//! ```
//! where `T` is the number of actions in the game.

pub mod config;
pub mod error;
pub mod estimate;
pub mod game;
pub mod layout;
pub mod returns;
pub mod stream;
pub mod writer;

// Re-export main types for convenient access
pub use config::{ConfigError, Label, LearningMode, StreamConfig};
pub use error::DataError;
pub use estimate::{estimate_sample_count, SIZE_PER_SAMPLE_ESTIMATE};
pub use game::{is_winner, GameRecord, PlayerRecord};
pub use layout::{
    actions_path, board_tensors_path, matrices_paths, rewards_path, run_directory, samples_path,
    DataLayout, MatrixPaths, DATA_DIRECTORY, RANDOM_GAMES_DIRECTORY,
};
pub use returns::{
    discounted_return, tournament_return, victory_points_return, DISCOUNT_FACTOR,
    VICTORY_POINTS_DISCOUNT, VICTORY_POINTS_ORDERING_BOUND,
};
pub use stream::{stream, Batch, BatchStream, Labels};
pub use writer::{populate_matrices, Frame};
