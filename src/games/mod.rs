//! Game simulators that produce records for the data pipeline.
//!
//! The full board-game engine is a separate system. The simulators here
//! implement the same [`GameRecord`](crate::data::GameRecord) /
//! [`PlayerRecord`](crate::data::PlayerRecord) interface and serve as:
//!
//! 1. **Bootstrap data**: random play fills the `random_games` run that the
//!    first models train on.
//!
//! 2. **Fixtures**: realistic record files for tests and benchmarks.
//!
//! ## Available Games
//!
//! - [`random_games`]: four-color resource race with uniformly random moves

pub mod random_games;
