//! On-disk layout of game-record runs.
//!
//! Every run lives in its own directory and holds four compressed,
//! comma-separated files that are always written together:
//!
//! ```text
//! <data_root>/<mode_key>/<version>/
//!     samples.csv.gzip
//!     board_tensors.csv.gzip
//!     actions.csv.gzip
//!     rewards.csv.gzip
//! ```
//!
//! Runs without a recognised learning-mode key share `<data_root>/random_games`.
//! Nothing in this module touches the filesystem.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::config::LearningMode;

/// Default root directory for all runs.
pub const DATA_DIRECTORY: &str = "data";

/// Directory used for runs that have no learning-mode key.
pub const RANDOM_GAMES_DIRECTORY: &str = "random_games";

const SAMPLES_FILE: &str = "samples.csv.gzip";
const BOARD_TENSORS_FILE: &str = "board_tensors.csv.gzip";
const ACTIONS_FILE: &str = "actions.csv.gzip";
const REWARDS_FILE: &str = "rewards.csv.gzip";

/// Path of the samples (state features) file in a run directory.
pub fn samples_path(dir: &Path) -> PathBuf {
    dir.join(SAMPLES_FILE)
}

/// Path of the flattened board-tensor file in a run directory.
pub fn board_tensors_path(dir: &Path) -> PathBuf {
    dir.join(BOARD_TENSORS_FILE)
}

/// Path of the actions file in a run directory.
pub fn actions_path(dir: &Path) -> PathBuf {
    dir.join(ACTIONS_FILE)
}

/// Path of the rewards (label columns) file in a run directory.
pub fn rewards_path(dir: &Path) -> PathBuf {
    dir.join(REWARDS_FILE)
}

/// The four co-located files of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixPaths {
    /// State feature rows.
    pub samples: PathBuf,
    /// Flattened board tensors, one row per sample.
    pub board_tensors: PathBuf,
    /// Action rows, line-aligned with samples.
    pub actions: PathBuf,
    /// Named reward/label columns, line-aligned with samples.
    pub rewards: PathBuf,
}

impl MatrixPaths {
    /// The paths in their fixed order: samples, board tensors, actions, rewards.
    pub fn as_array(&self) -> [&Path; 4] {
        [
            &self.samples,
            &self.board_tensors,
            &self.actions,
            &self.rewards,
        ]
    }
}

/// All four file paths of a run directory.
pub fn matrices_paths(dir: &Path) -> MatrixPaths {
    MatrixPaths {
        samples: samples_path(dir),
        board_tensors: board_tensors_path(dir),
        actions: actions_path(dir),
        rewards: rewards_path(dir),
    }
}

/// Run directory under the default [`DATA_DIRECTORY`] root.
///
/// See [`DataLayout::run_directory`].
pub fn run_directory(key: Option<&str>, version: u32) -> PathBuf {
    DataLayout::default().run_directory(key, version)
}

/// Root of the run directory tree.
///
/// # Example
/// ```
/// use catan_rl_data::data::DataLayout;
///
/// let layout = DataLayout::new("/tmp/records");
/// assert!(layout.run_directory(Some("Q"), 7).ends_with("Q/7"));
/// assert!(layout.run_directory(Some("Z"), 7).ends_with("random_games"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLayout {
    /// Directory that contains the per-mode subdirectories.
    pub data_root: PathBuf,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new(DATA_DIRECTORY)
    }
}

impl DataLayout {
    /// Layout rooted at `data_root`.
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    /// Directory for a run.
    ///
    /// A key naming a learning mode (`"Q"`, `"V"` or `"P"`) maps to
    /// `<data_root>/<key>/<version>`. Any other key, including none, maps to
    /// `<data_root>/random_games` and the version is ignored.
    pub fn run_directory(&self, key: Option<&str>, version: u32) -> PathBuf {
        match key.and_then(|k| k.parse::<LearningMode>().ok()) {
            Some(mode) => self.run_directory_for(mode, version),
            None => self.random_games_directory(),
        }
    }

    /// Directory for a run of a known learning mode.
    pub fn run_directory_for(&self, mode: LearningMode, version: u32) -> PathBuf {
        self.data_root.join(mode.tag()).join(version.to_string())
    }

    /// Shared directory for runs without a learning-mode key.
    pub fn random_games_directory(&self) -> PathBuf {
        self.data_root.join(RANDOM_GAMES_DIRECTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_are_fixed() {
        let dir = Path::new("runs/Q/3");
        assert_eq!(samples_path(dir), dir.join("samples.csv.gzip"));
        assert_eq!(board_tensors_path(dir), dir.join("board_tensors.csv.gzip"));
        assert_eq!(actions_path(dir), dir.join("actions.csv.gzip"));
        assert_eq!(rewards_path(dir), dir.join("rewards.csv.gzip"));
    }

    #[test]
    fn test_matrices_paths_order() {
        let dir = Path::new("x");
        let paths = matrices_paths(dir);
        let names: Vec<_> = paths
            .as_array()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "samples.csv.gzip",
                "board_tensors.csv.gzip",
                "actions.csv.gzip",
                "rewards.csv.gzip"
            ]
        );
        for p in paths.as_array() {
            assert_eq!(p.parent(), Some(dir));
        }
    }

    #[test]
    fn test_run_directory_recognised_keys() {
        assert_eq!(run_directory(Some("Q"), 7), Path::new("data/Q/7"));
        assert_eq!(run_directory(Some("V"), 1), Path::new("data/V/1"));
        assert_eq!(run_directory(Some("P"), 12), Path::new("data/P/12"));
        assert!(run_directory(Some("Q"), 7).ends_with("Q/7"));
    }

    #[test]
    fn test_run_directory_fallback_ignores_version() {
        let fallback = Path::new("data/random_games");
        assert_eq!(run_directory(Some("Z"), 7), fallback);
        assert_eq!(run_directory(Some("Z"), 99), fallback);
        assert_eq!(run_directory(None, 7), fallback);
        // Keys are case sensitive.
        assert_eq!(run_directory(Some("q"), 7), fallback);
    }

    #[test]
    fn test_custom_root() {
        let layout = DataLayout::new("/srv/games");
        assert_eq!(
            layout.run_directory_for(LearningMode::V, 2),
            Path::new("/srv/games/V/2")
        );
        assert_eq!(
            layout.random_games_directory(),
            Path::new("/srv/games/random_games")
        );
    }
}
