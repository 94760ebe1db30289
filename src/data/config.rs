//! Configuration for batch streaming.
//!
//! This module holds the learning-mode enumeration, which decides how a
//! (state, action, reward) row becomes a training pair, and the stream
//! configuration passed to [`BatchStream`](crate::data::BatchStream).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::error::DataError;

/// What the model being trained regresses.
///
/// | Mode | Input            | Label         |
/// |------|------------------|---------------|
/// | `Q`  | state ++ action  | scalar reward |
/// | `V`  | state            | scalar reward |
/// | `P`  | state            | action vector |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LearningMode {
    /// State-action value learning.
    #[default]
    Q,
    /// State value learning.
    V,
    /// Policy learning.
    P,
}

/// Label of one shaped training row.
#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    /// Single reward value (Q and V modes).
    Scalar(f32),
    /// Action vector (P mode).
    Vector(Vec<f32>),
}

impl Label {
    /// Number of values this label contributes to a batch row.
    pub fn width(&self) -> usize {
        match self {
            Label::Scalar(_) => 1,
            Label::Vector(v) => v.len(),
        }
    }
}

impl LearningMode {
    /// All modes, in directory-key order.
    pub const ALL: [LearningMode; 3] = [LearningMode::Q, LearningMode::V, LearningMode::P];

    /// Directory key for this mode.
    pub fn tag(self) -> &'static str {
        match self {
            LearningMode::Q => "Q",
            LearningMode::V => "V",
            LearningMode::P => "P",
        }
    }

    /// Turn one parsed row into an (input, label) pair.
    pub fn shape(self, state: Vec<f32>, action: Vec<f32>, reward: f32) -> (Vec<f32>, Label) {
        match self {
            LearningMode::Q => shape_q(state, action, reward),
            LearningMode::V => shape_v(state, action, reward),
            LearningMode::P => shape_p(state, action, reward),
        }
    }

    /// Whether labels of this mode are scalars.
    pub fn has_scalar_label(self) -> bool {
        !matches!(self, LearningMode::P)
    }
}

fn shape_q(mut state: Vec<f32>, action: Vec<f32>, reward: f32) -> (Vec<f32>, Label) {
    state.extend(action);
    (state, Label::Scalar(reward))
}

fn shape_v(state: Vec<f32>, _action: Vec<f32>, reward: f32) -> (Vec<f32>, Label) {
    (state, Label::Scalar(reward))
}

fn shape_p(state: Vec<f32>, action: Vec<f32>, _reward: f32) -> (Vec<f32>, Label) {
    (state, Label::Vector(action))
}

impl fmt::Display for LearningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for LearningMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Q" => Ok(LearningMode::Q),
            "V" => Ok(LearningMode::V),
            "P" => Ok(LearningMode::P),
            other => Err(ConfigError::UnknownLearningMode(other.to_string())),
        }
    }
}

/// Configuration for a [`BatchStream`](crate::data::BatchStream).
///
/// # Example
/// ```
/// use catan_rl_data::data::{LearningMode, StreamConfig};
///
/// let config = StreamConfig::new(256, "DISCOUNTED_RETURN")
///     .with_learning_mode(LearningMode::V)
///     .with_label_threshold(0.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// A batch is emitted once more than this many rows have accumulated,
    /// so every batch holds `batch_size + 1` rows.
    pub batch_size: usize,

    /// Name of the rewards column used as the label.
    pub label_column: String,

    /// How rows are shaped into (input, label) pairs.
    #[serde(default)]
    pub learning_mode: LearningMode,

    /// Rows whose reward is strictly below this value are skipped.
    #[serde(default)]
    pub label_threshold: Option<f64>,
}

impl StreamConfig {
    /// Q-learning configuration with no threshold.
    pub fn new(batch_size: usize, label_column: impl Into<String>) -> Self {
        Self {
            batch_size,
            label_column: label_column.into(),
            learning_mode: LearningMode::default(),
            label_threshold: None,
        }
    }

    /// Builder method: set the learning mode.
    pub fn with_learning_mode(mut self, mode: LearningMode) -> Self {
        self.learning_mode = mode;
        self
    }

    /// Builder method: skip rows whose reward is below `threshold`.
    pub fn with_label_threshold(mut self, threshold: f64) -> Self {
        self.label_threshold = Some(threshold);
        self
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        let config: StreamConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label_column.is_empty() {
            return Err(ConfigError::EmptyLabelColumn);
        }

        if let Some(threshold) = self.label_threshold {
            if !threshold.is_finite() {
                return Err(ConfigError::InvalidThreshold(threshold));
            }
        }

        Ok(())
    }
}

/// Errors that can occur when validating stream configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Learning-mode string is not one of `Q`, `V`, `P`.
    UnknownLearningMode(String),
    /// Label column name is empty.
    EmptyLabelColumn,
    /// Label threshold is NaN or infinite.
    InvalidThreshold(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownLearningMode(s) => {
                write!(f, "Unknown learning mode {:?} (expected Q, V or P)", s)
            }
            ConfigError::EmptyLabelColumn => write!(f, "Label column name is empty"),
            ConfigError::InvalidThreshold(val) => {
                write!(f, "Label threshold {} is not a finite number", val)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
