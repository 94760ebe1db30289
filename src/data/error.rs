//! Error type shared by the record layout, writer and streamer.

use std::path::PathBuf;

use thiserror::Error;

use crate::data::config::ConfigError;

/// Errors surfaced by the data pipeline.
///
/// Row-level problems inside a stream are never reported through this type;
/// they are logged and the row is dropped. Everything here aborts the
/// operation that produced it.
#[derive(Debug, Error)]
pub enum DataError {
    /// Underlying I/O failure (open, read, decompress, write).
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// A record file ended before its header row.
    #[error("{} has no header row", path.display())]
    MissingHeader {
        /// File that was expected to start with a header.
        path: PathBuf,
    },

    /// The requested label column is not in the rewards header.
    #[error("label column {column:?} not found in {} (columns: {available:?})", path.display())]
    MissingLabelColumn {
        /// Column name that was requested.
        column: String,
        /// Rewards file that was searched.
        path: PathBuf,
        /// Column names present in the header.
        available: Vec<String>,
    },

    /// Frames handed to the writer do not line up.
    #[error("frame shape: {0}")]
    FrameShape(String),

    /// A full pass over the files accepted too few rows to emit one batch.
    #[error(
        "pass over {} produced no batch ({accepted} rows accepted, batch needs more than {batch_size})",
        dir.display()
    )]
    NoBatchInPass {
        /// Run directory being streamed.
        dir: PathBuf,
        /// Rows accepted during the pass.
        accepted: usize,
        /// Configured batch size.
        batch_size: usize,
    },

    /// Accumulated rows could not be stacked into a batch array.
    #[error("batch shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Invalid stream configuration.
    #[error("config: {0}")]
    Config(#[from] ConfigError),
}
