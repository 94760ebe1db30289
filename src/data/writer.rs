//! Append-only persistence of game-record frames.
//!
//! Each call to [`populate_matrices`] appends one gzip member to each of the
//! four run files. The header row is written only when the run is fresh, so a
//! run directory read back through a multi-member gzip decoder looks like a
//! single CSV file with one header.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::data::error::DataError;
use crate::data::layout::matrices_paths;

/// A named-column table of floating-point rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl Frame {
    /// Empty frame with the given column names.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Empty frame with `width` columns named `<prefix>_0 .. <prefix>_{width-1}`.
    pub fn numbered(prefix: &str, width: usize) -> Self {
        Self::new((0..width).map(|i| format!("{}_{}", prefix, i)))
    }

    /// Append a row. Width is checked when the frame is written.
    pub fn push_row(&mut self, row: Vec<f64>) {
        self.rows.push(row);
    }

    /// Column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn check_widths(&self, name: &str) -> Result<(), DataError> {
        let width = self.columns.len();
        match self.rows.iter().position(|r| r.len() != width) {
            Some(i) => Err(DataError::FrameShape(format!(
                "{} row {} has {} values, header has {}",
                name,
                i,
                self.rows[i].len(),
                width
            ))),
            None => Ok(()),
        }
    }
}

/// Append the four frames of a batch of games to the run in `dir`.
///
/// The directory is created if needed. Headers are written only when the
/// samples file does not exist yet. All frames must have the same number of
/// rows, since readers join the files by line position; the shapes are
/// checked before anything is written.
///
/// The four appends are not atomic. If a write fails after an earlier file
/// was appended, the run is left with misaligned files and must be repaired
/// or discarded before it is streamed again.
pub fn populate_matrices(
    samples: &Frame,
    board_tensors: &Frame,
    actions: &Frame,
    rewards: &Frame,
    dir: &Path,
) -> Result<(), DataError> {
    let named = [
        ("samples", samples),
        ("board_tensors", board_tensors),
        ("actions", actions),
        ("rewards", rewards),
    ];
    for (name, frame) in named {
        frame.check_widths(name)?;
        if frame.len() != samples.len() {
            return Err(DataError::FrameShape(format!(
                "{} has {} rows, samples has {}",
                name,
                frame.len(),
                samples.len()
            )));
        }
    }

    fs::create_dir_all(dir)?;

    let paths = matrices_paths(dir);
    let is_first_write = !paths.samples.is_file();

    for (path, (_, frame)) in paths.as_array().into_iter().zip(named) {
        append_frame(path, frame, is_first_write)?;
    }

    log::info!(
        "Appended {} rows to {} (header written: {})",
        samples.len(),
        dir.display(),
        is_first_write
    );

    Ok(())
}

fn append_frame(path: &Path, frame: &Frame, write_header: bool) -> Result<(), DataError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());

    if write_header {
        writeln!(encoder, "{}", frame.columns.join(","))?;
    }

    for row in &frame.rows {
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                encoder.write_all(b",")?;
            }
            write!(encoder, "{}", value)?;
        }
        encoder.write_all(b"\n")?;
    }

    encoder.finish()?.flush()?;
    Ok(())
}
