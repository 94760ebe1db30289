//! Endless batched streaming of training pairs from a run directory.
//!
//! [`BatchStream`] reads the samples, actions and rewards files of one run in
//! lockstep and yields `f32` batches for the training loop. It cycles through
//! four states:
//!
//! ```text
//!   Closed ──open──▶ Open ──scan rows──▶ (samples exhausted) ──close──▶ Closed ...
//!      │                │
//!      └─ setup fault ──┴─ read fault ──▶ Failed (stream ends)
//! ```
//!
//! # Alignment contract
//!
//! Row `i` of the samples file, row `i` of the actions file and row `i` of
//! the rewards file describe the same decision. There is no key column; the
//! writer ([`populate_matrices`](crate::data::populate_matrices)) guarantees
//! identical row order and count, and the reader relies on it without
//! checking.
//!
//! # Batching
//!
//! A batch is emitted as soon as *more than* `batch_size` rows have been
//! accepted, so every batch holds exactly `batch_size + 1` rows. When the
//! samples file runs out, the rows accumulated since the last batch are
//! dropped and the files are reopened from the top.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::iter::FusedIterator;
use std::mem;
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use ndarray::{Array1, Array2};
use thiserror::Error;

use crate::data::config::{Label, LearningMode, StreamConfig};
use crate::data::error::DataError;
use crate::data::layout::{matrices_paths, MatrixPaths};

/// One batch of training pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Model inputs, one row per sample.
    pub inputs: Array2<f32>,
    /// Labels, one per sample.
    pub labels: Labels,
}

impl Batch {
    /// Number of samples in the batch.
    pub fn len(&self) -> usize {
        self.inputs.nrows()
    }

    /// Whether the batch holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stacked labels of a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Labels {
    /// One reward per sample (Q and V modes).
    Scalar(Array1<f32>),
    /// One action vector per sample (P mode).
    Vector(Array2<f32>),
}

impl Labels {
    /// Number of labels.
    pub fn len(&self) -> usize {
        match self {
            Labels::Scalar(a) => a.len(),
            Labels::Vector(a) => a.nrows(),
        }
    }

    /// Whether there are no labels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scalar labels, if this is a Q or V batch.
    pub fn as_scalar(&self) -> Option<&Array1<f32>> {
        match self {
            Labels::Scalar(a) => Some(a),
            Labels::Vector(_) => None,
        }
    }

    /// Label rows, if this is a P batch.
    pub fn as_vector(&self) -> Option<&Array2<f32>> {
        match self {
            Labels::Scalar(_) => None,
            Labels::Vector(a) => Some(a),
        }
    }
}

/// Why a single row was dropped.
#[derive(Debug, Error)]
enum RowError {
    #[error("{file}: read failed: {source}")]
    Io {
        file: &'static str,
        source: io::Error,
    },
    #[error("{file}: line is not valid UTF-8")]
    Utf8 { file: &'static str },
    #[error("{file}: no line for this row")]
    MissingLine { file: &'static str },
    #[error("{file}: column {column} is not a number: {value:?}")]
    Parse {
        file: &'static str,
        column: usize,
        value: String,
    },
    #[error("rewards: label column {index} missing from a row with {fields} fields")]
    MissingLabel { index: usize, fields: usize },
    #[error("{what} width {found} does not match batch width {expected}")]
    Width {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}

type RecordReader = BufReader<MultiGzDecoder<File>>;

fn open_reader(path: &Path) -> Result<RecordReader, DataError> {
    let file = File::open(path)?;
    Ok(BufReader::new(MultiGzDecoder::new(file)))
}

/// Read one line into `buf`. Returns `false` at end of file.
fn read_record(reader: &mut RecordReader, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    Ok(reader.read_until(b'\n', buf)? > 0)
}

fn read_header(reader: &mut RecordReader, path: &Path) -> Result<String, DataError> {
    let mut buf = Vec::new();
    if !read_record(reader, &mut buf)? {
        return Err(DataError::MissingHeader {
            path: path.to_path_buf(),
        });
    }
    Ok(String::from_utf8_lossy(&buf).trim_end().to_string())
}

fn as_line<'a>(buf: &'a [u8], file: &'static str) -> Result<&'a str, RowError> {
    std::str::from_utf8(buf)
        .map(str::trim_end)
        .map_err(|_| RowError::Utf8 { file })
}

fn parse_value(field: &str, file: &'static str, column: usize) -> Result<f64, RowError> {
    field.trim().parse::<f64>().map_err(|_| RowError::Parse {
        file,
        column,
        value: field.to_string(),
    })
}

fn parse_fields(buf: &[u8], file: &'static str) -> Result<Vec<f32>, RowError> {
    as_line(buf, file)?
        .split(',')
        .enumerate()
        .map(|(column, field)| parse_value(field, file, column).map(|v| v as f32))
        .collect()
}

fn parse_label(buf: &[u8], index: usize) -> Result<f64, RowError> {
    let line = as_line(buf, "rewards")?;
    match line.split(',').nth(index) {
        Some(field) => parse_value(field, "rewards", index),
        None => Err(RowError::MissingLabel {
            index,
            fields: line.split(',').count(),
        }),
    }
}

/// Outcome of scanning one samples line.
enum Scan {
    Accepted(Vec<f32>, Label),
    Filtered,
    Dropped { row: usize, error: RowError },
    Exhausted,
}

/// File handles and cursor for one pass over a run.
struct OpenRun {
    samples: RecordReader,
    actions: RecordReader,
    rewards: RecordReader,
    label_index: usize,
    rows_read: usize,
    accepted: usize,
    emitted: bool,
    sample_buf: Vec<u8>,
    action_buf: Vec<u8>,
    reward_buf: Vec<u8>,
}

impl OpenRun {
    fn open(paths: &MatrixPaths, label_column: &str) -> Result<Self, DataError> {
        let mut samples = open_reader(&paths.samples)?;
        let mut actions = open_reader(&paths.actions)?;
        let mut rewards = open_reader(&paths.rewards)?;

        read_header(&mut samples, &paths.samples)?;
        read_header(&mut actions, &paths.actions)?;
        let header = read_header(&mut rewards, &paths.rewards)?;

        let label_index = header
            .split(',')
            .position(|name| name == label_column)
            .ok_or_else(|| DataError::MissingLabelColumn {
                column: label_column.to_string(),
                path: paths.rewards.clone(),
                available: header.split(',').map(str::to_string).collect(),
            })?;

        Ok(Self {
            samples,
            actions,
            rewards,
            label_index,
            rows_read: 0,
            accepted: 0,
            emitted: false,
            sample_buf: Vec::new(),
            action_buf: Vec::new(),
            reward_buf: Vec::new(),
        })
    }

    /// Advance all three files by one line and parse the row.
    ///
    /// Only a failure to read the samples file is fatal; everything else
    /// drops the row.
    fn scan(&mut self, config: &StreamConfig) -> Result<Scan, DataError> {
        if !read_record(&mut self.samples, &mut self.sample_buf)? {
            return Ok(Scan::Exhausted);
        }
        let row = self.rows_read;
        self.rows_read += 1;

        // Both companion lines are consumed before any parsing so the files
        // stay in lockstep whatever happens to this row.
        let action_read = read_record(&mut self.actions, &mut self.action_buf);
        let reward_read = read_record(&mut self.rewards, &mut self.reward_buf);

        match self.parse(action_read, reward_read, config) {
            Ok(Some((input, label))) => Ok(Scan::Accepted(input, label)),
            Ok(None) => Ok(Scan::Filtered),
            Err(error) => Ok(Scan::Dropped { row, error }),
        }
    }

    fn parse(
        &self,
        action_read: io::Result<bool>,
        reward_read: io::Result<bool>,
        config: &StreamConfig,
    ) -> Result<Option<(Vec<f32>, Label)>, RowError> {
        if !action_read.map_err(|source| RowError::Io {
            file: "actions",
            source,
        })? {
            return Err(RowError::MissingLine { file: "actions" });
        }
        if !reward_read.map_err(|source| RowError::Io {
            file: "rewards",
            source,
        })? {
            return Err(RowError::MissingLine { file: "rewards" });
        }

        let state = parse_fields(&self.sample_buf, "samples")?;
        let action = parse_fields(&self.action_buf, "actions")?;
        let reward = parse_label(&self.reward_buf, self.label_index)?;

        if let Some(threshold) = config.label_threshold {
            if reward < threshold {
                return Ok(None);
            }
        }

        Ok(Some(config.learning_mode.shape(state, action, reward as f32)))
    }
}

/// Rows accepted since the last emitted batch, stored flat.
#[derive(Debug, Default)]
struct BatchBuilder {
    inputs: Vec<f32>,
    labels: Vec<f32>,
    input_width: usize,
    label_width: usize,
    rows: usize,
}

impl BatchBuilder {
    fn len(&self) -> usize {
        self.rows
    }

    /// Add a row; rows must match the widths of the rows already held.
    fn push(&mut self, input: Vec<f32>, label: Label) -> Result<(), RowError> {
        let label_width = label.width();

        if self.rows == 0 {
            self.input_width = input.len();
            self.label_width = label_width;
        } else if input.len() != self.input_width {
            return Err(RowError::Width {
                what: "input",
                expected: self.input_width,
                found: input.len(),
            });
        } else if label_width != self.label_width {
            return Err(RowError::Width {
                what: "label",
                expected: self.label_width,
                found: label_width,
            });
        }

        self.inputs.extend(input);
        match label {
            Label::Scalar(v) => self.labels.push(v),
            Label::Vector(v) => self.labels.extend(v),
        }
        self.rows += 1;
        Ok(())
    }

    fn clear(&mut self) {
        self.inputs.clear();
        self.labels.clear();
        self.rows = 0;
    }

    fn take(&mut self, mode: LearningMode) -> Result<Batch, DataError> {
        let rows = mem::take(&mut self.rows);
        let inputs = Array2::from_shape_vec((rows, self.input_width), mem::take(&mut self.inputs))?;
        let label_values = mem::take(&mut self.labels);
        let labels = if mode.has_scalar_label() {
            Labels::Scalar(Array1::from_vec(label_values))
        } else {
            Labels::Vector(Array2::from_shape_vec((rows, self.label_width), label_values)?)
        };
        Ok(Batch { inputs, labels })
    }
}

enum StreamState {
    Closed,
    Open(OpenRun),
    Failed,
}

/// Endless iterator of training batches read from one run directory.
///
/// Files are opened lazily on the first pull, so setup faults (missing
/// files, missing label column) arrive as the first item. After any fatal
/// fault the iterator returns `None` forever. Otherwise it never ends.
///
/// A single stream must be the only reader of its run while it is being
/// pulled, and nothing may append to the run in the meantime.
///
/// # Example
/// ```no_run
/// use catan_rl_data::data::{run_directory, BatchStream, StreamConfig};
///
/// let config = StreamConfig::new(255, "DISCOUNTED_RETURN");
/// let stream = BatchStream::new(run_directory(Some("Q"), 1), config).unwrap();
/// for batch in stream.take(10) {
///     let batch = batch.unwrap();
///     assert_eq!(batch.len(), 256);
/// }
/// ```
pub struct BatchStream {
    dir: PathBuf,
    paths: MatrixPaths,
    config: StreamConfig,
    state: StreamState,
    builder: BatchBuilder,
    passes: u64,
}

impl BatchStream {
    /// Stream batches from the run in `dir`. No file is touched until the
    /// first pull.
    pub fn new(dir: impl Into<PathBuf>, config: StreamConfig) -> Result<Self, DataError> {
        config.validate()?;
        let dir = dir.into();
        Ok(Self {
            paths: matrices_paths(&dir),
            dir,
            config,
            state: StreamState::Closed,
            builder: BatchBuilder::default(),
            passes: 0,
        })
    }

    /// Run directory being streamed.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stream configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Number of completed passes over the files.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    fn fail(&mut self, error: DataError) -> Option<Result<Batch, DataError>> {
        self.state = StreamState::Failed;
        self.builder.clear();
        Some(Err(error))
    }
}

impl Iterator for BatchStream {
    type Item = Result<Batch, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.state {
                StreamState::Failed => return None,

                StreamState::Closed => match OpenRun::open(&self.paths, &self.config.label_column) {
                    Ok(run) => self.state = StreamState::Open(run),
                    Err(e) => return self.fail(e),
                },

                StreamState::Open(run) => match run.scan(&self.config) {
                    Err(e) => return self.fail(e),

                    Ok(Scan::Filtered) => {}

                    Ok(Scan::Dropped { row, error }) => {
                        log::warn!(
                            "Dropping row {} of {} (mode {}): {}",
                            row,
                            self.dir.display(),
                            self.config.learning_mode,
                            error
                        );
                    }

                    Ok(Scan::Accepted(input, label)) => {
                        let row = run.rows_read - 1;
                        if let Err(error) = self.builder.push(input, label) {
                            log::warn!(
                                "Dropping row {} of {} (mode {}): {}",
                                row,
                                self.dir.display(),
                                self.config.learning_mode,
                                error
                            );
                            continue;
                        }
                        run.accepted += 1;

                        if self.builder.len() > self.config.batch_size {
                            run.emitted = true;
                            return match self.builder.take(self.config.learning_mode) {
                                Ok(batch) => Some(Ok(batch)),
                                Err(e) => self.fail(e),
                            };
                        }
                    }

                    Ok(Scan::Exhausted) => {
                        let emitted = run.emitted;
                        let accepted = run.accepted;
                        let rows_read = run.rows_read;
                        let discarded = self.builder.len();

                        self.builder.clear();
                        self.state = StreamState::Closed;
                        self.passes += 1;

                        if !emitted {
                            return self.fail(DataError::NoBatchInPass {
                                dir: self.dir.clone(),
                                accepted,
                                batch_size: self.config.batch_size,
                            });
                        }

                        log::debug!(
                            "Restarting {} after {} rows (pass {}, {} partial rows discarded)",
                            self.dir.display(),
                            rows_read,
                            self.passes,
                            discarded
                        );
                    }
                },
            }
        }
    }
}

impl FusedIterator for BatchStream {}

/// Stream batches from `dir` with the given parameters.
///
/// Shorthand for building a [`StreamConfig`] and a [`BatchStream`].
pub fn stream(
    dir: impl Into<PathBuf>,
    batch_size: usize,
    label_column: &str,
    learning_mode: LearningMode,
    label_threshold: Option<f64>,
) -> Result<BatchStream, DataError> {
    let mut config = StreamConfig::new(batch_size, label_column).with_learning_mode(learning_mode);
    config.label_threshold = label_threshold;
    BatchStream::new(dir, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::layout::{actions_path, rewards_path, samples_path};
    use crate::data::writer::{populate_matrices, Frame};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const STATE_DIM: usize = 3;
    const ACTION_DIM: usize = 2;

    /// Row `i` has state `[i, i+0.25, i+0.5]`, action one-hot on `i % 2`,
    /// and rewards `RETURN = i`, `WIN = i % 2`.
    fn write_run(dir: &Path, rows: usize) {
        let mut samples = Frame::numbered("F", STATE_DIM);
        let mut boards = Frame::numbered("B", 1);
        let mut actions = Frame::numbered("A", ACTION_DIM);
        let mut rewards = Frame::new(["RETURN", "WIN"]);
        for i in 0..rows {
            let x = i as f64;
            samples.push_row(vec![x, x + 0.25, x + 0.5]);
            boards.push_row(vec![0.0]);
            let mut action = vec![0.0; ACTION_DIM];
            action[i % 2] = 1.0;
            actions.push_row(action);
            rewards.push_row(vec![x, (i % 2) as f64]);
        }
        populate_matrices(&samples, &boards, &actions, &rewards, dir).unwrap();
    }

    fn write_gz(path: &Path, text: &str) {
        let mut encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap();
    }

    fn first_column(batch: &Batch) -> Vec<f32> {
        batch.inputs.column(0).to_vec()
    }

    #[test]
    fn test_q_mode_shapes() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), 10);

        let mut s = stream(dir.path(), 3, "RETURN", LearningMode::Q, None).unwrap();
        let batch = s.next().unwrap().unwrap();

        assert_eq!(batch.len(), 4);
        assert_eq!(batch.inputs.ncols(), STATE_DIM + ACTION_DIM);
        assert_eq!(batch.inputs.row(1).to_vec(), vec![1.0, 1.25, 1.5, 0.0, 1.0]);
        let labels = batch.labels.as_scalar().unwrap();
        assert_eq!(labels.to_vec(), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_v_mode_shapes() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), 10);

        let mut s = stream(dir.path(), 1, "WIN", LearningMode::V, None).unwrap();
        let batch = s.next().unwrap().unwrap();

        assert_eq!(batch.inputs.ncols(), STATE_DIM);
        assert_eq!(batch.labels.as_scalar().unwrap().to_vec(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_p_mode_shapes() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), 10);

        let mut s = stream(dir.path(), 2, "RETURN", LearningMode::P, None).unwrap();
        let batch = s.next().unwrap().unwrap();

        assert_eq!(batch.inputs.ncols(), STATE_DIM);
        let labels = batch.labels.as_vector().unwrap();
        assert_eq!(labels.dim(), (3, ACTION_DIM));
        assert_eq!(labels.row(0).to_vec(), vec![1.0, 0.0]);
        assert_eq!(labels.row(1).to_vec(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_batches_cover_pass_then_restart() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), 10);

        let mut s = stream(dir.path(), 2, "RETURN", LearningMode::V, None).unwrap();
        let mut seen = Vec::new();
        for _ in 0..3 {
            let batch = s.next().unwrap().unwrap();
            assert_eq!(batch.len(), 3);
            seen.extend(first_column(&batch));
        }
        assert_eq!(seen, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(s.passes(), 0);

        // Row 9 is the discarded partial batch; the next batch starts over.
        let batch = s.next().unwrap().unwrap();
        assert_eq!(first_column(&batch), vec![0.0, 1.0, 2.0]);
        assert_eq!(s.passes(), 1);
    }

    #[test]
    fn test_three_row_restart() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), 3);

        let mut s = stream(dir.path(), 1, "RETURN", LearningMode::Q, None).unwrap();
        let first = s.next().unwrap().unwrap();
        let second = s.next().unwrap().unwrap();
        assert_eq!(first_column(&first), vec![0.0, 1.0]);
        assert_eq!(first, second);
        assert_eq!(s.passes(), 1);
    }

    #[test]
    fn test_threshold_is_strict() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), 10);

        // RETURN == 4.0 is kept, 3.0 is filtered.
        let mut s = stream(dir.path(), 1, "RETURN", LearningMode::V, Some(4.0)).unwrap();
        let batch = s.next().unwrap().unwrap();
        assert_eq!(batch.labels.as_scalar().unwrap().to_vec(), vec![4.0, 5.0]);
    }

    #[test]
    fn test_reads_across_appended_members() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), 2);
        write_run(dir.path(), 2);

        let mut s = stream(dir.path(), 3, "RETURN", LearningMode::V, None).unwrap();
        let batch = s.next().unwrap().unwrap();
        assert_eq!(first_column(&batch), vec![0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_missing_label_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), 10);

        let mut s = stream(dir.path(), 1, "NOPE", LearningMode::Q, None).unwrap();
        match s.next() {
            Some(Err(DataError::MissingLabelColumn { column, available, .. })) => {
                assert_eq!(column, "NOPE");
                assert_eq!(available, vec!["RETURN", "WIN"]);
            }
            other => panic!("expected missing label column, got {:?}", other.map(|r| r.is_ok())),
        }
        assert!(s.next().is_none());
        assert!(s.next().is_none());
    }

    #[test]
    fn test_missing_files_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = stream(dir.path(), 1, "RETURN", LearningMode::Q, None).unwrap();
        assert!(matches!(s.next(), Some(Err(DataError::Io(_)))));
        assert!(s.next().is_none());
    }

    #[test]
    fn test_missing_header_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_gz(&samples_path(dir.path()), "");
        write_gz(&actions_path(dir.path()), "");
        write_gz(&rewards_path(dir.path()), "");

        let mut s = stream(dir.path(), 1, "RETURN", LearningMode::Q, None).unwrap();
        assert!(matches!(s.next(), Some(Err(DataError::MissingHeader { .. }))));
    }

    #[test]
    fn test_malformed_rows_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        write_gz(&samples_path(dir.path()), "a,b\n0,0\n1,oops\n2,2\n\n4,4\n5,5\n");
        write_gz(&actions_path(dir.path()), "x\n0\n1\n2\n3\n4\n5\n");
        write_gz(&rewards_path(dir.path()), "RETURN\n0\n1\n2\n3\nbad\n5\n");

        // Row 1 has a bad state, row 3 is blank, row 4 has a bad reward.
        let mut s = stream(dir.path(), 1, "RETURN", LearningMode::Q, None).unwrap();
        let batch = s.next().unwrap().unwrap();
        assert_eq!(batch.labels.as_scalar().unwrap().to_vec(), vec![0.0, 2.0]);
        assert_eq!(batch.inputs.row(1).to_vec(), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_short_companion_file_drops_trailing_rows() {
        let dir = tempfile::tempdir().unwrap();
        write_gz(&samples_path(dir.path()), "a\n0\n1\n2\n3\n4\n");
        write_gz(&actions_path(dir.path()), "x\n0\n1\n2\n");
        write_gz(&rewards_path(dir.path()), "RETURN\n0\n1\n2\n3\n4\n");

        let mut s = stream(dir.path(), 1, "RETURN", LearningMode::Q, None).unwrap();
        let first = s.next().unwrap().unwrap();
        assert_eq!(first.labels.as_scalar().unwrap().to_vec(), vec![0.0, 1.0]);
        // Row 2 is pending, rows 3 and 4 have no action line; next pass.
        let second = s.next().unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ragged_row_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        write_gz(&samples_path(dir.path()), "a,b\n0,0\n1,1,1\n2,2\n");
        write_gz(&actions_path(dir.path()), "x\n0\n1\n2\n");
        write_gz(&rewards_path(dir.path()), "RETURN\n0\n1\n2\n");

        let mut s = stream(dir.path(), 1, "RETURN", LearningMode::V, None).unwrap();
        let batch = s.next().unwrap().unwrap();
        assert_eq!(batch.inputs.dim(), (2, 2));
        assert_eq!(batch.labels.as_scalar().unwrap().to_vec(), vec![0.0, 2.0]);
    }

    #[test]
    fn test_ragged_action_label_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        write_gz(&samples_path(dir.path()), "a\n0\n1\n2\n");
        write_gz(&actions_path(dir.path()), "x,y\n1,0\n1\n0,1\n");
        write_gz(&rewards_path(dir.path()), "RETURN\n0\n1\n2\n");

        let mut s = stream(dir.path(), 1, "RETURN", LearningMode::P, None).unwrap();
        let batch = s.next().unwrap().unwrap();
        assert_eq!(batch.inputs.column(0).to_vec(), vec![0.0, 2.0]);
        let labels = batch.labels.as_vector().unwrap();
        assert_eq!(labels.dim(), (2, 2));
        assert_eq!(labels.row(1).to_vec(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_pass_without_batch_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), 3);

        let mut s = stream(dir.path(), 5, "RETURN", LearningMode::Q, None).unwrap();
        match s.next() {
            Some(Err(DataError::NoBatchInPass {
                accepted,
                batch_size,
                ..
            })) => {
                assert_eq!(accepted, 3);
                assert_eq!(batch_size, 5);
            }
            other => panic!("expected no-batch error, got {:?}", other.map(|r| r.is_ok())),
        }
        assert!(s.next().is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            stream("unused", 1, "", LearningMode::Q, None),
            Err(DataError::Config(_))
        ));
    }
}
