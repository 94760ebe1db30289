//! Rough sample counts for progress reporting.

use std::fs;
use std::path::Path;

use crate::data::error::DataError;
use crate::data::layout::samples_path;

/// Empirical compressed size of one samples row, in bytes.
pub const SIZE_PER_SAMPLE_ESTIMATE: f64 = 3906.25;

/// Estimate how many rows the samples file of `dir` holds.
///
/// Only good enough for progress bars and epoch sizing; never use it for
/// anything that must be exact.
pub fn estimate_sample_count(dir: &Path) -> Result<u64, DataError> {
    let file_size = fs::metadata(samples_path(dir))?.len();
    let estimate = (file_size as f64 / SIZE_PER_SAMPLE_ESTIMATE).floor() as u64;
    log::info!(
        "Training via generator. File size: {} bytes, estimated samples: {}",
        file_size,
        estimate
    );
    Ok(estimate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate_for(bytes: usize) -> u64 {
        let dir = tempfile::tempdir().unwrap();
        fs::write(samples_path(dir.path()), vec![0u8; bytes]).unwrap();
        estimate_sample_count(dir.path()).unwrap()
    }

    #[test]
    fn test_estimate_truncates() {
        assert_eq!(estimate_for(0), 0);
        assert_eq!(estimate_for(3906), 0);
        assert_eq!(estimate_for(3907), 1);
        assert_eq!(estimate_for(7813), 2);
        assert_eq!(estimate_for(40_000), 10);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            estimate_sample_count(dir.path()),
            Err(DataError::Io(_))
        ));
    }
}
