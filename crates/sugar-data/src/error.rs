//! Error types for sugar-data.

use std::path::PathBuf;

/// Errors from reading, validating, and partitioning a dataset.
///
/// `origin` names where the data came from: a file path, or the label of
/// the embedded copy.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {origin} at byte offset {offset}")]
    CsvParse {
        /// Where the data came from.
        origin: String,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the header has no column named like the target.
    #[error("missing target column \"{target}\" in {origin}")]
    MissingTargetColumn {
        /// Where the data came from.
        origin: String,
        /// Name of the expected target column.
        target: String,
    },

    /// Returned when the header holds only the target column.
    #[error("no feature columns in {origin}")]
    NoFeatureColumns {
        /// Where the data came from.
        origin: String,
    },

    /// Returned when the CSV contains a header but zero data rows.
    #[error("empty dataset (no data rows) in {origin}")]
    EmptyDataset {
        /// Where the data came from.
        origin: String,
    },

    /// Returned when a data row has a different number of columns than the header.
    #[error("inconsistent row length in {origin}: row {row_index} has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Where the data came from.
        origin: String,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Expected number of columns.
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when a cell value is NaN, Inf, or otherwise not a finite float.
    #[error("non-finite value in {origin}: row {row_index}, column \"{column}\", raw value \"{raw}\"")]
    NonFiniteValue {
        /// Where the data came from.
        origin: String,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Header name of the offending column.
        column: String,
        /// The raw string value that failed to parse.
        raw: String,
    },

    /// Returned when the number of targets differs from the number of rows.
    #[error("target count mismatch: {n_rows} rows, {n_targets} targets")]
    TargetCountMismatch {
        /// Number of feature rows.
        n_rows: usize,
        /// Number of targets.
        n_targets: usize,
    },

    /// Returned when the test fraction is outside (0.0, 1.0).
    #[error("invalid test fraction {fraction}: must be in (0.0, 1.0)")]
    InvalidTestFraction {
        /// The rejected fraction.
        fraction: f64,
    },

    /// Returned when a split would leave either partition empty.
    #[error("cannot split {n_samples} samples with {n_test} held out: both partitions must be non-empty")]
    SplitTooSmall {
        /// Number of samples in the dataset.
        n_samples: usize,
        /// Number of samples the test fraction would hold out.
        n_test: usize,
    },
}
