//! Error types for the training pipeline.

use std::path::PathBuf;

use sugar_data::DataError;
use sugar_forest::RfError;

/// Errors from a training run.
#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    /// Returned when the running executable's directory cannot be determined.
    #[error("cannot locate the running executable")]
    LocateExecutable {
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the dataset cannot be loaded or validated.
    #[error("failed to load dataset")]
    LoadDataset {
        /// Underlying data error.
        source: DataError,
    },

    /// Returned when the train/test partition cannot be made.
    #[error("failed to partition dataset")]
    Partition {
        /// Underlying data error.
        source: DataError,
    },

    /// Returned when the forest configuration is rejected.
    #[error("invalid forest configuration")]
    Configure {
        /// Underlying forest error.
        source: RfError,
    },

    /// Returned when fitting the forest fails.
    #[error("failed to fit random forest")]
    Fit {
        /// Underlying forest error.
        source: RfError,
    },

    /// Returned when the held-out partition cannot be scored.
    #[error("failed to score held-out partition")]
    Score {
        /// Underlying forest error.
        source: RfError,
    },

    /// Returned when the model artifact cannot be written.
    #[error("failed to save model")]
    SaveModel {
        /// Underlying forest error.
        source: RfError,
    },

    /// Returned when progress output cannot be written.
    #[error("failed to write progress output")]
    Console {
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the training report cannot be encoded.
    #[error("failed to encode training report")]
    EncodeReport {
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when the training report cannot be written.
    #[error("cannot write file {path}")]
    WriteReport {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
