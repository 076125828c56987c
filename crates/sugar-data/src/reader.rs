//! CSV dataset reader with full input validation.

use std::io::Read;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::dataset::Dataset;
use crate::DataError;

/// Default name of the target column.
pub const DEFAULT_TARGET_COLUMN: &str = "target";

/// Reads a regression dataset from CSV.
///
/// Expected CSV format:
/// - Header row required; one column is the target, every other column is a feature
/// - `age,sex,bmi,...,target`
/// - One row per sample, all rows must have the same number of columns
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DataError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`DataError::CsvParse`] | Malformed CSV record |
/// | [`DataError::MissingTargetColumn`] | No header column matches the target name |
/// | [`DataError::NoFeatureColumns`] | Only the target column is present |
/// | [`DataError::EmptyDataset`] | Zero data rows after header |
/// | [`DataError::InconsistentRowLength`] | Row has different column count than header |
/// | [`DataError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
#[derive(Debug, Clone)]
pub struct DatasetReader {
    target_column: String,
}

impl Default for DatasetReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetReader {
    /// Create a reader that expects a column named `target`.
    pub fn new() -> Self {
        Self {
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
        }
    }

    /// Use a different column as the target.
    #[must_use]
    pub fn with_target_column(mut self, name: impl Into<String>) -> Self {
        self.target_column = name.into();
        self
    }

    /// Read and validate a CSV file.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn read_path(&self, path: &Path) -> Result<Dataset, DataError> {
        let file = std::fs::File::open(path).map_err(|e| DataError::FileNotFound {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.read_from(&path.display().to_string(), file)
    }

    /// Read and validate CSV from any byte source; `origin` labels errors.
    pub fn read_from<R: Read>(&self, origin: &str, input: R) -> Result<Dataset, DataError> {
        // flexible(true) so ragged rows reach our own InconsistentRowLength
        // check instead of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let header = rdr.headers().map_err(|e| DataError::CsvParse {
            origin: origin.to_string(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        })?;
        let expected_cols = header.len();
        debug!(expected_cols, "read CSV header");

        let target_index = header
            .iter()
            .position(|name| name == self.target_column)
            .ok_or_else(|| DataError::MissingTargetColumn {
                origin: origin.to_string(),
                target: self.target_column.clone(),
            })?;

        if expected_cols < 2 {
            return Err(DataError::NoFeatureColumns {
                origin: origin.to_string(),
            });
        }

        let column_names: Vec<String> = header.iter().map(String::from).collect();
        let feature_names: Vec<String> = column_names
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != target_index)
            .map(|(_, name)| name.clone())
            .collect();

        let mut features = Vec::new();
        let mut targets = Vec::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| DataError::CsvParse {
                origin: origin.to_string(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;

            if record.len() != expected_cols {
                return Err(DataError::InconsistentRowLength {
                    origin: origin.to_string(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            let mut row_features = Vec::with_capacity(feature_names.len());
            for (col_index, raw) in record.iter().enumerate() {
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| DataError::NonFiniteValue {
                        origin: origin.to_string(),
                        row_index,
                        column: column_names[col_index].clone(),
                        raw: raw.to_string(),
                    })?;
                if col_index == target_index {
                    targets.push(value);
                } else {
                    row_features.push(value);
                }
            }
            features.push(row_features);
        }

        if features.is_empty() {
            return Err(DataError::EmptyDataset {
                origin: origin.to_string(),
            });
        }

        info!(
            origin,
            n_samples = features.len(),
            n_features = feature_names.len(),
            "dataset loaded"
        );

        Ok(Dataset::new(feature_names, features, targets))
    }
}
