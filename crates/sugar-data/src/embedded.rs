//! The diabetes-progression dataset compiled into the binary.

use crate::dataset::Dataset;
use crate::reader::DatasetReader;
use crate::DataError;

const PROGRESSION_CSV: &str = include_str!("../data/progression.csv");

/// Origin label used in log events and errors for the embedded copy.
pub const PROGRESSION_ORIGIN: &str = "embedded progression.csv";

/// Feature columns of the progression dataset, in training order.
pub const PROGRESSION_FEATURES: [&str; 10] =
    ["age", "sex", "bmi", "bp", "s1", "s2", "s3", "s4", "s5", "s6"];

/// Load the embedded progression dataset: 442 rows, 10 standardized
/// baseline measurements, and a one-year disease-progression target.
///
/// # Errors
///
/// Only fails if the embedded CSV is malformed, which the tests rule out.
pub fn progression() -> Result<Dataset, DataError> {
    DatasetReader::new().read_from(PROGRESSION_ORIGIN, PROGRESSION_CSV.as_bytes())
}
