//! Dataset loading, validation, and partitioning for the sugar-insight pipeline.

mod dataset;
mod embedded;
mod error;
mod reader;
mod split;

pub use dataset::Dataset;
pub use embedded::{PROGRESSION_FEATURES, PROGRESSION_ORIGIN, progression};
pub use error::DataError;
pub use reader::{DEFAULT_TARGET_COLUMN, DatasetReader};
pub use split::{Partition, TrainTestSplit};
