//! Sugar Insight: train a random-forest model of one-year diabetes
//! progression and serve its predictions over HTTP.
//!
//! The `sugar-train` binary runs [`train`] and writes `model.bin`; the
//! `sugar-serve` binary loads that file through `sugar_api`.

mod error;
mod logging;
mod paths;
mod trainer;

pub use error::TrainError;
pub use logging::init_logging;
pub use paths::{MODEL_FILE_NAME, default_model_path};
pub use trainer::{TrainOptions, TrainReport, train, write_report};
