//! One-time model resolution at service startup.

use std::io::ErrorKind;
use std::path::Path;

use sugar_forest::{RandomForest, RfError};
use tracing::{info, instrument, warn};

/// Why the service has no model.
#[derive(Debug)]
pub enum UnloadedReason {
    /// No file at the artifact path.
    Missing,
    /// A file exists but is unusable as a model.
    Corrupt(RfError),
}

/// The model slot, decided before any request is served and never changed.
#[derive(Debug)]
pub enum ModelState {
    /// Requests to `/predict` are answered with 503.
    Unloaded(UnloadedReason),
    /// Requests to `/predict` are answered by this forest.
    Loaded(RandomForest),
}

impl ModelState {
    /// Try to load the artifact at `path`.
    ///
    /// Never fails: an absent file is logged at info level and an unreadable
    /// one at warn level, and both leave the state [`ModelState::Unloaded`].
    #[instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> Self {
        match RandomForest::load(path) {
            Ok(forest) => {
                info!(
                    n_trees = forest.n_trees(),
                    n_features = forest.n_features(),
                    "model loaded"
                );
                ModelState::Loaded(forest)
            }
            Err(RfError::ReadModel { ref source, .. }) if source.kind() == ErrorKind::NotFound => {
                info!("no model found, predictions unavailable until trained");
                ModelState::Unloaded(UnloadedReason::Missing)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    cause = ?std::error::Error::source(&err),
                    "model artifact unusable, predictions unavailable"
                );
                ModelState::Unloaded(UnloadedReason::Corrupt(err))
            }
        }
    }

    /// Return the model when one is loaded.
    #[must_use]
    pub fn loaded(&self) -> Option<&RandomForest> {
        match self {
            ModelState::Loaded(forest) => Some(forest),
            ModelState::Unloaded(_) => None,
        }
    }

    /// Return `true` if a model is loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded().is_some()
    }
}

impl From<RandomForest> for ModelState {
    fn from(forest: RandomForest) -> Self {
        ModelState::Loaded(forest)
    }
}
