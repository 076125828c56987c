use std::path::Path;
use std::sync::Arc;

use crate::model::ModelState;

/// Shared, read-only application state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub(crate) model: Arc<ModelState>,
}

impl AppState {
    /// Wrap an already resolved model state.
    pub fn new(model: ModelState) -> Self {
        Self {
            model: Arc::new(model),
        }
    }

    /// Resolve the model at `path` once and wrap it.
    pub fn from_model_path(path: &Path) -> Self {
        Self::new(ModelState::load(path))
    }

    /// Borrow the model state.
    #[must_use]
    pub fn model(&self) -> &ModelState {
        &self.model
    }
}
