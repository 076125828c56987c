//! Model persistence via bincode.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::RfError;
use crate::forest::RandomForest;

/// Current binary format version.
const FORMAT_VERSION: u32 = 1;

/// Versioned envelope for the serialized model.
#[derive(serde::Serialize, serde::Deserialize)]
struct ModelEnvelope {
    format_version: u32,
    n_trees: usize,
    n_features: usize,
    feature_names: Vec<String>,
    forest: RandomForest,
}

impl RandomForest {
    /// Encode the model into its on-disk byte representation.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::SerializeModel`] if bincode encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RfError> {
        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION,
            n_trees: self.trees.len(),
            n_features: self.n_features,
            feature_names: self.feature_names.clone(),
            forest: self.clone(),
        };
        bincode::serialize(&envelope).map_err(|e| RfError::SerializeModel { source: e })
    }

    /// Save the model to a binary file, replacing any existing file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RfError::SerializeModel`] | bincode encoding failed |
    /// | [`RfError::WriteModel`] | file write failed |
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RfError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;

        std::fs::write(path, &bytes).map_err(|e| RfError::WriteModel {
            path: path.to_path_buf(),
            source: e,
        })?;

        info!(
            size_bytes = bytes.len(),
            n_trees = self.trees.len(),
            "model saved"
        );

        Ok(())
    }

    /// Load a model from a binary file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RfError::ReadModel`] | file read failed (including not found) |
    /// | [`RfError::DeserializeModel`] | bincode decoding failed |
    /// | [`RfError::IncompatibleModelVersion`] | format version mismatch |
    /// | [`RfError::MalformedModel`] | decoded model fails a structural check |
    #[instrument(fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RfError> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|e| RfError::ReadModel {
            path: path.to_path_buf(),
            source: e,
        })?;

        let envelope: ModelEnvelope = bincode::deserialize(&bytes).map_err(|e| {
            RfError::DeserializeModel {
                path: path.to_path_buf(),
                source: e,
            }
        })?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(RfError::IncompatibleModelVersion {
                expected: FORMAT_VERSION,
                found: envelope.format_version,
                path: path.to_path_buf(),
            });
        }

        check_envelope(&envelope).map_err(|reason| RfError::MalformedModel {
            path: path.to_path_buf(),
            reason,
        })?;

        debug!(
            n_trees = envelope.n_trees,
            n_features = envelope.n_features,
            "model loaded"
        );

        Ok(envelope.forest)
    }
}

/// Cross-check the envelope header against the forest it carries, then
/// every tree's arena.
fn check_envelope(envelope: &ModelEnvelope) -> Result<(), String> {
    let forest = &envelope.forest;
    if forest.trees.is_empty() {
        return Err("forest has no trees".to_string());
    }
    if envelope.n_trees != forest.trees.len() {
        return Err(format!(
            "header declares {} trees, forest has {}",
            envelope.n_trees,
            forest.trees.len()
        ));
    }
    if envelope.n_features != forest.n_features {
        return Err(format!(
            "header declares {} features, forest has {}",
            envelope.n_features, forest.n_features
        ));
    }
    if forest.feature_names.len() != forest.n_features
        || envelope.feature_names != forest.feature_names
    {
        return Err("feature names disagree with the feature count".to_string());
    }
    for (i, tree) in forest.trees.iter().enumerate() {
        if tree.n_features != forest.n_features {
            return Err(format!(
                "tree {i} expects {} features, forest has {}",
                tree.n_features, forest.n_features
            ));
        }
        tree.check_structure().map_err(|reason| format!("tree {i}: {reason}"))?;
    }
    Ok(())
}
