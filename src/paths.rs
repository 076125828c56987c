use std::path::PathBuf;

use crate::TrainError;

/// File name of the model artifact.
pub const MODEL_FILE_NAME: &str = "model.bin";

/// `model.bin` in the directory holding the running executable.
///
/// The trainer and the service are built into the same directory, so both
/// resolve the same file.
///
/// # Errors
///
/// Returns [`TrainError::LocateExecutable`] if the executable path is unknown.
pub fn default_model_path() -> Result<PathBuf, TrainError> {
    let exe = std::env::current_exe().map_err(|e| TrainError::LocateExecutable { source: e })?;
    let dir = exe.parent().ok_or_else(|| TrainError::LocateExecutable {
        source: std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} has no parent directory", exe.display()),
        ),
    })?;
    Ok(dir.join(MODEL_FILE_NAME))
}
