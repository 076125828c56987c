//! Regression metrics.

use crate::error::RfError;

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<(), RfError> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return Err(RfError::ScoreLengthMismatch {
            n_predicted: predicted.len(),
            n_actual: actual.len(),
        });
    }
    Ok(())
}

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// When `actual` has zero variance the score is 1.0 for an exact fit and
/// 0.0 otherwise.
///
/// # Errors
///
/// Returns [`RfError::ScoreLengthMismatch`] when the slices differ in length
/// or are empty.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> Result<f64, RfError> {
    check_lengths(actual, predicted)?;

    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|y| (y - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// Mean squared error.
///
/// # Errors
///
/// Returns [`RfError::ScoreLengthMismatch`] when the slices differ in length
/// or are empty.
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64, RfError> {
    check_lengths(actual, predicted)?;
    let total: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    Ok(total / actual.len() as f64)
}

/// Mean absolute error.
///
/// # Errors
///
/// Returns [`RfError::ScoreLengthMismatch`] when the slices differ in length
/// or are empty.
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64, RfError> {
    check_lengths(actual, predicted)?;
    let total: f64 = actual.iter().zip(predicted).map(|(y, p)| (y - p).abs()).sum();
    Ok(total / actual.len() as f64)
}
