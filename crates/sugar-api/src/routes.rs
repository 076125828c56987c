//! Request handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use sugar_forest::FittedModel;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `POST /predict`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictRequest {
    /// One value per trained feature, in training column order.
    pub features: Vec<f64>,
}

/// Successful `POST /predict` reply.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictResponse {
    /// One prediction per submitted row.
    pub prediction: Vec<f64>,
}

/// `GET /health` reply.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Whether `/predict` can answer.
    pub model_loaded: bool,
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_loaded: state.model.is_loaded(),
    })
}

/// The body is taken as a `Result` so an unloaded model answers 503 before
/// the body is looked at.
pub(crate) async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let model = state.model.loaded().ok_or(ApiError::ModelUnavailable)?;
    let Json(request) = body.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;

    let prediction = model
        .predict_rows(std::slice::from_ref(&request.features))
        .map_err(ApiError::Prediction)?;

    debug!(n_features = request.features.len(), ?prediction, "prediction served");
    Ok(Json(PredictResponse { prediction }))
}
