//! Prediction trigger endpoint.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Deserialize)]
pub struct PredictBody {
    pub text: String,
}

/// `POST /api/predict` — send clinical text to the external service.
///
/// Always answers 200 with the uniform mapping: the prediction payload,
/// or `{"error": …}` when the service failed. Service failure is data
/// here, never a fault.
pub async fn predict(
    State(ctx): State<ApiContext>,
    Json(body): Json<PredictBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if body.text.trim().is_empty() {
        return Err(ApiError::Validation {
            field: "text".into(),
            message: "text is required".into(),
        });
    }

    let outcome = ctx.predictor.predict(&body.text).await;
    if outcome.is_error() {
        tracing::warn!("prediction call returned an error payload");
    }
    Ok(Json(outcome.into_value()))
}
