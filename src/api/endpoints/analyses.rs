//! Final analysis endpoints: pair a patient with a stored prediction
//! payload and the clinician's closed-set classification.

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::analysis as analyses;
use crate::db::repository::patient as patients;
use crate::models::enums::FinalDiagnosis;
use crate::models::FinalAnalysis;

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub predictions: serde_json::Value,
    pub final_diagnosis: String,
    pub final_diagnosis_label: String,
    pub analyzed_at: DateTime<Utc>,
}

impl From<&FinalAnalysis> for AnalysisResponse {
    fn from(a: &FinalAnalysis) -> Self {
        Self {
            id: a.id,
            patient_id: a.patient_id,
            predictions: a.predictions.clone(),
            final_diagnosis: a.final_diagnosis.as_str().into(),
            final_diagnosis_label: a.final_diagnosis.label().into(),
            analyzed_at: a.analyzed_at,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateAnalysisRequest {
    /// Raw prediction payload, stored verbatim — including the
    /// `{"error": …}` shape when the service call failed.
    pub predictions: serde_json::Value,
    /// `CCR` or `CO`.
    pub final_diagnosis: String,
}

/// `POST /api/patients/:id/analyses`
pub async fn create(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<Uuid>,
    Json(req): Json<CreateAnalysisRequest>,
) -> Result<(StatusCode, Json<AnalysisResponse>), ApiError> {
    let diagnosis = FinalDiagnosis::from_str(&req.final_diagnosis)?;

    let conn = ctx.open_db()?;
    patients::get_patient(&conn, patient_id)?;

    let analysis = FinalAnalysis::new(patient_id, req.predictions, diagnosis);
    analyses::insert_analysis(&conn, &analysis)?;
    tracing::info!(
        patient_id = %patient_id,
        diagnosis = analysis.final_diagnosis.as_str(),
        "final analysis recorded"
    );
    Ok((StatusCode::CREATED, Json(AnalysisResponse::from(&analysis))))
}
