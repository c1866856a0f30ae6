//! Clinical visit endpoints: append-only entries under a patient, plus
//! the combined history view.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::endpoints::analyses::AnalysisResponse;
use crate::api::endpoints::patients::PatientResponse;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::analysis as analyses;
use crate::db::repository::patient as patients;
use crate::db::repository::visit as visits;
use crate::models::ClinicalVisit;

#[derive(Debug, Serialize)]
pub struct VisitResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub visited_at: DateTime<Utc>,
    pub symptoms: String,
    pub treatments: String,
    pub principal_diagnosis: String,
    pub comorbidities: Option<String>,
}

impl From<&ClinicalVisit> for VisitResponse {
    fn from(v: &ClinicalVisit) -> Self {
        Self {
            id: v.id,
            patient_id: v.patient_id,
            visited_at: v.visited_at,
            symptoms: v.symptoms.clone(),
            treatments: v.treatments.clone(),
            principal_diagnosis: v.principal_diagnosis.clone(),
            comorbidities: v.comorbidities.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct CreateVisitRequest {
    pub symptoms: String,
    pub treatments: String,
    pub principal_diagnosis: String,
    pub comorbidities: Option<String>,
}

/// `POST /api/patients/:id/visits` — append a visit. The timestamp is
/// stamped here and never editable afterwards.
pub async fn create(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<Uuid>,
    Json(req): Json<CreateVisitRequest>,
) -> Result<(StatusCode, Json<VisitResponse>), ApiError> {
    for (field, value) in [
        ("symptoms", &req.symptoms),
        ("treatments", &req.treatments),
        ("principal_diagnosis", &req.principal_diagnosis),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::Validation {
                field: field.into(),
                message: format!("{field} is required"),
            });
        }
    }

    let conn = ctx.open_db()?;
    // Unknown patient renders the error page, not a constraint failure
    patients::get_patient(&conn, patient_id)?;

    let visit = ClinicalVisit::new(
        patient_id,
        req.symptoms,
        req.treatments,
        req.principal_diagnosis,
        req.comorbidities.filter(|s| !s.is_empty()),
    );
    visits::insert_visit(&conn, &visit)?;
    tracing::info!(patient_id = %patient_id, visit_id = %visit.id, "clinical visit recorded");
    Ok((StatusCode::CREATED, Json(VisitResponse::from(&visit))))
}

#[derive(Debug, Serialize)]
pub struct PatientHistory {
    pub patient: PatientResponse,
    pub visits: Vec<VisitResponse>,
    pub analyses: Vec<AnalysisResponse>,
}

/// `GET /api/patients/:id/history` — full clinical history for one
/// patient, visits and analyses newest first.
pub async fn history(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<PatientHistory>, ApiError> {
    let conn = ctx.open_db()?;
    let patient = patients::get_patient(&conn, patient_id)?;
    let visits = visits::visits_for_patient(&conn, patient_id)?;
    let analyses = analyses::analyses_for_patient(&conn, patient_id, None)?;

    Ok(Json(PatientHistory {
        patient: PatientResponse::from(&patient),
        visits: visits.iter().map(VisitResponse::from).collect(),
        analyses: analyses.iter().map(AnalysisResponse::from).collect(),
    }))
}
