//! Patient registry endpoints: create, list with admin-style
//! search/filters, detail, and delete (cascading to children).

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::patient as patients;
use crate::db::repository::patient::PatientFilter;
use crate::models::enums::{IdType, MaritalStatus, Sex};
use crate::models::patient::DEFAULT_BIRTH_COUNTRY;
use crate::models::Patient;

#[derive(Debug, Serialize)]
pub struct PatientResponse {
    pub id: Uuid,
    pub id_type: String,
    pub identification_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub second_last_name: Option<String>,
    pub marital_status: String,
    pub birth_date: NaiveDate,
    pub birth_country: String,
    pub sex: String,
    pub address: String,
    pub phone: Option<String>,
    pub ethnic_group: Option<String>,
    /// Derived at read time, never stored.
    pub age: i32,
}

impl From<&Patient> for PatientResponse {
    fn from(p: &Patient) -> Self {
        Self {
            id: p.id,
            id_type: p.id_type.as_str().into(),
            identification_number: p.identification_number.clone(),
            first_name: p.first_name.clone(),
            middle_name: p.middle_name.clone(),
            last_name: p.last_name.clone(),
            second_last_name: p.second_last_name.clone(),
            marital_status: p.marital_status.as_str().into(),
            birth_date: p.birth_date,
            birth_country: p.birth_country.clone(),
            sex: p.sex.as_str().into(),
            address: p.address.clone(),
            phone: p.phone.clone(),
            ethnic_group: p.ethnic_group.clone(),
            age: p.age(),
        }
    }
}

#[derive(Deserialize)]
pub struct CreatePatientRequest {
    /// Defaults to the citizenship card when absent.
    pub id_type: Option<String>,
    pub identification_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub second_last_name: Option<String>,
    pub marital_status: String,
    pub birth_date: NaiveDate,
    /// Defaults to the fixed birth country when absent or empty.
    pub birth_country: Option<String>,
    pub sex: String,
    pub address: String,
    pub phone: Option<String>,
    pub ethnic_group: Option<String>,
}

fn required(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation {
            field: field.into(),
            message: format!("{field} is required"),
        });
    }
    Ok(())
}

/// `POST /api/patients` — register a patient. Identification-number
/// uniqueness is the store's constraint and comes back as a 409.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<PatientResponse>), ApiError> {
    required("identification_number", &req.identification_number)?;
    required("first_name", &req.first_name)?;
    required("last_name", &req.last_name)?;
    required("address", &req.address)?;

    let id_type = match req.id_type.as_deref() {
        None | Some("") => IdType::CitizenshipCard,
        Some(code) => IdType::from_str(code)?,
    };
    let birth_country = match req.birth_country.as_deref() {
        None | Some("") => DEFAULT_BIRTH_COUNTRY.to_string(),
        Some(country) => country.to_string(),
    };

    let patient = Patient {
        id: Uuid::new_v4(),
        id_type,
        identification_number: req.identification_number.trim().to_string(),
        first_name: req.first_name,
        middle_name: req.middle_name.filter(|s| !s.is_empty()),
        last_name: req.last_name,
        second_last_name: req.second_last_name.filter(|s| !s.is_empty()),
        marital_status: MaritalStatus::from_str(&req.marital_status)?,
        birth_date: req.birth_date,
        birth_country,
        sex: Sex::from_str(&req.sex)?,
        address: req.address,
        phone: req.phone.filter(|s| !s.is_empty()),
        ethnic_group: req.ethnic_group.filter(|s| !s.is_empty()),
    };

    let conn = ctx.open_db()?;
    patients::insert_patient(&conn, &patient)?;
    tracing::info!(patient_id = %patient.id, "patient registered");
    Ok((StatusCode::CREATED, Json(PatientResponse::from(&patient))))
}

#[derive(Deserialize, Default)]
pub struct PatientListQuery {
    pub search: Option<String>,
    pub marital_status: Option<String>,
    pub sex: Option<String>,
    pub id_type: Option<String>,
}

/// `GET /api/patients` — list with search and column filters.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<PatientListQuery>,
) -> Result<Json<Vec<PatientResponse>>, ApiError> {
    let filter = PatientFilter {
        search: query.search,
        marital_status: query
            .marital_status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(MaritalStatus::from_str)
            .transpose()?,
        sex: query
            .sex
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(Sex::from_str)
            .transpose()?,
        id_type: query
            .id_type
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(IdType::from_str)
            .transpose()?,
    };

    let conn = ctx.open_db()?;
    let all = patients::list_patients(&conn, &filter)?;
    Ok(Json(all.iter().map(PatientResponse::from).collect()))
}

/// `GET /api/patients/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<PatientResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let patient = patients::get_patient(&conn, id)?;
    Ok(Json(PatientResponse::from(&patient)))
}

/// `DELETE /api/patients/:id` — removes the patient and, via cascade,
/// every visit and analysis under it.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.open_db()?;
    patients::delete_patient(&conn, id)?;
    tracing::info!(patient_id = %id, "patient deleted with visit and analysis history");
    Ok(StatusCode::NO_CONTENT)
}
