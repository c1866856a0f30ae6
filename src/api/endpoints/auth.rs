//! Account endpoints: registration, login, email verification, and the
//! two-step password reset.
//!
//! Session handling is an external collaborator — `login` verifies
//! credentials and returns the account summary, nothing more.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth;
use crate::models::User;

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub verified: bool,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            verified: user.verified,
        }
    }
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/register` — create an unverified account with a
/// pending verification code. Code dispatch (email) is external.
pub async fn register(
    State(ctx): State<ApiContext>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    if req.first_name.trim().is_empty() || req.last_name.trim().is_empty() {
        return Err(ApiError::Validation {
            field: "name".into(),
            message: "first and last name are required".into(),
        });
    }
    let conn = ctx.open_db()?;
    let user = auth::register(&conn, &req.first_name, &req.last_name, &req.email, &req.password)?;
    Ok((StatusCode::CREATED, Json(UserSummary::from(&user))))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login` — check credentials, return the account summary.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<UserSummary>, ApiError> {
    let conn = ctx.open_db()?;
    let user = auth::login(&conn, &req.email, &req.password)?;
    Ok(Json(UserSummary::from(&user)))
}

/// `POST /api/auth/logout` — nothing to tear down server-side.
pub async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[derive(Deserialize)]
pub struct CodeRequest {
    pub email: String,
    pub code: String,
}

/// `POST /api/auth/verify-code` — confirm the registration code.
pub async fn verify_code(
    State(ctx): State<ApiContext>,
    Json(req): Json<CodeRequest>,
) -> Result<Json<UserSummary>, ApiError> {
    let conn = ctx.open_db()?;
    let user = auth::verify_code(&conn, &req.email, &req.code)?;
    Ok(Json(UserSummary::from(&user)))
}

#[derive(Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// `POST /api/auth/forgot-password` — issue a fresh reset code.
pub async fn forgot_password(
    State(ctx): State<ApiContext>,
    Json(req): Json<EmailRequest>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.open_db()?;
    auth::forgot_password(&conn, &req.email)?;
    Ok(StatusCode::ACCEPTED)
}

/// `POST /api/auth/verify-reset-code` — check the code without consuming it.
pub async fn verify_reset_code(
    State(ctx): State<ApiContext>,
    Json(req): Json<CodeRequest>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.open_db()?;
    auth::check_reset_code(&conn, &req.email, &req.code)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct ResetRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// `POST /api/auth/reset-password` — overwrite the password; the code is
/// a one-shot token consumed by a successful reset.
pub async fn reset_password(
    State(ctx): State<ApiContext>,
    Json(req): Json<ResetRequest>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.open_db()?;
    auth::reset_password(&conn, &req.email, &req.code, &req.new_password)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct ProfileUpdateRequest {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Absent or empty means "keep the current password".
    pub password: Option<String>,
}

/// `PUT /api/auth/profile` — edit profile fields. An empty password field
/// is the "no change" sentinel, not a policy violation.
pub async fn update_profile(
    State(ctx): State<ApiContext>,
    Json(req): Json<ProfileUpdateRequest>,
) -> Result<Json<UserSummary>, ApiError> {
    let conn = ctx.open_db()?;
    let user = auth::update_profile(
        &conn,
        req.user_id,
        &req.first_name,
        &req.last_name,
        &req.email,
        req.password.as_deref(),
    )?;
    Ok(Json(UserSummary::from(&user)))
}
