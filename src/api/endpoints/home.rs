//! Landing, dashboard, and the fallback error page.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::api::endpoints::catalog::{NewsResponse, ResourceResponse};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::config;
use crate::db::repository::{analysis, catalog, patient, visit};

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub name: &'static str,
    pub version: &'static str,
}

/// `GET /` — landing page data.
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        name: config::APP_NAME,
        version: config::APP_VERSION,
    })
}

#[derive(Debug, Serialize)]
pub struct HomeData {
    pub patients: i64,
    pub visits: i64,
    pub analyses: i64,
    pub resources: Vec<ResourceResponse>,
    pub news: Vec<NewsResponse>,
}

/// `GET /api/home` — record counts plus the catalog content shown on
/// the clinician dashboard.
pub async fn dashboard(State(ctx): State<ApiContext>) -> Result<Json<HomeData>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(HomeData {
        patients: patient::count_patients(&conn)?,
        visits: visit::count_visits(&conn)?,
        analyses: analysis::count_analyses(&conn)?,
        resources: catalog::list_resources(&conn)?
            .iter()
            .map(ResourceResponse::from)
            .collect(),
        news: catalog::list_news(&conn)?.iter().map(NewsResponse::from).collect(),
    }))
}

/// Fallback handler — the dedicated error page for unknown routes and
/// bad record links.
pub async fn not_found() -> Response {
    ApiError::NotFound("page not found".into()).into_response()
}
