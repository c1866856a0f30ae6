//! Read-only catalog endpoints: reference material and curated news.

use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::catalog;
use crate::models::{MedicalResource, NewsItem};

#[derive(Debug, Serialize)]
pub struct ResourceResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub kind: String,
    pub resource_url: String,
    pub image_url: Option<String>,
    pub published_on: Option<NaiveDate>,
}

impl From<&MedicalResource> for ResourceResponse {
    fn from(r: &MedicalResource) -> Self {
        Self {
            id: r.id,
            title: r.title.clone(),
            author: r.author.clone(),
            description: r.description.clone(),
            kind: r.kind.as_str().into(),
            resource_url: r.resource_url.clone(),
            image_url: r.image_url.clone(),
            published_on: r.published_on,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub article_url: String,
    pub image_url: String,
    pub source: String,
    pub published_on: NaiveDate,
}

impl From<&NewsItem> for NewsResponse {
    fn from(n: &NewsItem) -> Self {
        Self {
            id: n.id,
            title: n.title.clone(),
            summary: n.summary.clone(),
            article_url: n.article_url.clone(),
            image_url: n.image_url.clone(),
            source: n.source.clone(),
            published_on: n.published_on,
        }
    }
}

/// `GET /api/resources`
pub async fn resources(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<ResourceResponse>>, ApiError> {
    let conn = ctx.open_db()?;
    let all = catalog::list_resources(&conn)?;
    Ok(Json(all.iter().map(ResourceResponse::from).collect()))
}

/// `GET /api/news`
pub async fn news(State(ctx): State<ApiContext>) -> Result<Json<Vec<NewsResponse>>, ApiError> {
    let conn = ctx.open_db()?;
    let all = catalog::list_news(&conn)?;
    Ok(Json(all.iter().map(NewsResponse::from).collect()))
}
