use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ResourceKind;

/// Reference-content entry: a book, article, or video hosted elsewhere.
/// No relationship to any patient record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalResource {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub kind: ResourceKind,
    pub resource_url: String,
    pub image_url: Option<String>,
    pub published_on: Option<NaiveDate>,
}

/// Curated news entry linking out to the original article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub article_url: String,
    pub image_url: String,
    pub source: String,
    pub published_on: NaiveDate,
}
