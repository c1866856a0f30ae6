use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::ResourceKind;
use crate::models::{MedicalResource, NewsItem};

pub fn insert_resource(conn: &Connection, resource: &MedicalResource) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medical_resources (id, title, author, description, kind, resource_url,
             image_url, published_on)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            resource.id.to_string(),
            resource.title,
            resource.author,
            resource.description,
            resource.kind.as_str(),
            resource.resource_url,
            resource.image_url,
            resource.published_on.map(|d| d.to_string()),
        ],
    )?;
    Ok(())
}

/// Catalog of reference material, dated entries first (newest on top),
/// undated entries last.
pub fn list_resources(conn: &Connection) -> Result<Vec<MedicalResource>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, title, author, description, kind, resource_url, image_url, published_on
         FROM medical_resources
         ORDER BY published_on IS NULL, published_on DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, Option<String>>(6)?,
            row.get::<_, Option<String>>(7)?,
        ))
    })?;

    let mut resources = Vec::new();
    for row in rows {
        let (id, title, author, description, kind, resource_url, image_url, published_on) = row?;
        resources.push(MedicalResource {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            title,
            author,
            description,
            kind: ResourceKind::from_str(&kind)?,
            resource_url,
            image_url,
            published_on: published_on
                .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        });
    }
    Ok(resources)
}

pub fn insert_news(conn: &Connection, item: &NewsItem) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO news_items (id, title, summary, article_url, image_url, source, published_on)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            item.id.to_string(),
            item.title,
            item.summary,
            item.article_url,
            item.image_url,
            item.source,
            item.published_on.to_string(),
        ],
    )?;
    Ok(())
}

/// News feed, most recent first.
pub fn list_news(conn: &Connection) -> Result<Vec<NewsItem>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, title, summary, article_url, image_url, source, published_on
         FROM news_items ORDER BY published_on DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
        ))
    })?;

    let mut items = Vec::new();
    for row in rows {
        let (id, title, summary, article_url, image_url, source, published_on) = row?;
        items.push(NewsItem {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            title,
            summary,
            article_url,
            image_url,
            source,
            published_on: NaiveDate::parse_from_str(&published_on, "%Y-%m-%d")
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        });
    }
    Ok(items)
}
