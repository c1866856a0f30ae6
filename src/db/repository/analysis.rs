use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::FinalDiagnosis;
use crate::models::FinalAnalysis;

use super::map_constraint;

pub fn insert_analysis(conn: &Connection, analysis: &FinalAnalysis) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO final_analyses (id, patient_id, predictions, final_diagnosis, analyzed_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            analysis.id.to_string(),
            analysis.patient_id.to_string(),
            analysis.predictions.to_string(),
            analysis.final_diagnosis.as_str(),
            analysis.analyzed_at.to_rfc3339(),
        ],
    )
    .map_err(|e| map_constraint(e, "patient does not exist"))?;
    Ok(())
}

/// Analyses for one patient, newest first. Optionally narrowed to a single
/// final-diagnosis value (the admin list filter).
pub fn analyses_for_patient(
    conn: &Connection,
    patient_id: Uuid,
    diagnosis: Option<FinalDiagnosis>,
) -> Result<Vec<FinalAnalysis>, DatabaseError> {
    let mut sql = String::from(
        "SELECT id, patient_id, predictions, final_diagnosis, analyzed_at
         FROM final_analyses WHERE patient_id = ?1",
    );
    if diagnosis.is_some() {
        sql.push_str(" AND final_diagnosis = ?2");
    }
    sql.push_str(" ORDER BY analyzed_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let mut values = vec![patient_id.to_string()];
    if let Some(d) = diagnosis {
        values.push(d.as_str().into());
    }

    let rows = stmt.query_map(rusqlite::params_from_iter(values.iter()), |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut analyses = Vec::new();
    for row in rows {
        let (id, patient_id, predictions, final_diagnosis, analyzed_at) = row?;
        analyses.push(FinalAnalysis {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            patient_id: Uuid::parse_str(&patient_id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            predictions: serde_json::from_str(&predictions)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            final_diagnosis: FinalDiagnosis::from_str(&final_diagnosis)?,
            analyzed_at: DateTime::parse_from_rfc3339(&analyzed_at)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?
                .with_timezone(&Utc),
        });
    }
    Ok(analyses)
}

pub fn count_analyses(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM final_analyses", [], |row| row.get(0))?;
    Ok(count)
}
