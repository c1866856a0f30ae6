use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::ClinicalVisit;

use super::map_constraint;

pub fn insert_visit(conn: &Connection, visit: &ClinicalVisit) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO clinical_visits (id, patient_id, visited_at, symptoms, treatments,
             principal_diagnosis, comorbidities)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            visit.id.to_string(),
            visit.patient_id.to_string(),
            visit.visited_at.to_rfc3339(),
            visit.symptoms,
            visit.treatments,
            visit.principal_diagnosis,
            visit.comorbidities,
        ],
    )
    .map_err(|e| map_constraint(e, "patient does not exist"))?;
    Ok(())
}

/// Visit history for one patient, newest first.
pub fn visits_for_patient(
    conn: &Connection,
    patient_id: Uuid,
) -> Result<Vec<ClinicalVisit>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, visited_at, symptoms, treatments, principal_diagnosis, comorbidities
         FROM clinical_visits WHERE patient_id = ?1
         ORDER BY visited_at DESC",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, Option<String>>(6)?,
        ))
    })?;

    let mut visits = Vec::new();
    for row in rows {
        let (id, patient_id, visited_at, symptoms, treatments, principal_diagnosis, comorbidities) =
            row?;
        visits.push(ClinicalVisit {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            patient_id: Uuid::parse_str(&patient_id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            visited_at: DateTime::parse_from_rfc3339(&visited_at)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?
                .with_timezone(&Utc),
            symptoms,
            treatments,
            principal_diagnosis,
            comorbidities,
        });
    }
    Ok(visits)
}

pub fn count_visits(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM clinical_visits", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::db::repository::patient::insert_patient;
    use crate::models::enums::{IdType, MaritalStatus, Sex};
    use crate::models::Patient;
    use chrono::NaiveDate;

    fn stored_patient(conn: &Connection) -> Patient {
        let patient = Patient {
            id: Uuid::new_v4(),
            id_type: IdType::CitizenshipCard,
            identification_number: "80123456".into(),
            first_name: "Carlos".into(),
            middle_name: None,
            last_name: "Mendoza".into(),
            second_last_name: None,
            marital_status: MaritalStatus::Married,
            birth_date: NaiveDate::from_ymd_opt(1970, 3, 9).unwrap(),
            birth_country: "Colombia".into(),
            sex: Sex::Male,
            address: "Carrera 7 #45-12".into(),
            phone: None,
            ethnic_group: None,
        };
        insert_patient(conn, &patient).unwrap();
        patient
    }

    fn visit_at(patient_id: Uuid, visited_at: DateTime<Utc>) -> ClinicalVisit {
        ClinicalVisit {
            id: Uuid::new_v4(),
            patient_id,
            visited_at,
            symptoms: "rectal bleeding".into(),
            treatments: "iron supplements".into(),
            principal_diagnosis: "anemia under study".into(),
            comorbidities: None,
        }
    }

    #[test]
    fn visits_come_back_newest_first() {
        let conn = open_memory_database().unwrap();
        let patient = stored_patient(&conn);

        let older = Utc::now() - chrono::Duration::days(30);
        let newer = Utc::now();
        insert_visit(&conn, &visit_at(patient.id, older)).unwrap();
        insert_visit(&conn, &visit_at(patient.id, newer)).unwrap();

        let visits = visits_for_patient(&conn, patient.id).unwrap();
        assert_eq!(visits.len(), 2);
        assert!(visits[0].visited_at > visits[1].visited_at);
    }

    #[test]
    fn visit_for_unknown_patient_violates_constraint() {
        let conn = open_memory_database().unwrap();
        let err = insert_visit(&conn, &visit_at(Uuid::new_v4(), Utc::now())).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn timestamps_round_trip_through_storage() {
        let conn = open_memory_database().unwrap();
        let patient = stored_patient(&conn);
        let visit = visit_at(patient.id, Utc::now());
        insert_visit(&conn, &visit).unwrap();

        let stored = visits_for_patient(&conn, patient.id).unwrap();
        assert_eq!(stored[0].visited_at, visit.visited_at);
        assert_eq!(stored[0].symptoms, "rectal bleeding");
    }
}
