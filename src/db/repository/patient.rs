use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::{IdType, MaritalStatus, Sex};
use crate::models::Patient;

use super::map_constraint;

/// List-view filters: a case-insensitive substring search over
/// identification number, names, and phone, plus the three column filters.
#[derive(Debug, Default, Clone)]
pub struct PatientFilter {
    pub search: Option<String>,
    pub marital_status: Option<MaritalStatus>,
    pub sex: Option<Sex>,
    pub id_type: Option<IdType>,
}

const PATIENT_COLUMNS: &str = "id, id_type, identification_number, first_name, middle_name,
     last_name, second_last_name, marital_status, birth_date, birth_country, sex,
     address, phone, ethnic_group";

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, id_type, identification_number, first_name, middle_name,
             last_name, second_last_name, marital_status, birth_date, birth_country, sex,
             address, phone, ethnic_group)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            patient.id.to_string(),
            patient.id_type.as_str(),
            patient.identification_number,
            patient.first_name,
            patient.middle_name,
            patient.last_name,
            patient.second_last_name,
            patient.marital_status.as_str(),
            patient.birth_date.to_string(),
            patient.birth_country,
            patient.sex.as_str(),
            patient.address,
            patient.phone,
            patient.ethnic_group,
        ],
    )
    .map_err(|e| map_constraint(e, "identification number is already registered"))?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: Uuid) -> Result<Patient, DatabaseError> {
    let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1");
    let row: Option<PatientRow> = conn
        .query_row(&sql, params![id.to_string()], map_row)
        .optional()?;
    match row {
        Some(r) => row_to_patient(r),
        None => Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: id.to_string(),
        }),
    }
}

/// List patients ordered by last name then first name, applying the
/// admin-style search and column filters.
pub fn list_patients(
    conn: &Connection,
    filter: &PatientFilter,
) -> Result<Vec<Patient>, DatabaseError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut values: Vec<String> = Vec::new();

    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let n = values.len() + 1;
        conditions.push(format!(
            "(identification_number LIKE ?{n}
              OR first_name LIKE ?{n} OR middle_name LIKE ?{n}
              OR last_name LIKE ?{n} OR second_last_name LIKE ?{n}
              OR phone LIKE ?{n})"
        ));
        values.push(format!("%{}%", search.trim()));
    }
    if let Some(status) = &filter.marital_status {
        conditions.push(format!("marital_status = ?{}", values.len() + 1));
        values.push(status.as_str().into());
    }
    if let Some(sex) = &filter.sex {
        conditions.push(format!("sex = ?{}", values.len() + 1));
        values.push(sex.as_str().into());
    }
    if let Some(id_type) = &filter.id_type {
        conditions.push(format!("id_type = ?{}", values.len() + 1));
        values.push(id_type.as_str().into());
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    let sql = format!(
        "SELECT {PATIENT_COLUMNS} FROM patients{where_clause}
         ORDER BY last_name, first_name"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(values.iter()), map_row)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(row_to_patient(row?)?);
    }
    Ok(patients)
}

/// Delete a patient; visits and analyses go with it via cascade.
pub fn delete_patient(conn: &Connection, id: Uuid) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM patients WHERE id = ?1", params![id.to_string()])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn count_patients(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count)
}

type PatientRow = (
    String,
    String,
    String,
    String,
    Option<String>,
    String,
    Option<String>,
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
);

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
        row.get(11)?,
        row.get(12)?,
        row.get(13)?,
    ))
}

fn row_to_patient(row: PatientRow) -> Result<Patient, DatabaseError> {
    let (
        id,
        id_type,
        identification_number,
        first_name,
        middle_name,
        last_name,
        second_last_name,
        marital_status,
        birth_date,
        birth_country,
        sex,
        address,
        phone,
        ethnic_group,
    ) = row;
    Ok(Patient {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        id_type: IdType::from_str(&id_type)?,
        identification_number,
        first_name,
        middle_name,
        last_name,
        second_last_name,
        marital_status: MaritalStatus::from_str(&marital_status)?,
        birth_date: NaiveDate::parse_from_str(&birth_date, "%Y-%m-%d")
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        birth_country,
        sex: Sex::from_str(&sex)?,
        address,
        phone,
        ethnic_group,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::models::patient::DEFAULT_BIRTH_COUNTRY;

    fn sample_patient(ident: &str, last_name: &str) -> Patient {
        Patient {
            id: Uuid::new_v4(),
            id_type: IdType::CitizenshipCard,
            identification_number: ident.into(),
            first_name: "Carlos".into(),
            middle_name: None,
            last_name: last_name.into(),
            second_last_name: None,
            marital_status: MaritalStatus::Married,
            birth_date: NaiveDate::from_ymd_opt(1970, 3, 9).unwrap(),
            birth_country: DEFAULT_BIRTH_COUNTRY.into(),
            sex: Sex::Male,
            address: "Carrera 7 #45-12".into(),
            phone: Some("3001234567".into()),
            ethnic_group: None,
        }
    }

    #[test]
    fn insert_and_fetch_round_trip() {
        let conn = open_memory_database().unwrap();
        let patient = sample_patient("80123456", "Mendoza");
        insert_patient(&conn, &patient).unwrap();

        let fetched = get_patient(&conn, patient.id).unwrap();
        assert_eq!(fetched.identification_number, "80123456");
        assert_eq!(fetched.birth_country, "Colombia");
        assert_eq!(fetched.marital_status, MaritalStatus::Married);
        assert_eq!(fetched.birth_date, patient.birth_date);
    }

    #[test]
    fn duplicate_identification_number_rejected() {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &sample_patient("80123456", "Mendoza")).unwrap();
        let err = insert_patient(&conn, &sample_patient("80123456", "Otero")).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn list_orders_by_last_then_first_name() {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &sample_patient("1", "Zapata")).unwrap();
        insert_patient(&conn, &sample_patient("2", "Arango")).unwrap();
        insert_patient(&conn, &sample_patient("3", "Mendoza")).unwrap();

        let all = list_patients(&conn, &PatientFilter::default()).unwrap();
        let names: Vec<_> = all.iter().map(|p| p.last_name.as_str()).collect();
        assert_eq!(names, ["Arango", "Mendoza", "Zapata"]);
    }

    #[test]
    fn search_matches_identification_name_and_phone() {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &sample_patient("80123456", "Mendoza")).unwrap();
        insert_patient(&conn, &sample_patient("52987654", "Arango")).unwrap();

        let by_ident = list_patients(
            &conn,
            &PatientFilter { search: Some("8012".into()), ..Default::default() },
        )
        .unwrap();
        assert_eq!(by_ident.len(), 1);
        assert_eq!(by_ident[0].last_name, "Mendoza");

        let by_name = list_patients(
            &conn,
            &PatientFilter { search: Some("aran".into()), ..Default::default() },
        )
        .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].last_name, "Arango");

        let by_phone = list_patients(
            &conn,
            &PatientFilter { search: Some("300123".into()), ..Default::default() },
        )
        .unwrap();
        assert_eq!(by_phone.len(), 2);
    }

    #[test]
    fn column_filters_narrow_the_list() {
        let conn = open_memory_database().unwrap();
        let mut single = sample_patient("1", "Arango");
        single.marital_status = MaritalStatus::Single;
        single.sex = Sex::Female;
        insert_patient(&conn, &single).unwrap();
        insert_patient(&conn, &sample_patient("2", "Mendoza")).unwrap();

        let filtered = list_patients(
            &conn,
            &PatientFilter {
                marital_status: Some(MaritalStatus::Single),
                sex: Some(Sex::Female),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].last_name, "Arango");
    }

    #[test]
    fn delete_missing_patient_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = delete_patient(&conn, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }
}
