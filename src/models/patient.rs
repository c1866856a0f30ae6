use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{IdType, MaritalStatus, Sex};

/// Birth country applied when the form leaves the field unspecified.
pub const DEFAULT_BIRTH_COUNTRY: &str = "Colombia";

/// Demographic record, keyed by a unique national identification number.
///
/// Age is derived, never stored — see [`Patient::age`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub id_type: IdType,
    pub identification_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub second_last_name: Option<String>,
    pub marital_status: MaritalStatus,
    pub birth_date: NaiveDate,
    pub birth_country: String,
    pub sex: Sex,
    pub address: String,
    pub phone: Option<String>,
    pub ethnic_group: Option<String>,
}

impl Patient {
    /// Age in whole years as of `today`, subtracting one year when the
    /// birthday has not yet occurred this calendar year.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let mut age = today.year() - self.birth_date.year();
        if (today.month(), today.day()) < (self.birth_date.month(), self.birth_date.day()) {
            age -= 1;
        }
        age
    }

    /// Age as of the current local date. Recomputed on every read so the
    /// value stays consistent with "today".
    pub fn age(&self) -> i32 {
        self.age_on(Local::now().date_naive())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
