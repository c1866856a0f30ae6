use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One clinical visit under a patient. The timestamp is set at creation
/// and never edited afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalVisit {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub visited_at: DateTime<Utc>,
    pub symptoms: String,
    pub treatments: String,
    pub principal_diagnosis: String,
    pub comorbidities: Option<String>,
}

impl ClinicalVisit {
    /// Build a new visit record, stamping the immutable visit timestamp.
    pub fn new(
        patient_id: Uuid,
        symptoms: String,
        treatments: String,
        principal_diagnosis: String,
        comorbidities: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            visited_at: Utc::now(),
            symptoms,
            treatments,
            principal_diagnosis,
            comorbidities,
        }
    }
}
