use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::FinalDiagnosis;

/// Reviewed analysis for a patient: the raw prediction payload from the
/// NLP service stored verbatim, plus the clinician's final classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalAnalysis {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub predictions: serde_json::Value,
    pub final_diagnosis: FinalDiagnosis,
    pub analyzed_at: DateTime<Utc>,
}

impl FinalAnalysis {
    pub fn new(
        patient_id: Uuid,
        predictions: serde_json::Value,
        final_diagnosis: FinalDiagnosis,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            predictions,
            final_diagnosis,
            analyzed_at: Utc::now(),
        }
    }
}
