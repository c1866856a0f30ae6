//! HTTP adapter for the external NLP prediction service.
//!
//! One synchronous request per call, fail-fast: no retries, no backoff.
//! Both outcomes come back as data — callers store or render the result
//! without branching on error types. The endpoint is injected at
//! construction so tests can point the client anywhere.

use serde::{Deserialize, Serialize};

/// Bound on a single prediction request, end to end.
pub const PREDICTION_TIMEOUT_SECS: u64 = 25;

/// Request body understood by the prediction service.
#[derive(Serialize)]
struct PredictRequest<'a> {
    text: &'a str,
}

/// Why a prediction call produced no payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionFailure {
    /// Human-readable description, suitable for direct display.
    pub message: String,
    /// HTTP status when the service answered with a non-200 code;
    /// `None` when the request could not be completed at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// Tagged result of one prediction call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionOutcome {
    /// HTTP 200 — the parsed response body, verbatim.
    Predictions(serde_json::Value),
    Failed(PredictionFailure),
}

impl PredictionOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Collapse into the uniform mapping shape: the success payload as-is,
    /// or `{"error": <message>}`. Downstream code distinguishes the two
    /// only by the presence of the `error` key.
    pub fn into_value(self) -> serde_json::Value {
        match self {
            Self::Predictions(value) => value,
            Self::Failed(failure) => serde_json::json!({ "error": failure.message }),
        }
    }
}

/// Client for the external prediction endpoint.
pub struct PredictionClient {
    endpoint: String,
    client: reqwest::Client,
}

impl PredictionClient {
    /// Build a client for the given endpoint with the bounded timeout.
    /// An empty endpoint is accepted and fails at call time, not here.
    pub fn new(endpoint: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(PREDICTION_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the clinical text and normalize the response. A single
    /// attempt: whatever happens is the answer.
    pub async fn predict(&self, text: &str) -> PredictionOutcome {
        let body = PredictRequest { text };

        let response = match self.client.post(&self.endpoint).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(endpoint = %self.endpoint, "prediction request failed: {e}");
                return PredictionOutcome::Failed(PredictionFailure {
                    message: format!("could not reach prediction service: {e}"),
                    status: None,
                });
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return PredictionOutcome::Failed(PredictionFailure {
                message: format!("prediction service responded with status {}", status.as_u16()),
                status: Some(status.as_u16()),
            });
        }

        match response.json::<serde_json::Value>().await {
            Ok(payload) => PredictionOutcome::Predictions(payload),
            Err(e) => PredictionOutcome::Failed(PredictionFailure {
                message: format!("could not read prediction response: {e}"),
                status: None,
            }),
        }
    }
}
