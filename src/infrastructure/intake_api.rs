use crate::application::{ApiReply, IntakeApi};
use crate::domain::{ApplicantRecord, SubmissionError};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AcceptedBody {
    application_id: Option<Value>,
}

impl AcceptedBody {
    /// The id as display text; numbers are accepted alongside strings.
    fn application_id(self) -> Option<String> {
        match self.application_id? {
            Value::Null => None,
            Value::String(id) => Some(id),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RejectedBody {
    message: Option<String>,
    missing_fields: Option<Vec<String>>,
}

/// Blocking HTTP client for the Application Intake API.
pub struct HttpIntakeApi {
    client: Client,
    endpoint: String,
}

impl HttpIntakeApi {
    /// Builds a client posting to `endpoint`, optionally with a request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, SubmissionError> {
        // reqwest's blocking client defaults to a 30s timeout; `None` means wait
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl IntakeApi for HttpIntakeApi {
    fn submit_application(&self, record: &ApplicantRecord) -> Result<ApiReply, SubmissionError> {
        debug!(endpoint = %self.endpoint, "posting application");
        let response = self
            .client
            .post(&self.endpoint)
            .json(record)
            .send()
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;
        debug!(status = status.as_u16(), "intake API responded");

        if status.is_success() {
            let accepted: AcceptedBody = serde_json::from_str(&body)
                .map_err(|e| SubmissionError::MalformedResponse(e.to_string()))?;
            Ok(ApiReply::Accepted {
                application_id: accepted.application_id(),
            })
        } else {
            let rejected: RejectedBody = serde_json::from_str(&body)
                .map_err(|e| SubmissionError::MalformedResponse(e.to_string()))?;
            Ok(ApiReply::Rejected {
                status: status.as_u16(),
                message: rejected.message,
                missing_fields: rejected.missing_fields.unwrap_or_default(),
            })
        }
    }
}
