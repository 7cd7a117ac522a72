//! Request and response shapes of the sample submission endpoint.

use serde::{Deserialize, Serialize};

use crate::{ApiError, Identity, Stroke, SubmissionPayload};

const SNIPPET_CHARS: usize = 200;

/// Body of `POST /api/submit`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest<'a> {
    pub doctor_id: &'a str,
    pub email: &'a str,
    pub strokes: &'a [Stroke],
    pub transcription: &'a str,
}

impl<'a> SubmitRequest<'a> {
    pub fn new(identity: &'a Identity, payload: &'a SubmissionPayload) -> Self {
        Self {
            doctor_id: &identity.doctor_id,
            email: &identity.email,
            strokes: &payload.strokes,
            transcription: &payload.transcription,
        }
    }

    pub fn to_json(&self) -> Result<String, ApiError> {
        serde_json::to_string(self).map_err(|error| ApiError::Encode(error.to_string()))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubmitResponse {
    pub message: Option<String>,
    /// Refreshed profile of the submitter; shape owned by the server.
    pub updated_doctor: serde_json::Value,
}

/// `detail` of the page event fired once per accepted submission.
#[derive(Serialize, Debug)]
pub struct SubmittedDetail<'a> {
    pub strokes: &'a [Stroke],
    pub transcription: &'a str,
    pub profile: &'a serde_json::Value,
}

impl<'a> SubmittedDetail<'a> {
    pub fn new(payload: &'a SubmissionPayload, response: &'a SubmitResponse) -> Self {
        Self {
            strokes: &payload.strokes,
            transcription: &payload.transcription,
            profile: &response.updated_doctor,
        }
    }

    pub fn to_json(&self) -> Result<String, ApiError> {
        serde_json::to_string(self).map_err(|error| ApiError::Encode(error.to_string()))
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Maps an HTTP status and raw body to the submission outcome.
pub fn interpret_submit_response(status: u16, body: &str) -> Result<SubmitResponse, ApiError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|_| ApiError::InvalidResponse(body.chars().take(SNIPPET_CHARS).collect()))?;
    if !(200..300).contains(&status) {
        let message = serde_json::from_value::<ErrorBody>(value)
            .ok()
            .and_then(|body| body.error)
            .filter(|error| !error.is_empty())
            .unwrap_or_else(|| format!("Server error: {status}"));
        return Err(ApiError::Server { status, message });
    }
    // Any JSON body with a success status counts as accepted.
    Ok(SubmitResponse {
        message: value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
        updated_doctor: value.get("updatedDoctor").cloned().unwrap_or_default(),
    })
}
