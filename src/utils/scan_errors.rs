// HTTP-facing scan errors
// Only problems with the request itself surface here; scan faults become degraded verdicts instead

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("{0}")]
    MissingPayload(String),

    #[error("Malformed request body: {message}")]
    MalformedBody { status: StatusCode, message: String },

    #[error("Internal server error")]
    Internal(String),
}

// =============================================================================
// ERROR CONVERSIONS
// =============================================================================

impl From<validator::ValidationErrors> for ScanError {
    fn from(err: validator::ValidationErrors) -> Self {
        // Request DTOs have a single required field, so the first message is the whole story
        let message = err
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Payload is required".to_string());

        ScanError::MissingPayload(message)
    }
}

impl From<JsonRejection> for ScanError {
    fn from(rejection: JsonRejection) -> Self {
        ScanError::MalformedBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({ "error": "URL is required", "code": "MISSING_PAYLOAD" }))]
pub struct ScanErrorResponse {
    pub error: String,
    pub code: String,
}

impl ScanError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScanError::MissingPayload(_) => StatusCode::BAD_REQUEST,
            ScanError::MalformedBody { status, .. } => *status,
            ScanError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ScanError::MissingPayload(_) => "MISSING_PAYLOAD",
            ScanError::MalformedBody { .. } => "MALFORMED_BODY",
            ScanError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_response(&self) -> ScanErrorResponse {
        ScanErrorResponse {
            error: self.to_string(),
            code: self.error_code().to_string(),
        }
    }
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        if let ScanError::Internal(detail) = &self {
            tracing::error!("Internal error: {}", detail);
        }

        (self.status_code(), Json(self.to_response())).into_response()
    }
}

pub type ScanResult<T> = Result<T, ScanError>;
