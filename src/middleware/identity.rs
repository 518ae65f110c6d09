// Caller identity extraction
// The identity provider sits in front of this service and forwards an opaque user handle

use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

use crate::app::AppState;

/// Opaque user handle of the caller, if one was forwarded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanIdentity(pub Option<String>);

impl ScanIdentity {
    pub fn user_id(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Read the handle from the given header. Blank or non-UTF-8 values count as absent.
    pub fn from_parts(parts: &Parts, header_name: &str) -> Self {
        let user_id = parts
            .headers
            .get(header_name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from);

        Self(user_id)
    }
}

impl FromRequestParts<AppState> for ScanIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts, &state.config.persistence.identity_header))
    }
}
