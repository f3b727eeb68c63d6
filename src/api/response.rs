//! # Response Builder
//!
//! Every exit path produces an `ApiResponse`: a status code, the fixed
//! JSON/CORS headers, and a body string. Error bodies use the envelope
//!
//! ```text
//! { "error": { "code": "...", "message": "...", "details": {...} } }
//! ```

use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ApiError;

pub const CONTENT_TYPE: &str = "application/json";
pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "Content-Type";
pub const ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";

/// The response description returned for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Inner object of the error envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

/// Headers carried by every response.
pub fn default_headers() -> BTreeMap<String, String> {
    [
        ("Content-Type", CONTENT_TYPE),
        ("Access-Control-Allow-Origin", ALLOW_ORIGIN),
        ("Access-Control-Allow-Headers", ALLOW_HEADERS),
        ("Access-Control-Allow-Methods", ALLOW_METHODS),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl ApiResponse {
    /// A success response. `204` and `None` payloads get an empty body.
    ///
    /// A payload that cannot be serialized becomes an `INTERNAL_ERROR`.
    pub fn success<T: Serialize>(status: StatusCode, payload: Option<&T>) -> Self {
        let body = match payload {
            Some(data) if status != StatusCode::NO_CONTENT => match serde_json::to_string(data) {
                Ok(body) => body,
                Err(_) => return Self::error(&ApiError::unexpected()),
            },
            _ => String::new(),
        };
        Self::with_body(status, body)
    }

    pub fn no_content() -> Self {
        Self::with_body(StatusCode::NO_CONTENT, String::new())
    }

    /// The error envelope for `err`. The internal cause is not included.
    pub fn error(err: &ApiError) -> Self {
        let envelope = ErrorEnvelope {
            error: ErrorBody {
                code: err.code().as_str().to_string(),
                message: err.message().to_string(),
                details: err.details().cloned(),
            },
        };
        let body = serde_json::to_string(&envelope).unwrap_or_else(|_| {
            // Only reachable through a details value with non-string map keys
            format!(
                "{{\"error\":{{\"code\":\"{}\",\"message\":\"An unexpected error occurred\"}}}}",
                err.code()
            )
        });
        Self::with_body(err.status_code(), body)
    }

    fn with_body(status: StatusCode, body: String) -> Self {
        Self {
            status_code: status.as_u16(),
            headers: default_headers(),
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Parse the body back as JSON; `None` for an empty body.
    pub fn json(&self) -> Option<Value> {
        if self.body.is_empty() {
            return None;
        }
        serde_json::from_str(&self.body).ok()
    }

    /// Parse the body as an error envelope.
    pub fn error_body(&self) -> Option<ErrorBody> {
        serde_json::from_str::<ErrorEnvelope>(&self.body)
            .ok()
            .map(|envelope| envelope.error)
    }
}
