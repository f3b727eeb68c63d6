//! # API Errors
//!
//! The error taxonomy every operation reports through:
//!
//! | Code                   | Status | Cause                                   |
//! |------------------------|--------|-----------------------------------------|
//! | `INVALID_REQUEST`      | 400    | malformed body, bad field, bad route    |
//! | `STORE_ALREADY_EXISTS` | 409    | create hit an existing key              |
//! | `STORE_NOT_FOUND`      | 404    | referenced store is absent              |
//! | `INTERNAL_ERROR`       | 500    | persistence/config failure, panics      |
//!
//! The internal `cause` is logged but never serialized to the caller.

use std::fmt;

use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Stable error codes exposed in the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidRequest,
    StoreAlreadyExists,
    StoreNotFound,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::StoreAlreadyExists => "STORE_ALREADY_EXISTS",
            ErrorCode::StoreNotFound => "STORE_NOT_FOUND",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    /// HTTP status for this code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::StoreAlreadyExists => StatusCode::CONFLICT,
            ErrorCode::StoreNotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation failure, already classified.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    details: Option<Value>,
    cause: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            cause: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn already_exists(store_id: &str) -> Self {
        Self::new(
            ErrorCode::StoreAlreadyExists,
            format!("Store with id {} already exists", store_id),
        )
    }

    pub fn not_found(store_id: &str) -> Self {
        Self::new(
            ErrorCode::StoreNotFound,
            format!("Store with id {} not found", store_id),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// The generic 500 used for faults nobody anticipated.
    pub fn unexpected() -> Self {
        Self::internal("An unexpected error occurred")
    }

    /// Attach structured data returned to the caller.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach the underlying cause; logged only.
    pub fn with_cause(mut self, cause: impl fmt::Display) -> Self {
        self.cause = Some(cause.to_string());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }

    /// Text for the ERROR log record: message plus cause when known.
    pub fn log_message(&self) -> String {
        match &self.cause {
            Some(cause) => format!("{}: {}", self.message, cause),
            None => self.message.clone(),
        }
    }
}
