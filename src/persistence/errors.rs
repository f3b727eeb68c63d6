//! Persistence errors.

use std::io;

use thiserror::Error;

pub type PortResult<T> = Result<T, PortError>;

/// Failures reported by a `StorePort` implementation.
#[derive(Debug, Error)]
pub enum PortError {
    /// Conditional insert lost: the key is already taken
    #[error("record already exists: {0}")]
    AlreadyExists(String),

    /// Conditional write targeted a missing key
    #[error("record not found: {0}")]
    NotFound(String),

    /// Table name cannot be addressed by this backend
    #[error("invalid table name: {0}")]
    InvalidTable(String),

    /// Backend cannot serve the request right now
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Stored bytes failed verification
    #[error("table corrupted: {0}")]
    Corrupted(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PortError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display_keeps_context() {
        let err = PortError::io(
            "Failed to read table",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "Failed to read table: denied");
    }
}
