//! Error types for the disk cache
//!
//! Provides unified error handling using thiserror.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the disk cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Cache directory is unusable (relative path, not creatable or not writable)
    #[error("Invalid cache configuration: {0}")]
    Configuration(String),

    /// A file system operation on a cache file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored entry could not be parsed back into a response
    #[error("Malformed cache entry {digest}: {source}")]
    Deserialization {
        digest: String,
        #[source]
        source: serde_json::Error,
    },

    /// A response could not be encoded for storage
    #[error("Failed to serialize cache entry: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string()
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the disk cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_io_error_names_path() {
        let err = CacheError::io(
            "/var/cache/abc",
            std::io::Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        let message = err.to_string();
        assert!(message.contains("/var/cache/abc"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_configuration_error_message() {
        let err = CacheError::Configuration("relative path".to_string());
        assert_eq!(err.to_string(), "Invalid cache configuration: relative path");
    }

    #[test]
    fn test_error_into_response_status() {
        let err = CacheError::io(
            "/var/cache/abc",
            std::io::Error::new(ErrorKind::Other, "disk full"),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }
}
