//! Error types for dexpull
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur while harvesting
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The entity listing could not be fetched; fatal for the run
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Transport-level failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Upstream answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Upstream document did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Staging/output persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarvestError {
    /// HTTP status carried by this error, if it came from a status check
    pub fn status(&self) -> Option<u16> {
        match self {
            HarvestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for dexpull operations
pub type Result<T> = std::result::Result<T, HarvestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_unavailable_error() {
        let err = HarvestError::UpstreamUnavailable("HTTP 503".to_string());
        assert_eq!(err.to_string(), "Upstream unavailable: HTTP 503");
    }

    #[test]
    fn test_status_error() {
        let err = HarvestError::Status {
            url: "https://pokeapi.co/api/v2/pokemon/1/".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "HTTP 404 from https://pokeapi.co/api/v2/pokemon/1/");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_status_absent_for_other_errors() {
        let err = HarvestError::Http("connection reset".to_string());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_storage_error() {
        let err = HarvestError::Storage("lock poisoned".to_string());
        assert_eq!(err.to_string(), "Storage error: lock poisoned");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: HarvestError = io_err.into();
        assert!(matches!(err, HarvestError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: HarvestError = json_err.into();
        assert!(matches!(err, HarvestError::Json(_)));
    }
}
