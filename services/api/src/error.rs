//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service, and the mapping
//! from core/port errors onto HTTP responses used by the handlers.

use crate::config::ConfigError;
use axum::http::StatusCode;
use family_loop_core::{CoreError, PortError};
use tracing::error;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// The error shape every handler returns.
pub type HttpError = (StatusCode, String);

/// Maps a port failure to a response, logging anything that is not the
/// caller's fault. `action` reads like "load contacts".
pub fn port_failure(action: &str, err: PortError) -> HttpError {
    match err {
        PortError::NotFound(what) => (StatusCode::NOT_FOUND, what),
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        PortError::Unexpected(_) => {
            error!("Failed to {}: {:?}", action, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to {}", action),
            )
        }
    }
}

/// Core validation errors are always the client's input.
pub fn invalid_input(err: CoreError) -> HttpError {
    (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_errors_map_to_statuses() {
        let (status, body) = port_failure("load goal", PortError::NotFound("Goal 1 not found".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Goal 1 not found");

        let (status, body) = port_failure("load goal", PortError::Unexpected("db down".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Failed to load goal", "internal details stay in the logs");
    }

    #[test]
    fn core_errors_are_unprocessable() {
        let (status, body) = invalid_input(CoreError::MissingTitle);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("title"));
    }
}
