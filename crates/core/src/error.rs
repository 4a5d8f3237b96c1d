//! Error types for the Dost domain.
//!
//! Uses `thiserror` for ergonomic error definitions. The completion boundary
//! has its own [`ServiceError`]; configuration and rendering errors live in
//! their crates and convert into [`Error`] there.

use std::path::PathBuf;

use thiserror::Error;

/// The top-level error type for Dost operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Completion service errors ---
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Document export errors ---
    #[error("Render error: {message}")]
    Render { message: String },

    // --- I/O ---
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// A failed call to the completion service.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_displays_correctly() {
        let err = Error::Service(ServiceError::ApiError {
            status_code: 503,
            message: "upstream overloaded".into(),
        });
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("upstream overloaded"));
    }

    #[test]
    fn write_error_names_the_path() {
        let err = Error::Write {
            path: PathBuf::from("notes/chat.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to write notes/chat.pdf: no such directory"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn render_error_displays_message() {
        let err = Error::Render {
            message: "block taller than frame".into(),
        };
        assert_eq!(err.to_string(), "Render error: block taller than frame");
    }
}
