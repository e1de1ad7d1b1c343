//! Remote data service subsystem.
//!
//! # Data Flow
//! ```text
//! handler input
//!     → query.rs (list params → order / or-filter / window)
//!     → client.rs (authenticated REST call(s))
//!     → BackendError::Status on non-success, rows otherwise
//! ```

pub mod client;
pub mod query;

use reqwest::StatusCode;
use thiserror::Error;

pub use client::{BackendClient, Page};
pub use query::{ListParams, ListQuery, TotalCount};

/// Errors that can occur while talking to the data service.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The service answered with a non-success status.
    #[error("backend returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },

    /// Connection, TLS or body transfer failure.
    #[error("backend request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// A success response whose body was not the expected JSON.
    #[error("backend response could not be decoded: {0}")]
    Decode(String),

    /// The API key contains characters not allowed in a header.
    #[error("backend API key is not a valid header value")]
    InvalidHeader,
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackendError::Status {
            status: StatusCode::CONFLICT,
            detail: "duplicate key".into(),
        };
        assert_eq!(err.to_string(), "backend returned 409 Conflict: duplicate key");

        let err = BackendError::Decode("expected value at line 1".into());
        assert!(err.to_string().contains("line 1"));
    }
}
