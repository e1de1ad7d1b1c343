//! Request-level errors and their mapping to HTTP responses.

use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::backend::BackendError;
use crate::http::response::error_response;
use crate::registrations::validation::InputError;

pub const MISCONFIGURED: &str = "Server misconfigured: SUPABASE_URL or SUPABASE_ANON_KEY missing.";
pub const BACKEND_ERROR: &str = "Supabase error";
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Everything a request can fail with.
#[derive(Debug, Error)]
pub enum FacadeError {
    /// Backend URL or key not configured.
    #[error("Server misconfigured: SUPABASE_URL or SUPABASE_ANON_KEY missing.")]
    Misconfigured,

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Record not found")]
    NotFound,

    #[error("Method {0} not allowed")]
    MethodNotAllowed(Method),

    #[error(transparent)]
    Backend(#[from] BackendError),

    /// An extractor refused the request (undecodable path, oversized body).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("{0}")]
    Internal(String),
}

impl From<PathRejection> for FacadeError {
    fn from(rejection: PathRejection) -> Self {
        FacadeError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<BytesRejection> for FacadeError {
    fn from(rejection: BytesRejection) -> Self {
        FacadeError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl FacadeError {
    pub fn status(&self) -> StatusCode {
        match self {
            FacadeError::Misconfigured | FacadeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FacadeError::Input(InputError::InvalidJson | InputError::MissingId) => StatusCode::BAD_REQUEST,
            FacadeError::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FacadeError::NotFound => StatusCode::NOT_FOUND,
            FacadeError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            FacadeError::Rejected { status, .. } => *status,
            FacadeError::Backend(BackendError::Status { status, .. }) => *status,
            FacadeError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FacadeError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            FacadeError::Backend(BackendError::Status { detail, .. }) => {
                error_response(status, BACKEND_ERROR, Some(&detail))
            }
            FacadeError::Backend(err) => {
                tracing::error!(error = %err, "Backend failure");
                error_response(status, INTERNAL_ERROR, Some(&err.to_string()))
            }
            FacadeError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                error_response(status, INTERNAL_ERROR, Some(&detail))
            }
            FacadeError::Misconfigured => {
                tracing::error!("Backend credentials are not configured");
                error_response(status, MISCONFIGURED, None)
            }
            other => {
                tracing::debug!(status = %status, error = %other, "Request rejected");
                error_response(status, &other.to_string(), None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_split_between_400_and_422() {
        assert_eq!(FacadeError::from(InputError::InvalidJson).status(), StatusCode::BAD_REQUEST);
        assert_eq!(FacadeError::from(InputError::MissingId).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            FacadeError::from(InputError::MissingFields).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            FacadeError::from(InputError::InvalidStatus).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn backend_status_is_relayed_unchanged() {
        let err = FacadeError::from(BackendError::Status {
            status: StatusCode::IM_A_TEAPOT,
            detail: "short and stout".into(),
        });
        assert_eq!(err.status(), StatusCode::IM_A_TEAPOT);
    }

    #[test]
    fn method_message_names_the_verb() {
        assert_eq!(
            FacadeError::MethodNotAllowed(Method::TRACE).to_string(),
            "Method TRACE not allowed"
        );
        assert_eq!(FacadeError::Misconfigured.to_string(), MISCONFIGURED);
    }

    #[test]
    fn rejections_keep_their_status_and_message() {
        let err = FacadeError::Rejected {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "Failed to buffer the request body: length limit exceeded".into(),
        };
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            err.to_string(),
            "Failed to buffer the request body: length limit exceeded"
        );
    }
}
