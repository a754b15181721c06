//! Custom error types for the storefront service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::models::AuthResult;

/// Why a login or registration attempt did not succeed
///
/// Every variant folds into an [`AuthResult`]; none of them is fatal.
#[derive(Error, Debug, PartialEq)]
pub enum AuthError {
    /// Rejected locally before any network call
    #[error("{0}")]
    Validation(String),

    /// The identity API answered with a non-success status
    #[error("{message}")]
    Rejected { code: u16, message: String },

    /// The identity API could not be reached
    #[error("Unable to reach the server. Check your internet connection.")]
    Unreachable,

    /// The identity API answered 2xx with an unusable body
    #[error("Invalid response from server.")]
    InvalidResponse,
}

impl AuthError {
    /// HTTP status used when the result is sent back to the client
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Rejected { code, .. } if (400..500).contains(code) => {
                StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AuthError::Rejected { .. } | AuthError::InvalidResponse => StatusCode::BAD_GATEWAY,
            AuthError::Unreachable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<AuthError> for AuthResult {
    fn from(error: AuthError) -> Self {
        AuthResult::error(error.to_string())
    }
}

/// Custom error type for the JSON read routes
#[derive(Error, Debug)]
pub enum ApiError {
    /// Nothing to show for this resource
    #[error("Not found")]
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found"),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
