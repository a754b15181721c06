//! Outcome of a login or registration submission

use serde::Serialize;

/// Whether the submission went through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStatus {
    Success,
    Error,
}

/// Result returned to the submitting client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    pub status: AuthStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_path: Option<String>,
}

impl AuthResult {
    pub fn success(message: impl Into<String>, redirect_path: impl Into<String>) -> Self {
        Self {
            status: AuthStatus::Success,
            message: message.into(),
            redirect_path: Some(redirect_path.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: AuthStatus::Error,
            message: message.into(),
            redirect_path: None,
        }
    }
}
