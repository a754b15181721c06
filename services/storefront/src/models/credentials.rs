//! Form submissions and the payloads sent upstream
//!
//! Form fields are all optional so that a missing field surfaces as a
//! validation message instead of an extractor rejection.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Role;

/// Login form as submitted by the browser
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub callback_url: Option<String>,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

/// Registration form as submitted by the browser
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_repeat: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Validated login payload for `POST /login`
#[derive(Clone, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Validated registration payload for `POST /register`
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
    pub name: String,
    pub password: String,
    pub password_repeat: String,
    pub role: Role,
    pub phone_number: String,
    pub profile_picture_url: String,
}
