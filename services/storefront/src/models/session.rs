//! Session model
//!
//! A session lives entirely in the client's cookie jar; see
//! [`crate::session`] for how it is written and read.

use serde::Serialize;

use super::Role;

/// Session issued after a successful login
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user_name: String,
    pub role: Role,
    pub user_id: String,
}

/// User as exposed to pages; the token is never echoed back
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionUser {
    pub id: Option<String>,
    pub name: String,
    pub role: Role,
}

/// Answer to "who is logged in?"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub user: Option<SessionUser>,
}

impl SessionStatus {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            user: None,
        }
    }

    pub fn authenticated(user: SessionUser) -> Self {
        Self {
            authenticated: true,
            user: Some(user),
        }
    }
}
