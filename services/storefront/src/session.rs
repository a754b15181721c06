//! Session cookies
//!
//! The session is held by the client as four cookies. This module is the
//! only place that writes or reads them.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::models::{Role, Session, SessionStatus, SessionUser};

pub const TOKEN_COOKIE: &str = "token";
pub const USER_NAME_COOKIE: &str = "userName";
pub const ROLE_COOKIE: &str = "role";
pub const USER_ID_COOKIE: &str = "userId";

/// Every cookie that makes up a session
pub const SESSION_COOKIES: [&str; 4] = [TOKEN_COOKIE, USER_NAME_COOKIE, ROLE_COOKIE, USER_ID_COOKIE];

/// Session lifetime (7 days)
pub const SESSION_MAX_AGE: Duration = Duration::days(7);

/// Flags applied to every session cookie
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    /// Send cookies over HTTPS only
    pub secure: bool,
}

impl CookiePolicy {
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    fn cookie(&self, name: &'static str, value: String, http_only: bool) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(http_only)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .max_age(SESSION_MAX_AGE)
            .build()
    }

    /// Add the session cookies to the jar
    ///
    /// `userName` stays readable by client scripts for display; the rest are
    /// HTTP-only.
    pub fn write_session(&self, jar: CookieJar, session: &Session) -> CookieJar {
        jar.add(self.cookie(TOKEN_COOKIE, session.token.clone(), true))
            .add(self.cookie(USER_NAME_COOKIE, session.user_name.clone(), false))
            .add(self.cookie(ROLE_COOKIE, session.role.to_string(), true))
            .add(self.cookie(USER_ID_COOKIE, session.user_id.clone(), true))
    }

    /// Expire every session cookie, whether or not the request carried it
    pub fn clear_session(&self, jar: CookieJar) -> CookieJar {
        SESSION_COOKIES.into_iter().fold(jar, |jar, name| {
            let mut cookie = self.cookie(name, String::new(), true);
            cookie.make_removal();
            jar.add(cookie)
        })
    }
}

/// Non-empty `token` cookie, the whole of what the route guard checks
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Describe the logged-in user from the cookie jar
///
/// A session needs `token`, `userName` and `role`; `userId` is optional.
pub fn read_session(jar: &CookieJar) -> SessionStatus {
    let value = |name: &str| {
        jar.get(name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    };

    let (Some(_), Some(name), Some(role)) = (
        session_token(jar),
        value(USER_NAME_COOKIE),
        value(ROLE_COOKIE).and_then(|role| role.parse::<Role>().ok()),
    ) else {
        return SessionStatus::anonymous();
    };

    SessionStatus::authenticated(SessionUser {
        id: value(USER_ID_COOKIE),
        name,
        role,
    })
}
