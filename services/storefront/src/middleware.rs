//! Route guard middleware
//!
//! Requests on protected paths must carry a non-empty `token` cookie;
//! otherwise they are redirected to the login page with the requested path
//! as `callbackUrl`. The token itself is not inspected.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::info;

use crate::{actions::LOGIN_PATH, session::session_token};

/// Paths guarded by default
pub const DEFAULT_PROTECTED_PATTERNS: [&str; 3] =
    ["/cart/:path*", "/profile/:path*", "/activities/:id/book"];

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    /// `:name`, exactly one segment
    Param,
    /// `:name*`, zero or more trailing segments
    CatchAll,
}

/// Path pattern in `/literal/:param/:rest*` form
#[derive(Debug, Clone, PartialEq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) if name.ends_with('*') => Segment::CatchAll,
                Some(_) => Segment::Param,
                None => Segment::Literal(segment.to_string()),
            })
            .collect();

        Self { segments }
    }

    pub fn matches(&self, path: &str) -> bool {
        let mut parts = path.split('/').filter(|part| !part.is_empty());

        for segment in &self.segments {
            match segment {
                Segment::CatchAll => return true,
                Segment::Param => {
                    if parts.next().is_none() {
                        return false;
                    }
                }
                Segment::Literal(literal) => {
                    if parts.next() != Some(literal.as_str()) {
                        return false;
                    }
                }
            }
        }

        parts.next().is_none()
    }
}

/// What the guard decided for one request
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Route guard over a fixed set of path patterns
#[derive(Debug, Clone)]
pub struct RouteGuard {
    patterns: Vec<PathPattern>,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(&DEFAULT_PROTECTED_PATTERNS)
    }
}

impl RouteGuard {
    pub fn new(patterns: &[&str]) -> Self {
        Self {
            patterns: patterns.iter().map(|p| PathPattern::parse(p)).collect(),
        }
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(path))
    }

    /// Decide on a request from its path and cookies
    pub fn check(&self, path: &str, jar: &CookieJar) -> GuardDecision {
        if !self.is_protected(path) || session_token(jar).is_some() {
            return GuardDecision::Allow;
        }

        GuardDecision::Redirect(login_redirect(path))
    }
}

/// Login URL that sends the user back to `path` afterwards
pub fn login_redirect(path: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("callbackUrl", path)
        .finish();
    format!("{LOGIN_PATH}?{query}")
}

/// Redirect unauthenticated requests on protected paths to the login page
pub async fn route_guard(
    State(guard): State<Arc<RouteGuard>>,
    jar: CookieJar,
    req: Request<Body>,
    next: Next,
) -> Response {
    match guard.check(req.uri().path(), &jar) {
        GuardDecision::Allow => next.run(req).await,
        GuardDecision::Redirect(location) => {
            info!("No session for {}, redirecting to login", req.uri().path());
            Redirect::temporary(&location).into_response()
        }
    }
}
