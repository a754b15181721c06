//! Storefront routes

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{
    AppState,
    actions::LOGIN_PATH,
    error::{ApiError, ApiResult},
    middleware::route_guard,
    models::{AuthResult, LoginForm, RegisterForm},
    session::{read_session, session_token},
};

/// Create the router for the storefront service
///
/// The route guard wraps every route and the fallback, so protected paths
/// are redirected even when nothing else is mounted there.
pub fn create_router(state: AppState) -> Router {
    let guard = state.guard.clone();

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(session_status))
        .route("/profile", get(session_status))
        .route("/api/banners", get(banners))
        .route("/api/banners/:id", get(banner))
        .route("/api/categories", get(categories))
        .route("/api/categories/:id", get(category))
        .route("/api/categories/:id/activities", get(activities_by_category))
        .route("/api/promos", get(promos))
        .route("/api/promos/:id", get(promo))
        .route("/api/activities", get(activities))
        .route("/api/activities/:id", get(activity))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(guard, route_guard))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "storefront"
    }))
}

/// Login form submission
///
/// Cookies are only written when the action succeeds.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    match state.actions.login(form).await {
        Ok(outcome) => {
            let jar = state.cookies.write_session(jar, &outcome.session);
            let result = AuthResult::success(outcome.message, outcome.redirect_path);
            (StatusCode::OK, jar, Json(result))
        }
        Err(e) => {
            warn!("Login failed: {}", e);
            (e.status_code(), jar, Json(AuthResult::from(e)))
        }
    }
}

/// Registration form submission
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> impl IntoResponse {
    match state.actions.register(form).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(AuthResult::success(outcome.message, outcome.redirect_path)),
        ),
        Err(e) => {
            warn!("Registration failed: {}", e);
            (e.status_code(), Json(AuthResult::from(e)))
        }
    }
}

/// Logout
///
/// Always clears the session and redirects to the login page. The upstream
/// notification runs detached.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    info!("Logout request");

    if let Some(token) = session_token(&jar) {
        state.actions.spawn_logout_notification(token);
    }

    let jar = state.cookies.clear_session(jar);
    (jar, Redirect::to(&format!("{LOGIN_PATH}?status=logged_out")))
}

/// Who is logged in, read from the cookie jar
pub async fn session_status(jar: CookieJar) -> impl IntoResponse {
    Json(read_session(&jar))
}

fn found(body: Option<Value>) -> ApiResult<Json<Value>> {
    body.map(Json).ok_or(ApiError::NotFound)
}

pub async fn banners(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    found(state.catalog.banners().await)
}

pub async fn banner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    found(state.catalog.banner(&id).await)
}

pub async fn categories(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    found(state.catalog.categories().await)
}

pub async fn category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    found(state.catalog.category(&id).await)
}

pub async fn activities_by_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    found(state.catalog.activities_by_category(&id).await)
}

pub async fn promos(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    found(state.catalog.promos().await)
}

pub async fn promo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    found(state.catalog.promo(&id).await)
}

pub async fn activities(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    found(state.catalog.activities().await)
}

pub async fn activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    found(state.catalog.activity(&id).await)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
