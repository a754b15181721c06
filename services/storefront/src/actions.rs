//! Login, registration and logout actions
//!
//! Actions take a submitted form and return an outcome or an [`AuthError`].
//! They never touch cookies: the route handlers own that side effect, so the
//! logic here can be exercised without a request/response pair.

use common::{error::UpstreamError, upstream::ApiClient};
use serde::Deserialize;
use serde_json::{Number, Value};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{
    error::AuthError,
    models::{LoginCredentials, LoginForm, RegisterForm, Registration, Role, Session},
    validation::{
        normalize_phone_number, sanitize, validate_email, validate_name, validate_password_length,
        validate_password_strength, validate_phone_number,
    },
};

/// Login page, the target of every "please log in" redirect
pub const LOGIN_PATH: &str = "/auth/login";

const PLACEHOLDER_AVATAR_URL: &str = "https://placehold.co/200x200/E2E8F0/4A5568";

/// Successful login, ready for the boundary to write cookies from
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub session: Session,
    pub message: String,
    pub redirect_path: String,
}

/// Successful registration
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterOutcome {
    pub message: String,
    pub redirect_path: String,
}

/// Authentication actions backed by the identity API
#[derive(Clone)]
pub struct AuthActions {
    client: ApiClient,
}

impl AuthActions {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Validate and authenticate one login attempt
    pub async fn login(&self, form: LoginForm) -> Result<LoginOutcome, AuthError> {
        let callback_url = sanitize(form.callback_url.as_deref());
        let credentials = validate_login(&form)?;

        info!("Login attempt for {}", credentials.email);

        let body = self
            .client
            .post_json(&["login"], &credentials, None)
            .await
            .map_err(login_failure)?;

        let session = parse_login_response(&body).ok_or_else(|| {
            error!("Login response is missing the token or the user");
            AuthError::InvalidResponse
        })?;

        info!("Login successful for {}", session.user_name);

        let redirect_path = safe_callback(&callback_url)
            .unwrap_or_else(|| session.role.default_redirect().to_string());

        Ok(LoginOutcome {
            message: format!("Welcome, {}!", session.user_name),
            redirect_path,
            session,
        })
    }

    /// Validate and submit one registration attempt
    pub async fn register(&self, form: RegisterForm) -> Result<RegisterOutcome, AuthError> {
        let registration = validate_registration(&form)?;

        info!("Registration attempt for {}", registration.email);

        self.client
            .post_json(&["register"], &registration, None)
            .await
            .map_err(register_failure)?;

        info!("Registration successful for {}", registration.email);

        Ok(RegisterOutcome {
            message: "Registration successful! Please log in with your new account.".to_string(),
            redirect_path: LOGIN_PATH.to_string(),
        })
    }

    /// Tell the identity API that a token is no longer in use
    pub async fn notify_logout(&self, token: &str) -> Result<(), UpstreamError> {
        self.client
            .post_json(&["logout"], &serde_json::json!({}), Some(token))
            .await?;
        Ok(())
    }

    /// Fire the logout notification on a detached task
    ///
    /// The caller never waits on it and its failure is only logged.
    pub fn spawn_logout_notification(&self, token: String) -> JoinHandle<()> {
        let actions = self.clone();
        tokio::spawn(async move {
            match actions.notify_logout(&token).await {
                Ok(()) => info!("Upstream logout acknowledged"),
                Err(e) => warn!("Logout API call failed: {}", e),
            }
        })
    }
}

fn validate_login(form: &LoginForm) -> Result<LoginCredentials, AuthError> {
    let email = sanitize(form.email.as_deref());
    let password = sanitize(form.password.as_deref());

    if email.is_empty() || password.is_empty() {
        return Err(AuthError::Validation(
            "Email and password are required.".to_string(),
        ));
    }

    validate_email(&email).map_err(AuthError::Validation)?;
    validate_password_length(&password).map_err(AuthError::Validation)?;

    Ok(LoginCredentials { email, password })
}

fn validate_registration(form: &RegisterForm) -> Result<Registration, AuthError> {
    let name = sanitize(form.name.as_deref());
    let email = sanitize(form.email.as_deref());
    let phone_number = sanitize(form.phone_number.as_deref());
    let password = sanitize(form.password.as_deref());
    let password_repeat = sanitize(form.password_repeat.as_deref());
    let role = sanitize(form.role.as_deref());

    if [&name, &email, &phone_number, &password, &password_repeat]
        .iter()
        .any(|field| field.is_empty())
    {
        return Err(AuthError::Validation("All fields are required.".to_string()));
    }

    validate_name(&name).map_err(AuthError::Validation)?;
    validate_email(&email).map_err(AuthError::Validation)?;
    validate_phone_number(&phone_number).map_err(AuthError::Validation)?;
    validate_password_length(&password).map_err(AuthError::Validation)?;
    validate_password_strength(&password).map_err(AuthError::Validation)?;

    if password != password_repeat {
        return Err(AuthError::Validation(
            "Password and password confirmation do not match.".to_string(),
        ));
    }

    let role = if role.is_empty() {
        Role::default()
    } else {
        role.parse::<Role>()
            .map_err(|_| AuthError::Validation("Invalid role.".to_string()))?
    };

    Ok(Registration {
        profile_picture_url: placeholder_avatar(&name),
        phone_number: normalize_phone_number(&phone_number),
        email,
        name,
        password,
        password_repeat,
        role,
    })
}

/// Placeholder avatar showing the user's first initial
fn placeholder_avatar(name: &str) -> String {
    let initial: String = name
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default();
    let text: String = url::form_urlencoded::byte_serialize(initial.as_bytes()).collect();
    format!("{PLACEHOLDER_AVATAR_URL}?text={text}")
}

/// Only same-site absolute paths are honoured as callbacks
fn safe_callback(callback_url: &str) -> Option<String> {
    let is_local = callback_url.starts_with('/')
        && !callback_url.starts_with("//")
        && !callback_url.starts_with("/\\");
    is_local.then(|| callback_url.to_string())
}

#[derive(Deserialize)]
struct UpstreamUser {
    name: String,
    role: Role,
    id: UpstreamId,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UpstreamId {
    Text(String),
    Number(Number),
}

impl UpstreamId {
    fn into_string(self) -> String {
        match self {
            UpstreamId::Text(id) => id,
            UpstreamId::Number(id) => id.to_string(),
        }
    }
}

/// Extract the session from a login response
///
/// The token is read from `token` or `data.token`; the user from `data.user`
/// or, failing that, `data` itself.
fn parse_login_response(body: &Value) -> Option<Session> {
    let data = body.get("data");

    let token = body
        .get("token")
        .or_else(|| data.and_then(|data| data.get("token")))
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())?;

    let user = data
        .and_then(|data| data.get("user"))
        .filter(|user| user.is_object())
        .or(data)?;

    let user: UpstreamUser = serde_json::from_value(user.clone()).ok()?;

    Some(Session {
        token: token.to_string(),
        user_name: user.name,
        role: user.role,
        user_id: user.id.into_string(),
    })
}

fn login_failure(error: UpstreamError) -> AuthError {
    match error {
        UpstreamError::Status { code, message } => {
            warn!("Login rejected by upstream with {}", code);
            if code == 401 || message.to_lowercase().contains("unauthorized") {
                AuthError::Rejected {
                    code,
                    message: "Incorrect email or password.".to_string(),
                }
            } else {
                AuthError::Rejected { code, message }
            }
        }
        UpstreamError::Decode(_) => AuthError::InvalidResponse,
        UpstreamError::Network(_) | UpstreamError::Url(_) => AuthError::Unreachable,
    }
}

fn register_failure(error: UpstreamError) -> AuthError {
    match error {
        UpstreamError::Status { code, message } => {
            warn!("Registration rejected by upstream with {}", code);
            let lowered = message.to_lowercase();
            if lowered.contains("email") && lowered.contains("exist") {
                AuthError::Rejected {
                    code,
                    message: "Email is already registered. Use another email or log in."
                        .to_string(),
                }
            } else {
                AuthError::Rejected { code, message }
            }
        }
        UpstreamError::Decode(_) => AuthError::InvalidResponse,
        UpstreamError::Network(_) | UpstreamError::Url(_) => AuthError::Unreachable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::settings::{ApiConfig, parse_base_url};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn actions_for(server: &MockServer) -> AuthActions {
        actions_at(&server.uri())
    }

    fn actions_at(base_url: &str) -> AuthActions {
        let config = ApiConfig {
            base_url: parse_base_url(base_url).unwrap(),
            api_key: "test-key".to_string(),
        };
        AuthActions::new(ApiClient::new(&config).unwrap())
    }

    fn login_form(email: &str, password: &str, callback_url: Option<&str>) -> LoginForm {
        LoginForm {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            callback_url: callback_url.map(str::to_string),
        }
    }

    fn register_form() -> RegisterForm {
        RegisterForm {
            name: Some("ana".to_string()),
            email: Some("ana@example.com".to_string()),
            phone_number: Some("0812-3456-7890".to_string()),
            password: Some("Secret1".to_string()),
            password_repeat: Some("Secret1".to_string()),
            role: None,
        }
    }

    async fn no_network_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_login_requires_both_fields_without_network() {
        let server = no_network_server().await;
        let actions = actions_for(&server);

        for form in [
            login_form("", "secret1", None),
            login_form("ana@example.com", "   ", None),
            LoginForm::default(),
        ] {
            let err = actions.login(form).await.unwrap_err();
            assert_eq!(
                err,
                AuthError::Validation("Email and password are required.".to_string())
            );
        }
    }

    #[tokio::test]
    async fn test_login_validation_order() {
        let server = no_network_server().await;
        let actions = actions_for(&server);

        let err = actions
            .login(login_form("not-an-email", "123", None))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::Validation("Invalid email format.".to_string()));

        let err = actions
            .login(login_form("ana@example.com", "12345", None))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AuthError::Validation("Password must be at least 6 characters.".to_string())
        );
    }

    #[tokio::test]
    async fn test_login_success_uses_callback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(header("apiKey", "test-key"))
            .and(body_json(json!({ "email": "ana@example.com", "password": "secret1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "t1",
                "data": { "user": { "name": "Ana", "role": "user", "id": 7 } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = actions_for(&server)
            .login(login_form(" ana@example.com ", "secret1", Some("/cart")))
            .await
            .unwrap();

        assert_eq!(
            outcome.session,
            Session {
                token: "t1".to_string(),
                user_name: "Ana".to_string(),
                role: Role::User,
                user_id: "7".to_string(),
            }
        );
        assert_eq!(outcome.message, "Welcome, Ana!");
        assert_eq!(outcome.redirect_path, "/cart");
    }

    #[tokio::test]
    async fn test_login_success_defaults_by_role() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "token": "t2", "user": { "name": "Root", "role": "admin", "id": "u-1" } }
            })))
            .mount(&server)
            .await;

        let actions = actions_for(&server);

        let outcome = actions
            .login(login_form("root@example.com", "secret1", None))
            .await
            .unwrap();
        assert_eq!(outcome.redirect_path, "/dashboard");
        assert_eq!(outcome.session.user_id, "u-1");

        let outcome = actions
            .login(login_form("root@example.com", "secret1", Some("https://evil.test/")))
            .await
            .unwrap();
        assert_eq!(outcome.redirect_path, "/dashboard");
    }

    #[tokio::test]
    async fn test_login_unauthorized_is_remapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })),
            )
            .mount(&server)
            .await;

        let err = actions_for(&server)
            .login(login_form("ana@example.com", "secret1", None))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AuthError::Rejected {
                code: 401,
                message: "Incorrect email or password.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_login_other_rejections_keep_upstream_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "message": "User not found" })),
            )
            .mount(&server)
            .await;

        let err = actions_for(&server)
            .login(login_form("ana@example.com", "secret1", None))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn test_login_incomplete_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t1" })))
            .mount(&server)
            .await;

        let err = actions_for(&server)
            .login(login_form("ana@example.com", "secret1", None))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::InvalidResponse);
    }

    #[tokio::test]
    async fn test_login_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let actions = actions_at(&format!("http://127.0.0.1:{port}"));

        let err = actions
            .login(login_form("ana@example.com", "secret1", None))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::Unreachable);
    }

    #[tokio::test]
    async fn test_register_password_mismatch_without_network() {
        let server = no_network_server().await;
        let form = RegisterForm {
            password_repeat: Some("Secret2".to_string()),
            ..register_form()
        };

        let err = actions_for(&server).register(form).await.unwrap_err();
        assert_eq!(
            err,
            AuthError::Validation("Password and password confirmation do not match.".to_string())
        );
    }

    #[tokio::test]
    async fn test_register_validation_order() {
        let server = no_network_server().await;
        let actions = actions_for(&server);

        let cases = [
            (
                RegisterForm {
                    email: None,
                    ..register_form()
                },
                "All fields are required.",
            ),
            (
                RegisterForm {
                    name: Some("A".to_string()),
                    email: Some("bad".to_string()),
                    ..register_form()
                },
                "Name must be at least 2 characters.",
            ),
            (
                RegisterForm {
                    email: Some("bad".to_string()),
                    phone_number: Some("12345".to_string()),
                    ..register_form()
                },
                "Invalid email format.",
            ),
            (
                RegisterForm {
                    phone_number: Some("+1234567890".to_string()),
                    password: Some("short".to_string()),
                    ..register_form()
                },
                "Invalid phone number format. Use an Indonesian number (08xxxxxxxxxx).",
            ),
            (
                RegisterForm {
                    password: Some("Sh1".to_string()),
                    ..register_form()
                },
                "Password must be at least 6 characters.",
            ),
            (
                RegisterForm {
                    password: Some("secret1".to_string()),
                    password_repeat: Some("secret1".to_string()),
                    ..register_form()
                },
                "Password must contain an uppercase letter, a lowercase letter, and a digit.",
            ),
            (
                RegisterForm {
                    role: Some("owner".to_string()),
                    ..register_form()
                },
                "Invalid role.",
            ),
        ];

        for (form, expected) in cases {
            let err = actions.register(form).await.unwrap_err();
            assert_eq!(err, AuthError::Validation(expected.to_string()));
        }
    }

    #[tokio::test]
    async fn test_register_sends_normalized_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .and(header("apiKey", "test-key"))
            .and(body_json(json!({
                "email": "ana@example.com",
                "name": "ana",
                "password": "Secret1",
                "passwordRepeat": "Secret1",
                "role": "user",
                "phoneNumber": "081234567890",
                "profilePictureUrl": "https://placehold.co/200x200/E2E8F0/4A5568?text=A"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = actions_for(&server).register(register_form()).await.unwrap();
        assert_eq!(outcome.redirect_path, LOGIN_PATH);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_remapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(json!({ "message": "Email already exists" })),
            )
            .mount(&server)
            .await;

        let err = actions_for(&server)
            .register(register_form())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Email is already registered. Use another email or log in."
        );
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
    }

    #[test]
    fn test_parse_login_response_shapes() {
        let nested = json!({ "token": "t1", "data": { "user": { "name": "Ana", "role": "user", "id": 7 } } });
        let flat = json!({ "token": "t1", "data": { "name": "Ana", "role": "user", "id": 7, "email": "ana@example.com" } });
        let inner_token = json!({ "data": { "token": "t1", "user": { "name": "Ana", "role": "user", "id": 7 } } });

        for body in [nested, flat, inner_token] {
            let session = parse_login_response(&body).unwrap();
            assert_eq!(session.token, "t1");
            assert_eq!(session.user_id, "7");
        }

        assert!(parse_login_response(&json!({ "token": "", "data": { "name": "Ana", "role": "user", "id": 7 } })).is_none());
        assert!(parse_login_response(&json!({ "token": "t1", "data": { "user": { "name": "Ana" } } })).is_none());
        assert!(parse_login_response(&json!({ "token": "t1", "data": { "user": { "name": "Ana", "role": "root", "id": 1 } } })).is_none());
    }

    #[test]
    fn test_safe_callback() {
        assert_eq!(safe_callback("/cart"), Some("/cart".to_string()));
        assert_eq!(safe_callback("/activities/3/book"), Some("/activities/3/book".to_string()));
        assert_eq!(safe_callback(""), None);
        assert_eq!(safe_callback("//evil.test"), None);
        assert_eq!(safe_callback("https://evil.test"), None);
    }

    #[test]
    fn test_placeholder_avatar_uses_uppercase_initial() {
        assert_eq!(
            placeholder_avatar("budi"),
            "https://placehold.co/200x200/E2E8F0/4A5568?text=B"
        );
    }
}
