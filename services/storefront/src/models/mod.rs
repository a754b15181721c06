//! Storefront models

pub mod auth_result;
pub mod credentials;
pub mod role;
pub mod session;

// Re-export for convenience
pub use auth_result::AuthResult;
pub use credentials::{LoginCredentials, LoginForm, RegisterForm, Registration};
pub use role::Role;
pub use session::{Session, SessionStatus, SessionUser};
