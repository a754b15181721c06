//! Custom error types for the common library
//!
//! This module defines the errors raised while loading configuration and
//! while talking to the upstream REST API.

use thiserror::Error;

/// Custom error type for configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration sources could not be read or deserialized
    #[error("Configuration load error: {0}")]
    Load(#[from] ::config::ConfigError),

    /// The upstream API key is absent or empty
    #[error("API_KEY must be set")]
    MissingApiKey,

    /// The upstream base URL cannot be used as a base
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Custom error type for upstream API calls
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The upstream answered outside the success range
    #[error("Upstream returned {code}: {message}")]
    Status { code: u16, message: String },

    /// The request never produced a response
    #[error("Upstream unreachable: {0}")]
    Network(#[source] reqwest::Error),

    /// The response body was not what we expected
    #[error("Upstream response could not be decoded: {0}")]
    Decode(String),

    /// The endpoint URL could not be built
    #[error("Invalid upstream URL: {0}")]
    Url(String),
}

impl UpstreamError {
    /// HTTP status code reported by the upstream, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Type alias for Result with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Type alias for Result with UpstreamError
pub type UpstreamResult<T> = Result<T, UpstreamError>;
