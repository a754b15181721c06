//! Storefront configuration
//!
//! Settings are read from environment variables through the `config` crate.
//! The upstream API key has no fallback: a missing key is a startup failure.

use ::config::{Config, Environment};
use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Upstream API used when `API_BASE_URL` is not set
pub const DEFAULT_API_BASE_URL: &str = "https://travel-journal-api-bootcamp.do.dibimbing.id/api/v1";

/// Address the storefront binds to when `LISTEN_ADDR` is not set
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Connection settings for the upstream REST API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint is appended to
    pub base_url: Url,
    /// Value of the `apiKey` header
    pub api_key: String,
}

/// Storefront configuration
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub api: ApiConfig,
    /// Whether cookies must carry the `Secure` flag
    pub production: bool,
    pub listen_addr: String,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    api_base_url: String,
    #[serde(default)]
    api_key: Option<String>,
    app_env: String,
    listen_addr: String,
}

impl StorefrontConfig {
    /// Create a new StorefrontConfig from environment variables
    ///
    /// # Environment Variables
    /// - `API_BASE_URL`: Upstream base URL (default: the bootcamp travel API)
    /// - `API_KEY`: Upstream API key (required)
    /// - `APP_ENV`: `production` enables secure cookies (default: "development")
    /// - `LISTEN_ADDR`: Bind address (default: "0.0.0.0:3000")
    pub fn from_env() -> ConfigResult<Self> {
        let raw: RawConfig = Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("app_env", "development")?
            .set_default("listen_addr", DEFAULT_LISTEN_ADDR)?
            .add_source(Environment::default())
            .build()?
            .try_deserialize()?;

        let api_key = raw
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = parse_base_url(&raw.api_base_url)?;

        Ok(StorefrontConfig {
            api: ApiConfig { base_url, api_key },
            production: raw.app_env.trim().eq_ignore_ascii_case("production"),
            listen_addr: raw.listen_addr,
        })
    }

    /// Log the resolved settings without exposing the API key
    pub fn log_summary(&self) {
        info!("API base URL: {}", self.api.base_url);
        info!("API key: set");
        info!(
            "Environment: {}",
            if self.production {
                "production"
            } else {
                "development"
            }
        );
    }
}

/// Parse a base URL, rejecting URLs that cannot take path segments
pub fn parse_base_url(raw: &str) -> ConfigResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }

    Ok(url)
}
