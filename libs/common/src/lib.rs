//! Common library for the storefront
//!
//! This crate provides shared functionality used by the storefront service,
//! including configuration loading, the upstream REST API client, catalog
//! fetchers, and error handling.

pub mod catalog;
pub mod error;
pub mod settings;
pub mod upstream;

/// Example usage of the upstream client
///
/// ```rust,no_run
/// use common::{settings::StorefrontConfig, upstream::ApiClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = StorefrontConfig::from_env()?;
///     let client = ApiClient::new(&config.api)?;
///     let banners = common::catalog::Catalog::new(client).banners().await;
///     println!("Banners: {:?}", banners);
///     Ok(())
/// }
/// ```
///
/// Submitting credentials to the identity API:
///
/// ```rust,no_run
/// use common::{error::UpstreamError, settings::StorefrontConfig, upstream::ApiClient};
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = StorefrontConfig::from_env()?;
///     let client = ApiClient::new(&config.api)?;
///     let credentials = json!({ "email": "ana@example.com", "password": "secret1" });
///
///     match client.post_json(&["login"], &credentials, None).await {
///         Ok(body) => println!("Token: {}", body["token"]),
///         Err(UpstreamError::Status { code: 401, .. }) => println!("Wrong credentials"),
///         Err(e) => return Err(e.into()),
///     }
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
