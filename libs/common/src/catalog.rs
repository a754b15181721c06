//! Read-only catalog fetchers
//!
//! Banners, categories, promos and activities are passed through from the
//! upstream API. Any failure collapses to `None`; pages treat that as
//! "nothing to show".

use serde_json::Value;
use tracing::warn;

use crate::upstream::ApiClient;

/// Catalog reader backed by the upstream API
#[derive(Clone)]
pub struct Catalog {
    client: ApiClient,
}

impl Catalog {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn fetch(&self, segments: &[&str]) -> Option<Value> {
        match self.client.get_json(segments).await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("Catalog fetch of /{} failed: {}", segments.join("/"), e);
                None
            }
        }
    }

    pub async fn banners(&self) -> Option<Value> {
        self.fetch(&["banners"]).await
    }

    pub async fn banner(&self, id: &str) -> Option<Value> {
        self.fetch(&["banner", id]).await
    }

    pub async fn categories(&self) -> Option<Value> {
        self.fetch(&["categories"]).await
    }

    pub async fn category(&self, id: &str) -> Option<Value> {
        self.fetch(&["category", id]).await
    }

    pub async fn activities_by_category(&self, id: &str) -> Option<Value> {
        self.fetch(&["activities-by-category", id]).await
    }

    pub async fn promos(&self) -> Option<Value> {
        self.fetch(&["promos"]).await
    }

    pub async fn promo(&self, id: &str) -> Option<Value> {
        self.fetch(&["promo", id]).await
    }

    pub async fn activities(&self) -> Option<Value> {
        self.fetch(&["activities"]).await
    }

    pub async fn activity(&self, id: &str) -> Option<Value> {
        self.fetch(&["activity", id]).await
    }
}
