//! Application state shared across handlers

use std::sync::Arc;

use common::{
    catalog::Catalog, error::UpstreamResult, settings::StorefrontConfig, upstream::ApiClient,
};

use crate::{actions::AuthActions, middleware::RouteGuard, session::CookiePolicy};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub actions: AuthActions,
    pub catalog: Catalog,
    pub cookies: CookiePolicy,
    pub guard: Arc<RouteGuard>,
}

impl AppState {
    pub fn new(config: &StorefrontConfig) -> UpstreamResult<Self> {
        let client = ApiClient::new(&config.api)?;

        Ok(Self {
            actions: AuthActions::new(client.clone()),
            catalog: Catalog::new(client),
            cookies: CookiePolicy::new(config.production),
            guard: Arc::new(RouteGuard::default()),
        })
    }
}
