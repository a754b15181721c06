use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod actions;
mod error;
mod middleware;
mod models;
mod routes;
mod session;
mod state;
mod validation;

use common::settings::StorefrontConfig;

pub use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting storefront service");

    // Missing API key aborts startup
    let config = StorefrontConfig::from_env()?;
    config.log_summary();

    let app_state = AppState::new(&config)?;

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Storefront service listening on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
