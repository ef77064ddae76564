//! MentorLink realtime coordination layer
//!
//! Presence-tracked messaging with delivery status, best-effort notification
//! fan-out, and a booking arbiter that keeps a mentor's slot from being
//! confirmed twice.

pub mod audit;
pub mod auth;
pub mod booking;
pub mod chat;
pub mod config;
pub mod ctx;
pub mod error;
pub mod handlers;
pub mod mail;
pub mod models;
pub mod notifications;
pub mod presence;
pub mod protocol;
pub mod router;
pub mod store;

pub use config::{AppState, ServerConfig};
pub use error::{Error, Result};

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Later calls are ignored.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    info!("=== MentorLink Realtime Server ===");

    let config = ServerConfig::default();
    info!("Database: {}", config.database_url);

    let state = AppState::build(config.clone()).await?;
    info!("Store, presence, messaging, notifications and booking initialized");

    let app = router::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
