//! Server configuration and shared state

use std::sync::Arc;

use tracing::warn;

use crate::audit::{AuditLog, TracingAuditLog};
use crate::auth::Authenticator;
use crate::booking::{BookingArbiter, SlotPolicy};
use crate::chat::MessagingChannel;
use crate::mail::{LogMailer, Mailer};
use crate::notifications::NotificationFanout;
use crate::presence::PresenceRegistry;
use crate::store::SqliteStore;

const DEV_JWT_SECRET: &str = "mentorlink-development-secret";

/// Configuration for the MentorLink realtime server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address the HTTP/WebSocket listener binds to
    pub bind_addr: String,
    /// sqlx SQLite connection URL
    pub database_url: String,
    /// HMAC secret used to sign and verify credentials
    pub jwt_secret: String,
    /// Lifetime of issued credentials, in seconds
    pub token_ttl_secs: i64,
    /// Whether a request for an already-confirmed slot is refused up front
    pub slot_policy: SlotPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: std::env::var("MENTORLINK_BIND")
                .unwrap_or_else(|_| "0.0.0.0:3001".to_string()),
            database_url: std::env::var("MENTORLINK_DB")
                .unwrap_or_else(|_| "sqlite:mentorlink.sqlite".to_string()),
            jwt_secret: std::env::var("MENTORLINK_JWT_SECRET").unwrap_or_else(|_| {
                warn!("MENTORLINK_JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }),
            token_ttl_secs: std::env::var("MENTORLINK_TOKEN_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(86_400),
            slot_policy: std::env::var("MENTORLINK_SLOT_POLICY")
                .ok()
                .and_then(|s| match s.parse() {
                    Ok(policy) => Some(policy),
                    Err(e) => {
                        warn!("Ignoring MENTORLINK_SLOT_POLICY: {}", e);
                        None
                    }
                })
                .unwrap_or_default(),
        }
    }
}

impl ServerConfig {
    /// Config for a database at `database_url`, everything else from the environment
    pub fn with_database(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_ttl_secs)
    }
}

/// App state shared across all handlers and connections
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub store: SqliteStore,
    pub presence: PresenceRegistry,
    pub auth: Arc<Authenticator>,
    pub messaging: Arc<MessagingChannel>,
    pub notifications: Arc<NotificationFanout>,
    pub booking: Arc<BookingArbiter>,
}

impl AppState {
    /// Open the store and wire every component with the default collaborators
    pub async fn build(config: ServerConfig) -> crate::error::Result<Self> {
        let store = SqliteStore::open(&config.database_url).await?;
        Ok(Self::with_collaborators(
            config,
            store,
            Arc::new(LogMailer),
            Arc::new(TracingAuditLog),
        ))
    }

    pub fn with_collaborators(
        config: ServerConfig,
        store: SqliteStore,
        mailer: Arc<dyn Mailer>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        let presence = PresenceRegistry::new();
        let auth = Arc::new(Authenticator::new(
            store.clone(),
            config.jwt_secret.as_bytes(),
            config.token_ttl(),
        ));
        let messaging = Arc::new(MessagingChannel::new(store.clone(), presence.clone()));
        let notifications = Arc::new(NotificationFanout::new(store.clone(), presence.clone()));
        let booking = Arc::new(BookingArbiter::new(
            store.clone(),
            messaging.clone(),
            notifications.clone(),
            mailer,
            audit,
            config.slot_policy,
        ));

        Self {
            config,
            store,
            presence,
            auth,
            messaging,
            notifications,
            booking,
        }
    }
}
