//! HTTP surface
//!
//! `/ws` authenticates during its own handshake; every other route except
//! `/health` sits behind the bearer-token middleware.

use crate::auth::middleware::mw_require_auth;
use crate::config::AppState;
use crate::handlers::{self, ws_handler};
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/presence", get(handlers::get_presence))
        .route(
            "/conversations",
            get(handlers::list_conversations).post(handlers::open_conversation),
        )
        .route("/conversations/{id}/messages", get(handlers::list_messages))
        .route(
            "/notifications",
            get(handlers::list_notifications).delete(handlers::clear_notifications),
        )
        .route("/notifications/read-all", post(handlers::mark_all_read))
        .route("/notifications/{id}/read", post(handlers::mark_read))
        .route(
            "/sessions",
            get(handlers::list_sessions).post(handlers::book_session),
        )
        .route("/sessions/{id}/status", patch(handlers::update_status))
        .route("/sessions/{id}/review", post(handlers::submit_review))
        .route_layer(middleware::from_fn_with_state(state.clone(), mw_require_auth));

    Router::new()
        .route("/health", get(health_check))
        .route("/ws", get(ws_handler))
        .merge(protected)
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK - MentorLink realtime server"
}
