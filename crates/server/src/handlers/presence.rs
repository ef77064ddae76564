use crate::config::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PresenceList {
    pub online: Vec<String>,
}

/// GET /presence
pub async fn get_presence(State(state): State<AppState>) -> Json<PresenceList> {
    Json(PresenceList {
        online: state.presence.online(),
    })
}
