//! Conversation and history handlers

use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::Result;
use crate::models::{Conversation, Message};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct OpenConversationRequest {
    pub peer_id: String,
}

/// GET /conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<Vec<Conversation>>> {
    info!("GET /conversations - {}", ctx.id());
    Ok(Json(state.messaging.list_conversations(ctx.id()).await?))
}

/// POST /conversations
pub async fn open_conversation(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(req): Json<OpenConversationRequest>,
) -> Result<Json<Conversation>> {
    info!("POST /conversations - {} with {}", ctx.id(), req.peer_id);
    Ok(Json(
        state.messaging.open_conversation(ctx.id(), &req.peer_id).await?,
    ))
}

/// GET /conversations/{id}/messages
pub async fn list_messages(
    Path(conversation_id): Path<String>,
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<Vec<Message>>> {
    info!("GET /conversations/{}/messages", conversation_id);
    Ok(Json(
        state.messaging.list_messages(ctx.id(), &conversation_id).await?,
    ))
}
