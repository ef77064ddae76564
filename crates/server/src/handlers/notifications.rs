//! Notification handlers

use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::Result;
use crate::models::Notification;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    pub unread: i64,
}

#[derive(Debug, Serialize)]
pub struct Affected {
    pub affected: u64,
}

/// GET /notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<NotificationList>> {
    info!("GET /notifications - {}", ctx.id());
    let notifications = state.notifications.list(ctx.id()).await?;
    let unread = state.notifications.unread_count(ctx.id()).await?;
    Ok(Json(NotificationList {
        notifications,
        unread,
    }))
}

/// POST /notifications/{id}/read
pub async fn mark_read(
    Path(notification_id): Path<String>,
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<Notification>> {
    info!("POST /notifications/{}/read", notification_id);
    Ok(Json(
        state.notifications.mark_read(&notification_id, ctx.id()).await?,
    ))
}

/// POST /notifications/read-all
pub async fn mark_all_read(State(state): State<AppState>, ctx: Ctx) -> Result<Json<Affected>> {
    info!("POST /notifications/read-all - {}", ctx.id());
    let affected = state.notifications.mark_all_read(ctx.id()).await?;
    Ok(Json(Affected { affected }))
}

/// DELETE /notifications
pub async fn clear_notifications(
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<Affected>> {
    info!("DELETE /notifications - {}", ctx.id());
    let affected = state.notifications.clear(ctx.id()).await?;
    Ok(Json(Affected { affected }))
}
