//! Booking boundary: create, list, transition and review sessions

use crate::booking::BookingRequest;
use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::Result;
use crate::models::{Session, SessionStatus};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: SessionStatus,
    #[serde(default)]
    pub meeting_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewInput {
    pub rating: i64,
    #[serde(default)]
    pub review: Option<String>,
}

/// POST /sessions
pub async fn book_session(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(req): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Session>)> {
    info!(
        "POST /sessions - {} books {} at {} {}",
        ctx.id(),
        req.mentor_id,
        req.date,
        req.time
    );
    let session = state.booking.book_slot(ctx.identity(), req).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /sessions
pub async fn list_sessions(State(state): State<AppState>, ctx: Ctx) -> Result<Json<Vec<Session>>> {
    info!("GET /sessions - {}", ctx.id());
    Ok(Json(state.booking.list_sessions(ctx.identity()).await?))
}

/// PATCH /sessions/{id}/status
pub async fn update_status(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    ctx: Ctx,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Session>> {
    info!(
        "PATCH /sessions/{}/status - {} -> {}",
        session_id,
        ctx.id(),
        update.status
    );
    let session = state
        .booking
        .update_status(ctx.identity(), &session_id, update.status, update.meeting_link)
        .await?;
    Ok(Json(session))
}

/// POST /sessions/{id}/review
pub async fn submit_review(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    ctx: Ctx,
    Json(input): Json<ReviewInput>,
) -> Result<Json<Session>> {
    info!("POST /sessions/{}/review - {}", session_id, ctx.id());
    let session = state
        .booking
        .submit_review(ctx.identity(), &session_id, input.rating, input.review)
        .await?;
    Ok(Json(session))
}
