//! Connection handshake and steady-state event exchange
//!
//! The credential is verified before the upgrade, so a refused handshake never
//! touches the presence registry. After the upgrade the connection registers,
//! drains its outbound queue on a writer task, and dispatches inbound frames.

use crate::auth::middleware::bearer_token;
use crate::config::AppState;
use crate::error::{Error, Result};
use crate::models::Identity;
use crate::presence::ConnectionHandle;
use crate::protocol::{ClientEvent, ServerEvent};
use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message as WsMessage, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: Option<String>,
}

/// GET /ws
pub async fn ws_handler(
    Query(params): Query<WsParams>,
    headers: HeaderMap,
    State(state): State<AppState>,
    upgrade: std::result::Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response> {
    let credential = match params.token {
        Some(token) => Some(token),
        None => bearer_token(&headers)?.map(str::to_string),
    };

    let identity = match state.auth.authenticate(credential.as_deref()).await {
        Ok(identity) => identity,
        Err(e) => {
            warn!("[Socket] Handshake refused: {}", e);
            return Err(e);
        }
    };

    let ws = match upgrade {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    info!("[Socket] {} connecting", identity.id);
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, identity)))
}

async fn handle_socket(socket: WebSocket, state: AppState, identity: Identity) {
    let (mut sink, mut stream) = socket.split();
    let (handle, mut outbound) = ConnectionHandle::new();
    let connection = handle.id();

    handle.push(ServerEvent::PresenceSnapshot {
        online: state.presence.online(),
    });
    state.presence.register(&identity.id, handle.clone());

    let writer = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!("[Socket] Failed to encode event: {}", e);
                    continue;
                }
            };
            if sink.send(WsMessage::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => {
                if let Some(reply) = dispatch(&state, &identity, text.as_str()).await {
                    handle.push(reply);
                }
            }
            Ok(WsMessage::Binary(_)) => {
                handle.push(ServerEvent::ack(
                    None,
                    Err(Error::Validation("binary frames are not supported".into())),
                ));
            }
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("[Socket] {} read error: {}", identity.id, e);
                break;
            }
        }
    }

    state.presence.deregister(&identity.id, connection);
    writer.abort();
    info!("[Socket] {} disconnected", identity.id);
}

/// Handle one inbound frame from `identity`. Returns the reply for the
/// caller's own connection, if the event calls for one.
pub async fn dispatch(state: &AppState, identity: &Identity, raw: &str) -> Option<ServerEvent> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            return Some(ServerEvent::ack(
                None,
                Err(Error::Validation(format!("malformed frame: {}", e))),
            ))
        }
    };
    let request_id = value
        .get("request_id")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let event: ClientEvent = match serde_json::from_value(value) {
        Ok(event) => event,
        Err(e) => {
            return Some(ServerEvent::ack(
                request_id,
                Err(Error::Validation(format!("malformed event: {}", e))),
            ))
        }
    };

    match event {
        ClientEvent::MessageSend {
            request_id,
            conversation,
            to,
            body,
        } => {
            let result = state
                .messaging
                .send_message(&identity.id, &conversation, &to, &body)
                .await;
            Some(ServerEvent::ack(request_id, result))
        }
        ClientEvent::MessageMark {
            request_id,
            message_id,
            status,
        } => {
            let result = state
                .messaging
                .mark_message(&identity.id, &message_id, status)
                .await;
            Some(ServerEvent::ack(request_id, result))
        }
        ClientEvent::MessageDelete {
            request_id,
            message_id,
            mode,
        } => {
            let result = state
                .messaging
                .delete_message(&identity.id, &message_id, mode)
                .await;
            Some(ServerEvent::ack(request_id, result))
        }
        ClientEvent::Typing {
            to,
            conversation,
            typing,
        } => {
            if let Err(e) = state
                .messaging
                .typing(&identity.id, &to, &conversation, typing)
                .await
            {
                debug!("[Socket] Typing from {} failed: {}", identity.id, e);
            }
            None
        }
    }
}
