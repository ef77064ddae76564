//! Socket event taxonomy
//!
//! Every frame is a JSON object tagged by `type`. Client requests may carry a
//! `request_id` which is echoed back in the matching `ack`.

use crate::error::{Error, ErrorBody};
use crate::models::{DeleteMode, Message, MessageStatus, Notification};
use serde::{Deserialize, Serialize};

/// Events sent by a connected client
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    MessageSend {
        #[serde(default)]
        request_id: Option<String>,
        conversation: String,
        to: String,
        body: String,
    },
    MessageMark {
        #[serde(default)]
        request_id: Option<String>,
        message_id: String,
        status: MessageStatus,
    },
    MessageDelete {
        #[serde(default)]
        request_id: Option<String>,
        message_id: String,
        mode: DeleteMode,
    },
    Typing {
        to: String,
        conversation: String,
        typing: bool,
    },
}

/// Events pushed to a connected client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    PresenceSnapshot {
        online: Vec<String>,
    },
    PresenceChanged {
        identity: String,
        online: bool,
    },
    Ack {
        #[serde(skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<Message>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<ErrorBody>,
    },
    MessageNew {
        message: Message,
    },
    MessageUpdate {
        message_id: String,
        conversation: String,
        status: MessageStatus,
    },
    MessageDeleted {
        message_id: String,
        conversation: String,
        mode: DeleteMode,
    },
    Typing {
        from: String,
        conversation: String,
        typing: bool,
    },
    NotificationCreated {
        notification: Notification,
    },
}

impl ServerEvent {
    pub fn ack(request_id: Option<String>, result: Result<Message, Error>) -> Self {
        match result {
            Ok(message) => ServerEvent::Ack {
                request_id,
                ok: true,
                message: Some(message),
                error: None,
            },
            Err(e) => ServerEvent::Ack {
                request_id,
                ok: false,
                message: None,
                error: Some(e.body()),
            },
        }
    }
}
