//! Messaging Channel
//!
//! Message creation, delivery-status transitions, deletion and typing
//! signals. Messages are persisted before any push; a push only ever
//! advances state that is already durable.

use crate::error::{Error, Result};
use crate::models::{Conversation, DeleteMode, Message, MessageStatus};
use crate::presence::PresenceRegistry;
use crate::protocol::ServerEvent;
use crate::store::SqliteStore;
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Longest accepted message body, in characters
pub const MAX_BODY_CHARS: usize = 4000;

pub struct MessagingChannel {
    store: SqliteStore,
    presence: PresenceRegistry,
}

impl MessagingChannel {
    pub fn new(store: SqliteStore, presence: PresenceRegistry) -> Self {
        Self { store, presence }
    }

    /// Locate or create the canonical conversation between `caller` and `peer`
    pub async fn open_conversation(&self, caller: &str, peer: &str) -> Result<Conversation> {
        let peer = peer.trim();
        if peer.is_empty() {
            return Err(Error::Validation("peer is required".into()));
        }
        if peer == caller {
            return Err(Error::Validation("cannot open a conversation with yourself".into()));
        }
        if self.store.find_identity(peer).await?.is_none() {
            return Err(Error::NotFound(format!("identity {}", peer)));
        }
        self.store.locate_or_create_conversation(caller, peer).await
    }

    pub async fn list_conversations(&self, caller: &str) -> Result<Vec<Conversation>> {
        self.store.list_conversations(caller).await
    }

    /// History as the caller sees it: messages they hid are left out
    pub async fn list_messages(&self, caller: &str, conversation_id: &str) -> Result<Vec<Message>> {
        let conversation = self.participant_conversation(caller, conversation_id).await?;
        self.store.list_messages(&conversation.id, caller).await
    }

    /// Persist a message from `sender` and deliver it if the recipient is online
    pub async fn send_message(
        &self,
        sender: &str,
        conversation_id: &str,
        recipient: &str,
        body: &str,
    ) -> Result<Message> {
        if conversation_id.trim().is_empty() {
            return Err(Error::Validation("conversation is required".into()));
        }
        if recipient.trim().is_empty() {
            return Err(Error::Validation("recipient is required".into()));
        }
        let body = body.trim();
        if body.is_empty() {
            return Err(Error::Validation("message body is empty".into()));
        }
        if body.chars().count() > MAX_BODY_CHARS {
            return Err(Error::Validation(format!(
                "message body exceeds {} characters",
                MAX_BODY_CHARS
            )));
        }

        let conversation = self.participant_conversation(sender, conversation_id).await?;
        if conversation.counterpart(sender) != Some(recipient) {
            return Err(Error::Validation(
                "recipient is not the other participant of this conversation".into(),
            ));
        }

        let message = new_message(&conversation.id, sender, recipient, body, false);
        self.persist_and_deliver(message).await
    }

    /// Append a platform-authored message, e.g. the seed of a booking thread
    pub async fn post_system_message(
        &self,
        conversation: &Conversation,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<Message> {
        let message = new_message(&conversation.id, from, to, body, true);
        self.persist_and_deliver(message).await
    }

    async fn persist_and_deliver(&self, mut message: Message) -> Result<Message> {
        self.store.insert_message(&message).await?;
        self.store
            .touch_conversation(&message.conversation_id, Some(&message.id), message.created_at)
            .await?;

        let pushed = self.presence.push_to(
            &message.recipient_id,
            ServerEvent::MessageNew {
                message: message.clone(),
            },
        );
        if pushed
            && self
                .store
                .advance_message_status(&message.id, MessageStatus::Delivered)
                .await?
        {
            message.status = MessageStatus::Delivered;
        }

        debug!(
            "[Chat] {} -> {} in {} ({})",
            message.sender_id,
            message.recipient_id,
            message.conversation_id,
            message.status.as_str()
        );
        Ok(message)
    }

    /// Recipient acknowledgement. Status only ever moves forward.
    pub async fn mark_message(
        &self,
        caller: &str,
        message_id: &str,
        status: MessageStatus,
    ) -> Result<Message> {
        let message = self.find_message(message_id).await?;

        if message.recipient_id != caller {
            return Err(Error::Authorization(
                "only the recipient can acknowledge a message".into(),
            ));
        }
        if status <= message.status {
            return Err(Error::Conflict(format!(
                "message is already {}",
                message.status.as_str()
            )));
        }

        if !self.store.advance_message_status(&message.id, status).await? {
            // Someone else moved it first; report what it is now.
            let current = self.find_message(message_id).await?;
            return Err(Error::Conflict(format!(
                "message is already {}",
                current.status.as_str()
            )));
        }

        self.presence.push_to(
            &message.sender_id,
            ServerEvent::MessageUpdate {
                message_id: message.id.clone(),
                conversation: message.conversation_id.clone(),
                status,
            },
        );

        Ok(Message { status, ..message })
    }

    /// `Everyone` tombstones the message for both parties (sender only);
    /// `Me` hides it from the caller's view alone.
    pub async fn delete_message(
        &self,
        caller: &str,
        message_id: &str,
        mode: DeleteMode,
    ) -> Result<Message> {
        let message = self.find_message(message_id).await?;
        if message.sender_id != caller && message.recipient_id != caller {
            return Err(Error::Authorization("not a participant of this message".into()));
        }

        match mode {
            DeleteMode::Everyone => {
                if message.system {
                    return Err(Error::Authorization(
                        "system messages cannot be deleted for everyone".into(),
                    ));
                }
                if message.sender_id != caller {
                    return Err(Error::Authorization(
                        "only the sender can delete a message for everyone".into(),
                    ));
                }
                if !self.store.tombstone_message(&message.id, caller).await? {
                    return Err(Error::NotFound(format!("message {}", message_id)));
                }

                let event = ServerEvent::MessageDeleted {
                    message_id: message.id.clone(),
                    conversation: message.conversation_id.clone(),
                    mode,
                };
                self.presence.push_to(&message.sender_id, event.clone());
                self.presence.push_to(&message.recipient_id, event);

                info!("[Chat] {} deleted {} for everyone", caller, message.id);
                self.find_message(message_id).await
            }
            DeleteMode::Me => {
                self.store.hide_message(&message.id, caller).await?;
                self.find_message(message_id).await
            }
        }
    }

    /// Ephemeral; forwarded only when `to` is `from`'s counterpart in
    /// `conversation` and is online. Returns whether it was.
    pub async fn typing(
        &self,
        from: &str,
        to: &str,
        conversation_id: &str,
        is_typing: bool,
    ) -> Result<bool> {
        let Some(conversation) = self.store.find_conversation(conversation_id).await? else {
            debug!("[Chat] Typing for unknown conversation {} dropped", conversation_id);
            return Ok(false);
        };
        if conversation.counterpart(from) != Some(to) {
            debug!("[Chat] Typing from {} to {} outside {} dropped", from, to, conversation_id);
            return Ok(false);
        }
        Ok(self.presence.push_to(
            to,
            ServerEvent::Typing {
                from: from.to_string(),
                conversation: conversation.id,
                typing: is_typing,
            },
        ))
    }

    async fn find_message(&self, message_id: &str) -> Result<Message> {
        self.store
            .find_message(message_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("message {}", message_id)))
    }

    async fn participant_conversation(
        &self,
        caller: &str,
        conversation_id: &str,
    ) -> Result<Conversation> {
        let conversation = self
            .store
            .find_conversation(conversation_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("conversation {}", conversation_id)))?;

        if !conversation.includes(caller) {
            warn!("[Chat] {} is not in conversation {}", caller, conversation_id);
            return Err(Error::Authorization("not a participant of this conversation".into()));
        }
        Ok(conversation)
    }
}

fn new_message(conversation_id: &str, sender: &str, recipient: &str, body: &str, system: bool) -> Message {
    Message {
        id: Uuid::new_v4().to_string(),
        conversation_id: conversation_id.to_string(),
        sender_id: sender.to_string(),
        recipient_id: recipient.to_string(),
        body: body.to_string(),
        status: MessageStatus::Sent,
        hidden_for: Vec::new(),
        deleted: false,
        system,
        created_at: Utc::now(),
    }
}
