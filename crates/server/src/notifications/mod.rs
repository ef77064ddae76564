//! Notification Fan-out
//!
//! Persist first, then push to the owner's live connection if there is one.
//! The stored record is authoritative; a missed push is picked up by listing.

use crate::error::{Error, Result};
use crate::models::{NewNotification, Notification};
use crate::presence::PresenceRegistry;
use crate::protocol::ServerEvent;
use crate::store::SqliteStore;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

pub struct NotificationFanout {
    store: SqliteStore,
    presence: PresenceRegistry,
}

impl NotificationFanout {
    pub fn new(store: SqliteStore, presence: PresenceRegistry) -> Self {
        Self { store, presence }
    }

    /// Persist a notification (unread) and attempt a direct push to its owner
    pub async fn create(&self, input: NewNotification) -> Result<Notification> {
        if input.owner_id.trim().is_empty() {
            return Err(Error::Validation("notification owner is required".into()));
        }
        if input.title.trim().is_empty() {
            return Err(Error::Validation("notification title is required".into()));
        }

        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            owner_id: input.owner_id,
            title: input.title,
            body: input.body,
            link: input.link,
            kind: input.kind,
            read: false,
            metadata: input.metadata,
            created_at: Utc::now(),
        };
        self.store.insert_notification(&notification).await?;

        let pushed = self.presence.push_to(
            &notification.owner_id,
            ServerEvent::NotificationCreated {
                notification: notification.clone(),
            },
        );
        debug!(
            "[Notify] {} for {} (pushed: {})",
            notification.kind, notification.owner_id, pushed
        );

        Ok(notification)
    }

    /// Newest first
    pub async fn list(&self, caller: &str) -> Result<Vec<Notification>> {
        self.store.list_notifications(caller).await
    }

    pub async fn unread_count(&self, caller: &str) -> Result<i64> {
        self.store.unread_notifications(caller).await
    }

    /// Only the owner may mark a notification read
    pub async fn mark_read(&self, id: &str, caller: &str) -> Result<Notification> {
        let notification = self
            .store
            .find_notification(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("notification {}", id)))?;

        if notification.owner_id != caller {
            return Err(Error::Authorization(
                "notification belongs to another identity".into(),
            ));
        }

        if !self.store.mark_notification_read(id, caller).await? {
            // Cleared between the lookup and the update
            return Err(Error::NotFound(format!("notification {}", id)));
        }
        Ok(Notification {
            read: true,
            ..notification
        })
    }

    /// Returns how many notifications changed
    pub async fn mark_all_read(&self, caller: &str) -> Result<u64> {
        let changed = self.store.mark_all_notifications_read(caller).await?;
        debug!("[Notify] {} marked {} read", caller, changed);
        Ok(changed)
    }

    /// Delete every notification the caller owns. Returns how many were removed.
    pub async fn clear(&self, caller: &str) -> Result<u64> {
        let removed = self.store.clear_notifications(caller).await?;
        info!("[Notify] {} cleared {} notifications", caller, removed);
        Ok(removed)
    }
}
