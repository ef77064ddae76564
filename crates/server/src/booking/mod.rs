//! Booking Arbiter
//!
//! Creates sessions and drives their status machine. Competing pending
//! requests for one slot may coexist; arbitration happens when a session is
//! confirmed, and the store's conditional update is what finally decides it.
//! [`SlotPolicy::RejectConfirmed`] additionally refuses requests for a slot
//! that is already confirmed.

use crate::audit::{self, AuditEntry, AuditLog};
use crate::chat::MessagingChannel;
use crate::error::{Error, Result};
use crate::mail::{self, Mailer, OutboundMail};
use crate::models::{Identity, NewNotification, Role, ServiceDetails, Session, SessionStatus, Slot};
use crate::notifications::NotificationFanout;
use crate::store::SqliteStore;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// When a request for an already-confirmed slot is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotPolicy {
    /// Accept the request as pending; it collides only if someone tries to confirm it
    #[default]
    DeferToConfirmation,
    /// Refuse the request up front while another session holds the slot
    RejectConfirmed,
}

impl FromStr for SlotPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "defer" => Ok(SlotPolicy::DeferToConfirmation),
            "reject-confirmed" => Ok(SlotPolicy::RejectConfirmed),
            other => Err(Error::Validation(format!("unknown slot policy '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub mentor_id: String,
    pub date: String,
    pub time: String,
    pub service: ServiceDetails,
}

pub struct BookingArbiter {
    store: SqliteStore,
    messaging: Arc<MessagingChannel>,
    notifications: Arc<NotificationFanout>,
    mailer: Arc<dyn Mailer>,
    audit: Arc<dyn AuditLog>,
    policy: SlotPolicy,
}

impl BookingArbiter {
    pub fn new(
        store: SqliteStore,
        messaging: Arc<MessagingChannel>,
        notifications: Arc<NotificationFanout>,
        mailer: Arc<dyn Mailer>,
        audit: Arc<dyn AuditLog>,
        policy: SlotPolicy,
    ) -> Self {
        Self {
            store,
            messaging,
            notifications,
            mailer,
            audit,
            policy,
        }
    }

    /// Request a session with a mentor. Any failed check aborts before anything is written.
    pub async fn book_slot(&self, mentee: &Identity, request: BookingRequest) -> Result<Session> {
        let slot = Slot::parse(&request.date, &request.time)?;
        request.service.validate()?;

        let mentor = self
            .store
            .find_identity(&request.mentor_id)
            .await?
            .filter(|identity| identity.role == Role::Mentor)
            .ok_or_else(|| Error::NotFound(format!("mentor {}", request.mentor_id)))?;

        if mentor.id == mentee.id {
            return Err(Error::Validation("cannot book a session with yourself".into()));
        }

        if self
            .store
            .find_active_request(&mentor.id, &mentee.id, &slot)
            .await?
            .is_some()
        {
            return Err(Error::Conflict(format!(
                "you already have an open request for {}",
                slot
            )));
        }

        // Other mentees' pending requests never block. A confirmed one blocks only
        // under RejectConfirmed; otherwise the collision is settled at confirmation.
        if self.policy == SlotPolicy::RejectConfirmed
            && self.store.find_confirmed(&mentor.id, &slot).await?.is_some()
        {
            return Err(Error::Conflict(format!("slot {} is already booked", slot)));
        }

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            mentor_id: mentor.id.clone(),
            mentee_id: mentee.id.clone(),
            slot,
            service: ServiceDetails {
                title: request.service.title.trim().to_string(),
                ..request.service
            },
            status: SessionStatus::Pending,
            meeting_link: None,
            rating: None,
            review: None,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_session(&session).await?;

        info!(
            "[Booking] {} requested {} with {} at {}",
            mentee.id, session.id, mentor.id, session.slot
        );

        if let Err(e) = self.seed_conversation(&session).await {
            warn!("[Booking] Seed conversation for {} failed: {}", session.id, e);
        }

        self.notify(
            &session.mentor_id,
            "New session request",
            format!(
                "{} requested \"{}\" on {}",
                mentee.display_name, session.service.title, session.slot
            ),
            "session_request",
            &session,
        )
        .await;

        mail::dispatch(
            &self.mailer,
            OutboundMail {
                to_identity: session.mentor_id.clone(),
                subject: "New session request".into(),
                body: format!(
                    "{} requested \"{}\" on {}.",
                    mentee.display_name, session.service.title, session.slot
                ),
            },
        );
        audit::record(
            &self.audit,
            AuditEntry::new(
                &mentee.id,
                "session.book",
                &session.id,
                json!({ "mentor": session.mentor_id, "slot": session.slot }),
            ),
        );

        Ok(session)
    }

    /// Locate-or-create the pair's conversation and drop a summary of the request in it
    async fn seed_conversation(&self, session: &Session) -> Result<()> {
        let conversation = self
            .store
            .locate_or_create_conversation(&session.mentor_id, &session.mentee_id)
            .await?;

        let summary = format!(
            "Session request: \"{}\" on {} at {} ({} min, {:.2})",
            session.service.title,
            session.slot.date,
            session.slot.time,
            session.service.duration_minutes,
            session.service.price
        );
        self.messaging
            .post_system_message(&conversation, &session.mentee_id, &session.mentor_id, &summary)
            .await?;
        Ok(())
    }

    /// Apply a status transition on behalf of `caller`.
    ///
    /// Mentor or admin may confirm, complete or cancel; the mentee may only cancel.
    pub async fn update_status(
        &self,
        caller: &Identity,
        session_id: &str,
        next: SessionStatus,
        meeting_link: Option<String>,
    ) -> Result<Session> {
        let session = self.find_session(session_id).await?;

        let is_mentee = caller.id == session.mentee_id;
        let is_manager = caller.id == session.mentor_id || caller.role == Role::Admin;
        if !is_manager {
            if !is_mentee {
                return Err(Error::Authorization("not a party to this session".into()));
            }
            if next != SessionStatus::Cancelled {
                return Err(Error::Authorization("mentees may only cancel a session".into()));
            }
        }

        if !session.status.can_transition_to(next) {
            return Err(Error::Conflict(format!(
                "cannot move a {} session to {}",
                session.status, next
            )));
        }

        if next == SessionStatus::Confirmed {
            self.ensure_slot_free(&session).await?;
        }

        let meeting_link = if is_manager {
            meeting_link
                .map(|link| link.trim().to_string())
                .filter(|link| !link.is_empty())
        } else {
            None
        };

        let applied = self
            .store
            .transition_session(&session.id, session.status, next, meeting_link.as_deref())
            .await?;
        if !applied {
            if next == SessionStatus::Confirmed {
                self.ensure_slot_free(&session).await?;
            }
            let current = self.find_session(session_id).await?;
            return Err(Error::Conflict(format!(
                "session changed concurrently and is now {}",
                current.status
            )));
        }

        let updated = self.find_session(session_id).await?;
        info!(
            "[Booking] {} moved {} {} -> {}",
            caller.id, updated.id, session.status, updated.status
        );

        let (title, body) = status_message(&updated, caller);
        for party in [&updated.mentor_id, &updated.mentee_id] {
            if party == &caller.id {
                continue;
            }
            self.notify(
                party,
                &title,
                body.clone(),
                &format!("session_{}", updated.status),
                &updated,
            )
            .await;
            mail::dispatch(
                &self.mailer,
                OutboundMail {
                    to_identity: party.clone(),
                    subject: title.clone(),
                    body: body.clone(),
                },
            );
        }

        audit::record(
            &self.audit,
            AuditEntry::new(
                &caller.id,
                "session.status",
                &updated.id,
                json!({ "from": session.status, "to": updated.status }),
            ),
        );

        Ok(updated)
    }

    /// Mentors see sessions they give; everyone else sees sessions they booked
    pub async fn list_sessions(&self, caller: &Identity) -> Result<Vec<Session>> {
        match caller.role {
            Role::Mentor => self.store.list_sessions_as_mentor(&caller.id).await,
            Role::Mentee | Role::Admin => self.store.list_sessions_as_mentee(&caller.id).await,
        }
    }

    /// Rate a completed session. Only its mentee, only once.
    pub async fn submit_review(
        &self,
        caller: &Identity,
        session_id: &str,
        rating: i64,
        review: Option<String>,
    ) -> Result<Session> {
        if !(1..=5).contains(&rating) {
            return Err(Error::Validation("rating must be between 1 and 5".into()));
        }
        let review = review
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        let session = self.find_session(session_id).await?;
        if session.mentee_id != caller.id {
            return Err(Error::Authorization(
                "only the session's mentee can review it".into(),
            ));
        }
        if session.status != SessionStatus::Completed {
            return Err(Error::Conflict("only completed sessions can be reviewed".into()));
        }
        if session.rating.is_some() {
            return Err(Error::Conflict("session has already been reviewed".into()));
        }

        if !self
            .store
            .record_review(&session.id, &caller.id, rating, review.as_deref())
            .await?
        {
            return Err(Error::Conflict("session has already been reviewed".into()));
        }

        let updated = self.find_session(session_id).await?;
        self.notify(
            &updated.mentor_id,
            "New review",
            format!(
                "{} rated \"{}\" {}/5",
                caller.display_name, updated.service.title, rating
            ),
            "session_review",
            &updated,
        )
        .await;
        audit::record(
            &self.audit,
            AuditEntry::new(&caller.id, "session.review", &updated.id, json!({ "rating": rating })),
        );

        Ok(updated)
    }

    async fn find_session(&self, session_id: &str) -> Result<Session> {
        self.store
            .find_session(session_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("session {}", session_id)))
    }

    /// Second arbitration point: no sibling may already hold the slot
    async fn ensure_slot_free(&self, session: &Session) -> Result<()> {
        match self.store.find_confirmed(&session.mentor_id, &session.slot).await? {
            Some(other) if other.id != session.id => Err(Error::Conflict(format!(
                "slot {} is already confirmed for another session",
                session.slot
            ))),
            _ => Ok(()),
        }
    }

    /// Best-effort; a failed notification never undoes the booking action
    async fn notify(&self, owner: &str, title: &str, body: String, kind: &str, session: &Session) {
        let result = self
            .notifications
            .create(NewNotification {
                owner_id: owner.to_string(),
                title: title.to_string(),
                body,
                link: Some(format!("/sessions/{}", session.id)),
                kind: kind.to_string(),
                metadata: json!({
                    "session_id": session.id,
                    "status": session.status,
                    "slot": session.slot,
                }),
            })
            .await;
        if let Err(e) = result {
            warn!("[Booking] Notification for {} failed: {}", owner, e);
        }
    }
}

fn status_message(session: &Session, caller: &Identity) -> (String, String) {
    let what = format!("\"{}\" on {}", session.service.title, session.slot);
    match session.status {
        SessionStatus::Confirmed => {
            let mut body = format!("Your session {} is confirmed.", what);
            if let Some(link) = &session.meeting_link {
                body.push_str(&format!(" Join at {}", link));
            }
            ("Session confirmed".into(), body)
        }
        SessionStatus::Completed => (
            "Session completed".into(),
            format!("Your session {} is complete. You can now leave a review.", what),
        ),
        SessionStatus::Cancelled => (
            "Session cancelled".into(),
            format!("Your session {} was cancelled by {}.", what, caller.display_name),
        ),
        SessionStatus::Pending => ("Session updated".into(), format!("Your session {} is pending.", what)),
    }
}
