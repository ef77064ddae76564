use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Role of an authenticated actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Mentor,
    Mentee,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Mentor => "mentor",
            Role::Mentee => "mentee",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mentor" => Ok(Role::Mentor),
            "mentee" => Ok(Role::Mentee),
            "admin" => Ok(Role::Admin),
            other => Err(Error::Validation(format!("unknown role '{}'", other))),
        }
    }
}

/// An authenticated actor. Owned by the identity service, read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub display_name: String,
    pub role: Role,
}

impl Identity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            role,
        }
    }
}

/// Two-participant thread. Participants are stored sorted so the pair is canonical.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub participants: [String; 2],
    pub last_message_id: Option<String>,
    pub last_activity_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Sorted participant pair for two distinct identities
    pub fn canonical_pair(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    pub fn includes(&self, identity_id: &str) -> bool {
        self.participants.iter().any(|p| p == identity_id)
    }

    /// The participant that is not `identity_id`
    pub fn counterpart(&self, identity_id: &str) -> Option<&str> {
        if !self.includes(identity_id) {
            return None;
        }
        self.participants
            .iter()
            .find(|p| p.as_str() != identity_id)
            .map(|p| p.as_str())
    }
}

/// Delivery status of a message. Ordered: sent < delivered < read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Sent,
    Delivered,
    Read,
}

impl MessageStatus {
    pub const ALL: [MessageStatus; 3] = [
        MessageStatus::Sent,
        MessageStatus::Delivered,
        MessageStatus::Read,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Sent => "sent",
            MessageStatus::Delivered => "delivered",
            MessageStatus::Read => "read",
        }
    }

    /// Statuses strictly earlier than `self`
    pub fn predecessors(&self) -> Vec<MessageStatus> {
        Self::ALL.iter().copied().filter(|s| s < self).collect()
    }
}

impl FromStr for MessageStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(MessageStatus::Sent),
            "delivered" => Ok(MessageStatus::Delivered),
            "read" => Ok(MessageStatus::Read),
            other => Err(Error::Validation(format!("unknown message status '{}'", other))),
        }
    }
}

/// Body written over a message deleted for everyone
pub const TOMBSTONE_BODY: &str = "This message was deleted";

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub body: String,
    pub status: MessageStatus,
    /// Identities that removed this message from their own view
    #[serde(default)]
    pub hidden_for: Vec<String>,
    /// Tombstone for messages deleted for everyone
    #[serde(default)]
    pub deleted: bool,
    /// Authored by the platform rather than typed by the sender
    #[serde(default)]
    pub system: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn is_hidden_for(&self, identity_id: &str) -> bool {
        self.hidden_for.iter().any(|h| h == identity_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteMode {
    /// Tombstone for both participants
    Everyone,
    /// Hide from the caller only
    Me,
}

/// A persisted notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub read: bool,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a notification
#[derive(Debug, Clone, Deserialize)]
pub struct NewNotification {
    pub owner_id: String,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    pub kind: String,
    pub metadata: serde_json::Value,
}

/// One bookable unit of a mentor's time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub date: String,
    pub time: String,
}

impl Slot {
    /// Parse and normalize a `YYYY-MM-DD` date and `HH:MM` time
    pub fn parse(date: &str, time: &str) -> Result<Self, Error> {
        let d = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| Error::Validation(format!("invalid slot date '{}'", date)))?;
        let t = NaiveTime::parse_from_str(time.trim(), "%H:%M")
            .map_err(|_| Error::Validation(format!("invalid slot time '{}'", time)))?;
        Ok(Self {
            date: d.format("%Y-%m-%d").to_string(),
            time: t.format("%H:%M").to_string(),
        })
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDetails {
    pub title: String,
    pub duration_minutes: i64,
    pub price: f64,
}

impl ServiceDetails {
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("service title is required".into()));
        }
        if self.duration_minutes <= 0 {
            return Err(Error::Validation("duration must be positive".into()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::Validation("price must be zero or more".into()));
        }
        Ok(())
    }
}

/// Booking lifecycle. `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Confirmed => "confirmed",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Cancelled)
    }

    /// Holds the slot against duplicate requests from the same mentee
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Pending | SessionStatus::Confirmed)
    }

    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }
}

impl FromStr for SessionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SessionStatus::Pending),
            "confirmed" => Ok(SessionStatus::Confirmed),
            "completed" => Ok(SessionStatus::Completed),
            "cancelled" => Ok(SessionStatus::Cancelled),
            other => Err(Error::Validation(format!("unknown session status '{}'", other))),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booked mentoring session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub mentor_id: String,
    pub mentee_id: String,
    pub slot: Slot,
    pub service: ServiceDetails,
    pub status: SessionStatus,
    pub meeting_link: Option<String>,
    pub rating: Option<i64>,
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// The other party of the session, from `identity_id`'s point of view
    pub fn counterpart(&self, identity_id: &str) -> &str {
        if self.mentor_id == identity_id {
            &self.mentee_id
        } else {
            &self.mentor_id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_pair_is_order_independent() {
        assert_eq!(
            Conversation::canonical_pair("bob", "alice"),
            Conversation::canonical_pair("alice", "bob")
        );
    }

    #[test]
    fn message_status_predecessors() {
        assert!(MessageStatus::Sent.predecessors().is_empty());
        assert_eq!(
            MessageStatus::Read.predecessors(),
            vec![MessageStatus::Sent, MessageStatus::Delivered]
        );
    }

    #[test]
    fn session_state_machine() {
        use SessionStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Pending));
        for terminal in [Completed, Cancelled] {
            for next in [Pending, Confirmed, Completed, Cancelled] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn slot_parsing_normalizes() {
        let slot = Slot::parse(" 2024-06-01", "10:00 ").unwrap();
        assert_eq!(slot.to_string(), "2024-06-01 10:00");
        assert!(Slot::parse("2024-13-01", "10:00").is_err());
        assert!(Slot::parse("2024-06-01", "25:00").is_err());
    }
}
