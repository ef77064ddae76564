#![allow(dead_code)]

use mentorlink_server::audit::TracingAuditLog;
use mentorlink_server::booking::{BookingRequest, SlotPolicy};
use mentorlink_server::mail::LogMailer;
use mentorlink_server::models::{Identity, Role, ServiceDetails};
use mentorlink_server::presence::{ConnectionHandle, ConnectionId};
use mentorlink_server::protocol::ServerEvent;
use mentorlink_server::store::SqliteStore;
use mentorlink_server::{AppState, ServerConfig};
use std::sync::Arc;
use tempfile::{tempdir, TempDir};
use tokio::sync::mpsc::UnboundedReceiver;

pub const SECRET: &str = "integration-test-secret";

/// App state over a throwaway database. Keep `_dir` alive for the test's duration.
pub struct Harness {
    pub state: AppState,
    pub mentor: Identity,
    pub other_mentor: Identity,
    pub alice: Identity,
    pub bob: Identity,
    pub carol: Identity,
    pub admin: Identity,
    _dir: TempDir,
}

pub async fn harness() -> Harness {
    harness_with(SlotPolicy::default()).await
}

pub async fn harness_with(slot_policy: SlotPolicy) -> Harness {
    let dir = tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("mentorlink.sqlite").display());

    let mut config = ServerConfig::with_database(url.clone());
    config.jwt_secret = SECRET.to_string();
    config.slot_policy = slot_policy;

    let store = SqliteStore::open(&url).await.unwrap();
    let state = AppState::with_collaborators(
        config,
        store,
        Arc::new(LogMailer),
        Arc::new(TracingAuditLog),
    );

    let mentor = Identity::new("mentor-mira", "Mira", Role::Mentor);
    let other_mentor = Identity::new("mentor-otto", "Otto", Role::Mentor);
    let alice = Identity::new("mentee-alice", "Alice", Role::Mentee);
    let bob = Identity::new("mentee-bob", "Bob", Role::Mentee);
    let carol = Identity::new("mentee-carol", "Carol", Role::Mentee);
    let admin = Identity::new("admin-ada", "Ada", Role::Admin);
    for identity in [&mentor, &other_mentor, &alice, &bob, &carol, &admin] {
        state.store.upsert_identity(identity).await.unwrap();
    }

    Harness {
        state,
        mentor,
        other_mentor,
        alice,
        bob,
        carol,
        admin,
        _dir: dir,
    }
}

/// Register a live connection for `identity` and discard the presence chatter
pub fn connect(state: &AppState, identity: &Identity) -> (ConnectionId, UnboundedReceiver<ServerEvent>) {
    let (handle, mut rx) = ConnectionHandle::new();
    let id = handle.id();
    state.presence.register(&identity.id, handle);
    drain(&mut rx);
    (id, rx)
}

pub fn drain(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn request(mentor: &Identity, date: &str, time: &str) -> BookingRequest {
    BookingRequest {
        mentor_id: mentor.id.clone(),
        date: date.to_string(),
        time: time.to_string(),
        service: ServiceDetails {
            title: "Career coaching".to_string(),
            duration_minutes: 60,
            price: 25.0,
        },
    }
}
