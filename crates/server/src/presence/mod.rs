//! Presence Registry
//!
//! Process-wide map of identity -> live connection. Each connection owns an
//! unbounded outbound queue; pushing to an identity means enqueueing onto the
//! queue of whichever connection is currently registered for it.

use crate::protocol::ServerEvent;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};
use uuid::Uuid;

/// Unique identifier for one socket connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending half of a connection's outbound queue
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: UnboundedSender<ServerEvent>,
}

impl ConnectionHandle {
    /// Create a handle and the receiver the connection's writer drains
    pub fn new() -> (Self, UnboundedReceiver<ServerEvent>) {
        let (sender, rx) = unbounded_channel();
        (
            Self {
                id: ConnectionId::new(),
                sender,
            },
            rx,
        )
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Fire-and-forget. False if the connection has already gone away.
    pub fn push(&self, event: ServerEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// identity -> current connection. Last connect wins.
#[derive(Clone, Default)]
pub struct PresenceRegistry {
    inner: Arc<Mutex<HashMap<String, ConnectionHandle>>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handle` to `identity`, superseding any earlier connection, and
    /// broadcast that the identity is online.
    pub fn register(&self, identity: &str, handle: ConnectionHandle) {
        let (previous, targets) = {
            let mut guard = self.inner.lock();
            let previous = guard.insert(identity.to_string(), handle);
            (previous, guard.values().cloned().collect::<Vec<_>>())
        };

        if let Some(prev) = previous {
            debug!("[Presence] {} superseded connection {:?}", identity, prev.id());
        }
        info!("[Presence] {} online", identity);

        fan_out(
            &targets,
            ServerEvent::PresenceChanged {
                identity: identity.to_string(),
                online: true,
            },
        );
    }

    /// Remove `identity` if `connection` is still the registered one.
    ///
    /// A superseded connection closing must not evict its replacement, so the
    /// removal is keyed on the connection id. Returns whether an entry was removed.
    pub fn deregister(&self, identity: &str, connection: ConnectionId) -> bool {
        let targets = {
            let mut guard = self.inner.lock();
            let is_current = guard
                .get(identity)
                .map(|current| current.id() == connection)
                .unwrap_or(false);
            if !is_current {
                return false;
            }
            guard.remove(identity);
            guard.values().cloned().collect::<Vec<_>>()
        };

        info!("[Presence] {} offline", identity);
        fan_out(
            &targets,
            ServerEvent::PresenceChanged {
                identity: identity.to_string(),
                online: false,
            },
        );
        true
    }

    /// Current connection for `identity`. `None` just means offline.
    pub fn lookup(&self, identity: &str) -> Option<ConnectionHandle> {
        self.inner.lock().get(identity).cloned()
    }

    /// Push to `identity` if present. Returns whether the event was enqueued.
    pub fn push_to(&self, identity: &str, event: ServerEvent) -> bool {
        match self.lookup(identity) {
            Some(handle) => handle.push(event),
            None => false,
        }
    }

    pub fn is_online(&self, identity: &str) -> bool {
        self.inner.lock().contains_key(identity)
    }

    /// Identities with a registered connection, sorted
    pub fn online(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.lock().keys().cloned().collect();
        ids.sort();
        ids
    }
}

fn fan_out(targets: &[ConnectionHandle], event: ServerEvent) {
    for target in targets {
        target.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }
        events
    }

    #[test]
    fn later_connect_supersedes_earlier() {
        let registry = PresenceRegistry::new();
        let (first, mut first_rx) = ConnectionHandle::new();
        let (second, mut second_rx) = ConnectionHandle::new();
        let second_id = second.id();

        registry.register("alice", first);
        registry.register("alice", second);
        drain(&mut first_rx);
        drain(&mut second_rx);

        assert_eq!(registry.online(), vec!["alice".to_string()]);
        assert_eq!(registry.lookup("alice").map(|h| h.id()), Some(second_id));

        assert!(registry.push_to(
            "alice",
            ServerEvent::PresenceSnapshot { online: vec![] }
        ));
        assert!(drain(&mut first_rx).is_empty());
        assert_eq!(drain(&mut second_rx).len(), 1);
    }

    #[test]
    fn stale_connection_cannot_evict_replacement() {
        let registry = PresenceRegistry::new();
        let (first, _rx1) = ConnectionHandle::new();
        let first_id = first.id();
        let (second, _rx2) = ConnectionHandle::new();
        let second_id = second.id();

        registry.register("alice", first);
        registry.register("alice", second);

        assert!(!registry.deregister("alice", first_id));
        assert!(registry.is_online("alice"));
        assert!(registry.deregister("alice", second_id));
        assert!(!registry.is_online("alice"));
    }

    #[test]
    fn transitions_are_broadcast() {
        let registry = PresenceRegistry::new();
        let (watcher, mut watcher_rx) = ConnectionHandle::new();
        registry.register("bob", watcher);
        drain(&mut watcher_rx);

        let (alice, _alice_rx) = ConnectionHandle::new();
        let alice_id = alice.id();
        registry.register("alice", alice);
        registry.deregister("alice", alice_id);

        let events = drain(&mut watcher_rx);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            ServerEvent::PresenceChanged { identity, online: true } if identity == "alice"
        ));
        assert!(matches!(
            &events[1],
            ServerEvent::PresenceChanged { identity, online: false } if identity == "alice"
        ));
    }

    #[test]
    fn absent_identity_is_not_an_error() {
        let registry = PresenceRegistry::new();
        assert!(registry.lookup("ghost").is_none());
        assert!(!registry.push_to("ghost", ServerEvent::PresenceSnapshot { online: vec![] }));
    }
}
