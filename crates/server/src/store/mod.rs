//! Persistence boundary
//!
//! SQLite storage for every record the realtime layer owns, with the
//! conditional writes the booking and delivery invariants rely on.

pub mod sqlite_store;

pub use sqlite_store::SqliteStore;
