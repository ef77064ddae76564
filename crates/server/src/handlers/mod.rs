//! HTTP and WebSocket handlers

pub mod chat;
pub mod notifications;
pub mod presence;
pub mod sessions;
pub mod ws;

pub use crate::config::AppState;

pub use chat::{list_conversations, list_messages, open_conversation};
pub use notifications::{clear_notifications, list_notifications, mark_all_read, mark_read};
pub use presence::get_presence;
pub use sessions::{book_session, list_sessions, submit_review, update_status};
pub use ws::{dispatch, ws_handler};
