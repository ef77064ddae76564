//! Chat Service Layer
//!
//! Two-party conversations, message delivery status and typing signals.

pub mod messaging;

pub use messaging::{MessagingChannel, MAX_BODY_CHARS};
