//! # Relaydesk Messaging Crate
//!
//! This crate provides the real-time messaging core for Relaydesk: a
//! room-scoped publish/subscribe broker that delivers chat messages and
//! ephemeral typing signals to connected sessions and maintains per-room
//! unread/last-message summaries.
//!
//! ## Architecture
//!
//! - **Entities**: Domain models (Room, ChatMessage)
//! - **Registry**: Authoritative room/summary state
//! - **Store**: Append-only per-room message log
//! - **Presence**: Transient typing state
//! - **Sessions**: Connected-session delivery sets
//! - **Dispatcher**: Per-room serialized intent processing and fan-out
//! - **Directory**: Bootstrap data with remote-roster fallback
//!
//! ## Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use relaydesk_messaging::{seed_history, seed_rooms, Dispatcher, MessageStore, RoomRegistry};
//!
//! # async fn demo() {
//! let registry = RoomRegistry::seeded("currUser", seed_rooms());
//! let store = MessageStore::seeded(seed_history());
//! let dispatcher = Dispatcher::new(registry, store, Duration::from_millis(1_500));
//!
//! let session = dispatcher.connect("currUser").await;
//! dispatcher.send("room1", "currUser", "hello").await.unwrap();
//! # let _ = session;
//! # }
//! ```

pub mod directory;
pub mod dispatcher;
pub mod entities;
pub mod presence;
pub mod registry;
mod responder;
pub mod sessions;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use directory::{seed_history, seed_rooms, Directory, DirectoryLoader};
pub use dispatcher::Dispatcher;
pub use entities::{
    display_time, preview, ChatMessage, Room, RoomKind, RoomSummary, LAST_MESSAGE_PREVIEW_CHARS,
};
pub use presence::TypingTracker;
pub use registry::RoomRegistry;
pub use sessions::{SessionHandle, SessionId, SessionRegistry};
pub use store::MessageStore;
pub use types::{BrokerError, BrokerEvent, BrokerResult};
