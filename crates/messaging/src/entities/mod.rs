//! Domain entities for the messaging core.

pub mod message;
pub mod room;

pub use message::{display_time, ChatMessage};
pub use room::{preview, Room, RoomKind, RoomSummary, LAST_MESSAGE_PREVIEW_CHARS};
