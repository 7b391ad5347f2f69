//! Transient per-room typing state.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

/// Tracks who is currently typing in each room.
///
/// At most one entry per room; the last writer wins. Entries are cleared on a
/// "stopped typing" intent or when a send is accepted for the room. Purely
/// in-memory and best-effort.
#[derive(Debug, Clone, Default)]
pub struct TypingTracker {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl TypingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the typing participant for a room, overwriting any previous entry
    pub async fn set_typing(&self, room_id: &str, user_label: &str) {
        let mut entries = self.inner.write().await;
        entries.insert(room_id.to_string(), user_label.to_string());
    }

    /// Remove the room's typing entry; no-op when absent
    pub async fn clear_typing(&self, room_id: &str) {
        let mut entries = self.inner.write().await;
        entries.remove(room_id);
    }

    /// The label of the participant currently typing in the room, if any
    pub async fn get(&self, room_id: &str) -> Option<String> {
        let entries = self.inner.read().await;
        entries.get(room_id).cloned()
    }
}
