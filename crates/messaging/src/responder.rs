//! Demo auto-responder: the room's counterpart acknowledges agent messages.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::dispatcher::Dispatcher;
use crate::entities::Room;

/// Body of the synthetic counterpart acknowledgement.
pub(crate) fn reply_body(original: &str) -> String {
    format!("I received your message: \"{original}\"")
}

/// Schedule the counterpart's delayed reply to an accepted agent send.
///
/// The timer never touches broker state itself; when it fires it submits a
/// normal send intent through the dispatcher, so the reply is subject to the
/// same per-room serialization as user-originated sends. Each agent send arms
/// its own timer (no coalescing) and disconnects never cancel one.
pub(crate) fn schedule_reply(
    dispatcher: Arc<Dispatcher>,
    room: Room,
    original_text: String,
    delay: Duration,
) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let body = reply_body(&original_text);
        // Replies land unread; the viewer has not seen them yet.
        if let Err(error) = dispatcher
            .dispatch_send(&room.id, &room.client_id, &body, false)
            .await
        {
            warn!(room_id = %room.id, %error, "auto reply dropped");
        }
    });
}
