//! Room history endpoint

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use relaydesk_messaging::ChatMessage;

use crate::state::GatewayState;

pub fn create_message_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/api/messages/:room_id", get(room_history))
}

/// Ordered history for a room.
///
/// Unknown rooms read as an empty list rather than an error, so a client can
/// hydrate a view before its room data has arrived.
pub async fn room_history(
    State(state): State<Arc<GatewayState>>,
    Path(room_id): Path<String>,
) -> Json<Vec<ChatMessage>> {
    Json(state.dispatcher.list_messages(&room_id).await)
}
