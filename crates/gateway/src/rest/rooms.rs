//! Room list endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use relaydesk_messaging::directory::Client;
use relaydesk_messaging::Room;

use crate::state::GatewayState;

/// Room payload with the counterpart client joined in for list rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomResponse {
    pub id: String,
    pub kind: String,
    pub participants: Vec<String>,
    pub agent_id: String,
    pub client_id: String,
    pub last_message_text: String,
    pub last_message_time: String,
    pub unread_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_user: Option<Client>,
}

impl RoomResponse {
    fn from_room(room: Room, other_user: Option<Client>) -> Self {
        Self {
            id: room.id,
            kind: String::from(room.kind),
            participants: room.participants,
            agent_id: room.agent_id,
            client_id: room.client_id,
            last_message_text: room.summary.last_message_text,
            last_message_time: room.summary.last_message_time,
            unread_count: room.summary.unread_count,
            other_user,
        }
    }
}

pub fn create_room_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/api/rooms", get(list_rooms))
}

pub async fn list_rooms(State(state): State<Arc<GatewayState>>) -> Json<Vec<RoomResponse>> {
    let rooms = state.dispatcher.rooms().await;
    let responses = rooms
        .into_iter()
        .map(|room| {
            let other_user = state.directory.client(&room.client_id).cloned();
            RoomResponse::from_room(room, other_user)
        })
        .collect();
    Json(responses)
}
