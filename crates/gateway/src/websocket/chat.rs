//! Chat WebSocket handlers

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use relaydesk_messaging::{BrokerError, BrokerEvent, ChatMessage, SessionId};

use crate::state::GatewayState;

/// Client events received from WebSocket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatClientEvent {
    /// Heartbeat to keep connection alive
    Ping,
    /// Subscribe to a room and make it the active view
    JoinRoom { room_id: String },
    /// Send a message
    SendMessage {
        room_id: String,
        text: String,
        sender_id: Option<String>,
    },
    /// Typing indicator
    Typing {
        room_id: String,
        is_typing: bool,
        user: String,
    },
}

/// Server events sent to WebSocket clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatServerEvent {
    /// Welcome message after successful connection
    Hello { session_id: String, user_id: String },
    /// Heartbeat response
    Pong,
    /// A rejected intent, reported only to the offending connection
    Error { code: String, message: String },
    /// New message in a subscribed room
    ReceiveMessage { message: ChatMessage },
    /// Typing state change in a subscribed room
    UserTyping {
        room_id: String,
        is_typing: bool,
        user: String,
    },
}

impl From<BrokerEvent> for ChatServerEvent {
    fn from(event: BrokerEvent) -> Self {
        match event {
            BrokerEvent::ReceiveMessage { message } => ChatServerEvent::ReceiveMessage { message },
            BrokerEvent::UserTyping {
                room_id,
                is_typing,
                user,
            } => ChatServerEvent::UserTyping {
                room_id,
                is_typing,
                user,
            },
        }
    }
}

fn rejection(error: &BrokerError) -> ChatServerEvent {
    let code = match error {
        BrokerError::RoomUnknown { .. } => "room_unknown",
        BrokerError::EmptyBody => "empty_body",
        BrokerError::Transport(_) => "transport_failure",
    };
    ChatServerEvent::Error {
        code: code.to_string(),
        message: error.to_string(),
    }
}

#[derive(Debug, Deserialize)]
pub struct WebSocketQuery {
    user_id: Option<String>,
}

/// Chat WebSocket connection handler
pub async fn chat_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<WebSocketQuery>,
) -> Response {
    ws.on_upgrade(move |socket| async move {
        let user_id = match query.user_id {
            Some(user_id) if !user_id.trim().is_empty() => user_id,
            _ => state.dispatcher.viewer_id().await,
        };
        handle_chat_socket(socket, state, user_id).await;
    })
}

/// Handle one chat WebSocket connection
async fn handle_chat_socket(socket: WebSocket, state: Arc<GatewayState>, user_id: String) {
    let (mut socket_tx, mut socket_rx) = socket.split();

    let mut session = state.dispatcher.connect(&user_id).await;
    let session_id = session.id;

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ChatServerEvent>();

    let _ = out_tx.send(ChatServerEvent::Hello {
        session_id: session_id.to_string(),
        user_id: user_id.clone(),
    });

    // Bridge broker fan-out into the outbound wire queue.
    let bridge_tx = out_tx.clone();
    let bridge_task = tokio::spawn(async move {
        while let Some(event) = session.events.recv().await {
            if bridge_tx.send(event.into()).is_err() {
                break;
            }
        }
    });

    // Pump the outbound wire queue onto the socket.
    let send_task = tokio::spawn(async move {
        while let Some(event) = out_rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(text) => {
                    if socket_tx.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(error) => warn!(%error, "failed to serialize server event"),
            }
        }
    });

    // Process inbound intents until the client goes away.
    while let Some(message) = socket_rx.next().await {
        let Ok(message) = message else { break };
        match message {
            Message::Text(text) => match serde_json::from_str::<ChatClientEvent>(&text) {
                Ok(event) => {
                    handle_chat_client_event(event, &state, session_id, &user_id, &out_tx).await;
                }
                Err(error) => {
                    debug!(%error, "malformed client event");
                    let _ = out_tx.send(ChatServerEvent::Error {
                        code: "malformed_event".to_string(),
                        message: error.to_string(),
                    });
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    // Teardown: delivery sets only. In-flight sends and pending auto-reply
    // timers keep running.
    state.dispatcher.disconnect(session_id).await;
    bridge_task.abort();
    drop(out_tx);
    let _ = send_task.await;
    debug!(session_id = %session_id, user_id, "chat socket closed");
}

/// Handle chat client events
async fn handle_chat_client_event(
    event: ChatClientEvent,
    state: &Arc<GatewayState>,
    session_id: SessionId,
    user_id: &str,
    out_tx: &mpsc::UnboundedSender<ChatServerEvent>,
) {
    match event {
        ChatClientEvent::Ping => {
            let _ = out_tx.send(ChatServerEvent::Pong);
        }
        ChatClientEvent::JoinRoom { room_id } => {
            if let Err(error) = state.dispatcher.join(session_id, &room_id).await {
                let _ = out_tx.send(rejection(&error));
            }
        }
        ChatClientEvent::SendMessage {
            room_id,
            text,
            sender_id,
        } => {
            let sender_id = sender_id.unwrap_or_else(|| user_id.to_string());
            if let Err(error) = state.dispatcher.send(&room_id, &sender_id, &text).await {
                let _ = out_tx.send(rejection(&error));
            }
        }
        ChatClientEvent::Typing {
            room_id,
            is_typing,
            user,
        } => {
            if let Err(error) = state
                .dispatcher
                .typing(session_id, &room_id, &user, is_typing)
                .await
            {
                let _ = out_tx.send(rejection(&error));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_wire_format() {
        let event: ChatClientEvent = serde_json::from_str(
            r#"{"type":"send_message","room_id":"room1","text":"hi","sender_id":"currUser"}"#,
        )
        .expect("parse send_message");
        assert!(matches!(event, ChatClientEvent::SendMessage { .. }));

        let event: ChatClientEvent =
            serde_json::from_str(r#"{"type":"typing","room_id":"room1","is_typing":true,"user":"You"}"#)
                .expect("parse typing");
        assert!(matches!(event, ChatClientEvent::Typing { is_typing: true, .. }));
    }

    #[test]
    fn test_rejection_codes() {
        let event = rejection(&BrokerError::room_unknown("roomX"));
        match event {
            ChatServerEvent::Error { code, .. } => assert_eq!(code, "room_unknown"),
            other => panic!("expected error event, got {other:?}"),
        }

        let event = rejection(&BrokerError::EmptyBody);
        match event {
            ChatServerEvent::Error { code, .. } => assert_eq!(code, "empty_body"),
            other => panic!("expected error event, got {other:?}"),
        }
    }

    #[test]
    fn test_broker_event_conversion() {
        let broker_event = BrokerEvent::UserTyping {
            room_id: "room1".to_string(),
            is_typing: false,
            user: "You".to_string(),
        };
        let wire: ChatServerEvent = broker_event.into();
        let json = serde_json::to_value(&wire).expect("serialize");
        assert_eq!(json["type"], "user_typing");
        assert_eq!(json["is_typing"], false);
    }
}
