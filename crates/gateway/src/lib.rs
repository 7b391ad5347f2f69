//! # Relaydesk Gateway Crate
//!
//! This crate provides the transport surface for the Relaydesk broker,
//! exposing REST read-model endpoints and the chat WebSocket that carries
//! client intents in and room fan-out back.
//!
//! ## Architecture
//!
//! - **REST**: Directory, room list, and history endpoints
//! - **WebSocket**: Real-time intent/event channel per connection
//! - **State**: Shared handles to the dispatcher and directory
//! - **Error**: Gateway error mapping onto HTTP responses
//!
//! ## Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use relaydesk_gateway::{create_router, GatewayState};
//! use relaydesk_messaging::{seed_history, seed_rooms, Directory, Dispatcher, MessageStore, RoomRegistry};
//!
//! let registry = RoomRegistry::seeded("currUser", seed_rooms());
//! let store = MessageStore::seeded(seed_history());
//! let dispatcher = Dispatcher::new(registry, store, Duration::from_millis(1_500));
//! let state = GatewayState::new(dispatcher, Directory::seed());
//! let app = create_router(state);
//! # let _ = app;
//! ```

pub mod error;
pub mod rest;
pub mod state;
pub mod websocket;

// Re-export main types for convenience
pub use error::{GatewayError, GatewayResult};
pub use state::GatewayState;

use std::sync::Arc;

use axum::{http::Method, Router};
use tower_http::cors::{Any, CorsLayer};

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let arc_state = Arc::new(state);
    Router::new()
        // REST API routes
        .merge(rest::create_rest_routes().with_state(arc_state.clone()))
        // WebSocket routes
        .merge(websocket::create_websocket_routes().with_state(arc_state))
        // CORS middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any),
        )
}
