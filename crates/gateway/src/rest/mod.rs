//! REST API endpoints for the gateway

pub mod directory;
pub mod health;
pub mod messages;
pub mod rooms;

use std::sync::Arc;

use axum::Router;

use crate::state::GatewayState;

/// Create all REST API routes
pub fn create_rest_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .merge(directory::create_directory_routes())
        .merge(rooms::create_room_routes())
        .merge(messages::create_message_routes())
        .merge(health::create_health_routes())
}

// Re-export for convenience
pub use directory::*;
pub use health::*;
pub use messages::*;
pub use rooms::*;
