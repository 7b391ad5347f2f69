//! Directory listing endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use relaydesk_messaging::directory::{Agent, Channel, Team};

use crate::state::GatewayState;

pub fn create_directory_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/api/teams", get(list_teams))
        .route("/api/users", get(list_users))
        .route("/api/channels", get(list_channels))
}

pub async fn list_teams(State(state): State<Arc<GatewayState>>) -> Json<Vec<Team>> {
    Json(state.directory.teams.clone())
}

pub async fn list_users(State(state): State<Arc<GatewayState>>) -> Json<Vec<Agent>> {
    Json(state.directory.agents.clone())
}

pub async fn list_channels(State(state): State<Arc<GatewayState>>) -> Json<Vec<Channel>> {
    Json(state.directory.channels.clone())
}
