use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use relaydesk_config::load as load_config;
use relaydesk_gateway::{create_router, GatewayState};
use relaydesk_messaging::{
    seed_history, seed_rooms, DirectoryLoader, Dispatcher, MessageStore, RoomRegistry,
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(env_filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("starting Relaydesk backend");

    let config = load_config().context("failed to load configuration")?;

    let loader = DirectoryLoader::new(
        config.directory.users_url.clone(),
        Duration::from_secs(config.directory.request_timeout_seconds),
    );
    let directory = loader.load().await;
    info!(
        teams = directory.teams.len(),
        agents = directory.agents.len(),
        clients = directory.clients.len(),
        "directory ready"
    );

    let registry = RoomRegistry::seeded(config.broker.viewer_id.clone(), seed_rooms());
    let store = MessageStore::seeded(seed_history());
    let dispatcher = Dispatcher::new(
        registry,
        store,
        Duration::from_millis(config.broker.auto_reply_delay_ms),
    );
    info!(
        auto_reply_delay_ms = config.broker.auto_reply_delay_ms,
        viewer_id = %config.broker.viewer_id,
        "message broker ready"
    );

    let state = GatewayState::new(Arc::clone(&dispatcher), directory);
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

fn shutdown_signal() -> impl std::future::Future<Output = ()> {
    async {
        if let Err(error) = signal::ctrl_c().await {
            error!(?error, "failed to listen for shutdown signal");
        }
        info!("shutdown signal received");
    }
}
