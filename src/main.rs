//! Aventura Game Server
//!
//! The authoritative server for a small multiplayer 3D RPG, with
//! WebSocket state sync for browser clients and an HTTP status API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use aventura_server::api;
use aventura_server::config::ServerConfig;
use aventura_server::net::handler;
use aventura_server::state::AppState;
use aventura_server::VERSION;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    info!(version = VERSION, "Starting Aventura game server");

    let config = ServerConfig::load().await?;
    info!(path = %config.config_path.display(), "Configuration loaded");

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let state = Arc::new(AppState::new(config.clone(), shutdown_tx.clone())?);

    // Game clients speak the websocket protocol on one port; the status
    // API answers HTTP on another.
    let ws_listener = bind(config.websocket_port).await?;
    info!(port = config.websocket_port, "WebSocket listener ready");
    let ws_handle = tokio::spawn(handler::accept_connections(
        ws_listener,
        state.clone(),
        shutdown_tx.subscribe(),
    ));

    let status_listener = bind(config.status_port).await?;
    info!(port = config.status_port, "Status API listener ready");
    let status_handle = tokio::spawn(run_status_server(
        status_listener,
        state.clone(),
        shutdown_tx.subscribe(),
    ));

    info!(
        map = %state.world.starting_map(),
        max_players = config.max_players,
        "Server ready for connections"
    );

    wait_for_shutdown().await;
    info!("Shutting down");
    let _ = shutdown_tx.send(());

    let _ = ws_handle.await;
    let _ = status_handle.await;

    state.session_manager.disconnect_all();
    info!("Shutdown complete");
    Ok(())
}

async fn bind(port: u16) -> Result<TcpListener> {
    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    Ok(TcpListener::bind(addr).await?)
}

/// Initialize the logging/tracing system
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,aventura_server=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .init();
}

/// Run the HTTP status server with graceful shutdown
async fn run_status_server(
    listener: TcpListener,
    state: Arc<AppState>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let router = api::create_router(state);
    let shutdown_signal = async move {
        let _ = shutdown_rx.recv().await;
        info!("Status API shutting down");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .unwrap_or_else(|e| error!(error = %e, "Status API failed"));
}

/// Block until Ctrl+C or, on unix, SIGTERM
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = signal::ctrl_c() => info!("Received Ctrl+C"),
            _ = sigterm.recv() => info!("Received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = signal::ctrl_c().await;
        info!("Received Ctrl+C");
    }
}
