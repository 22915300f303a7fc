//! Application state module
//!
//! Contains the shared state used across all server connections.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::Result;
use crate::game::world::WorldCoordinator;
use crate::net::session::SessionManager;

/// Application state shared across all connections
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Session manager for tracking connected clients
    pub session_manager: SessionManager,
    /// World coordinator owning all player and map state
    pub world: Arc<WorldCoordinator>,
    /// Shutdown signal sender
    pub shutdown_tx: broadcast::Sender<()>,
    /// Moment the state was created, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: ServerConfig, shutdown_tx: broadcast::Sender<()>) -> Result<Self> {
        let world = Arc::new(WorldCoordinator::new(&config.starting_map)?);
        info!(
            starting_map = %config.starting_map,
            max_players = config.max_players,
            "World coordinator initialized"
        );

        let session_manager =
            SessionManager::new(config.max_players as usize, config.outbound_capacity);

        Ok(Self {
            config,
            session_manager,
            world,
            shutdown_tx,
            started_at: Instant::now(),
        })
    }

    /// Seconds since the server state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
