//! Aventura Game Server Library
//!
//! This library provides the core functionality for the Aventura game
//! server, the authoritative backend for a small multiplayer 3D RPG.
//!
//! ## Modules
//!
//! - `api` - HTTP status endpoints
//! - `config` - Server configuration management
//! - `error` - Error types and result definitions
//! - `game` - Players, maps, inventory and the world coordinator
//! - `net` - WebSocket handling and session management
//! - `protocol` - Client/server event catalog and wire format

pub mod api;
pub mod config;
pub mod error;
pub mod game;
pub mod net;
pub mod protocol;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{AventuraError, Result};
pub use state::AppState;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
