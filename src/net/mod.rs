//! Networking module
//!
//! This module handles all network-related functionality for the
//! Aventura server:
//! - WebSocket accept loop and per-connection handling
//! - Session management and outbound delivery channels
//! - A typed client for tools and integration tests

pub mod client;
pub mod handler;
pub mod session;

pub use client::GameClient;
pub use handler::{accept_connections, ConnectionHandler};
pub use session::{Session, SessionId, SessionManager, SessionState};
