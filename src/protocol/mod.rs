//! Protocol module
//!
//! This module contains the wire protocol spoken over the websocket:
//! - Event envelope (JSON frames tagged with an event name)
//! - Client-to-server events (join, move, chat, interact, equipment)
//! - Server-to-client events (state snapshots and broadcasts)

pub mod events;

pub use events::{ClientEvent, ServerEvent};
