//! Game module
//!
//! This module contains the core game logic for the Aventura server:
//! - World coordination (joins, movement, interactions, equipment)
//! - Player entities and the session-keyed registry
//! - Items and inventories
//! - Static map content, collision and proximity queries

pub mod inventory;
pub mod item;
pub mod map;
pub mod player;
pub mod world;
