//! Event envelope and payload types
//!
//! Every websocket frame is a JSON object of the form
//! `{"event": "<name>", "data": <payload>}`. Event names are camelCase
//! and payload field names match the client's own type definitions, so
//! a captured frame reads the same on both ends of the connection.
//!
//! Parsing is strict: a frame whose event name is unknown or whose
//! payload does not match the expected shape is rejected as malformed,
//! and the connection layer drops it without disturbing the session.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::game::item::EquipSlot;
use crate::game::map::MapDefinition;
use crate::game::player::{Player, Position};
use crate::net::session::SessionId;

/// Upper bound on a single inbound frame, in bytes
pub const MAX_EVENT_BYTES: usize = 64 * 1024;

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Enter the world under a nickname
    Join { nickname: String },
    /// Update position; omitted axes keep their current value
    Move(MoveData),
    /// Say something to everyone
    Chat(String),
    /// Interact with whatever is nearby
    Interact(InteractionData),
    /// Equip an inventory item into a slot
    #[serde(rename_all = "camelCase")]
    EquipItem { item_id: String, slot: EquipSlot },
    /// Return an equipped item to the inventory
    UnequipItem { slot: EquipSlot },
}

impl ClientEvent {
    /// Parse a raw text frame into an event
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        if text.len() > MAX_EVENT_BYTES {
            return Err(ProtocolError::MessageTooLarge {
                size: text.len(),
                max: MAX_EVENT_BYTES,
            });
        }
        serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }

    /// Encode the event as a text frame
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Everyone currently in the world, sent to a joining client
    CurrentPlayers(HashMap<SessionId, Player>),
    /// The map the receiving client is on
    CurrentMap(MapDefinition),
    /// A player other than the recipient joined
    NewPlayer(Player),
    /// A player other than the recipient moved
    PlayerMoved(Player),
    /// A chat line, fanned out to everyone including the sender
    Chat(ChatBroadcast),
    /// Outcome of the recipient's interact request
    InteractionResult(InteractionResult),
    /// The recipient's own state changed
    PlayerUpdated(Player),
    /// A player left the world
    RemovePlayer(SessionId),
}

impl ServerEvent {
    /// Encode the event as a text frame
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }

    /// Parse a raw text frame into an event
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }
}

/// Partial position update; present axes overwrite, absent axes persist
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl MoveData {
    /// Merge this update into an existing position
    pub fn apply_to(&self, position: Position) -> Position {
        Position::new(
            self.x.unwrap_or(position.x),
            self.y.unwrap_or(position.y),
            self.z.unwrap_or(position.z),
        )
    }
}

/// What the client believes it is interacting with.
///
/// The server treats this as a hint and resolves the interaction
/// against its own proximity checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionData {
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub target_id: String,
    pub target_type: TargetKind,
}

/// Interaction verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Talk,
    Trade,
    Attack,
    Collect,
    Use,
}

/// What an interaction can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Player,
    Npc,
    Object,
}

/// Outcome of an interact request, sent only to the requester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl InteractionResult {
    /// A successful interaction with a message for the client
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    /// Nothing in range responded
    pub fn failure() -> Self {
        Self {
            success: false,
            message: None,
        }
    }
}

/// A chat line as fanned out to every client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatBroadcast {
    /// Session id of the speaker
    pub id: SessionId,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: ChatKind,
}

/// Chat channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Normal,
    System,
    Trade,
    Guild,
}
