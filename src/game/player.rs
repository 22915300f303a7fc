//! Player module
//!
//! Manages player entities and their state including:
//! - Player data (stats, inventory, equipment)
//! - Player position
//! - The session-keyed player registry
//!
//! The registry is the single source of truth for who is in the world.
//! All mutation goes through it; callers never hold references into the
//! underlying map.

use std::collections::HashMap;

use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GameError;
use crate::game::inventory::Inventory;
use crate::game::item::{self, EquipSlot, Item, ItemStats};
use crate::net::session::SessionId;

/// Starting stats for a freshly joined player
pub const STARTING_LEVEL: u32 = 1;
pub const STARTING_HP: u32 = 100;
pub const STARTING_ATTACK: u32 = 10;
pub const STARTING_DEFENSE: u32 = 5;

/// A point in world space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance on the ground plane, ignoring height
    pub fn distance_xz(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }
}

/// Equipment slots of a player.
///
/// Empty slots serialize as explicit `null`s so clients always see the
/// full slot layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipped {
    #[serde(default)]
    pub weapon: Option<Item>,
    #[serde(default)]
    pub armor: Option<Item>,
    #[serde(default)]
    pub accessory: Option<Item>,
}

impl Equipped {
    /// The item currently in the given slot
    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_ref(),
            EquipSlot::Armor => self.armor.as_ref(),
            EquipSlot::Accessory => self.accessory.as_ref(),
        }
    }

    /// Place an item in the given slot, returning the displaced one
    pub fn set(&mut self, slot: EquipSlot, item: Item) -> Option<Item> {
        match slot {
            EquipSlot::Weapon => self.weapon.replace(item),
            EquipSlot::Armor => self.armor.replace(item),
            EquipSlot::Accessory => self.accessory.replace(item),
        }
    }

    /// Empty the given slot, returning its item
    pub fn take(&mut self, slot: EquipSlot) -> Option<Item> {
        match slot {
            EquipSlot::Weapon => self.weapon.take(),
            EquipSlot::Armor => self.armor.take(),
            EquipSlot::Accessory => self.accessory.take(),
        }
    }
}

/// A connected player's full state, serialized as-is to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Session id of the owning connection
    pub id: SessionId,
    pub nickname: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Display color assigned at join, `#rrggbb`
    pub color: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub experience: u32,
    pub inventory: Inventory,
    pub equipped: Equipped,
}

impl Player {
    /// Create a fully formed player at the world origin with baseline
    /// stats and the starting inventory
    pub fn new(id: SessionId, nickname: impl Into<String>) -> Self {
        Self {
            id,
            nickname: nickname.into(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            color: random_color(),
            level: STARTING_LEVEL,
            hp: STARTING_HP,
            max_hp: STARTING_HP,
            attack: STARTING_ATTACK,
            defense: STARTING_DEFENSE,
            experience: 0,
            inventory: Inventory::with_items(vec![item::starting_potion()]),
            equipped: Equipped::default(),
        }
    }

    /// Current position as a point
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y, self.z)
    }

    /// Move the player to the given point
    pub fn set_position(&mut self, position: Position) {
        self.x = position.x;
        self.y = position.y;
        self.z = position.z;
    }

    /// Apply an equipped item's stat deltas
    pub fn apply_item_stats(&mut self, stats: &ItemStats) {
        self.attack += stats.attack.unwrap_or(0);
        self.defense += stats.defense.unwrap_or(0);
        self.max_hp += stats.hp.unwrap_or(0);
    }

    /// Reverse an equipped item's stat deltas.
    ///
    /// Current hit points are clamped so they never exceed the reduced
    /// maximum.
    pub fn remove_item_stats(&mut self, stats: &ItemStats) {
        self.attack = self.attack.saturating_sub(stats.attack.unwrap_or(0));
        self.defense = self.defense.saturating_sub(stats.defense.unwrap_or(0));
        self.max_hp = self.max_hp.saturating_sub(stats.hp.unwrap_or(0));
        if self.hp > self.max_hp {
            self.hp = self.max_hp;
        }
    }
}

/// Random display color in `#rrggbb` form
fn random_color() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..0x100_0000);
    format!("#{value:06x}")
}

/// Session-keyed registry of all players currently in the world.
///
/// A single coarse lock guards the map. Every operation acquires it,
/// runs to completion and releases it, so each registry call is atomic
/// with respect to every other.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: Mutex<HashMap<SessionId, Player>>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new player under the given session id.
    ///
    /// The player is created fully formed before becoming visible, so
    /// no observer ever sees a partially initialized entry. Returns the
    /// created player's snapshot.
    pub fn register(
        &self,
        id: SessionId,
        nickname: impl Into<String>,
    ) -> Result<Player, GameError> {
        let mut players = self.players.lock();
        if players.contains_key(&id) {
            return Err(GameError::AlreadyRegistered(id));
        }
        let player = Player::new(id, nickname);
        players.insert(id, player.clone());
        debug!(id, nickname = %player.nickname, "Player registered");
        Ok(player)
    }

    /// Snapshot of the player under the given session id
    pub fn lookup(&self, id: SessionId) -> Option<Player> {
        self.players.lock().get(&id).cloned()
    }

    /// Whether a player is registered under the given session id
    pub fn contains(&self, id: SessionId) -> bool {
        self.players.lock().contains_key(&id)
    }

    /// Remove and return the player under the given session id
    pub fn unregister(&self, id: SessionId) -> Option<Player> {
        let player = self.players.lock().remove(&id);
        if let Some(ref player) = player {
            debug!(id, nickname = %player.nickname, "Player unregistered");
        }
        player
    }

    /// Snapshot of every registered player, keyed by session id
    pub fn all(&self) -> HashMap<SessionId, Player> {
        self.players.lock().clone()
    }

    /// Number of registered players
    pub fn count(&self) -> usize {
        self.players.lock().len()
    }

    /// Run a closure against the live entry for the given session id,
    /// holding the registry lock for the duration.
    ///
    /// Returns `None` without running the closure when no player is
    /// registered under the id.
    pub fn with_player_mut<R>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut Player) -> R,
    ) -> Option<R> {
        let mut players = self.players.lock();
        players.get_mut(&id).map(f)
    }
}
