//! World module
//!
//! The world coordinator applies client intents to shared state:
//! - Join and leave lifecycle
//! - Movement with collision checks and portal transitions
//! - Interaction resolution against nearby NPCs and objects
//! - Equipment changes and their stat effects
//! - Chat fan-out payloads
//!
//! It owns the player registry and the per-session map assignment. The
//! map catalog is immutable and shared.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::{GameError, Result};
use crate::game::item::EquipSlot;
use crate::game::map::{
    standard_catalog, MapCatalog, MapDefinition, ObjectKind, INTERACTION_RANGE,
};
use crate::game::player::{Player, PlayerRegistry, Position};
use crate::net::session::SessionId;
use crate::protocol::events::{
    ChatBroadcast, ChatKind, InteractionData, InteractionResult, MoveData,
};

/// Everything a joining client needs for its initial view of the world
#[derive(Debug, Clone)]
pub struct JoinData {
    /// The newly created player
    pub player: Player,
    /// Snapshot of everyone in the world, including the new player
    pub players: HashMap<SessionId, Player>,
    /// The map the player starts on
    pub map: MapDefinition,
}

/// Result of a movement request
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// The move was applied. `transition` carries the destination map
    /// when the move landed the player in portal range.
    Accepted {
        player: Player,
        transition: Option<MapDefinition>,
    },
    /// A solid object overlaps the target position; nothing changed
    Blocked,
    /// No player is registered for the session; nothing changed
    UnknownPlayer,
}

/// Result of an interact request
#[derive(Debug, Clone, PartialEq)]
pub struct InteractOutcome {
    /// What to tell the requesting client
    pub result: InteractionResult,
    /// Player state after a portal teleport, for broadcast to others
    pub moved: Option<Player>,
    /// Destination map after a portal teleport
    pub map: Option<MapDefinition>,
}

/// Authoritative coordinator for all world state.
///
/// The `locations` lock doubles as the coordinator's critical section:
/// every operation that touches shared state acquires it first and
/// holds it to completion, so operations never interleave. The
/// registry's own lock only ever nests inside it.
pub struct WorldCoordinator {
    registry: PlayerRegistry,
    catalog: Arc<MapCatalog>,
    starting_map: String,
    /// Map id each session is currently on
    locations: Mutex<HashMap<SessionId, String>>,
}

impl WorldCoordinator {
    /// Coordinator over the standard map catalog
    pub fn new(starting_map: impl Into<String>) -> Result<Self> {
        Self::with_catalog(standard_catalog(), starting_map)
    }

    /// Coordinator over a custom catalog. Fails when the starting map
    /// is not in the catalog.
    pub fn with_catalog(
        catalog: Arc<MapCatalog>,
        starting_map: impl Into<String>,
    ) -> Result<Self> {
        let starting_map = starting_map.into();
        if !catalog.contains(&starting_map) {
            return Err(GameError::UnknownMap(starting_map).into());
        }
        Ok(Self {
            registry: PlayerRegistry::new(),
            catalog,
            starting_map,
            locations: Mutex::new(HashMap::new()),
        })
    }

    /// Bring a session into the world under a nickname.
    ///
    /// The player is created fully formed on the starting map's spawn
    /// point. The returned snapshot already includes them; announcing
    /// them to other connections is the caller's responsibility.
    pub fn join(&self, id: SessionId, nickname: impl Into<String>) -> Result<JoinData> {
        let mut locations = self.locations.lock();
        let map = match self.catalog.get(&self.starting_map) {
            Some(map) => map.clone(),
            None => return Err(GameError::UnknownMap(self.starting_map.clone()).into()),
        };

        let player = self.registry.register(id, nickname)?;
        let spawn = map.spawn_point();
        let player = self
            .registry
            .with_player_mut(id, |player| {
                player.set_position(spawn);
                player.clone()
            })
            .unwrap_or(player);
        locations.insert(id, map.id.clone());
        let players = self.registry.all();

        info!(id, nickname = %player.nickname, map = %map.id, "Player joined the world");
        Ok(JoinData {
            player,
            players,
            map,
        })
    }

    /// Apply a movement intent.
    ///
    /// Axes absent from the update keep their current value. The merged
    /// destination is collision-checked against the player's current
    /// map; a blocked move leaves all state untouched. An accepted move
    /// that lands within portal range teleports the player to the
    /// portal's configured arrival point, skipping the collision check
    /// there.
    pub fn move_player(&self, id: SessionId, update: MoveData) -> MoveOutcome {
        let mut locations = self.locations.lock();
        let map_id = match locations.get(&id) {
            Some(map_id) => map_id.clone(),
            None => return MoveOutcome::UnknownPlayer,
        };
        let map = match self.catalog.get(&map_id) {
            Some(map) => map,
            None => return MoveOutcome::UnknownPlayer,
        };
        let current = match self.registry.lookup(id) {
            Some(player) => player.position(),
            None => return MoveOutcome::UnknownPlayer,
        };

        let target = update.apply_to(current);
        if let Some(object) = map.solid_object_at(target) {
            debug!(id, object = %object.id, "Move blocked by solid object");
            return MoveOutcome::Blocked;
        }

        let transition = self.portal_transition(map, target);
        let final_position = match &transition {
            Some((_, spawn)) => *spawn,
            None => target,
        };

        let player = match self.registry.with_player_mut(id, |player| {
            player.set_position(final_position);
            player.clone()
        }) {
            Some(player) => player,
            None => return MoveOutcome::UnknownPlayer,
        };

        let transition = transition.map(|(dest, _)| dest);
        if let Some(ref dest) = transition {
            locations.insert(id, dest.id.clone());
            info!(id, map = %dest.id, "Player took a portal");
        }

        MoveOutcome::Accepted { player, transition }
    }

    /// Resolve an interact request against whatever is nearby.
    ///
    /// NPCs respond before objects, each in placement order, and only
    /// the first responder is reported. A portal in range with a valid
    /// destination additionally teleports the player, and the result
    /// message then reports the arrival map instead.
    ///
    /// Returns `None` when no player is registered for the session.
    pub fn interact(
        &self,
        id: SessionId,
        descriptor: &InteractionData,
    ) -> Option<InteractOutcome> {
        let mut locations = self.locations.lock();
        let map_id = locations.get(&id)?.clone();
        let map = self.catalog.get(&map_id)?;
        let position = self.registry.lookup(id)?.position();

        debug!(
            id,
            kind = ?descriptor.kind,
            target = %descriptor.target_id,
            "Interact request"
        );

        let mut result = match map.npc_within(position, INTERACTION_RANGE) {
            Some(npc) => {
                InteractionResult::success(format!("{}: {}", npc.name, npc.greeting()))
            }
            None => match map.interactable_within(position, INTERACTION_RANGE) {
                Some(object) if object.kind == ObjectKind::Item => {
                    let name = object
                        .item
                        .as_ref()
                        .map(|item| item.name.as_str())
                        .unwrap_or("item");
                    InteractionResult::success(format!("Pressione E para coletar {name}"))
                }
                Some(_) => InteractionResult::success("Pressione E para entrar no portal"),
                None => InteractionResult::failure(),
            },
        };

        let mut moved = None;
        let mut transition = None;
        if let Some((dest, spawn)) = self.portal_transition(map, position) {
            if let Some(player) = self.registry.with_player_mut(id, |player| {
                player.set_position(spawn);
                player.clone()
            }) {
                result = InteractionResult::success(format!("Teleportado para {}!", dest.name));
                info!(id, map = %dest.id, "Player took a portal");
                locations.insert(id, dest.id.clone());
                moved = Some(player);
                transition = Some(dest);
            }
        }

        Some(InteractOutcome {
            result,
            moved,
            map: transition,
        })
    }

    /// Build the chat line to fan out to every connection, including
    /// the sender. Text is carried as-is, without length enforcement.
    pub fn chat(&self, id: SessionId, msg: impl Into<String>) -> ChatBroadcast {
        ChatBroadcast {
            id,
            msg: msg.into(),
            kind: ChatKind::Normal,
        }
    }

    /// Equip an inventory item into a slot.
    ///
    /// The item must be present in the inventory and its kind must
    /// match the slot. Anything already in the slot is discarded
    /// outright and keeps its stat contribution; the new item's deltas
    /// are added on top. Returns the updated player, or `None` when the
    /// request was a no-op.
    pub fn equip(&self, id: SessionId, item_id: &str, slot: EquipSlot) -> Option<Player> {
        let _guard = self.locations.lock();
        let updated = self
            .registry
            .with_player_mut(id, |player| {
                let kind_matches = player
                    .inventory
                    .find(item_id)
                    .map(|item| item.kind.equip_slot() == Some(slot))
                    .unwrap_or(false);
                if !kind_matches {
                    return None;
                }

                let item = player.inventory.remove_by_id(item_id)?;
                let stats = item.stats;
                if let Some(discarded) = player.equipped.set(slot, item) {
                    // The displaced item is destroyed, not returned to
                    // the inventory.
                    debug!(id, item = %discarded.id, "Discarded previously equipped item");
                }
                player.apply_item_stats(&stats);
                Some(player.clone())
            })
            .flatten()?;

        debug!(id, item = %item_id, slot = %slot, "Item equipped");
        Some(updated)
    }

    /// Return the item in a slot to the inventory, reversing its stat
    /// deltas exactly. A no-op when the slot is empty or the inventory
    /// has no room.
    pub fn unequip(&self, id: SessionId, slot: EquipSlot) -> Option<Player> {
        let _guard = self.locations.lock();
        let updated = self
            .registry
            .with_player_mut(id, |player| {
                if player.inventory.is_full() {
                    return None;
                }
                let item = player.equipped.take(slot)?;
                let stats = item.stats;
                player.inventory.add(item).ok()?;
                player.remove_item_stats(&stats);
                Some(player.clone())
            })
            .flatten()?;

        debug!(id, slot = %slot, "Item unequipped");
        Some(updated)
    }

    /// Remove a session's player from the world.
    ///
    /// Idempotent: only the first call returns the removed player.
    pub fn leave(&self, id: SessionId) -> Option<Player> {
        let mut locations = self.locations.lock();
        locations.remove(&id);
        let player = self.registry.unregister(id);
        if let Some(ref player) = player {
            info!(id, nickname = %player.nickname, "Player left the world");
        }
        player
    }

    /// The player registry, for read access and targeted mutations
    /// outside the intent path
    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// Number of players currently in the world
    pub fn player_count(&self) -> usize {
        self.registry.count()
    }

    /// Snapshot of every player in the world
    pub fn players(&self) -> HashMap<SessionId, Player> {
        self.registry.all()
    }

    /// Map id the session is currently on
    pub fn current_map_id(&self, id: SessionId) -> Option<String> {
        self.locations.lock().get(&id).cloned()
    }

    /// Id of the map new players start on
    pub fn starting_map(&self) -> &str {
        &self.starting_map
    }

    /// Destination map and arrival point when `position` sits within
    /// portal range and the portal's destination actually exists
    fn portal_transition(
        &self,
        map: &MapDefinition,
        position: Position,
    ) -> Option<(MapDefinition, Position)> {
        let portal = map.portal_within(position, INTERACTION_RANGE)?;
        let dest_id = portal.portal_to.as_deref()?;
        let spawn = portal.portal_spawn?;
        match self.catalog.get(dest_id) {
            Some(dest) => Some((dest.clone(), spawn)),
            None => {
                debug!(portal = %portal.id, dest = %dest_id, "Portal destination not in catalog");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::item;
    use crate::game::map::MapObject;
    use crate::protocol::events::{InteractionKind, TargetKind};

    fn world() -> WorldCoordinator {
        WorldCoordinator::new("town").unwrap()
    }

    fn move_to(x: f32, y: f32, z: f32) -> MoveData {
        MoveData {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    fn descriptor() -> InteractionData {
        InteractionData {
            kind: InteractionKind::Talk,
            target_id: "anything".to_string(),
            target_type: TargetKind::Npc,
        }
    }

    fn give(world: &WorldCoordinator, id: SessionId, item: item::Item) {
        world
            .registry()
            .with_player_mut(id, |player| player.inventory.add(item).unwrap())
            .unwrap();
    }

    #[test]
    fn test_join_returns_full_state() {
        let world = world();
        let alice = world.join(1, "Alice").unwrap();
        assert_eq!(alice.player.id, 1);
        assert_eq!(alice.player.hp, 100);
        assert_eq!(alice.map.id, "town");
        assert_eq!(alice.players.len(), 1);

        let bob = world.join(2, "Bob").unwrap();
        assert_eq!(bob.players.len(), 2);
        // Alice appears fully formed in Bob's snapshot
        assert_eq!(bob.players[&1].nickname, "Alice");
        assert_eq!(bob.players[&1].inventory.len(), 1);
    }

    #[test]
    fn test_join_duplicate_session_fails() {
        let world = world();
        world.join(1, "Alice").unwrap();
        assert!(world.join(1, "Impostor").is_err());
        assert_eq!(world.player_count(), 1);
    }

    #[test]
    fn test_unknown_starting_map_rejected() {
        assert!(WorldCoordinator::new("atlantis").is_err());
    }

    #[test]
    fn test_join_places_player_on_spawn_point() {
        let mut catalog = MapCatalog::new();
        catalog.insert(MapDefinition {
            id: "island".to_string(),
            name: "Ilha".to_string(),
            width: 20.0,
            height: 20.0,
            objects: Vec::new(),
            npcs: Vec::new(),
            spawn_points: vec![Position::new(3.0, 0.0, -4.0)],
        });

        let world = WorldCoordinator::with_catalog(Arc::new(catalog), "island").unwrap();
        let data = world.join(1, "Alice").unwrap();

        assert_eq!(data.player.position(), Position::new(3.0, 0.0, -4.0));
        // The snapshot carries the spawned position too
        assert_eq!(data.players[&1].position(), Position::new(3.0, 0.0, -4.0));
    }

    #[test]
    fn test_move_merges_partial_update() {
        let world = world();
        world.join(1, "Alice").unwrap();

        let outcome = world.move_player(
            1,
            MoveData {
                x: Some(1.5),
                ..Default::default()
            },
        );
        match outcome {
            MoveOutcome::Accepted { player, transition } => {
                assert_eq!(player.x, 1.5);
                assert_eq!(player.z, 0.0);
                assert!(transition.is_none());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_empty_move_is_accepted() {
        let world = world();
        world.join(1, "Alice").unwrap();
        assert!(matches!(
            world.move_player(1, MoveData::default()),
            MoveOutcome::Accepted { .. }
        ));
    }

    #[test]
    fn test_move_blocked_by_wall() {
        let world = world();
        world.join(1, "Alice").unwrap();

        let outcome = world.move_player(1, move_to(17.6, 0.0, 0.0));
        assert_eq!(outcome, MoveOutcome::Blocked);
        // Nothing mutated
        let player = world.registry().lookup(1).unwrap();
        assert_eq!(player.position(), Position::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_move_for_unknown_session() {
        let world = world();
        assert_eq!(
            world.move_player(9, move_to(1.0, 0.0, 1.0)),
            MoveOutcome::UnknownPlayer
        );
    }

    #[test]
    fn test_portal_transition_on_move() {
        let world = world();
        world.join(1, "Alice").unwrap();

        // (0, 0, -15) is clear ground one unit from the town portal
        let outcome = world.move_player(1, move_to(0.0, 0.0, -15.0));
        match outcome {
            MoveOutcome::Accepted { player, transition } => {
                let map = transition.expect("portal should fire");
                assert_eq!(map.id, "cave");
                assert_eq!(player.position(), Position::new(0.0, 0.0, 0.0));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(world.current_map_id(1).as_deref(), Some("cave"));
    }

    #[test]
    fn test_portal_roundtrip_returns_to_town() {
        let world = world();
        world.join(1, "Alice").unwrap();
        world.move_player(1, move_to(0.0, 0.0, -15.0));

        // Now in the cave at the origin; walk to the exit portal
        let outcome = world.move_player(1, move_to(0.0, 0.0, 15.0));
        match outcome {
            MoveOutcome::Accepted { player, transition } => {
                assert_eq!(transition.unwrap().id, "town");
                assert_eq!(player.position(), Position::new(0.0, 0.0, -16.0));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(world.current_map_id(1).as_deref(), Some("town"));
    }

    #[test]
    fn test_interact_reports_npc_first() {
        let world = world();
        world.join(1, "Alice").unwrap();
        world.move_player(1, move_to(0.5, 0.0, 0.0));

        let outcome = world.interact(1, &descriptor()).unwrap();
        assert!(outcome.result.success);
        assert_eq!(
            outcome.result.message.as_deref(),
            Some("Guia de Missão: Preciso de ajuda para derrotar o dragão!")
        );
        assert!(outcome.moved.is_none());
        assert!(outcome.map.is_none());
    }

    #[test]
    fn test_interact_reports_pickup_prompt() {
        let world = WorldCoordinator::new("cave").unwrap();
        world.join(1, "Alice").unwrap();
        world.move_player(1, move_to(-5.0, 0.0, -4.0));

        let outcome = world.interact(1, &descriptor()).unwrap();
        assert_eq!(
            outcome.result.message.as_deref(),
            Some("Pressione E para coletar Cristal Mágico")
        );
    }

    #[test]
    fn test_interact_with_nothing_in_range() {
        let world = world();
        world.join(1, "Alice").unwrap();
        world.move_player(1, move_to(5.0, 0.0, 5.0));

        let outcome = world.interact(1, &descriptor()).unwrap();
        assert!(!outcome.result.success);
        assert!(outcome.result.message.is_none());
    }

    #[test]
    fn test_interact_for_unknown_session() {
        let world = world();
        assert!(world.interact(9, &descriptor()).is_none());
    }

    #[test]
    fn test_interact_portal_teleports() {
        // Custom catalog with a portal right at the spawn point, so the
        // teleport is triggered by interact rather than by movement
        let mut catalog = MapCatalog::new();
        catalog.insert(MapDefinition {
            id: "start".to_string(),
            name: "Start".to_string(),
            width: 10.0,
            height: 10.0,
            objects: vec![MapObject {
                id: "gate".to_string(),
                kind: ObjectKind::Portal,
                x: 1.0,
                y: 0.0,
                z: 0.0,
                width: 2.0,
                height: 3.0,
                depth: 1.0,
                solid: false,
                item: None,
                portal_to: Some("dest".to_string()),
                portal_spawn: Some(Position::new(5.0, 0.0, 5.0)),
            }],
            npcs: Vec::new(),
            spawn_points: vec![Position::default()],
        });
        catalog.insert(MapDefinition {
            id: "dest".to_string(),
            name: "Destino".to_string(),
            width: 20.0,
            height: 20.0,
            objects: Vec::new(),
            npcs: Vec::new(),
            spawn_points: vec![Position::new(5.0, 0.0, 5.0)],
        });

        let world = WorldCoordinator::with_catalog(Arc::new(catalog), "start").unwrap();
        world.join(1, "Alice").unwrap();

        let outcome = world.interact(1, &descriptor()).unwrap();
        assert!(outcome.result.success);
        assert_eq!(
            outcome.result.message.as_deref(),
            Some("Teleportado para Destino!")
        );
        let moved = outcome.moved.unwrap();
        assert_eq!(moved.position(), Position::new(5.0, 0.0, 5.0));
        assert_eq!(outcome.map.unwrap().id, "dest");
        assert_eq!(world.current_map_id(1).as_deref(), Some("dest"));
    }

    #[test]
    fn test_chat_payload() {
        let world = world();
        let line = world.chat(4, "oi pessoal");
        assert_eq!(line.id, 4);
        assert_eq!(line.msg, "oi pessoal");
        assert_eq!(line.kind, ChatKind::Normal);
    }

    #[test]
    fn test_equip_moves_item_and_applies_stats() {
        let world = world();
        world.join(1, "Alice").unwrap();
        give(&world, 1, item::wooden_sword());

        let player = world.equip(1, "sword", EquipSlot::Weapon).unwrap();
        assert_eq!(player.attack, 15);
        assert!(!player.inventory.contains("sword"));
        assert_eq!(player.equipped.weapon.as_ref().unwrap().id, "sword");
    }

    #[test]
    fn test_equip_rejects_wrong_slot() {
        let world = world();
        world.join(1, "Alice").unwrap();
        give(&world, 1, item::wooden_sword());

        assert!(world.equip(1, "sword", EquipSlot::Armor).is_none());
        // Unchanged: still in inventory, slot still empty
        let player = world.registry().lookup(1).unwrap();
        assert!(player.inventory.contains("sword"));
        assert!(player.equipped.armor.is_none());
        assert_eq!(player.attack, 10);
    }

    #[test]
    fn test_equip_rejects_unequippable_kind() {
        let world = world();
        world.join(1, "Alice").unwrap();
        // The starting potion is consumable and fits no slot
        assert!(world.equip(1, "potion1", EquipSlot::Weapon).is_none());
    }

    #[test]
    fn test_equip_missing_item_is_noop() {
        let world = world();
        world.join(1, "Alice").unwrap();
        assert!(world.equip(1, "excalibur", EquipSlot::Weapon).is_none());
    }

    #[test]
    fn test_equip_twice_is_noop() {
        let world = world();
        world.join(1, "Alice").unwrap();
        give(&world, 1, item::wooden_sword());

        assert!(world.equip(1, "sword", EquipSlot::Weapon).is_some());
        assert!(world.equip(1, "sword", EquipSlot::Weapon).is_none());
        assert_eq!(world.registry().lookup(1).unwrap().attack, 15);
    }

    #[test]
    fn test_equip_discards_displaced_item() {
        let world = world();
        world.join(1, "Alice").unwrap();
        give(&world, 1, item::wooden_sword());
        give(
            &world,
            1,
            item::Item::new("axe", "Machado", item::ItemKind::Weapon, item::Rarity::Common)
                .with_stats(item::ItemStats {
                    attack: Some(7),
                    ..Default::default()
                }),
        );

        world.equip(1, "sword", EquipSlot::Weapon).unwrap();
        let player = world.equip(1, "axe", EquipSlot::Weapon).unwrap();

        // The sword is gone entirely but its stat contribution remains
        assert_eq!(player.equipped.weapon.as_ref().unwrap().id, "axe");
        assert!(!player.inventory.contains("sword"));
        assert_eq!(player.attack, 10 + 5 + 7);
    }

    #[test]
    fn test_unequip_restores_stats_exactly() {
        let world = world();
        world.join(1, "Alice").unwrap();
        give(&world, 1, item::wooden_sword());

        world.equip(1, "sword", EquipSlot::Weapon).unwrap();
        let player = world.unequip(1, EquipSlot::Weapon).unwrap();

        assert_eq!(player.attack, 10);
        assert_eq!(player.max_hp, 100);
        assert!(player.inventory.contains("sword"));
        assert!(player.equipped.weapon.is_none());
    }

    #[test]
    fn test_unequip_empty_slot_is_noop() {
        let world = world();
        world.join(1, "Alice").unwrap();
        assert!(world.unequip(1, EquipSlot::Weapon).is_none());
    }

    #[test]
    fn test_unequip_blocked_by_full_inventory() {
        let world = world();
        world.join(1, "Alice").unwrap();
        give(&world, 1, item::wooden_sword());
        world.equip(1, "sword", EquipSlot::Weapon).unwrap();

        // Fill the remaining inventory space
        world.registry().with_player_mut(1, |player| {
            let mut n = 0;
            while player.inventory.add(item::magic_crystal(format!("c{n}"))).is_ok() {
                n += 1;
            }
        });

        assert!(world.unequip(1, EquipSlot::Weapon).is_none());
        let player = world.registry().lookup(1).unwrap();
        assert_eq!(player.equipped.weapon.as_ref().unwrap().id, "sword");
        assert_eq!(player.attack, 15);
    }

    #[test]
    fn test_leave_is_idempotent() {
        let world = world();
        world.join(1, "Alice").unwrap();

        let removed = world.leave(1).unwrap();
        assert_eq!(removed.nickname, "Alice");
        assert_eq!(world.player_count(), 0);
        assert!(world.leave(1).is_none());
    }

    #[test]
    fn test_late_intents_after_leave_are_dropped() {
        let world = world();
        world.join(1, "Alice").unwrap();
        world.leave(1);

        assert_eq!(
            world.move_player(1, move_to(1.0, 0.0, 0.0)),
            MoveOutcome::UnknownPlayer
        );
        assert!(world.interact(1, &descriptor()).is_none());
        assert!(world.equip(1, "sword", EquipSlot::Weapon).is_none());
    }

    #[test]
    fn test_player_count_tracks_joins_and_leaves() {
        let world = world();
        for id in 0..8 {
            world.join(id, format!("player{id}")).unwrap();
        }
        for id in 0..3 {
            world.leave(id);
        }
        assert_eq!(world.player_count(), 5);
        assert_eq!(world.players().len(), 5);
    }
}
