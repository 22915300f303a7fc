//! Integration tests for the world coordinator
//!
//! These tests verify the end-to-end behavior of:
//! - Join/leave lifecycle and world snapshots
//! - Movement with collision checks and portal transitions
//! - Interaction resolution (NPCs, pickups)
//! - Equipment changes and their stat effects
//! - Concurrent intent handling

use aventura_server::game::item::{self, EquipSlot, Item, ItemKind, ItemStats, Rarity};
use aventura_server::game::world::{MoveOutcome, WorldCoordinator};
use aventura_server::protocol::events::{
    ChatKind, InteractionData, InteractionKind, MoveData, TargetKind,
};

fn world() -> WorldCoordinator {
    WorldCoordinator::new("town").expect("standard catalog should contain the town")
}

fn move_to(x: f32, z: f32) -> MoveData {
    MoveData {
        x: Some(x),
        y: None,
        z: Some(z),
    }
}

fn talk_to(target_id: &str, target_type: TargetKind) -> InteractionData {
    InteractionData {
        kind: InteractionKind::Talk,
        target_id: target_id.to_string(),
        target_type,
    }
}

/// Test that a join produces a fully formed player and world snapshot
#[test]
fn test_join_provides_complete_snapshot() {
    let world = world();
    let data = world.join(1, "Alice").expect("join should succeed");

    assert_eq!(data.player.id, 1);
    assert_eq!(data.player.nickname, "Alice");
    assert_eq!(data.player.level, 1);
    assert_eq!(data.player.hp, 100);
    assert_eq!(data.player.max_hp, 100);
    assert_eq!(data.player.attack, 10);
    assert_eq!(data.player.defense, 5);
    assert_eq!(data.player.experience, 0);
    assert_eq!((data.player.x, data.player.y, data.player.z), (0.0, 0.0, 0.0));

    // Color is a css hex string
    assert!(data.player.color.starts_with('#'));
    assert_eq!(data.player.color.len(), 7);

    // Starting inventory holds the healing potion
    assert_eq!(data.player.inventory.len(), 1);
    assert!(data.player.inventory.contains(item::item_ids::STARTING_POTION));

    // The snapshot already includes the new player
    assert_eq!(data.map.id, "town");
    assert!(data.players.contains_key(&1));
}

/// Test that a later join sees everyone who arrived before it
#[test]
fn test_join_sees_existing_players() {
    let world = world();
    world.join(1, "Alice").expect("join should succeed");
    let data = world.join(2, "Bob").expect("join should succeed");

    assert_eq!(data.players.len(), 2);
    let alice = data.players.get(&1).expect("Alice should be visible");
    assert_eq!(alice.nickname, "Alice");
    assert_eq!(alice.hp, 100, "existing players must appear fully formed");
}

/// Test that a session cannot join twice
#[test]
fn test_duplicate_session_join_rejected() {
    let world = world();
    world.join(1, "Alice").expect("join should succeed");

    let result = world.join(1, "Imposter");
    assert!(result.is_err(), "second join on the same session must fail");

    // The original player is untouched
    assert_eq!(world.player_count(), 1);
    let player = world.registry().lookup(1).expect("player should remain");
    assert_eq!(player.nickname, "Alice");
}

/// Test that an accepted move updates the stored position
#[test]
fn test_move_updates_position() {
    let world = world();
    world.join(1, "Alice").expect("join should succeed");

    match world.move_player(1, move_to(3.0, 4.0)) {
        MoveOutcome::Accepted { player, transition } => {
            assert_eq!((player.x, player.y, player.z), (3.0, 0.0, 4.0));
            assert!(transition.is_none());
        }
        other => panic!("expected accepted move, got {:?}", other),
    }

    let stored = world.registry().lookup(1).expect("player should exist");
    assert_eq!((stored.x, stored.z), (3.0, 4.0));
}

/// Test that a move into a wall is rejected without side effects
#[test]
fn test_move_into_wall_is_blocked() {
    let world = world();
    world.join(1, "Alice").expect("join should succeed");

    // The east wall spans x 17.5..18.5, so 17.6 overlaps it
    let outcome = world.move_player(1, move_to(17.6, 0.0));
    assert_eq!(outcome, MoveOutcome::Blocked);

    let stored = world.registry().lookup(1).expect("player should exist");
    assert_eq!((stored.x, stored.z), (0.0, 0.0), "blocked move must not change state");

    // Touching the wall edge exactly is still allowed
    let outcome = world.move_player(1, move_to(17.0, 0.0));
    assert!(matches!(outcome, MoveOutcome::Accepted { .. }));
}

/// Test that omitted axes keep their previous values
#[test]
fn test_partial_move_keeps_missing_axes() {
    let world = world();
    world.join(1, "Alice").expect("join should succeed");
    world.move_player(1, move_to(3.0, 4.0));

    let update = MoveData {
        x: Some(5.0),
        y: None,
        z: None,
    };
    match world.move_player(1, update) {
        MoveOutcome::Accepted { player, .. } => {
            assert_eq!((player.x, player.y, player.z), (5.0, 0.0, 4.0));
        }
        other => panic!("expected accepted move, got {:?}", other),
    }
}

/// Test that walking into portal range teleports to the linked map
#[test]
fn test_portal_move_transitions_maps() {
    let world = world();
    world.join(1, "Alice").expect("join should succeed");

    match world.move_player(1, move_to(0.0, -16.0)) {
        MoveOutcome::Accepted { player, transition } => {
            let map = transition.expect("portal range should trigger a transition");
            assert_eq!(map.id, "cave");
            // Position is the destination spawn, not the portal location
            assert_eq!((player.x, player.y, player.z), (0.0, 0.0, 0.0));
        }
        other => panic!("expected accepted move, got {:?}", other),
    }
    assert_eq!(world.current_map_id(1).as_deref(), Some("cave"));
}

/// Test that the cave portal leads back to the town gate
#[test]
fn test_portal_roundtrip_returns_to_town_gate() {
    let world = world();
    world.join(1, "Alice").expect("join should succeed");
    world.move_player(1, move_to(0.0, -16.0));

    match world.move_player(1, move_to(0.0, 16.0)) {
        MoveOutcome::Accepted { player, transition } => {
            let map = transition.expect("cave portal should lead back to town");
            assert_eq!(map.id, "town");
            assert_eq!((player.x, player.y, player.z), (0.0, 0.0, -16.0));
        }
        other => panic!("expected accepted move, got {:?}", other),
    }
    assert_eq!(world.current_map_id(1).as_deref(), Some("town"));
}

/// Test that interacting next to an NPC returns its dialogue line
#[test]
fn test_interact_npc_returns_dialogue() {
    let world = world();
    world.join(1, "Alice").expect("join should succeed");

    // The quest guide stands on the town spawn point
    let outcome = world
        .interact(1, &talk_to("quest1", TargetKind::Npc))
        .expect("joined players always get an interaction outcome");

    assert!(outcome.result.success);
    assert_eq!(
        outcome.result.message.as_deref(),
        Some("Guia de Missão: Preciso de ajuda para derrotar o dragão!")
    );
    assert!(outcome.moved.is_none());
    assert!(outcome.map.is_none());
}

/// Test that interacting next to a pickup prompts collection
#[test]
fn test_interact_pickup_prompts_collection() {
    let world = world();
    world.join(1, "Alice").expect("join should succeed");

    // Through the portal into the cave, then up next to a crystal
    world.move_player(1, move_to(0.0, -16.0));
    world.move_player(1, move_to(-4.0, -5.0));

    let outcome = world
        .interact(1, &talk_to("crystal1", TargetKind::Object))
        .expect("joined players always get an interaction outcome");

    assert!(outcome.result.success);
    assert_eq!(
        outcome.result.message.as_deref(),
        Some("Pressione E para coletar Cristal Mágico")
    );
}

/// Test that interacting with nothing in range reports failure
#[test]
fn test_interact_out_of_range_fails() {
    let world = world();
    world.join(1, "Alice").expect("join should succeed");
    world.move_player(1, move_to(5.0, 2.0));

    let outcome = world
        .interact(1, &talk_to("merchant1", TargetKind::Npc))
        .expect("joined players always get an interaction outcome");

    assert!(!outcome.result.success);
    assert!(outcome.result.message.is_none());
}

/// Test that equipping a weapon adds its stats and consumes the item
#[test]
fn test_equip_sword_adds_attack() {
    let world = world();
    world.join(1, "Alice").expect("join should succeed");
    world
        .registry()
        .with_player_mut(1, |player| {
            player.inventory.add(item::wooden_sword()).unwrap();
        })
        .expect("player should exist");

    let player = world
        .equip(1, item::item_ids::WOODEN_SWORD, EquipSlot::Weapon)
        .expect("equip should succeed");

    assert_eq!(player.attack, 15);
    assert!(player.equipped.weapon.is_some());
    assert!(
        !player.inventory.contains(item::item_ids::WOODEN_SWORD),
        "equipped item must leave the inventory"
    );
}

/// Test that replacing equipment keeps both stat bonuses and destroys
/// the displaced item
#[test]
fn test_displaced_equipment_is_destroyed() {
    let world = world();
    world.join(1, "Alice").expect("join should succeed");

    let iron_sword = Item::new("iron_sword", "Espada de Ferro", ItemKind::Weapon, Rarity::Uncommon)
        .with_stats(ItemStats {
            attack: Some(7),
            ..Default::default()
        });
    world
        .registry()
        .with_player_mut(1, |player| {
            player.inventory.add(item::wooden_sword()).unwrap();
            player.inventory.add(iron_sword).unwrap();
        })
        .expect("player should exist");

    world
        .equip(1, item::item_ids::WOODEN_SWORD, EquipSlot::Weapon)
        .expect("first equip should succeed");
    let player = world
        .equip(1, "iron_sword", EquipSlot::Weapon)
        .expect("second equip should succeed");

    // Both bonuses remain even though the wooden sword is gone
    assert_eq!(player.attack, 10 + 5 + 7);
    let weapon = player.equipped.weapon.as_ref().expect("slot should be filled");
    assert_eq!(weapon.id, "iron_sword");
    assert!(!player.inventory.contains(item::item_ids::WOODEN_SWORD));
}

/// Test that equipping into the wrong slot or with a missing item is a
/// silent no-op
#[test]
fn test_invalid_equip_is_noop() {
    let world = world();
    world.join(1, "Alice").expect("join should succeed");
    world
        .registry()
        .with_player_mut(1, |player| {
            player.inventory.add(item::wooden_sword()).unwrap();
        })
        .expect("player should exist");

    assert!(world
        .equip(1, item::item_ids::WOODEN_SWORD, EquipSlot::Armor)
        .is_none());
    assert!(world.equip(1, "excalibur", EquipSlot::Weapon).is_none());

    let player = world.registry().lookup(1).expect("player should exist");
    assert_eq!(player.attack, 10, "failed equips must not change stats");
    assert!(player.inventory.contains(item::item_ids::WOODEN_SWORD));
}

/// Test that unequipping returns the item and reverts its stats
#[test]
fn test_unequip_reverts_stats() {
    let world = world();
    world.join(1, "Alice").expect("join should succeed");
    world
        .registry()
        .with_player_mut(1, |player| {
            player.inventory.add(item::wooden_sword()).unwrap();
        })
        .expect("player should exist");
    world
        .equip(1, item::item_ids::WOODEN_SWORD, EquipSlot::Weapon)
        .expect("equip should succeed");

    let player = world
        .unequip(1, EquipSlot::Weapon)
        .expect("unequip should succeed");

    assert_eq!(player.attack, 10);
    assert!(player.equipped.weapon.is_none());
    assert!(player.inventory.contains(item::item_ids::WOODEN_SWORD));

    // The slot is now empty, so a second unequip changes nothing
    assert!(world.unequip(1, EquipSlot::Weapon).is_none());
}

/// Test that chat lines carry the sender id unchanged
#[test]
fn test_chat_carries_sender_and_text() {
    let world = world();
    world.join(7, "Alice").expect("join should succeed");

    let line = world.chat(7, "olá pessoal");
    assert_eq!(line.id, 7);
    assert_eq!(line.msg, "olá pessoal");
    assert_eq!(line.kind, ChatKind::Normal);

    // Empty messages pass through as-is
    assert_eq!(world.chat(7, "").msg, "");
}

/// Test that leaving removes the player and late intents are dropped
#[test]
fn test_leave_drops_late_intents() {
    let world = world();
    world.join(1, "Alice").expect("join should succeed");
    world.join(2, "Bob").expect("join should succeed");

    let gone = world.leave(1).expect("leave should return the player");
    assert_eq!(gone.nickname, "Alice");
    assert_eq!(world.player_count(), 1);

    // Intents for the departed session are silent no-ops
    assert_eq!(world.move_player(1, move_to(1.0, 1.0)), MoveOutcome::UnknownPlayer);
    assert!(world.interact(1, &talk_to("quest1", TargetKind::Npc)).is_none());
    assert!(world.equip(1, "sword", EquipSlot::Weapon).is_none());
    assert!(world.leave(1).is_none(), "leave is idempotent");

    // Bob is unaffected
    assert!(world.registry().contains(2));
}

mod concurrency {
    use std::sync::Arc;

    use super::{move_to, world};
    use aventura_server::game::world::MoveOutcome;

    /// Test that concurrent joins never observe half-built players
    #[test]
    fn test_concurrent_joins_are_isolated() {
        let world = Arc::new(world());

        std::thread::scope(|scope| {
            for id in 1..=16u64 {
                let world = Arc::clone(&world);
                scope.spawn(move || {
                    let data = world
                        .join(id, format!("Player{}", id))
                        .expect("join should succeed");
                    assert!(data.players.contains_key(&id));
                    for player in data.players.values() {
                        assert_eq!(player.hp, 100, "snapshots must hold complete players");
                        assert!(!player.nickname.is_empty());
                    }
                });
            }
        });

        assert_eq!(world.player_count(), 16);
    }

    /// Test that concurrent movers only ever affect their own player
    #[test]
    fn test_concurrent_moves_stay_per_player() {
        let world = Arc::new(world());
        for id in 1..=8u64 {
            world
                .join(id, format!("Player{}", id))
                .expect("join should succeed");
        }

        std::thread::scope(|scope| {
            for id in 1..=8u64 {
                let world = Arc::clone(&world);
                scope.spawn(move || {
                    for step in 1..=50 {
                        let x = id as f32;
                        let z = (step % 10) as f32;
                        let outcome = world.move_player(id, move_to(x, z));
                        assert!(matches!(outcome, MoveOutcome::Accepted { .. }));
                    }
                });
            }
        });

        for id in 1..=8u64 {
            let player = world.registry().lookup(id).expect("player should exist");
            assert_eq!(player.x, id as f32, "each session owns its position");
        }
    }

    /// Test that join/leave churn settles to a consistent count
    #[test]
    fn test_join_leave_churn_settles() {
        let world = Arc::new(world());
        world.join(100, "Resident").expect("join should succeed");

        std::thread::scope(|scope| {
            for id in 1..=8u64 {
                let world = Arc::clone(&world);
                scope.spawn(move || {
                    for _ in 0..25 {
                        world
                            .join(id, format!("Churn{}", id))
                            .expect("join should succeed");
                        world.leave(id).expect("leave should return the player");
                    }
                });
            }
        });

        assert_eq!(world.player_count(), 1);
        assert!(world.registry().contains(100));
    }
}
