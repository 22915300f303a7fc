//! Map module
//!
//! Static world geometry and content: map definitions with their objects,
//! NPCs and spawn points, plus the collision and proximity queries the
//! world coordinator resolves movement and interactions against.
//!
//! Map data is immutable after startup and shared behind an `Arc`. The
//! standard catalog ships two maps, the town and the cave, linked by a
//! portal pair.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::game::item::{self, Item};
use crate::game::player::Position;

/// Distance (inclusive) within which NPCs, pickups and portals respond
pub const INTERACTION_RANGE: f32 = 2.0;

/// Half extent of the player's collision box on every axis
pub const PLAYER_HALF_EXTENT: f32 = 0.5;

/// Object categories placed on maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Wall,
    Tree,
    Rock,
    Chest,
    Door,
    Item,
    Portal,
}

/// NPC roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NpcKind {
    Merchant,
    Guard,
    Quest,
    Wanderer,
}

/// How an NPC moves around, if at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementPattern {
    Random,
    Patrol,
    Static,
}

/// A static object placed on a map.
///
/// The box spans `width`, `height` and `depth` centered on `(x, y, z)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapObject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// Solid objects reject movement into their box
    pub solid: bool,
    /// Item granted by pickups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
    /// Destination map id for portals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_to: Option<String>,
    /// Arrival position on the destination map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_spawn: Option<Position>,
}

impl MapObject {
    /// Center of the object's box
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y, self.z)
    }

    /// Whether a player centered at `target` would overlap this object.
    ///
    /// Non-solid objects never block. Overlap is strict on every axis,
    /// so boxes that merely touch do not collide.
    pub fn blocks(&self, target: Position) -> bool {
        if !self.solid {
            return false;
        }
        target.x + PLAYER_HALF_EXTENT > self.x - self.width / 2.0
            && target.x - PLAYER_HALF_EXTENT < self.x + self.width / 2.0
            && target.y + PLAYER_HALF_EXTENT > self.y - self.height / 2.0
            && target.y - PLAYER_HALF_EXTENT < self.y + self.height / 2.0
            && target.z + PLAYER_HALF_EXTENT > self.z - self.depth / 2.0
            && target.z - PLAYER_HALF_EXTENT < self.z + self.depth / 2.0
    }
}

/// A non-player character placed on a map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(rename = "type")]
    pub kind: NpcKind,
    /// Lines spoken in order; the first is the interaction greeting
    pub dialogue: Vec<String>,
    pub is_moving: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_pattern: Option<MovementPattern>,
}

impl Npc {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y, self.z)
    }

    /// First dialogue line, or an empty string for a mute NPC
    pub fn greeting(&self) -> &str {
        self.dialogue.first().map(String::as_str).unwrap_or("")
    }
}

/// A complete map: geometry, inhabitants and spawn points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDefinition {
    pub id: String,
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub objects: Vec<MapObject>,
    pub npcs: Vec<Npc>,
    pub spawn_points: Vec<Position>,
}

impl MapDefinition {
    /// First solid object a player centered at `target` would overlap
    pub fn solid_object_at(&self, target: Position) -> Option<&MapObject> {
        self.objects.iter().find(|object| object.blocks(target))
    }

    /// Whether a player centered at `target` overlaps any solid object
    pub fn collides(&self, target: Position) -> bool {
        self.solid_object_at(target).is_some()
    }

    /// First NPC within `range` of `position` on the ground plane,
    /// in placement order
    pub fn npc_within(&self, position: Position, range: f32) -> Option<&Npc> {
        self.npcs
            .iter()
            .find(|npc| position.distance_xz(&npc.position()) <= range)
    }

    /// First pickup or portal within `range` of `position`, in placement
    /// order. Other object kinds are scenery and never respond.
    pub fn interactable_within(&self, position: Position, range: f32) -> Option<&MapObject> {
        self.objects.iter().find(|object| {
            matches!(object.kind, ObjectKind::Item | ObjectKind::Portal)
                && position.distance_xz(&object.position()) <= range
        })
    }

    /// First portal with a destination within `range` of `position`
    pub fn portal_within(&self, position: Position, range: f32) -> Option<&MapObject> {
        self.objects.iter().find(|object| {
            object.kind == ObjectKind::Portal
                && object.portal_to.is_some()
                && position.distance_xz(&object.position()) <= range
        })
    }

    /// Default arrival position, the first spawn point or the origin
    pub fn spawn_point(&self) -> Position {
        self.spawn_points.first().copied().unwrap_or_default()
    }
}

/// Immutable collection of maps keyed by id
#[derive(Debug, Clone, Default)]
pub struct MapCatalog {
    maps: HashMap<String, MapDefinition>,
}

impl MapCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a map to the catalog, replacing any map with the same id
    pub fn insert(&mut self, map: MapDefinition) {
        self.maps.insert(map.id.clone(), map);
    }

    pub fn get(&self, id: &str) -> Option<&MapDefinition> {
        self.maps.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.maps.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Map ids in sorted order
    pub fn map_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.maps.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// The standard world content: the town and the cave
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        catalog.insert(town());
        catalog.insert(cave());
        catalog
    }
}

static STANDARD_CATALOG: OnceLock<Arc<MapCatalog>> = OnceLock::new();

/// Shared instance of the standard catalog, built on first use
pub fn standard_catalog() -> Arc<MapCatalog> {
    STANDARD_CATALOG
        .get_or_init(|| Arc::new(MapCatalog::standard()))
        .clone()
}

fn wall(id: &str, x: f32, z: f32, width: f32, height: f32, depth: f32) -> MapObject {
    MapObject {
        id: id.to_string(),
        kind: ObjectKind::Wall,
        x,
        y: 0.0,
        z,
        width,
        height,
        depth,
        solid: true,
        item: None,
        portal_to: None,
        portal_spawn: None,
    }
}

fn scenery(
    id: &str,
    kind: ObjectKind,
    x: f32,
    y: f32,
    z: f32,
    width: f32,
    height: f32,
    depth: f32,
) -> MapObject {
    MapObject {
        id: id.to_string(),
        kind,
        x,
        y,
        z,
        width,
        height,
        depth,
        solid: false,
        item: None,
        portal_to: None,
        portal_spawn: None,
    }
}

fn chest(id: &str, x: f32, z: f32, item: Item) -> MapObject {
    MapObject {
        id: id.to_string(),
        kind: ObjectKind::Chest,
        x,
        y: 0.0,
        z,
        width: 1.0,
        height: 1.0,
        depth: 1.0,
        solid: false,
        item: Some(item),
        portal_to: None,
        portal_spawn: None,
    }
}

fn pickup(id: &str, x: f32, z: f32, item: Item) -> MapObject {
    MapObject {
        id: id.to_string(),
        kind: ObjectKind::Item,
        x,
        y: 0.0,
        z,
        width: 0.5,
        height: 1.0,
        depth: 0.5,
        solid: false,
        item: Some(item),
        portal_to: None,
        portal_spawn: None,
    }
}

fn portal(id: &str, x: f32, z: f32, to: &str, spawn: Position) -> MapObject {
    MapObject {
        id: id.to_string(),
        kind: ObjectKind::Portal,
        x,
        y: 0.0,
        z,
        width: 2.0,
        height: 3.0,
        depth: 1.0,
        solid: false,
        item: None,
        portal_to: Some(to.to_string()),
        portal_spawn: Some(spawn),
    }
}

fn npc(id: &str, name: &str, x: f32, z: f32, kind: NpcKind, lines: &[&str]) -> Npc {
    Npc {
        id: id.to_string(),
        name: name.to_string(),
        x,
        y: 0.0,
        z,
        kind,
        dialogue: lines.iter().map(|line| line.to_string()).collect(),
        is_moving: false,
        movement_pattern: Some(MovementPattern::Static),
    }
}

fn town() -> MapDefinition {
    MapDefinition {
        id: "town".to_string(),
        name: "Vila Inicial".to_string(),
        width: 40.0,
        height: 40.0,
        objects: vec![
            // Outer walls
            wall("wall1", -18.0, 0.0, 1.0, 4.0, 40.0),
            wall("wall2", 18.0, 0.0, 1.0, 4.0, 40.0),
            wall("wall3", 0.0, -18.0, 40.0, 4.0, 1.0),
            wall("wall4", 0.0, 18.0, 40.0, 4.0, 1.0),
            // Scattered trees
            scenery("tree1", ObjectKind::Tree, -15.0, 0.0, -15.0, 1.0, 4.0, 1.0),
            scenery("tree2", ObjectKind::Tree, 15.0, 0.0, -15.0, 1.0, 4.0, 1.0),
            scenery("tree3", ObjectKind::Tree, -15.0, 0.0, 15.0, 1.0, 4.0, 1.0),
            scenery("tree4", ObjectKind::Tree, 15.0, 0.0, 15.0, 1.0, 4.0, 1.0),
            scenery("tree5", ObjectKind::Tree, -10.0, 0.0, -10.0, 1.0, 4.0, 1.0),
            scenery("tree6", ObjectKind::Tree, 10.0, 0.0, -10.0, 1.0, 4.0, 1.0),
            scenery("tree7", ObjectKind::Tree, -10.0, 0.0, 10.0, 1.0, 4.0, 1.0),
            scenery("tree8", ObjectKind::Tree, 10.0, 0.0, 10.0, 1.0, 4.0, 1.0),
            scenery("tree9", ObjectKind::Tree, 0.0, 0.0, -12.0, 1.0, 4.0, 1.0),
            scenery("tree10", ObjectKind::Tree, 0.0, 0.0, 12.0, 1.0, 4.0, 1.0),
            // Decorative rocks
            scenery("rock1", ObjectKind::Rock, -12.0, 0.0, -12.0, 1.0, 1.0, 1.0),
            scenery("rock2", ObjectKind::Rock, 12.0, 0.0, -12.0, 1.0, 1.0, 1.0),
            scenery("rock3", ObjectKind::Rock, -12.0, 0.0, 12.0, 1.0, 1.0, 1.0),
            scenery("rock4", ObjectKind::Rock, 12.0, 0.0, 12.0, 1.0, 1.0, 1.0),
            // Item chests
            chest("chest1", -15.0, 0.0, item::gold_coin()),
            chest("chest2", 15.0, 0.0, item::health_potion()),
            chest("chest3", 0.0, 15.0, item::wooden_sword()),
            chest("chest4", 0.0, -15.0, item::wooden_shield()),
            // Portal to the cave
            portal("portal1", 0.0, -16.0, "cave", Position::new(0.0, 0.0, 0.0)),
        ],
        npcs: vec![
            npc(
                "merchant1",
                "Mercador",
                -8.0,
                8.0,
                NpcKind::Merchant,
                &["Olá! Como posso ajudar?", "Vem comprar algo!"],
            ),
            npc(
                "guard1",
                "Guarda",
                8.0,
                -8.0,
                NpcKind::Guard,
                &["Quem é você?", "Não se aproxime!"],
            ),
            npc(
                "quest1",
                "Guia de Missão",
                0.0,
                0.0,
                NpcKind::Quest,
                &["Preciso de ajuda para derrotar o dragão!"],
            ),
            npc(
                "wanderer1",
                "Vagabundo",
                -12.0,
                0.0,
                NpcKind::Wanderer,
                &["Onde está a cidade?", "Preciso de um guia."],
            ),
        ],
        spawn_points: vec![Position::new(0.0, 0.0, 0.0)],
    }
}

fn cave() -> MapDefinition {
    MapDefinition {
        id: "cave".to_string(),
        name: "Caverna Sombria".to_string(),
        width: 30.0,
        height: 30.0,
        objects: vec![
            // Cave walls
            wall("cave_wall1", -14.0, 0.0, 1.0, 5.0, 30.0),
            wall("cave_wall2", 14.0, 0.0, 1.0, 5.0, 30.0),
            wall("cave_wall3", 0.0, -14.0, 30.0, 5.0, 1.0),
            wall("cave_wall4", 0.0, 14.0, 30.0, 5.0, 1.0),
            // Stalactites hanging from the ceiling
            scenery("stalactite1", ObjectKind::Rock, -10.0, 2.0, -10.0, 0.5, 2.0, 0.5),
            scenery("stalactite2", ObjectKind::Rock, 10.0, 2.0, -10.0, 0.5, 2.0, 0.5),
            scenery("stalactite3", ObjectKind::Rock, -10.0, 2.0, 10.0, 0.5, 2.0, 0.5),
            scenery("stalactite4", ObjectKind::Rock, 10.0, 2.0, 10.0, 0.5, 2.0, 0.5),
            scenery("stalactite5", ObjectKind::Rock, 0.0, 2.0, 0.0, 0.5, 2.0, 0.5),
            // Stalagmites on the floor
            scenery("stalagmite1", ObjectKind::Rock, -8.0, 0.0, -8.0, 1.0, 2.0, 1.0),
            scenery("stalagmite2", ObjectKind::Rock, 8.0, 0.0, -8.0, 1.0, 2.0, 1.0),
            scenery("stalagmite3", ObjectKind::Rock, -8.0, 0.0, 8.0, 1.0, 2.0, 1.0),
            scenery("stalagmite4", ObjectKind::Rock, 8.0, 0.0, 8.0, 1.0, 2.0, 1.0),
            // Magic crystals
            pickup("crystal1", -5.0, -5.0, item::magic_crystal(item::item_ids::MAGIC_CRYSTAL)),
            pickup("crystal2", 5.0, -5.0, item::magic_crystal(item::item_ids::MAGIC_CRYSTAL_2)),
            // Cave treasure
            chest("cave_chest", 0.0, 10.0, item::cave_treasure()),
            // Portal back to town
            portal("portal2", 0.0, 16.0, "town", Position::new(0.0, 0.0, -16.0)),
        ],
        npcs: vec![
            npc(
                "cave_guardian",
                "Guardião da Caverna",
                0.0,
                0.0,
                NpcKind::Guard,
                &["Esta caverna é perigosa!", "Cuidado com os cristais!"],
            ),
            npc(
                "cave_merchant",
                "Mercador da Caverna",
                -8.0,
                0.0,
                NpcKind::Merchant,
                &["Bem-vindo à caverna!", "Tenho itens especiais aqui!"],
            ),
        ],
        spawn_points: vec![Position::new(0.0, 0.0, 0.0)],
    }
}
