//! Item definitions module
//!
//! Defines the item value type shared by inventories, equipment slots and
//! map chests, plus constructors for the standard world content. Items are
//! plain values: cloning one yields an independent copy, and an instance
//! lives in exactly one inventory, equipment slot or chest at a time.

use serde::{Deserialize, Serialize};

/// Item categories carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Armor,
    Accessory,
    Consumable,
    Material,
}

impl ItemKind {
    /// The equipment slot this kind of item occupies, if any
    pub fn equip_slot(self) -> Option<EquipSlot> {
        match self {
            ItemKind::Weapon => Some(EquipSlot::Weapon),
            ItemKind::Armor => Some(EquipSlot::Armor),
            ItemKind::Accessory => Some(EquipSlot::Accessory),
            ItemKind::Consumable | ItemKind::Material => None,
        }
    }

    /// Whether items of this kind can be equipped at all
    pub fn is_equippable(self) -> bool {
        self.equip_slot().is_some()
    }
}

/// Equipment slots a player can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipSlot {
    Weapon,
    Armor,
    Accessory,
}

impl EquipSlot {
    /// Slot name as it appears on the wire
    pub fn name(self) -> &'static str {
        match self {
            EquipSlot::Weapon => "weapon",
            EquipSlot::Armor => "armor",
            EquipSlot::Accessory => "accessory",
        }
    }
}

impl std::fmt::Display for EquipSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Item rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Additive stat contributions an item grants while equipped.
///
/// `hp` raises the holder's maximum hit points, not the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<u32>,
}

/// An item instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Item identifier, unique within the world content
    pub id: String,
    /// Display name
    pub name: String,
    /// Item category
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Rarity tier
    pub rarity: Rarity,
    /// Stat deltas applied while equipped
    #[serde(default)]
    pub stats: ItemStats,
    /// Flavor text shown in the inventory panel
    pub description: String,
    /// Icon reference rendered by the client
    pub icon: String,
}

impl Item {
    /// Create a new item with empty stats, description and icon
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ItemKind,
        rarity: Rarity,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            rarity,
            stats: ItemStats::default(),
            description: String::new(),
            icon: String::new(),
        }
    }

    /// Set the stat deltas
    pub fn with_stats(mut self, stats: ItemStats) -> Self {
        self.stats = stats;
        self
    }

    /// Set the description text
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the icon reference
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

/// Item identifiers used by the standard world content
pub mod item_ids {
    pub const STARTING_POTION: &str = "potion1";
    pub const GOLD_COIN: &str = "gold_coin";
    pub const HEALTH_POTION: &str = "health_potion";
    pub const WOODEN_SWORD: &str = "sword";
    pub const WOODEN_SHIELD: &str = "shield";
    pub const MAGIC_CRYSTAL: &str = "magic_crystal";
    pub const MAGIC_CRYSTAL_2: &str = "magic_crystal2";
    pub const CAVE_TREASURE: &str = "cave_treasure";
}

/// The healing potion every new player starts with
pub fn starting_potion() -> Item {
    Item::new(
        item_ids::STARTING_POTION,
        "Poção de Cura",
        ItemKind::Consumable,
        Rarity::Common,
    )
    .with_stats(ItemStats {
        hp: Some(50),
        ..Default::default()
    })
    .with_description("Restaura 50 pontos de vida")
    .with_icon("🧪")
}

/// Beginner weapon found in the town chest
pub fn wooden_sword() -> Item {
    Item::new(
        item_ids::WOODEN_SWORD,
        "Espada de Madeira",
        ItemKind::Weapon,
        Rarity::Common,
    )
    .with_stats(ItemStats {
        attack: Some(5),
        ..Default::default()
    })
    .with_description("Uma espada simples para iniciantes.")
    .with_icon("⚔️")
}

/// Beginner armor found in the town chest
pub fn wooden_shield() -> Item {
    Item::new(
        item_ids::WOODEN_SHIELD,
        "Escudo de Madeira",
        ItemKind::Armor,
        Rarity::Common,
    )
    .with_stats(ItemStats {
        defense: Some(3),
        ..Default::default()
    })
    .with_description("Um escudo leve para defender.")
    .with_icon("🛡️")
}

pub fn gold_coin() -> Item {
    Item::new(
        item_ids::GOLD_COIN,
        "Moeda de Ouro",
        ItemKind::Consumable,
        Rarity::Common,
    )
    .with_stats(ItemStats {
        hp: Some(10),
        ..Default::default()
    })
    .with_description("Uma moeda de ouro valiosa.")
    .with_icon("💰")
}

pub fn health_potion() -> Item {
    Item::new(
        item_ids::HEALTH_POTION,
        "Poção de Vida",
        ItemKind::Consumable,
        Rarity::Uncommon,
    )
    .with_stats(ItemStats {
        hp: Some(50),
        ..Default::default()
    })
    .with_description("Restaura 50 de HP.")
    .with_icon("💊")
}

/// Cave pickup; two instances exist with distinct ids
pub fn magic_crystal(id: impl Into<String>) -> Item {
    Item::new(id, "Cristal Mágico", ItemKind::Consumable, Rarity::Rare)
        .with_stats(ItemStats {
            hp: Some(100),
            ..Default::default()
        })
        .with_description("Um cristal brilhante com poder mágico.")
        .with_icon("💎")
}

pub fn cave_treasure() -> Item {
    Item::new(
        item_ids::CAVE_TREASURE,
        "Tesouro da Caverna",
        ItemKind::Consumable,
        Rarity::Epic,
    )
    .with_stats(ItemStats {
        hp: Some(200),
        ..Default::default()
    })
    .with_description("Um tesouro antigo encontrado na caverna.")
    .with_icon("🏺")
}
