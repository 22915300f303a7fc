//! Inventory module
//!
//! This module handles player inventory storage and operations:
//! - Ordered item storage with a fixed capacity
//! - Add and remove operations
//! - Lookup by item id
//!
//! The inventory serializes as a bare JSON array so the wire shape stays
//! a plain item list.

use serde::{Deserialize, Serialize};

use super::item::Item;

/// Maximum number of items a player can carry
pub const INVENTORY_CAPACITY: usize = 20;

/// Error returned when an item cannot be added
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// The inventory already holds `INVENTORY_CAPACITY` items
    Full,
}

impl std::fmt::Display for InventoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InventoryError::Full => write!(f, "inventory is full"),
        }
    }
}

impl std::error::Error for InventoryError {}

/// An ordered collection of items with a fixed capacity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    /// Create an empty inventory
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create an inventory pre-filled with the given items.
    ///
    /// Items beyond the capacity are dropped.
    pub fn with_items(items: Vec<Item>) -> Self {
        let mut inventory = Self::new();
        for item in items {
            if inventory.add(item).is_err() {
                break;
            }
        }
        inventory
    }

    /// Add an item to the end of the inventory
    pub fn add(&mut self, item: Item) -> Result<(), InventoryError> {
        if self.items.len() >= INVENTORY_CAPACITY {
            return Err(InventoryError::Full);
        }
        self.items.push(item);
        Ok(())
    }

    /// Remove and return the first item with the given id
    pub fn remove_by_id(&mut self, item_id: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == item_id)?;
        Some(self.items.remove(index))
    }

    /// Find the first item with the given id
    pub fn find(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Whether an item with the given id is present
    pub fn contains(&self, item_id: &str) -> bool {
        self.find(item_id).is_some()
    }

    /// Number of items carried
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the inventory is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the inventory is at capacity
    pub fn is_full(&self) -> bool {
        self.items.len() >= INVENTORY_CAPACITY
    }

    /// Iterate over the carried items in order
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }
}
