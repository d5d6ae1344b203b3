//! # Items and Inventory
//!
//! Items come in two disjoint classes. Held items are picked up into an
//! inventory slot and used later; instant items fire the moment the player
//! steps on them and never enter the inventory.

use crate::{config, Position};
use serde::{Deserialize, Serialize};

/// Every kind of item.
///
/// Declaration order is the order items are placed during population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    Exit,
    Key,
    Coin,
    Heart,
    Belt,
    HealthPotion,
    Bomb,
    InvulnerabilityPotion,
    SpeedPotion,
    SummonScroll,
    MapScroll,
}

impl ItemKind {
    /// Every kind in population order.
    pub const ALL: [ItemKind; 11] = [
        ItemKind::Exit,
        ItemKind::Key,
        ItemKind::Coin,
        ItemKind::Heart,
        ItemKind::Belt,
        ItemKind::HealthPotion,
        ItemKind::Bomb,
        ItemKind::InvulnerabilityPotion,
        ItemKind::SpeedPotion,
        ItemKind::SummonScroll,
        ItemKind::MapScroll,
    ];

    /// Held items go to the inventory; the rest trigger on contact.
    pub fn is_pickupable(self) -> bool {
        matches!(
            self,
            ItemKind::HealthPotion
                | ItemKind::Bomb
                | ItemKind::InvulnerabilityPotion
                | ItemKind::SpeedPotion
                | ItemKind::SummonScroll
                | ItemKind::MapScroll
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Exit => "exit",
            ItemKind::Key => "key",
            ItemKind::Coin => "coin",
            ItemKind::Heart => "heart",
            ItemKind::Belt => "belt",
            ItemKind::HealthPotion => "health potion",
            ItemKind::Bomb => "bomb",
            ItemKind::InvulnerabilityPotion => "potion of invulnerability",
            ItemKind::SpeedPotion => "potion of speed",
            ItemKind::SummonScroll => "summoning scroll",
            ItemKind::MapScroll => "map",
        }
    }

    pub fn glyph(self) -> char {
        match self {
            ItemKind::Exit => '>',
            ItemKind::Key => 'k',
            ItemKind::Coin => '$',
            ItemKind::Heart => 'h',
            ItemKind::Belt => 'b',
            ItemKind::HealthPotion => '!',
            ItemKind::Bomb => 'o',
            ItemKind::InvulnerabilityPotion => 'i',
            ItemKind::SpeedPotion => 'q',
            ItemKind::SummonScroll => '?',
            ItemKind::MapScroll => 'm',
        }
    }
}

/// An item instance, either lying on a cell or held in a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    /// Cell the item lies on; `None` while held
    pub position: Option<Position>,
}

impl Item {
    /// Creates an item that is not yet placed anywhere.
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            position: None,
        }
    }

    pub fn is_pickupable(&self) -> bool {
        self.kind.is_pickupable()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Fixed-size ordered slots; the slot count always equals the capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<Item>>,
}

impl Inventory {
    /// Creates an inventory with `capacity` empty slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Inventory, Item, ItemKind};
    ///
    /// let mut inventory = Inventory::new(2);
    /// assert_eq!(inventory.add(Item::new(ItemKind::Bomb)), Ok(0));
    /// assert_eq!(inventory.add(Item::new(ItemKind::MapScroll)), Ok(1));
    /// assert!(inventory.add(Item::new(ItemKind::Bomb)).is_err());
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Stores an item in the first empty slot.
    ///
    /// Returns the slot index, or gives the item back when every slot is full.
    pub fn add(&mut self, mut item: Item) -> Result<usize, Item> {
        match self.slots.iter().position(Option::is_none) {
            Some(index) => {
                item.position = None;
                self.slots[index] = Some(item);
                Ok(index)
            }
            None => Err(item),
        }
    }

    /// Looks at a slot without changing it. Out-of-range slots read as empty.
    pub fn get(&self, slot: usize) -> Option<&Item> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Empties a slot and returns what it held.
    pub fn take(&mut self, slot: usize) -> Option<Item> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Puts an item back into a specific empty slot.
    ///
    /// Gives the item back if the slot is out of range or occupied.
    pub fn restore(&mut self, slot: usize, item: Item) -> Result<(), Item> {
        match self.slots.get_mut(slot) {
            Some(entry) if entry.is_none() => {
                *entry = Some(item);
                Ok(())
            }
            _ => Err(item),
        }
    }

    /// Adds one slot unless already at the hard cap. Returns whether it grew.
    pub fn grow(&mut self) -> bool {
        if self.slots.len() >= config::MAX_INVENTORY_CAPACITY {
            return false;
        }
        self.slots.push(None);
        true
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First slot holding an item of this kind.
    pub fn find(&self, kind: ItemKind) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.map(|item| item.kind) == Some(kind))
    }

    /// All slots in order, including empty ones.
    pub fn slots(&self) -> &[Option<Item>] {
        &self.slots
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(config::INITIAL_INVENTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_item_classes() {
        let held: Vec<_> = ItemKind::ALL
            .iter()
            .filter(|kind| kind.is_pickupable())
            .collect();
        assert_eq!(held.len(), 6);
        for instant in [
            ItemKind::Key,
            ItemKind::Coin,
            ItemKind::Heart,
            ItemKind::Exit,
            ItemKind::Belt,
        ] {
            assert!(!instant.is_pickupable());
        }
    }

    #[test]
    fn test_add_fills_first_empty_slot() {
        let mut inventory = Inventory::new(3);
        inventory.add(Item::new(ItemKind::Bomb)).unwrap();
        inventory.add(Item::new(ItemKind::Bomb)).unwrap();
        inventory.take(0);

        assert_eq!(inventory.add(Item::new(ItemKind::MapScroll)), Ok(0));
        assert_eq!(inventory.get(0).map(|item| item.kind), Some(ItemKind::MapScroll));
    }

    #[test]
    fn test_add_strips_map_position() {
        let mut inventory = Inventory::new(1);
        let mut item = Item::new(ItemKind::Bomb);
        item.position = Some(Position::new(2, 2));
        inventory.add(item).unwrap();
        assert_eq!(inventory.get(0).and_then(|item| item.position), None);
    }

    #[test]
    fn test_take_clears_slot() {
        let mut inventory = Inventory::new(2);
        inventory.add(Item::new(ItemKind::HealthPotion)).unwrap();
        assert!(inventory.take(0).is_some());
        assert!(inventory.get(0).is_none());
        assert!(inventory.take(0).is_none());
        assert!(inventory.take(7).is_none());
        assert_eq!(inventory.capacity(), 2);
    }

    #[test]
    fn test_restore() {
        let mut inventory = Inventory::new(2);
        let potion = Item::new(ItemKind::HealthPotion);
        assert!(inventory.restore(1, potion).is_ok());
        assert_eq!(inventory.find(ItemKind::HealthPotion), Some(1));
        assert!(inventory.restore(1, potion).is_err());
        assert!(inventory.restore(5, potion).is_err());
    }

    #[test]
    fn test_grow_respects_cap() {
        let mut inventory = Inventory::default();
        assert_eq!(inventory.capacity(), config::INITIAL_INVENTORY_CAPACITY);
        while inventory.grow() {}
        assert_eq!(inventory.capacity(), config::MAX_INVENTORY_CAPACITY);
        assert!(!inventory.grow());
        assert_eq!(inventory.slots().len(), config::MAX_INVENTORY_CAPACITY);
    }

    proptest! {
        #[test]
        fn prop_slot_count_tracks_capacity(ops in proptest::collection::vec(0u8..3, 0..40)) {
            let mut inventory = Inventory::default();
            for op in ops {
                let before_len = inventory.len();
                let before_capacity = inventory.capacity();
                match op {
                    0 => {
                        let was_full = inventory.is_full();
                        match inventory.add(Item::new(ItemKind::Bomb)) {
                            Ok(_) => prop_assert_eq!(inventory.len(), before_len + 1),
                            Err(_) => {
                                prop_assert!(was_full);
                                prop_assert_eq!(inventory.len(), before_len);
                            }
                        }
                    }
                    1 => {
                        let _ = inventory.take(before_len.saturating_sub(1));
                    }
                    _ => {
                        inventory.grow();
                    }
                }
                prop_assert_eq!(inventory.slots().len(), inventory.capacity());
                prop_assert!(inventory.capacity() >= before_capacity);
                prop_assert!(inventory.capacity() <= config::MAX_INVENTORY_CAPACITY);
            }
        }
    }
}
