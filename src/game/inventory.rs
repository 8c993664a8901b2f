//! Capacity-bounded item storage carried by an actor.

use crate::game::entities::{Entity, Item};
use crate::game::EntityId;
use crate::{TowerError, TowerResult};
use serde::{Deserialize, Serialize};

/// Items owned by an actor. Items here are not on any map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub capacity: usize,
    pub items: Vec<Item>,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Stores an item. On a full inventory the item is dropped with the
    /// error, so check [`Inventory::is_full`] first to keep it.
    pub fn add(&mut self, item: Item) -> TowerResult<()> {
        if self.is_full() {
            return Err(TowerError::impossible("Your inventory is full."));
        }
        self.items.push(item);
        Ok(())
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: EntityId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Item id stored at a display slot.
    pub fn id_at(&self, index: usize) -> Option<EntityId> {
        self.items.get(index).map(Entity::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;
    use crate::generation::factory::{spawn_item, ItemKind};

    #[test]
    fn test_capacity_enforced() {
        let mut inventory = Inventory::new(1);
        assert!(inventory.add(spawn_item(ItemKind::HealthPotion, Position::origin())).is_ok());
        assert!(inventory.is_full());
        let err = inventory
            .add(spawn_item(ItemKind::Sword, Position::origin()))
            .unwrap_err();
        assert!(err.is_impossible());
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn test_remove_by_id() {
        let mut inventory = Inventory::new(5);
        let sword = spawn_item(ItemKind::Sword, Position::origin());
        let sword_id = sword.id();
        inventory.add(sword).unwrap();
        assert_eq!(inventory.id_at(0), Some(sword_id));
        assert!(inventory.get(sword_id).is_some());
        assert_eq!(inventory.remove(sword_id).map(|i| i.id()), Some(sword_id));
        assert!(inventory.remove(sword_id).is_none());
        assert!(inventory.is_empty());
    }
}
