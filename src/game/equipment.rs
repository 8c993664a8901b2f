//! # Equipment Module
//!
//! Wearable items and the slots that hold them.
//!
//! Equipped items stay in the actor's inventory; a slot only stores the item's
//! id. Applying an item's bonuses is guarded by its `is_applied` flag, so the
//! fighter's accumulators always match the set of equipped items.

use crate::config::RING_SLOTS;
use crate::game::entities::{Actor, Entity};
use crate::game::fighter::Attributes;
use crate::game::messages::{palette, MessageLog};
use crate::game::EntityId;
use crate::{TowerError, TowerResult};
use serde::{Deserialize, Serialize};

/// The kind of body slot an item is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentType {
    Weapon,
    Armor,
    Ring,
    Head,
    Eyes,
    Necklace,
    Cloak,
    Wrist,
    Belt,
    Legs,
}

/// A concrete slot on an equipment set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Head,
    Eyes,
    Necklace,
    Cloak,
    Wrist,
    Belt,
    Legs,
    Ring(usize),
}

impl EquipmentSlot {
    /// Every slot, rings last.
    pub fn all() -> Vec<EquipmentSlot> {
        let mut slots = vec![
            EquipmentSlot::Weapon,
            EquipmentSlot::Armor,
            EquipmentSlot::Head,
            EquipmentSlot::Eyes,
            EquipmentSlot::Necklace,
            EquipmentSlot::Cloak,
            EquipmentSlot::Wrist,
            EquipmentSlot::Belt,
            EquipmentSlot::Legs,
        ];
        slots.extend((0..RING_SLOTS).map(EquipmentSlot::Ring));
        slots
    }

    /// Whether items of `equipment_type` belong in this slot.
    pub fn accepts(self, equipment_type: EquipmentType) -> bool {
        matches!(
            (self, equipment_type),
            (EquipmentSlot::Weapon, EquipmentType::Weapon)
                | (EquipmentSlot::Armor, EquipmentType::Armor)
                | (EquipmentSlot::Head, EquipmentType::Head)
                | (EquipmentSlot::Eyes, EquipmentType::Eyes)
                | (EquipmentSlot::Necklace, EquipmentType::Necklace)
                | (EquipmentSlot::Cloak, EquipmentType::Cloak)
                | (EquipmentSlot::Wrist, EquipmentType::Wrist)
                | (EquipmentSlot::Belt, EquipmentType::Belt)
                | (EquipmentSlot::Legs, EquipmentType::Legs)
                | (EquipmentSlot::Ring(_), EquipmentType::Ring)
        )
    }
}

/// Stat deltas an item grants while worn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equippable {
    pub equipment_type: EquipmentType,
    pub power_bonus: i32,
    pub defense_bonus: i32,
    pub stat_bonus: Attributes,
    pub attack_count_bonus: i32,
    /// Set while the deltas are applied to a fighter
    pub is_applied: bool,
}

impl Equippable {
    pub fn new(equipment_type: EquipmentType) -> Self {
        Self {
            equipment_type,
            power_bonus: 0,
            defense_bonus: 0,
            stat_bonus: Attributes::default(),
            attack_count_bonus: 0,
            is_applied: false,
        }
    }

    pub fn with_power(mut self, power_bonus: i32) -> Self {
        self.power_bonus = power_bonus;
        self
    }

    pub fn with_defense(mut self, defense_bonus: i32) -> Self {
        self.defense_bonus = defense_bonus;
        self
    }

    pub fn with_stats(mut self, stat_bonus: Attributes) -> Self {
        self.stat_bonus = stat_bonus;
        self
    }
}

/// Slot to item-id mapping for one actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<EntityId>,
    pub armor: Option<EntityId>,
    pub head: Option<EntityId>,
    pub eyes: Option<EntityId>,
    pub necklace: Option<EntityId>,
    pub cloak: Option<EntityId>,
    pub wrist: Option<EntityId>,
    pub belt: Option<EntityId>,
    pub legs: Option<EntityId>,
    pub rings: [Option<EntityId>; RING_SLOTS],
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, slot: EquipmentSlot) -> Option<EntityId> {
        match slot {
            EquipmentSlot::Weapon => self.weapon,
            EquipmentSlot::Armor => self.armor,
            EquipmentSlot::Head => self.head,
            EquipmentSlot::Eyes => self.eyes,
            EquipmentSlot::Necklace => self.necklace,
            EquipmentSlot::Cloak => self.cloak,
            EquipmentSlot::Wrist => self.wrist,
            EquipmentSlot::Belt => self.belt,
            EquipmentSlot::Legs => self.legs,
            EquipmentSlot::Ring(i) => self.rings.get(i).copied().flatten(),
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> TowerResult<&mut Option<EntityId>> {
        Ok(match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Head => &mut self.head,
            EquipmentSlot::Eyes => &mut self.eyes,
            EquipmentSlot::Necklace => &mut self.necklace,
            EquipmentSlot::Cloak => &mut self.cloak,
            EquipmentSlot::Wrist => &mut self.wrist,
            EquipmentSlot::Belt => &mut self.belt,
            EquipmentSlot::Legs => &mut self.legs,
            EquipmentSlot::Ring(i) => self.rings.get_mut(i).ok_or_else(|| {
                TowerError::InvalidState(format!("Ring slot {} does not exist", i))
            })?,
        })
    }

    /// The slot currently holding an item.
    pub fn slot_of(&self, item_id: EntityId) -> Option<EquipmentSlot> {
        EquipmentSlot::all()
            .into_iter()
            .find(|&slot| self.slot(slot) == Some(item_id))
    }

    pub fn item_is_equipped(&self, item_id: EntityId) -> bool {
        self.slot_of(item_id).is_some()
    }

    /// Where an item of the given type goes.
    ///
    /// Rings go to the slot already holding them, else the first empty ring
    /// slot, else the first ring slot.
    pub fn slot_for(&self, item_id: EntityId, equipment_type: EquipmentType) -> EquipmentSlot {
        match equipment_type {
            EquipmentType::Weapon => EquipmentSlot::Weapon,
            EquipmentType::Armor => EquipmentSlot::Armor,
            EquipmentType::Head => EquipmentSlot::Head,
            EquipmentType::Eyes => EquipmentSlot::Eyes,
            EquipmentType::Necklace => EquipmentSlot::Necklace,
            EquipmentType::Cloak => EquipmentSlot::Cloak,
            EquipmentType::Wrist => EquipmentSlot::Wrist,
            EquipmentType::Belt => EquipmentSlot::Belt,
            EquipmentType::Legs => EquipmentSlot::Legs,
            EquipmentType::Ring => {
                let held = self.rings.iter().position(|&r| r == Some(item_id));
                let empty = self.rings.iter().position(Option::is_none);
                EquipmentSlot::Ring(held.or(empty).unwrap_or(0))
            }
        }
    }

    /// Every occupied slot with its item.
    pub fn equipped(&self) -> Vec<(EquipmentSlot, EntityId)> {
        EquipmentSlot::all()
            .into_iter()
            .filter_map(|slot| self.slot(slot).map(|id| (slot, id)))
            .collect()
    }
}

impl Actor {
    /// Equips an inventory item, or unequips it if it is already worn.
    ///
    /// Equipping into an occupied slot first removes the incumbent. Messages
    /// go to `log` when one is given.
    pub fn toggle_equip(
        &mut self,
        item_id: EntityId,
        log: Option<&mut MessageLog>,
    ) -> TowerResult<()> {
        let equipment_type = self
            .inventory
            .get(item_id)
            .and_then(|item| item.equippable.as_ref())
            .map(|equippable| equippable.equipment_type)
            .ok_or_else(|| TowerError::impossible("That cannot be equipped."))?;

        if let Some(slot) = self.equipment.slot_of(item_id) {
            return self.unequip_from_slot(slot, log);
        }

        let slot = self.equipment.slot_for(item_id, equipment_type);
        self.equip_to_slot(slot, item_id, log)
    }

    /// Puts an item into a slot and applies its bonuses.
    ///
    /// Whatever occupies the slot is removed first, and so is the item itself
    /// if it is worn elsewhere. The slot is only written once the bonuses
    /// have been applied.
    pub fn equip_to_slot(
        &mut self,
        slot: EquipmentSlot,
        item_id: EntityId,
        mut log: Option<&mut MessageLog>,
    ) -> TowerResult<()> {
        let equipment_type = self
            .inventory
            .get(item_id)
            .and_then(|item| item.equippable.as_ref())
            .map(|equippable| equippable.equipment_type)
            .ok_or(TowerError::EntityNotFound(item_id))?;
        if !slot.accepts(equipment_type) {
            return Err(TowerError::InvalidState(format!(
                "{:?} cannot go in the {:?} slot",
                equipment_type, slot
            )));
        }
        self.equipment.slot_mut(slot)?;

        match self.equipment.slot_of(item_id) {
            Some(held) if held == slot => return Ok(()),
            Some(held) => self.unequip_from_slot(held, None)?,
            None => {}
        }
        self.unequip_from_slot(slot, log.as_deref_mut())?;

        self.apply_equippable(item_id, true)?;
        *self.equipment.slot_mut(slot)? = Some(item_id);
        if let (Some(log), Some(item)) = (log, self.inventory.get(item_id)) {
            log.add_message(format!("You equip the {}.", item.name()), palette::WHITE);
        }
        Ok(())
    }

    /// Empties a slot and removes the bonuses of whatever was in it.
    pub fn unequip_from_slot(
        &mut self,
        slot: EquipmentSlot,
        log: Option<&mut MessageLog>,
    ) -> TowerResult<()> {
        let Some(item_id) = self.equipment.slot_mut(slot)?.take() else {
            return Ok(());
        };
        self.apply_equippable(item_id, false)?;
        if let (Some(log), Some(item)) = (log, self.inventory.get(item_id)) {
            log.add_message(format!("You remove the {}.", item.name()), palette::WHITE);
        }
        Ok(())
    }

    /// Adds or subtracts an item's deltas exactly once, then re-derives.
    fn apply_equippable(&mut self, item_id: EntityId, add: bool) -> TowerResult<()> {
        let equippable = self
            .inventory
            .get_mut(item_id)
            .and_then(|item| item.equippable.as_mut())
            .ok_or(TowerError::EntityNotFound(item_id))?;
        if equippable.is_applied == add {
            return Ok(());
        }
        equippable.is_applied = add;

        let fighter = &mut self.fighter;
        if add {
            fighter.bonus_stats += equippable.stat_bonus;
            fighter.bonus_power += equippable.power_bonus;
            fighter.bonus_defense += equippable.defense_bonus;
            fighter.bonus_attack_count += equippable.attack_count_bonus;
        } else {
            fighter.bonus_stats -= equippable.stat_bonus;
            fighter.bonus_power -= equippable.power_bonus;
            fighter.bonus_defense -= equippable.defense_bonus;
            fighter.bonus_attack_count -= equippable.attack_count_bonus;
        }
        fighter.derive_stats(false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;
    use crate::generation::factory::{spawn_item, spawn_player, ItemKind};

    fn player_with(kinds: &[ItemKind]) -> (Actor, Vec<EntityId>) {
        let mut player = spawn_player(Position::origin());
        let mut ids = Vec::new();
        for &kind in kinds {
            let item = spawn_item(kind, Position::origin());
            ids.push(item.id());
            player.inventory.add(item).unwrap();
        }
        (player, ids)
    }

    #[test]
    fn test_equip_unequip_round_trip() {
        let (mut player, ids) = player_with(&[ItemKind::Sword]);
        let before = player.fighter.clone();

        player.toggle_equip(ids[0], None).unwrap();
        assert_eq!(player.equipment.weapon, Some(ids[0]));
        assert_eq!(player.fighter.power(), before.power() + 4);

        player.toggle_equip(ids[0], None).unwrap();
        assert_eq!(player.equipment.weapon, None);
        assert_eq!(player.fighter, before);
    }

    #[test]
    fn test_equipping_occupied_slot_replaces_incumbent() {
        let (mut player, ids) = player_with(&[ItemKind::Dagger, ItemKind::Sword]);
        let base_power = player.fighter.power();
        let mut log = MessageLog::new();

        player.toggle_equip(ids[0], Some(&mut log)).unwrap();
        player.toggle_equip(ids[1], Some(&mut log)).unwrap();

        assert_eq!(player.equipment.weapon, Some(ids[1]));
        assert_eq!(player.fighter.power(), base_power + 4);
        let dagger = player.inventory.get(ids[0]).unwrap();
        assert!(!dagger.equippable.as_ref().unwrap().is_applied);
        assert!(log.contains("You remove the Dagger."));
        assert!(log.contains("You equip the Sword."));
    }

    #[test]
    fn test_rings_fill_distinct_slots() {
        let (mut player, ids) = player_with(&[ItemKind::Ring, ItemKind::WeirdRing]);
        player.toggle_equip(ids[0], None).unwrap();
        player.toggle_equip(ids[1], None).unwrap();
        assert_eq!(player.equipment.slot_of(ids[0]), Some(EquipmentSlot::Ring(0)));
        assert_eq!(player.equipment.slot_of(ids[1]), Some(EquipmentSlot::Ring(1)));
        assert_eq!(player.fighter.bonus_stats.cd, 5);

        player.toggle_equip(ids[0], None).unwrap();
        assert_eq!(player.equipment.rings[0], None);
        assert_eq!(player.equipment.slot_of(ids[1]), Some(EquipmentSlot::Ring(1)));
    }

    #[test]
    fn test_item_occupies_at_most_one_slot() {
        let (mut player, ids) = player_with(&[ItemKind::Ring]);
        player.toggle_equip(ids[0], None).unwrap();
        let occupied = player
            .equipment
            .equipped()
            .into_iter()
            .filter(|(_, id)| *id == ids[0])
            .count();
        assert_eq!(occupied, 1);
    }

    #[test]
    fn test_equip_to_slot_swaps_out_incumbent() {
        let (mut player, ids) = player_with(&[ItemKind::Dagger, ItemKind::Sword]);
        let base_power = player.fighter.power();

        player.equip_to_slot(EquipmentSlot::Weapon, ids[0], None).unwrap();
        player.equip_to_slot(EquipmentSlot::Weapon, ids[1], None).unwrap();

        assert_eq!(player.equipment.weapon, Some(ids[1]));
        assert_eq!(player.fighter.power(), base_power + 4);
        let dagger = player.inventory.get(ids[0]).unwrap();
        assert!(!dagger.equippable.as_ref().unwrap().is_applied);
    }

    #[test]
    fn test_equip_to_slot_moves_ring_between_slots() {
        let (mut player, ids) = player_with(&[ItemKind::WeirdRing]);

        player.equip_to_slot(EquipmentSlot::Ring(0), ids[0], None).unwrap();
        let worn = player.fighter.clone();
        player.equip_to_slot(EquipmentSlot::Ring(1), ids[0], None).unwrap();

        assert_eq!(player.equipment.rings[0], None);
        assert_eq!(player.equipment.slot_of(ids[0]), Some(EquipmentSlot::Ring(1)));
        assert_eq!(player.equipment.equipped().len(), 1);
        assert_eq!(player.fighter, worn);
    }

    #[test]
    fn test_equip_to_slot_rejects_missing_or_misplaced_items() {
        let (mut player, ids) = player_with(&[ItemKind::Sword]);
        let stranger = spawn_item(ItemKind::Dagger, Position::origin()).id();
        let before = player.fighter.clone();

        let err = player.equip_to_slot(EquipmentSlot::Weapon, stranger, None).unwrap_err();
        assert!(matches!(err, TowerError::EntityNotFound(_)));
        assert_eq!(player.equipment.weapon, None);

        let err = player.equip_to_slot(EquipmentSlot::Head, ids[0], None).unwrap_err();
        assert!(matches!(err, TowerError::InvalidState(_)));
        assert_eq!(player.equipment.head, None);
        assert_eq!(player.fighter, before);
    }

    #[test]
    fn test_non_equippable_is_impossible() {
        let (mut player, ids) = player_with(&[ItemKind::HealthPotion]);
        let err = player.toggle_equip(ids[0], None).unwrap_err();
        assert!(err.is_impossible());
    }

    #[test]
    fn test_unequip_empty_slot_is_noop() {
        let (mut player, _) = player_with(&[]);
        let before = player.fighter.clone();
        player.unequip_from_slot(EquipmentSlot::Head, None).unwrap();
        assert_eq!(player.fighter, before);
    }
}
