//! # Entities Module
//!
//! Actors and items, the two kinds of thing that can stand on a floor.
//!
//! Every entity shares an [`EntityData`] block (position, glyph, name, ...) and
//! is reached through the [`Entity`] trait. Components an actor carries live
//! in their own modules.

use crate::game::affix::Affix;
use crate::game::ai::AiState;
use crate::game::consumable::Consumable;
use crate::game::effects::{ConsumeEffect, InnerConsumption, LogBook};
use crate::game::equipment::{Equipment, Equippable};
use crate::game::fighter::Fighter;
use crate::game::inventory::Inventory;
use crate::game::level::Level;
use crate::game::settings::PlayerClass;
use crate::game::spells::SpellBook;
use crate::game::world::Color;
use crate::game::{new_entity_id, EntityId, Position};
use serde::{Deserialize, Serialize};

/// Draw order. Higher values are drawn on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RenderOrder {
    Corpse,
    Item,
    Actor,
}

/// Fields common to every entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    pub id: EntityId,
    pub position: Position,
    pub glyph: char,
    pub color: Color,
    pub name: String,
    pub blocks_movement: bool,
    pub render_order: RenderOrder,
}

impl EntityData {
    pub fn new(
        position: Position,
        glyph: char,
        color: Color,
        name: impl Into<String>,
        blocks_movement: bool,
        render_order: RenderOrder,
    ) -> Self {
        Self {
            id: new_entity_id(),
            position,
            glyph,
            color,
            name: name.into(),
            blocks_movement,
            render_order,
        }
    }
}

/// Shared accessors for everything that can stand on a floor.
pub trait Entity {
    fn data(&self) -> &EntityData;
    fn data_mut(&mut self) -> &mut EntityData;

    fn id(&self) -> EntityId {
        self.data().id
    }

    fn position(&self) -> Position {
        self.data().position
    }

    fn set_position(&mut self, position: Position) {
        self.data_mut().position = position;
    }

    fn name(&self) -> &str {
        &self.data().name
    }

    fn blocks_movement(&self) -> bool {
        self.data().blocks_movement
    }

    fn render_order(&self) -> RenderOrder {
        self.data().render_order
    }
}

/// A creature: the player, a monster, a vendor, or the remains of one.
///
/// An actor is alive exactly while it has an AI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub data: EntityData,
    pub ai: Option<AiState>,
    pub fighter: Fighter,
    pub inventory: Inventory,
    pub equipment: Equipment,
    pub spellbook: SpellBook,
    pub logbook: LogBook,
    /// What happens to whoever eats this actor's corpse
    pub effect: ConsumeEffect,
    pub level: Level,
    pub affixes: Vec<Affix>,
    pub player_class: PlayerClass,
    pub inner_consumption: InnerConsumption,
    /// Currency carried; handed to the player on death
    pub organs: u32,
}

impl Actor {
    pub fn new(data: EntityData, ai: Option<AiState>, fighter: Fighter) -> Self {
        Self {
            data,
            ai,
            fighter,
            inventory: Inventory::new(0),
            equipment: Equipment::new(),
            spellbook: SpellBook::new(0),
            logbook: LogBook::new(),
            effect: ConsumeEffect::Inert,
            level: Level::new(0),
            affixes: Vec::new(),
            player_class: PlayerClass::Generic,
            inner_consumption: InnerConsumption::None,
            organs: 0,
        }
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn with_spellbook(mut self, spellbook: SpellBook) -> Self {
        self.spellbook = spellbook;
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_effect(mut self, effect: ConsumeEffect) -> Self {
        self.effect = effect;
        self
    }

    pub fn with_organs(mut self, organs: u32) -> Self {
        self.organs = organs;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.ai.is_some()
    }

    pub fn is_mage(&self) -> bool {
        self.player_class == PlayerClass::Mage
    }

    pub fn is_vendor(&self) -> bool {
        matches!(self.ai, Some(AiState::Vendor))
    }
}

impl Entity for Actor {
    fn data(&self) -> &EntityData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut EntityData {
        &mut self.data
    }
}

/// Something that can be picked up, carried, equipped, used or eaten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub data: EntityData,
    pub consumable: Option<Consumable>,
    pub equippable: Option<Equippable>,
    /// Cost in organs when sold by a vendor
    pub price: u32,
    pub effect: ConsumeEffect,
}

impl Item {
    pub fn new(data: EntityData) -> Self {
        Self {
            data,
            consumable: None,
            equippable: None,
            price: 0,
            effect: ConsumeEffect::Inert,
        }
    }

    pub fn with_consumable(mut self, consumable: Consumable) -> Self {
        self.consumable = Some(consumable);
        self
    }

    pub fn with_equippable(mut self, equippable: Equippable) -> Self {
        self.equippable = Some(equippable);
        self
    }

    pub fn with_price(mut self, price: u32) -> Self {
        self.price = price;
        self
    }

    pub fn with_effect(mut self, effect: ConsumeEffect) -> Self {
        self.effect = effect;
        self
    }
}

impl Entity for Item {
    fn data(&self) -> &EntityData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut EntityData {
        &mut self.data
    }
}

/// Anything a [`GameMap`](crate::GameMap) can hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConcreteEntity {
    Actor(Box<Actor>),
    Item(Item),
}

impl ConcreteEntity {
    pub fn as_actor(&self) -> Option<&Actor> {
        match self {
            ConcreteEntity::Actor(actor) => Some(actor),
            ConcreteEntity::Item(_) => None,
        }
    }

    pub fn as_actor_mut(&mut self) -> Option<&mut Actor> {
        match self {
            ConcreteEntity::Actor(actor) => Some(actor),
            ConcreteEntity::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            ConcreteEntity::Item(item) => Some(item),
            ConcreteEntity::Actor(_) => None,
        }
    }

    /// The effect granted when this entity is eaten.
    pub fn effect(&self) -> &ConsumeEffect {
        match self {
            ConcreteEntity::Actor(actor) => &actor.effect,
            ConcreteEntity::Item(item) => &item.effect,
        }
    }

    /// Returns true for living actors.
    pub fn is_alive(&self) -> bool {
        self.as_actor().map_or(false, Actor::is_alive)
    }
}

impl Entity for ConcreteEntity {
    fn data(&self) -> &EntityData {
        match self {
            ConcreteEntity::Actor(actor) => &actor.data,
            ConcreteEntity::Item(item) => &item.data,
        }
    }

    fn data_mut(&mut self) -> &mut EntityData {
        match self {
            ConcreteEntity::Actor(actor) => &mut actor.data,
            ConcreteEntity::Item(item) => &mut item.data,
        }
    }
}

impl From<Actor> for ConcreteEntity {
    fn from(actor: Actor) -> Self {
        ConcreteEntity::Actor(Box::new(actor))
    }
}

impl From<Item> for ConcreteEntity {
    fn from(item: Item) -> Self {
        ConcreteEntity::Item(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::factory::{spawn_item, spawn_monster, spawn_player, ItemKind, MonsterKind};

    #[test]
    fn test_actor_alive_follows_ai() {
        let mut orc = spawn_monster(MonsterKind::Orc, Position::new(1, 1));
        assert!(orc.is_alive());
        orc.ai = None;
        assert!(!orc.is_alive());
    }

    #[test]
    fn test_vendor_detection() {
        let trader = spawn_monster(MonsterKind::OrganTrader, Position::new(1, 1));
        assert!(trader.is_vendor());
        assert!(!spawn_monster(MonsterKind::Troll, Position::new(1, 1)).is_vendor());
    }

    #[test]
    fn test_concrete_entity_accessors() {
        let player: ConcreteEntity = spawn_player(Position::new(3, 4)).into();
        assert_eq!(player.position(), Position::new(3, 4));
        assert!(player.as_actor().is_some());
        assert!(player.as_item().is_none());
        assert!(player.is_alive());
        assert!(player.blocks_movement());

        let mut sword: ConcreteEntity = spawn_item(ItemKind::Sword, Position::new(0, 0)).into();
        assert!(!sword.is_alive());
        assert_eq!(sword.render_order(), RenderOrder::Item);
        sword.set_position(Position::new(5, 5));
        assert_eq!(sword.position(), Position::new(5, 5));
    }

    #[test]
    fn test_render_order_sorting() {
        let mut orders = vec![RenderOrder::Actor, RenderOrder::Corpse, RenderOrder::Item];
        orders.sort();
        assert_eq!(orders, vec![RenderOrder::Corpse, RenderOrder::Item, RenderOrder::Actor]);
    }
}
