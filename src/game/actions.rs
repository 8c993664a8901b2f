//! # Actions Module
//!
//! Every intent an actor can have, player or monster, is an action. An action
//! either succeeds, mutating the game state and consuming the actor's turn,
//! or fails with [`TowerError::Impossible`] and leaves the turn unspent.
//!
//! Each action is its own struct implementing [`Action`]; [`ConcreteAction`]
//! wraps them so they can be queued, serialized and dispatched uniformly.

use crate::game::ai::AiState;
use crate::game::entities::Entity;
use crate::game::messages::palette;
use crate::game::spells::SpellKind;
use crate::game::state::GameState;
use crate::game::{Direction, EntityId, Position};
use crate::{TowerError, TowerResult};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Stamina a rogue spends for an extra strike.
pub const ROGUE_STRIKE_COST: i32 = 5;

/// Common interface for all actions.
pub trait Action {
    /// Performs the action against the game state.
    fn perform(&self, state: &mut GameState) -> TowerResult<()>;

    /// The actor attempting the action.
    fn actor(&self) -> EntityId;
}

/// Does nothing, successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitAction {
    pub actor: EntityId,
}

impl WaitAction {
    pub fn new(actor: EntityId) -> Self {
        Self { actor }
    }
}

impl Action for WaitAction {
    fn perform(&self, _state: &mut GameState) -> TowerResult<()> {
        Ok(())
    }

    fn actor(&self) -> EntityId {
        self.actor
    }
}

/// Steps one tile by `delta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementAction {
    pub actor: EntityId,
    pub delta: Position,
}

impl MovementAction {
    pub fn new(actor: EntityId, delta: Position) -> Self {
        Self { actor, delta }
    }

    pub fn toward(actor: EntityId, direction: Direction) -> Self {
        Self::new(actor, direction.to_delta())
    }
}

impl Action for MovementAction {
    fn perform(&self, state: &mut GameState) -> TowerResult<()> {
        let origin = state.actor(self.actor)?.position();
        let destination = origin + self.delta;
        let noclip = state.is_player(self.actor) && state.settings.noclip;

        if !state.map.in_bounds(destination) {
            return Err(TowerError::impossible("The way is blocked!"));
        }
        if !state.map.is_walkable(destination) && !noclip {
            return Err(TowerError::impossible("Path inaccessible!"));
        }
        if state.map.blocking_entity_at(destination).is_some() {
            return Err(TowerError::impossible("The path is blocked!"));
        }

        state.actor_mut(self.actor)?.set_position(destination);
        if state.is_player(self.actor) {
            state.statistics.steps_taken += 1;
        }
        Ok(())
    }

    fn actor(&self) -> EntityId {
        self.actor
    }
}

/// Attacks whatever living actor stands at `delta`.
///
/// Each of the attacker's strikes rolls 0..=100 against the target's damage
/// reduction: at or above it the target loses the attacker's power in HP,
/// below it the strike is dodged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeleeAction {
    pub actor: EntityId,
    pub delta: Position,
}

impl MeleeAction {
    pub fn new(actor: EntityId, delta: Position) -> Self {
        Self { actor, delta }
    }
}

impl Action for MeleeAction {
    fn perform(&self, state: &mut GameState) -> TowerResult<()> {
        let attacker = state.actor(self.actor)?;
        let destination = attacker.position() + self.delta;
        let attacker_name = attacker.name().to_string();
        let power = attacker.fighter.power();
        let mut strikes = attacker.fighter.attack_count();
        let is_rogue = attacker.player_class == crate::PlayerClass::Rogue;

        let target_id = state
            .map
            .living_actor_at(destination)
            .filter(|target| target.id() != self.actor)
            .map(Entity::id)
            .ok_or_else(|| TowerError::impossible("Nothing to attack."))?;
        let target_name = state.actor(target_id)?.name().to_string();

        if is_rogue {
            let free = state.settings.infinite_stamina;
            let attacker = state.actor_mut(self.actor)?;
            if free || attacker.fighter.spend_stamina(ROGUE_STRIKE_COST) {
                strikes += 1;
            }
        }

        let color = if state.is_player(self.actor) {
            palette::PLAYER_ATTACK
        } else {
            palette::ENEMY_ATTACK
        };
        for _ in 0..strikes {
            if !state.actor(target_id)?.is_alive() {
                break;
            }
            let roll = state.rng.gen_range(0..=100);
            let reduction = state.actor(target_id)?.fighter.damage_reduction();
            let description = format!("{} attacks {}", attacker_name, target_name);
            if roll < reduction {
                state
                    .message_log
                    .add_message(format!("{}, but it dodges.", description), color);
            } else if power > 0 {
                state.message_log.add_message(
                    format!("{} for {} hit points.", description, power),
                    color,
                );
                state.strike(self.actor, target_id, power)?;
            } else {
                state
                    .message_log
                    .add_message(format!("{} but does no damage.", description), color);
            }
        }
        Ok(())
    }

    fn actor(&self) -> EntityId {
        self.actor
    }
}

/// Moves, or attacks if a non-vendor actor is in the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BumpAction {
    pub actor: EntityId,
    pub delta: Position,
}

impl BumpAction {
    pub fn new(actor: EntityId, direction: Direction) -> Self {
        Self {
            actor,
            delta: direction.to_delta(),
        }
    }
}

impl Action for BumpAction {
    fn perform(&self, state: &mut GameState) -> TowerResult<()> {
        let destination = state.actor(self.actor)?.position() + self.delta;
        match state.map.living_actor_at(destination) {
            Some(target) if target.id() == self.actor => {
                MovementAction::new(self.actor, self.delta).perform(state)
            }
            // Walking into a vendor passes the turn without a fight.
            Some(target) if target.is_vendor() => {
                debug!("{} bumps into the {}", self.actor, target.name());
                Ok(())
            }
            Some(_) => MeleeAction::new(self.actor, self.delta).perform(state),
            None => MovementAction::new(self.actor, self.delta).perform(state),
        }
    }

    fn actor(&self) -> EntityId {
        self.actor
    }
}

/// Picks up the item on the actor's tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupAction {
    pub actor: EntityId,
}

impl PickupAction {
    pub fn new(actor: EntityId) -> Self {
        Self { actor }
    }
}

impl Action for PickupAction {
    fn perform(&self, state: &mut GameState) -> TowerResult<()> {
        let actor = state.actor(self.actor)?;
        let item_id = state
            .map
            .item_at(actor.position())
            .map(Entity::id)
            .ok_or_else(|| TowerError::impossible("There is nothing here to pick up."))?;
        if actor.inventory.is_full() {
            return Err(TowerError::impossible("Your inventory is full."));
        }

        let item = match state.map.remove_entity(item_id) {
            Some(crate::ConcreteEntity::Item(item)) => item,
            _ => return Err(TowerError::EntityNotFound(item_id)),
        };
        let name = item.name().to_string();
        state.actor_mut(self.actor)?.inventory.add(item)?;
        state
            .message_log
            .add_message(format!("You picked up the {}!", name), palette::WHITE);
        if state.is_player(self.actor) {
            state.statistics.items_collected += 1;
        }
        Ok(())
    }

    fn actor(&self) -> EntityId {
        self.actor
    }
}

/// Toggles an inventory item in or out of its slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipAction {
    pub actor: EntityId,
    pub item: EntityId,
}

impl EquipAction {
    pub fn new(actor: EntityId, item: EntityId) -> Self {
        Self { actor, item }
    }
}

impl Action for EquipAction {
    fn perform(&self, state: &mut GameState) -> TowerResult<()> {
        let GameState {
            map, message_log, ..
        } = state;
        let actor = map
            .actor_mut(self.actor)
            .ok_or(TowerError::EntityNotFound(self.actor))?;
        actor.toggle_equip(self.item, Some(message_log))
    }

    fn actor(&self) -> EntityId {
        self.actor
    }
}

/// Drops an inventory item on the actor's tile, unequipping it first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropItemAction {
    pub actor: EntityId,
    pub item: EntityId,
}

impl DropItemAction {
    pub fn new(actor: EntityId, item: EntityId) -> Self {
        Self { actor, item }
    }
}

impl Action for DropItemAction {
    fn perform(&self, state: &mut GameState) -> TowerResult<()> {
        let GameState {
            map, message_log, ..
        } = state;
        let actor = map
            .actor_mut(self.actor)
            .ok_or(TowerError::EntityNotFound(self.actor))?;
        if actor.equipment.item_is_equipped(self.item) {
            actor.toggle_equip(self.item, Some(message_log))?;
        }
        let position = actor.position();
        let mut item = actor
            .inventory
            .remove(self.item)
            .ok_or_else(|| TowerError::impossible("You don't have that."))?;
        item.set_position(position);
        message_log.add_message(format!("You dropped the {}.", item.name()), palette::WHITE);
        map.add_entity(item);
        Ok(())
    }

    fn actor(&self) -> EntityId {
        self.actor
    }
}

/// Uses a consumable from the inventory. The target defaults to the actor's
/// own tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAction {
    pub actor: EntityId,
    pub item: EntityId,
    pub target: Option<Position>,
}

impl ItemAction {
    pub fn new(actor: EntityId, item: EntityId, target: Option<Position>) -> Self {
        Self {
            actor,
            item,
            target,
        }
    }
}

impl Action for ItemAction {
    fn perform(&self, state: &mut GameState) -> TowerResult<()> {
        let actor = state.actor(self.actor)?;
        let target = self.target.unwrap_or_else(|| actor.position());
        let consumable = actor
            .inventory
            .get(self.item)
            .ok_or_else(|| TowerError::impossible("You don't have that."))?
            .consumable
            .clone()
            .ok_or_else(|| TowerError::impossible("You cannot use that."))?;
        consumable.activate(state, self.actor, self.item, target)
    }

    fn actor(&self) -> EntityId {
        self.actor
    }
}

/// Climbs to the next floor from the upstairs tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeStairsAction {
    pub actor: EntityId,
}

impl TakeStairsAction {
    pub fn new(actor: EntityId) -> Self {
        Self { actor }
    }
}

impl Action for TakeStairsAction {
    fn perform(&self, state: &mut GameState) -> TowerResult<()> {
        let position = state.actor(self.actor)?.position();
        if state.map.upstairs != Some(position) || !state.is_player(self.actor) {
            return Err(TowerError::impossible("There are no stairs here."));
        }
        state.enter_floor(state.current_floor + 1)?;
        state
            .message_log
            .add_message("You go up the fleshy stairs.", palette::DESCEND);
        Ok(())
    }

    fn actor(&self) -> EntityId {
        self.actor
    }
}

/// Eats the first dead thing sharing the actor's tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumeCorpseAction {
    pub actor: EntityId,
}

impl ConsumeCorpseAction {
    pub fn new(actor: EntityId) -> Self {
        Self { actor }
    }
}

impl Action for ConsumeCorpseAction {
    fn perform(&self, state: &mut GameState) -> TowerResult<()> {
        let position = state.actor(self.actor)?.position();
        let meal_id = state
            .map
            .entities_at(position)
            .find(|entity| entity.id() != self.actor && !entity.is_alive())
            .map(Entity::id)
            .ok_or_else(|| TowerError::impossible("There is no corpse here."))?;
        let meal = state
            .map
            .remove_entity(meal_id)
            .ok_or(TowerError::EntityNotFound(meal_id))?;
        meal.effect().clone().activate(state, self.actor, &meal)
    }

    fn actor(&self) -> EntityId {
        self.actor
    }
}

/// Casts a known spell at the nearest visible actor in range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastSpellAction {
    pub actor: EntityId,
    pub spell_index: usize,
}

impl CastSpellAction {
    pub fn new(actor: EntityId, spell_index: usize) -> Self {
        Self { actor, spell_index }
    }
}

impl Action for CastSpellAction {
    fn perform(&self, state: &mut GameState) -> TowerResult<()> {
        let caster = state.actor(self.actor)?;
        let spell = caster
            .spellbook
            .get(self.spell_index)
            .cloned()
            .ok_or_else(|| TowerError::impossible("You don't know that spell."))?;
        let origin = caster.position();
        let bonus = caster.fighter.spell_damage_bonus();

        let target = state
            .nearest_visible_actor(origin, spell.range() as f64, self.actor)
            .ok_or_else(|| TowerError::impossible("No target in range."))?;
        let target_name = state.actor(target)?.name().to_string();

        if matches!(spell.kind, SpellKind::Confusion { .. })
            && !state.actor(target)?.ai.as_ref().map_or(false, AiState::is_confusable)
        {
            return Err(TowerError::impossible(format!(
                "The {} cannot be confused.",
                target_name
            )));
        }

        if !(state.is_player(self.actor) && state.settings.infinite_mana)
            && !state.actor_mut(self.actor)?.fighter.cast_spell(&spell)
        {
            return Err(TowerError::impossible("You don't have enough mana."));
        }

        match spell.kind {
            SpellKind::Lightning { damage, .. } => {
                let dealt = state.damage(target, damage + bonus, false)?;
                state.message_log.add_message(
                    format!("Lightning arcs into the {} for {} damage!", target_name, dealt),
                    palette::PLAYER_ATTACK,
                );
            }
            SpellKind::Fireball { damage, radius, .. } => {
                let center = state.actor(target)?.position();
                for victim in state.living_actors_within(center, radius as f64) {
                    let name = state.actor(victim)?.name().to_string();
                    let dealt = state.damage(victim, damage + bonus, false)?;
                    state.message_log.add_message(
                        format!("The {} is caught in the blaze for {} damage!", name, dealt),
                        palette::PLAYER_ATTACK,
                    );
                }
            }
            SpellKind::Confusion { turns, .. } => {
                let victim = state.actor_mut(target)?;
                if let Some(previous) = victim.ai.take() {
                    victim.ai = Some(AiState::Confused {
                        previous: Box::new(previous),
                        turns_remaining: turns,
                    });
                }
                state.message_log.add_message(
                    format!("The {} starts to stumble around!", target_name),
                    palette::STATUS_EFFECT,
                );
            }
        }
        Ok(())
    }

    fn actor(&self) -> EntityId {
        self.actor
    }
}

/// Buys an item from an adjacent vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyAction {
    pub actor: EntityId,
    pub vendor: EntityId,
    pub index: usize,
}

impl BuyAction {
    pub fn new(actor: EntityId, vendor: EntityId, index: usize) -> Self {
        Self {
            actor,
            vendor,
            index,
        }
    }
}

impl Action for BuyAction {
    fn perform(&self, state: &mut GameState) -> TowerResult<()> {
        let buyer = state.actor(self.actor)?;
        let vendor = state
            .map
            .actor(self.vendor)
            .filter(|vendor| vendor.is_vendor())
            .filter(|vendor| vendor.position().chebyshev_distance(buyer.position()) <= 1)
            .ok_or_else(|| TowerError::impossible("There is no one here to trade with."))?;
        let ware = vendor
            .inventory
            .items
            .get(self.index)
            .ok_or_else(|| TowerError::impossible("What? I don't have that!"))?;
        if buyer.inventory.is_full() {
            return Err(TowerError::impossible("Your inventory is full."));
        }
        let discount = buyer.fighter.price_discount().max(0) as u32;
        let price = ware.price.saturating_sub(discount);
        if buyer.organs < price {
            return Err(TowerError::impossible(format!(
                "You're too poor, are you not? This {} costs {} organs.",
                ware.name(),
                price
            )));
        }
        let ware_id = ware.id();

        let item = state
            .actor_mut(self.vendor)?
            .inventory
            .remove(ware_id)
            .ok_or(TowerError::EntityNotFound(ware_id))?;
        let name = item.name().to_string();
        let buyer = state.actor_mut(self.actor)?;
        buyer.organs -= price;
        buyer.inventory.add(item)?;
        state.message_log.add_message(
            format!("You buy the {} for {} organs.", name, price),
            palette::WHITE,
        );
        Ok(())
    }

    fn actor(&self) -> EntityId {
        self.actor
    }
}

/// Any action, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConcreteAction {
    Wait(WaitAction),
    Move(MovementAction),
    Melee(MeleeAction),
    Bump(BumpAction),
    Pickup(PickupAction),
    Equip(EquipAction),
    Drop(DropItemAction),
    UseItem(ItemAction),
    TakeStairs(TakeStairsAction),
    ConsumeCorpse(ConsumeCorpseAction),
    CastSpell(CastSpellAction),
    Buy(BuyAction),
}

impl ConcreteAction {
    fn inner(&self) -> &dyn Action {
        match self {
            ConcreteAction::Wait(a) => a,
            ConcreteAction::Move(a) => a,
            ConcreteAction::Melee(a) => a,
            ConcreteAction::Bump(a) => a,
            ConcreteAction::Pickup(a) => a,
            ConcreteAction::Equip(a) => a,
            ConcreteAction::Drop(a) => a,
            ConcreteAction::UseItem(a) => a,
            ConcreteAction::TakeStairs(a) => a,
            ConcreteAction::ConsumeCorpse(a) => a,
            ConcreteAction::CastSpell(a) => a,
            ConcreteAction::Buy(a) => a,
        }
    }
}

impl Action for ConcreteAction {
    fn perform(&self, state: &mut GameState) -> TowerResult<()> {
        self.inner().perform(state)
    }

    fn actor(&self) -> EntityId {
        self.inner().actor()
    }
}

macro_rules! impl_from_action {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for ConcreteAction {
                fn from(action: $ty) -> Self {
                    ConcreteAction::$variant(action)
                }
            }
        )*
    };
}

impl_from_action!(
    Wait(WaitAction),
    Move(MovementAction),
    Melee(MeleeAction),
    Bump(BumpAction),
    Pickup(PickupAction),
    Equip(EquipAction),
    Drop(DropItemAction),
    UseItem(ItemAction),
    TakeStairs(TakeStairsAction),
    ConsumeCorpse(ConsumeCorpseAction),
    CastSpell(CastSpellAction),
    Buy(BuyAction),
);
