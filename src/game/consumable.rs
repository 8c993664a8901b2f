//! # Consumables
//!
//! Single-use items: potions and scrolls. A consumable is removed from its
//! owner's inventory only when its activation succeeds.

use crate::game::ai::AiState;
use crate::game::entities::Entity;
use crate::game::messages::palette;
use crate::game::state::GameState;
use crate::game::{EntityId, Position};
use crate::{TowerError, TowerResult};
use serde::{Deserialize, Serialize};

/// Failed lightning readings tolerated before the scroll turns on its reader.
pub const LIGHTNING_FIZZLE_LIMIT: u32 = 3;

/// How a consumable picks what it affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Targeting {
    /// Acts on the user or picks its own target
    None,
    /// Needs a single actor chosen by position
    Single,
    /// Needs a visible area centered on a position
    Area { radius: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Consumable {
    /// Restores a percentage of max HP
    Healing { percent: i32 },
    /// Restores mana; only mages can use it
    Mana { amount: i32 },
    /// Strikes the nearest visible actor within range
    Lightning {
        damage: i32,
        max_range: i32,
        fizzles: u32,
    },
    /// Damages every actor within the radius of a visible tile
    Fireball { damage: i32, radius: i32 },
    /// Confuses one actor for a number of turns
    Confusion { turns: i32 },
}

impl Consumable {
    pub fn targeting(&self) -> Targeting {
        match self {
            Consumable::Fireball { radius, .. } => Targeting::Area { radius: *radius },
            Consumable::Confusion { .. } => Targeting::Single,
            _ => Targeting::None,
        }
    }

    /// Uses the item. `target` is only read by targeted consumables.
    pub fn activate(
        &self,
        state: &mut GameState,
        consumer: EntityId,
        item_id: EntityId,
        target: Position,
    ) -> TowerResult<()> {
        match self {
            Consumable::Healing { percent } => heal(state, consumer, item_id, *percent),
            Consumable::Mana { amount } => restore_mana(state, consumer, item_id, *amount),
            Consumable::Lightning {
                damage, max_range, ..
            } => lightning(state, consumer, item_id, *damage, *max_range),
            Consumable::Fireball { damage, radius } => {
                fireball(state, consumer, item_id, target, *damage, *radius)
            }
            Consumable::Confusion { turns } => confuse(state, consumer, item_id, target, *turns),
        }
    }
}

/// Removes a used item from its owner and records it in the logbook.
fn consume(state: &mut GameState, consumer: EntityId, item_id: EntityId) -> TowerResult<()> {
    let actor = state.actor_mut(consumer)?;
    let item = actor
        .inventory
        .remove(item_id)
        .ok_or(TowerError::EntityNotFound(item_id))?;
    actor.logbook.write(item.name());
    Ok(())
}

fn item_name(state: &GameState, consumer: EntityId, item_id: EntityId) -> TowerResult<String> {
    state
        .actor(consumer)?
        .inventory
        .get(item_id)
        .map(|item| item.name().to_string())
        .ok_or(TowerError::EntityNotFound(item_id))
}

fn heal(state: &mut GameState, consumer: EntityId, item_id: EntityId, percent: i32) -> TowerResult<()> {
    let name = item_name(state, consumer, item_id)?;
    let fighter = &mut state.actor_mut(consumer)?.fighter;
    let amount = (fighter.max_hp() * percent / 100).max(1);
    let recovered = fighter.heal(amount);
    if recovered == 0 {
        return Err(TowerError::impossible("Your health is already full."));
    }
    state.message_log.add_message(
        format!("You consume the {}, and recover {} HP!", name, recovered),
        palette::HEALTH_RECOVERED,
    );
    consume(state, consumer, item_id)
}

fn restore_mana(
    state: &mut GameState,
    consumer: EntityId,
    item_id: EntityId,
    amount: i32,
) -> TowerResult<()> {
    let name = item_name(state, consumer, item_id)?;
    let actor = state.actor_mut(consumer)?;
    if !actor.is_mage() {
        return Err(TowerError::impossible("The blue liquid has no effect on you."));
    }
    let recovered = actor.fighter.heal_mana(amount);
    if recovered == 0 {
        return Err(TowerError::impossible("Your mana is already full."));
    }
    state.message_log.add_message(
        format!("You consume the {}, and recover {} mana!", name, recovered),
        palette::HEALTH_RECOVERED,
    );
    consume(state, consumer, item_id)
}

fn lightning(
    state: &mut GameState,
    consumer: EntityId,
    item_id: EntityId,
    damage: i32,
    max_range: i32,
) -> TowerResult<()> {
    let origin = state.actor(consumer)?.position();
    let Some(target) = state.nearest_visible_actor(origin, max_range as f64, consumer) else {
        let fizzles = {
            let item = state
                .actor_mut(consumer)?
                .inventory
                .get_mut(item_id)
                .ok_or(TowerError::EntityNotFound(item_id))?;
            match &mut item.consumable {
                Some(Consumable::Lightning { fizzles, .. }) => {
                    *fizzles += 1;
                    *fizzles
                }
                _ => 0,
            }
        };
        if fizzles <= LIGHTNING_FIZZLE_LIMIT {
            return Err(TowerError::impossible("No enemy is close enough to strike."));
        }
        let dealt = state.damage(consumer, damage, false)?;
        consume(state, consumer, item_id)?;
        return Err(TowerError::impossible(format!(
            "The scroll loses patience and strikes you instead, for {} HP!",
            dealt
        )));
    };

    let target_name = state.actor(target)?.name().to_string();
    let dealt = state.damage(target, damage, false)?;
    state.message_log.add_message(
        format!(
            "A lightning bolt strikes the {} with a loud thunder, for {} damage!",
            target_name, dealt
        ),
        palette::WHITE,
    );
    consume(state, consumer, item_id)
}

fn fireball(
    state: &mut GameState,
    consumer: EntityId,
    item_id: EntityId,
    target: Position,
    damage: i32,
    radius: i32,
) -> TowerResult<()> {
    if !state.map.is_visible(target) {
        return Err(TowerError::impossible(
            "You cannot target an area that you cannot see.",
        ));
    }
    let victims = state.living_actors_within(target, radius as f64);
    if victims.is_empty() {
        return Err(TowerError::impossible("There are no targets in the radius."));
    }
    for victim in victims {
        let name = state.actor(victim)?.name().to_string();
        let dealt = state.damage(victim, damage, false)?;
        state.message_log.add_message(
            format!(
                "The {} is engulfed in a fiery explosion, taking {} damage!",
                name, dealt
            ),
            palette::PLAYER_ATTACK,
        );
    }
    consume(state, consumer, item_id)
}

fn confuse(
    state: &mut GameState,
    consumer: EntityId,
    item_id: EntityId,
    target: Position,
    turns: i32,
) -> TowerResult<()> {
    if !state.map.is_visible(target) {
        return Err(TowerError::impossible(
            "You cannot target an area that you cannot see.",
        ));
    }
    let target_id = state
        .map
        .living_actor_at(target)
        .map(Entity::id)
        .ok_or_else(|| TowerError::impossible("You must select an enemy to target."))?;
    if target_id == consumer {
        return Err(TowerError::impossible("You cannot confuse yourself!"));
    }

    let actor = state.actor_mut(target_id)?;
    let name = actor.name().to_string();
    match actor.ai.take() {
        Some(previous) if previous.is_confusable() => {
            actor.ai = Some(AiState::Confused {
                previous: Box::new(previous),
                turns_remaining: turns,
            });
        }
        previous => {
            actor.ai = previous;
            return Err(TowerError::impossible(format!("The {} cannot be confused.", name)));
        }
    }
    state.message_log.add_message(
        format!(
            "The eyes of the {} look vacant, as it starts to stumble around!",
            name
        ),
        palette::STATUS_EFFECT,
    );
    consume(state, consumer, item_id)
}
