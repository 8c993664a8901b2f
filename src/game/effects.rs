//! # Consumption Effects
//!
//! What happens when the player eats something: corpses, items lying on the
//! floor, class totems. Every meal is written to the eater's [`LogBook`];
//! some boons only trigger on the first taste of a name.

use crate::game::entities::{Actor, ConcreteEntity, Entity};
use crate::game::messages::{palette, MessageLog};
use crate::game::settings::PlayerClass;
use crate::game::spells::Spell;
use crate::game::state::GameState;
use crate::game::EntityId;
use crate::TowerResult;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mass a Fighter gains per meal.
pub const MASS_PER_MEAL: i32 = 20;

/// Count of everything an actor has eaten, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogBook {
    pub entries: BTreeMap<String, u32>,
}

impl LogBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, name: &str) {
        *self.entries.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, name: &str) -> u32 {
        self.entries.get(name).copied().unwrap_or(0)
    }

    pub fn has(&self, name: &str) -> bool {
        self.count(name) > 0
    }
}

/// One-off stat gain granted by a first taste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Boon {
    MaxHp(i32),
    Power(i32),
    Defense(i32),
}

impl Boon {
    fn apply(self, actor: &mut Actor) -> String {
        let fighter = &mut actor.fighter;
        let text = match self {
            Boon::MaxHp(n) => {
                fighter.base_hp += n;
                fighter.derive_stats(false);
                fighter.heal(n);
                format!("Your flesh thickens (+{} max HP).", n)
            }
            Boon::Power(n) => {
                fighter.base_power += n;
                format!("Your sinews tighten (+{} power).", n)
            }
            Boon::Defense(n) => {
                fighter.base_defense += n;
                format!("Your hide hardens (+{} defense).", n)
            }
        };
        fighter.derive_stats(false);
        text
    }
}

/// The effect an entity has on whoever eats it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumeEffect {
    /// Nothing beyond being eaten
    Inert,
    /// Grants a boon the first time this name is eaten
    FirstTaste(Boon),
    /// Restores a percentage of max HP
    Heal { percent: i32 },
    /// Restores mana for mages
    RestoreMana { amount: i32 },
    /// Chance for a mage to learn the spell
    LearnSpell(Spell),
    /// Turns the eater into a mage
    BecomeMage,
    /// Sets the eater's class if none is chosen yet
    ChooseClass(PlayerClass),
}

/// Class passive that fires after every meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InnerConsumption {
    #[default]
    None,
    /// Heals 3 HP per meal
    Zombie,
    /// Adds 1 base HP per meal
    FlayedThrall,
}

impl ConsumeEffect {
    /// Applies the effect of `meal` to `consumer`. The meal has already been
    /// taken off the map.
    pub fn activate(
        &self,
        state: &mut GameState,
        consumer: EntityId,
        meal: &ConcreteEntity,
    ) -> TowerResult<()> {
        let name = meal.name().to_string();
        let roll = state.rng.gen_range(0..=100);
        let actor = state.actor_mut(consumer)?;
        let first = !actor.logbook.has(&name);
        actor.logbook.write(&name);

        let outcome = match self {
            ConsumeEffect::Inert => None,
            ConsumeEffect::FirstTaste(boon) => first.then(|| boon.apply(actor)),
            ConsumeEffect::Heal { percent } => {
                let amount = (actor.fighter.max_hp() * percent / 100).max(1);
                match actor.fighter.heal(amount) {
                    0 => None,
                    n => Some(format!("You recover {} HP.", n)),
                }
            }
            ConsumeEffect::RestoreMana { amount } if actor.is_mage() => {
                match actor.fighter.heal_mana(*amount) {
                    0 => None,
                    n => Some(format!("You recover {} mana.", n)),
                }
            }
            ConsumeEffect::RestoreMana { .. } => None,
            ConsumeEffect::LearnSpell(spell) => {
                let is_mage = actor.is_mage();
                actor
                    .spellbook
                    .learn_spell(spell.clone(), roll, is_mage)
                    .then(|| format!("Your flesh learns to cast: {}", spell.name))
            }
            ConsumeEffect::BecomeMage => {
                actor.player_class = PlayerClass::Mage;
                actor.fighter.base_mana = actor.fighter.base_mana.max(30);
                actor.fighter.base_hp = actor.fighter.base_hp.min(20);
                actor.fighter.derive_stats(true);
                Some("Arcane power floods your veins. You are a Mage now.".to_string())
            }
            ConsumeEffect::ChooseClass(class) if actor.player_class == PlayerClass::Generic => {
                adopt_class(actor, *class);
                Some(format!("You have become a {}.", class.name()))
            }
            ConsumeEffect::ChooseClass(_) => None,
        };

        let text = match outcome {
            Some(detail) => format!("You bury your teeth in the {}. {}", name, detail),
            None => format!("You bury your teeth in the {}, nothing happens.", name),
        };
        state.message_log.add_message(text, palette::CORPSE);
        digest(state, consumer)?;
        state.statistics.corpses_consumed += 1;
        Ok(())
    }
}

/// Runs the class passives that follow every meal.
fn digest(state: &mut GameState, consumer: EntityId) -> TowerResult<()> {
    let GameState {
        map, message_log, ..
    } = state;
    let actor = map
        .actor_mut(consumer)
        .ok_or(crate::TowerError::EntityNotFound(consumer))?;
    inner_consumption(actor, message_log);
    if actor.player_class == PlayerClass::Fighter && actor.fighter.gain_mass(MASS_PER_MEAL) {
        message_log.add_message(
            format!("Your mass swells! Mass level {}.", actor.fighter.mass_level),
            palette::STATUS_EFFECT,
        );
    }
    Ok(())
}

fn inner_consumption(actor: &mut Actor, log: &mut MessageLog) {
    match actor.inner_consumption {
        InnerConsumption::None => {}
        InnerConsumption::Zombie => {
            let healed = actor.fighter.heal(3);
            if healed > 0 {
                log.add_message(
                    format!("Your inner Zombie grants you {} HP for this consumption.", healed),
                    palette::HEALTH_RECOVERED,
                );
            }
        }
        InnerConsumption::FlayedThrall => {
            actor.fighter.base_hp += 1;
            actor.fighter.derive_stats(false);
            log.add_message(
                "Your inner Flayed Thrall stretches your skin (+1 max HP).",
                palette::HEALTH_RECOVERED,
            );
        }
    }
}

/// Applies a class's starting template.
pub fn adopt_class(actor: &mut Actor, class: PlayerClass) {
    actor.player_class = class;
    let fighter = &mut actor.fighter;
    match class {
        PlayerClass::Generic => {}
        PlayerClass::Fighter => {
            fighter.attributes.tm += 2;
            fighter.attributes.fi += 2;
            actor.inner_consumption = InnerConsumption::FlayedThrall;
        }
        PlayerClass::Mage => {
            fighter.attributes.pe += 2;
            fighter.attributes.cd += 2;
            fighter.base_mana += 20;
            if !actor.spellbook.knows("Lightning") && actor.spellbook.capacity > 0 {
                actor.spellbook.spells.push(Spell::lightning());
            }
        }
        PlayerClass::Rogue => {
            fighter.attributes.ns += 2;
            fighter.attributes.vi += 2;
            fighter.base_stamina += 20;
            actor.inner_consumption = InnerConsumption::Zombie;
        }
    }
    actor.fighter.derive_stats(true);
}
