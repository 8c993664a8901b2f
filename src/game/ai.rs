//! # Enemy AI
//!
//! Each non-player actor carries an [`AiState`]. On its turn the state is
//! taken out of the actor, asked for a list of intents, put back (possibly
//! replaced), and the intents are executed. Failures of the resulting actions
//! are the caller's to swallow.

use crate::game::actions::{Action, BumpAction, ConcreteAction, MeleeAction, MovementAction, WaitAction};
use crate::game::entities::{Actor, Entity};
use crate::game::messages::palette;
use crate::game::state::GameState;
use crate::game::world::GameMap;
use crate::game::{Direction, EntityId, Position};
use crate::generation::factory::{spawn_monster, MonsterKind};
use crate::utils::pathfinding::find_path;
use crate::TowerResult;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Casters only consider targets closer than this.
pub const CASTER_SIGHT: f64 = 10.0;

/// Casters prefer melee inside this distance.
pub const CASTER_MIN_RANGE: f64 = 4.0;

/// Damage of a caster's bolt, which ignores defense.
pub const CASTER_BOLT_DAMAGE: i32 = 8;

/// Turns between brood spawns.
pub const BROOD_INTERVAL: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    /// Driven by player input; never ticked by the engine
    PlayerControlled,
    /// Chases and attacks the player once it is seen
    Hostile { path: Vec<Position> },
    /// Casts at range while slots last, otherwise fights like a hostile
    Caster {
        path: Vec<Position>,
        spell_slots: u32,
    },
    /// Hostile that spawns minions next to itself
    Brood {
        path: Vec<Position>,
        turns_since_spawn: u32,
    },
    /// Hostile that takes two steps per turn
    Skitter { path: Vec<Position> },
    /// Stumbles randomly, then reverts to the wrapped state
    Confused {
        previous: Box<AiState>,
        turns_remaining: i32,
    },
    /// Waits for customers
    Vendor,
}

impl AiState {
    pub fn hostile() -> Self {
        AiState::Hostile { path: Vec::new() }
    }

    pub fn caster(spell_slots: u32) -> Self {
        AiState::Caster {
            path: Vec::new(),
            spell_slots,
        }
    }

    pub fn brood() -> Self {
        AiState::Brood {
            path: Vec::new(),
            turns_since_spawn: 0,
        }
    }

    pub fn skitter() -> Self {
        AiState::Skitter { path: Vec::new() }
    }

    /// Whether the confusion spell can take hold.
    pub fn is_confusable(&self) -> bool {
        matches!(
            self,
            AiState::Hostile { .. }
                | AiState::Caster { .. }
                | AiState::Brood { .. }
                | AiState::Skitter { .. }
        )
    }
}

/// Something an AI wants done this turn.
#[derive(Debug, Clone, PartialEq)]
pub enum AiIntent {
    Act(ConcreteAction),
    /// Ranged bolt that ignores defense
    Strike { target: EntityId, damage: i32 },
    /// Spawn a minion on the given tile
    Spawn(Position),
    Announce(String),
}

/// Read-only context an AI decides from.
struct Senses<'a> {
    map: &'a GameMap,
    me: &'a Actor,
    player: Position,
}

/// Runs one AI tick for `actor_id`.
pub fn take_turn(state: &mut GameState, actor_id: EntityId) -> TowerResult<()> {
    let player = state.player_position()?;
    let Some(ai) = state.map.actor_mut(actor_id).and_then(|actor| actor.ai.take()) else {
        return Ok(());
    };

    let (ai, intents) = match state.map.actor(actor_id) {
        Some(me) => {
            let senses = Senses {
                map: &state.map,
                me,
                player,
            };
            decide(ai, &senses, &mut state.rng)
        }
        None => return Ok(()),
    };

    if let Some(actor) = state.map.actor_mut(actor_id) {
        actor.ai = Some(ai);
    }

    for intent in intents {
        if !state.map.actor(actor_id).map_or(false, Actor::is_alive) {
            break;
        }
        execute(state, actor_id, intent)?;
    }
    Ok(())
}

fn execute(state: &mut GameState, actor_id: EntityId, intent: AiIntent) -> TowerResult<()> {
    match intent {
        AiIntent::Act(action) => action.perform(state),
        AiIntent::Strike { target, damage } => {
            let caster = state.actor(actor_id)?.name().to_string();
            let victim = state.actor(target)?.name().to_string();
            let dealt = state.damage(target, damage, true)?;
            let color = if state.is_player(target) {
                palette::ENEMY_ATTACK
            } else {
                palette::WHITE
            };
            state.message_log.add_message(
                format!("The {} strikes the {} for {} HP.", caster, victim, dealt),
                color,
            );
            Ok(())
        }
        AiIntent::Spawn(position) => {
            let minion = spawn_monster(MonsterKind::ViceraSpawn, position);
            debug!("Spawning {} at {:?}", minion.name(), position);
            let text = format!(
                "The {} splits off a {}!",
                state.actor(actor_id)?.name(),
                minion.name()
            );
            state.message_log.add_message(text, palette::ENEMY_ATTACK);
            state.map.add_entity(minion);
            Ok(())
        }
        AiIntent::Announce(text) => {
            state.message_log.add_message(text, palette::STATUS_EFFECT);
            Ok(())
        }
    }
}

fn decide(ai: AiState, senses: &Senses<'_>, rng: &mut StdRng) -> (AiState, Vec<AiIntent>) {
    let me = senses.me.id();
    match ai {
        AiState::PlayerControlled | AiState::Vendor => {
            (ai, vec![AiIntent::Act(WaitAction::new(me).into())])
        }
        AiState::Hostile { mut path } => {
            let intents = chase(senses, senses.player, &mut path, 1);
            (AiState::Hostile { path }, intents)
        }
        AiState::Skitter { mut path } => {
            let intents = chase(senses, senses.player, &mut path, 2);
            (AiState::Skitter { path }, intents)
        }
        AiState::Brood {
            mut path,
            mut turns_since_spawn,
        } => {
            let mut intents = Vec::new();
            turns_since_spawn += 1;
            if turns_since_spawn >= BROOD_INTERVAL {
                if let Some(spot) = free_neighbor(senses, rng) {
                    turns_since_spawn = 0;
                    intents.push(AiIntent::Spawn(spot));
                }
            }
            intents.extend(chase(senses, senses.player, &mut path, 1));
            (
                AiState::Brood {
                    path,
                    turns_since_spawn,
                },
                intents,
            )
        }
        AiState::Caster {
            mut path,
            mut spell_slots,
        } => {
            let origin = senses.me.position();
            let target = senses
                .map
                .living_actors()
                .filter(|actor| actor.id() != me && senses.map.is_visible(actor.position()))
                .map(|actor| (actor.id(), actor.position(), origin.euclidean_distance(actor.position())))
                .filter(|(_, _, distance)| *distance < CASTER_SIGHT)
                .min_by(|a, b| a.2.total_cmp(&b.2));

            let intents = match target {
                Some((target, _, distance)) if distance > CASTER_MIN_RANGE && spell_slots > 0 => {
                    spell_slots -= 1;
                    vec![AiIntent::Strike {
                        target,
                        damage: CASTER_BOLT_DAMAGE,
                    }]
                }
                Some((_, position, _)) => chase(senses, position, &mut path, 1),
                None => follow(senses, &mut path, 1),
            };
            (AiState::Caster { path, spell_slots }, intents)
        }
        AiState::Confused {
            previous,
            turns_remaining,
        } => {
            if turns_remaining <= 0 {
                let text = format!("The {} is no longer confused.", senses.me.name());
                return (*previous, vec![AiIntent::Announce(text)]);
            }
            let direction = Direction::all()
                .choose(rng)
                .copied()
                .unwrap_or(Direction::North);
            (
                AiState::Confused {
                    previous,
                    turns_remaining: turns_remaining - 1,
                },
                vec![AiIntent::Act(BumpAction::new(me, direction).into())],
            )
        }
    }
}

/// Attack when adjacent and seen, otherwise re-path when seen and walk.
fn chase(senses: &Senses<'_>, target: Position, path: &mut Vec<Position>, steps: usize) -> Vec<AiIntent> {
    let origin = senses.me.position();
    if senses.map.is_visible(origin) {
        if origin.chebyshev_distance(target) <= 1 {
            let delta = target - origin;
            return vec![AiIntent::Act(
                MeleeAction::new(senses.me.id(), delta).into(),
            )];
        }
        *path = find_path(senses.map, origin, target).unwrap_or_default();
    }
    follow(senses, path, steps)
}

/// Pops up to `steps` positions off the remembered path.
fn follow(senses: &Senses<'_>, path: &mut Vec<Position>, steps: usize) -> Vec<AiIntent> {
    let me = senses.me.id();
    let mut at = senses.me.position();
    let mut intents = Vec::new();
    for _ in 0..steps {
        if path.is_empty() {
            break;
        }
        let next = path.remove(0);
        // The last step of a chase path is the target's own tile.
        if next == senses.player || senses.map.blocking_entity_at(next).is_some() {
            path.clear();
            break;
        }
        intents.push(AiIntent::Act(MovementAction::new(me, next - at).into()));
        at = next;
    }
    if intents.is_empty() {
        intents.push(AiIntent::Act(WaitAction::new(me).into()));
    }
    intents
}

fn free_neighbor(senses: &Senses<'_>, rng: &mut StdRng) -> Option<Position> {
    let candidates: Vec<Position> = senses
        .me
        .position()
        .adjacent_positions()
        .into_iter()
        .filter(|&pos| senses.map.is_walkable(pos) && senses.map.blocking_entity_at(pos).is_none())
        .collect();
    candidates.choose(rng).copied()
}
