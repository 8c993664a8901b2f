//! # Autoexplore Module
//!
//! A simple autopilot that plays the player for headless runs: it picks a
//! class, fights what it sees, loots, eats, explores and climbs.

use crate::game::actions::{
    BumpAction, ConcreteAction, ConsumeCorpseAction, EquipAction, ItemAction, PickupAction,
    TakeStairsAction, WaitAction,
};
use crate::game::consumable::Consumable;
use crate::game::entities::{Actor, ConcreteEntity, Entity, RenderOrder};
use crate::game::level::StatBoost;
use crate::game::settings::PlayerClass;
use crate::game::state::GameState;
use crate::game::world::GameMap;
use crate::game::{Direction, EntityId, Position};
use crate::utils::pathfinding::find_path;
use crate::TowerResult;
use log::trace;
use std::collections::{HashSet, VecDeque};

/// Heal below this share of max HP, in percent.
const HEAL_THRESHOLD: i32 = 50;

/// What the autopilot wants to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum AutoStep {
    /// Take a turn
    Act(ConcreteAction),
    /// Spend a pending level-up
    LevelUp(StatBoost),
    /// Nothing left to do on this floor
    Stuck,
}

/// Autopilot state.
#[derive(Debug, Clone, Default)]
pub struct AutoPilot {
    /// Class picked on floor 0
    pub preferred_class: PlayerClass,
    /// Tiles the autopilot failed to reach this floor
    unreachable: HashSet<Position>,
    floor: u32,
}

impl AutoPilot {
    pub fn new(preferred_class: PlayerClass) -> Self {
        Self {
            preferred_class,
            ..Self::default()
        }
    }

    /// Decides the next step for the player.
    pub fn next_step(&mut self, state: &GameState) -> TowerResult<AutoStep> {
        if state.current_floor != self.floor {
            self.floor = state.current_floor;
            self.unreachable.clear();
        }

        let player = state.player()?;
        let id = player.id();
        let here = player.position();
        let map = &state.map;

        if player.level.requires_level_up() {
            return Ok(AutoStep::LevelUp(StatBoost::Constitution));
        }

        if player.fighter.hp() * 100 < player.fighter.max_hp() * HEAL_THRESHOLD {
            if let Some(potion) = healing_potion(player) {
                return Ok(act(ItemAction::new(id, potion, None)));
            }
        }

        if let Some(item) = unworn_gear(player) {
            return Ok(act(EquipAction::new(id, item)));
        }

        if let Some(enemy) = visible_enemies(state).find(|e| e.position().chebyshev_distance(here) <= 1) {
            if let Some(direction) = Direction::from_delta(enemy.position() - here) {
                return Ok(act(BumpAction::new(id, direction)));
            }
        }

        for entity in map.entities_at(here).filter(|e| e.id() != id) {
            if self.wants_to_eat(player, entity) {
                return Ok(act(ConsumeCorpseAction::new(id)));
            }
            if entity.as_item().is_some() && !player.inventory.is_full() {
                return Ok(act(PickupAction::new(id)));
            }
        }

        let targets = self.targets(state, player);
        for target in targets {
            if target == here {
                continue;
            }
            if self.unreachable.contains(&target) {
                continue;
            }
            match find_path(map, here, target).and_then(|path| path.first().copied()) {
                Some(next) => {
                    trace!("Autopilot heading for {:?} via {:?}", target, next);
                    if let Some(direction) = Direction::from_delta(next - here) {
                        return Ok(act(BumpAction::new(id, direction)));
                    }
                }
                None => {
                    self.unreachable.insert(target);
                }
            }
        }

        if map.upstairs == Some(here) {
            return Ok(act(TakeStairsAction::new(id)));
        }
        if visible_enemies(state).next().is_some() {
            return Ok(act(WaitAction::new(id)));
        }
        Ok(AutoStep::Stuck)
    }

    fn wants_to_eat(&self, player: &Actor, entity: &ConcreteEntity) -> bool {
        match entity {
            ConcreteEntity::Actor(corpse) => corpse.render_order() == RenderOrder::Corpse,
            ConcreteEntity::Item(item) => {
                player.player_class == PlayerClass::Generic
                    && item.name() == format!("{} Totem", self.preferred_class.name())
            }
        }
    }

    /// Places worth walking to, most urgent first.
    fn targets(&self, state: &GameState, player: &Actor) -> Vec<Position> {
        let map = &state.map;
        let mut targets = Vec::new();

        if player.player_class == PlayerClass::Generic {
            let totem = format!("{} Totem", self.preferred_class.name());
            targets.extend(map.items().filter(|i| i.name() == totem).map(Entity::position));
        }

        targets.extend(visible_enemies(state).map(Entity::position));

        let visible_loot = map.entities.iter().filter(|e| {
            map.is_visible(e.position())
                && (e.as_item().is_some() || e.render_order() == RenderOrder::Corpse)
        });
        if !player.inventory.is_full() {
            targets.extend(visible_loot.map(Entity::position));
        }

        targets.extend(nearest_frontier(map, player.position()));
        targets.extend(map.upstairs);
        targets
    }
}

fn act(action: impl Into<ConcreteAction>) -> AutoStep {
    AutoStep::Act(action.into())
}

fn visible_enemies(state: &GameState) -> impl Iterator<Item = &Actor> {
    state.map.living_actors().filter(move |actor| {
        !state.is_player(actor.id()) && !actor.is_vendor() && state.map.is_visible(actor.position())
    })
}

fn healing_potion(player: &Actor) -> Option<EntityId> {
    player
        .inventory
        .items
        .iter()
        .find(|item| matches!(item.consumable, Some(Consumable::Healing { .. })))
        .map(Entity::id)
}

fn unworn_gear(player: &Actor) -> Option<EntityId> {
    player.inventory.items.iter().find_map(|item| {
        let equippable = item.equippable.as_ref()?;
        let slot = player.equipment.slot_for(item.id(), equippable.equipment_type);
        (!player.equipment.item_is_equipped(item.id()) && player.equipment.slot(slot).is_none())
            .then(|| item.id())
    })
}

/// Closest explored walkable tile that borders unexplored ground.
fn nearest_frontier(map: &GameMap, start: Position) -> Option<Position> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(pos) = queue.pop_front() {
        let neighbors = pos.adjacent_positions();
        if neighbors.iter().any(|&n| map.in_bounds(n) && !map.is_explored(n)) {
            return Some(pos);
        }
        for next in neighbors {
            if map.is_walkable(next) && map.is_explored(next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    None
}
