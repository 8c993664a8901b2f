//! # Game State Module
//!
//! Central game state and the turn engine.
//!
//! [`GameState`] owns the current floor, the message log, the settings and the
//! random number generator. Player actions enter through
//! [`GameState::handle_player_action`]; a successful action is followed by one
//! AI tick for every living non-player actor, a field-of-view update and the
//! end-of-turn bookkeeping.

use crate::game::actions::{Action, ConcreteAction};
use crate::game::affix::Affix;
use crate::game::ai::{self, AiState};
use crate::game::entities::{Actor, Entity, RenderOrder};
use crate::game::level::StatBoost;
use crate::game::messages::{palette, MessageLog};
use crate::game::settings::{CheatCommand, Settings};
use crate::game::world::GameMap;
use crate::game::{EntityId, Position};
use crate::generation::{self, factory, FloorKind, GenerationConfig};
use crate::rendering::RenderSnapshot;
use crate::utils::fov::compute_fov;
use crate::{TowerError, TowerResult};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Game statistics tracking player progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Number of enemies killed by any means
    pub enemies_defeated: u32,
    /// Number of floors climbed
    pub floors_climbed: u32,
    /// Number of items picked up
    pub items_collected: u32,
    /// Total damage suffered by non-player actors
    pub damage_dealt: u64,
    /// Total damage suffered by the player
    pub damage_taken: u64,
    /// Total steps taken by the player
    pub steps_taken: u64,
    /// Number of things eaten
    pub corpses_consumed: u32,
    /// Highest floor reached
    pub max_floor_reached: u32,
}

/// Game completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCompletionState {
    /// Game is still in progress
    Playing,
    /// Player died
    PlayerDied,
}

/// Result of handing one player action to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The action succeeded and the world moved on by one turn
    Advanced {
        /// The player has enough XP to pick a level-up boost
        requires_level_up: bool,
    },
    /// The action was impossible; nothing else happened
    Rejected(String),
    /// The player died during this turn
    PlayerDied,
}

fn fresh_rng() -> StdRng {
    StdRng::from_entropy()
}

/// Central game state containing all simulation data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// The floor the player is on
    pub map: GameMap,
    /// Current floor number, starting at 0
    pub current_floor: u32,
    /// The player actor's id
    pub player_id: EntityId,
    /// Player-facing messages
    pub message_log: MessageLog,
    /// Runtime settings and cheat flags
    pub settings: Settings,
    /// Completed turns
    pub turn_number: u64,
    /// Game statistics for player progress
    pub statistics: GameStatistics,
    /// Current game completion state
    pub completion_state: GameCompletionState,
    /// Random source for combat rolls, AI and generation
    #[serde(skip, default = "fresh_rng")]
    pub rng: StdRng,
}

impl GameState {
    /// Starts a new game on floor 0 with a fresh player.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleshtower::{GameState, Settings};
    ///
    /// let state = GameState::new(42, Settings::for_testing()).unwrap();
    /// assert_eq!(state.current_floor, 0);
    /// assert!(state.player().unwrap().is_alive());
    /// ```
    pub fn new(seed: u64, settings: Settings) -> TowerResult<Self> {
        let player = factory::spawn_player(Position::origin());
        let player_id = player.id();
        let mut placeholder = GameMap::new(1, 1, 0);
        placeholder.add_entity(player);

        let mut state = Self {
            map: placeholder,
            current_floor: 0,
            player_id,
            message_log: MessageLog::new(),
            settings,
            turn_number: 0,
            statistics: GameStatistics::default(),
            completion_state: GameCompletionState::Playing,
            rng: StdRng::seed_from_u64(seed),
        };
        state.enter_floor(0)?;
        state.message_log.add_message(
            "The tower swallows you whole. Eat, grow and climb.",
            palette::WELCOME,
        );
        Ok(state)
    }

    /// Wraps an existing floor. The player must already be on the map.
    pub fn with_map(
        map: GameMap,
        player_id: EntityId,
        settings: Settings,
        seed: u64,
    ) -> TowerResult<Self> {
        if map.actor(player_id).is_none() {
            return Err(TowerError::EntityNotFound(player_id));
        }
        let mut state = Self {
            current_floor: map.floor,
            map,
            player_id,
            message_log: MessageLog::new(),
            settings,
            turn_number: 0,
            statistics: GameStatistics::default(),
            completion_state: GameCompletionState::Playing,
            rng: StdRng::seed_from_u64(seed),
        };
        state.update_fov()?;
        Ok(state)
    }

    pub fn player(&self) -> TowerResult<&Actor> {
        self.actor(self.player_id)
    }

    pub fn player_mut(&mut self) -> TowerResult<&mut Actor> {
        self.actor_mut(self.player_id)
    }

    pub fn actor(&self, id: EntityId) -> TowerResult<&Actor> {
        self.map.actor(id).ok_or(TowerError::EntityNotFound(id))
    }

    pub fn actor_mut(&mut self, id: EntityId) -> TowerResult<&mut Actor> {
        self.map.actor_mut(id).ok_or(TowerError::EntityNotFound(id))
    }

    pub fn player_position(&self) -> TowerResult<Position> {
        Ok(self.player()?.position())
    }

    pub fn is_player(&self, id: EntityId) -> bool {
        id == self.player_id
    }

    pub fn is_game_over(&self) -> bool {
        self.completion_state == GameCompletionState::PlayerDied
    }

    /// Deals damage through the target's defense (unless ignored).
    ///
    /// Returns the HP actually lost. Kills the target when its HP reaches 0.
    pub fn damage(&mut self, target: EntityId, amount: i32, ignore_defense: bool) -> TowerResult<i32> {
        if self.is_player(target) && self.settings.god_mode {
            return Ok(0);
        }
        let actor = self.actor_mut(target)?;
        let dealt = actor.fighter.take_damage(amount, ignore_defense);
        let dead = actor.fighter.hp() == 0;
        self.record_damage(target, dealt);
        if dead {
            self.die(target)?;
        }
        Ok(dealt)
    }

    /// Removes `amount` HP from `target` with no defense applied, as a melee
    /// hit does.
    pub fn strike(&mut self, attacker: EntityId, target: EntityId, amount: i32) -> TowerResult<i32> {
        if self.is_player(target) && self.settings.god_mode {
            return Ok(0);
        }
        let fighter = &mut self.actor_mut(target)?.fighter;
        let before = fighter.hp();
        let dead = fighter.set_hp(before - amount.max(0));
        let dealt = before - fighter.hp();
        self.record_damage(target, dealt);
        if dead {
            debug!("{} landed the killing blow on {}", attacker, target);
            self.die(target)?;
        }
        Ok(dealt)
    }

    fn record_damage(&mut self, target: EntityId, dealt: i32) {
        let dealt = dealt.max(0) as u64;
        if self.is_player(target) {
            self.statistics.damage_taken += dealt;
        } else {
            self.statistics.damage_dealt += dealt;
        }
    }

    /// Turns a living actor into a corpse. Does nothing for the already dead.
    pub fn die(&mut self, id: EntityId) -> TowerResult<()> {
        let is_player = self.is_player(id);
        let drop_roll = self.rng.gen_range(0..100);
        let drop_chance = self.settings.death_drop_chance;

        let actor = self.actor_mut(id)?;
        if actor.ai.take().is_none() {
            return Ok(());
        }
        let name = actor.data.name.clone();
        actor.data.glyph = '%';
        actor.data.color = palette::CORPSE;
        actor.data.blocks_movement = false;
        actor.data.render_order = RenderOrder::Corpse;
        actor.data.name = format!("remains of {}", name);
        let xp = actor.level.xp_given;
        let organs = std::mem::take(&mut actor.organs);
        let position = actor.position();

        let carried = actor.inventory.len();

        let dropped = if drop_roll < drop_chance && carried > 0 {
            let index = self.rng.gen_range(0..carried);
            self.drop_from_corpse(id, index, position)?
        } else {
            None
        };

        if is_player {
            self.message_log
                .add_message("Your flesh becomes part of the tower.", palette::PLAYER_DIE);
            self.completion_state = GameCompletionState::PlayerDied;
            info!("Player died on floor {} at turn {}", self.current_floor, self.turn_number);
        } else {
            self.message_log
                .add_message(format!("{} returns to the tower.", name), palette::ENEMY_DIE);
            self.statistics.enemies_defeated += 1;
            debug!("{} died at {:?}", name, position);

            let player = self.player_mut()?;
            player.organs += organs;
            if player.level.add_xp(xp) {
                self.message_log.add_message(
                    format!("You gain {} experience points.", xp),
                    palette::WHITE,
                );
            }
        }

        if let Some(item) = dropped {
            self.message_log.add_message(
                format!("The {} falls from the remains of {}.", item, name),
                palette::WHITE,
            );
        }
        Ok(())
    }

    fn drop_from_corpse(
        &mut self,
        id: EntityId,
        index: usize,
        position: Position,
    ) -> TowerResult<Option<String>> {
        let actor = self.actor_mut(id)?;
        let Some(item_id) = actor.inventory.id_at(index) else {
            return Ok(None);
        };
        if actor.equipment.item_is_equipped(item_id) {
            actor.toggle_equip(item_id, None)?;
        }
        let Some(mut item) = actor.inventory.remove(item_id) else {
            return Ok(None);
        };
        item.set_position(position);
        let name = item.name().to_string();
        self.map.add_entity(item);
        Ok(Some(name))
    }

    /// Nearest living actor other than `exclude` that stands on a visible
    /// tile within `range` of `origin`.
    pub fn nearest_visible_actor(
        &self,
        origin: Position,
        range: f64,
        exclude: EntityId,
    ) -> Option<EntityId> {
        self.map
            .living_actors()
            .filter(|actor| actor.id() != exclude && self.map.is_visible(actor.position()))
            .map(|actor| (actor.id(), origin.euclidean_distance(actor.position())))
            .filter(|(_, distance)| *distance <= range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Every living actor within `radius` of `center`, in map order.
    pub fn living_actors_within(&self, center: Position, radius: f64) -> Vec<EntityId> {
        self.map
            .living_actors()
            .filter(|actor| center.euclidean_distance(actor.position()) <= radius)
            .map(Entity::id)
            .collect()
    }

    /// Generates `floor` and moves the player onto it.
    pub fn enter_floor(&mut self, floor: u32) -> TowerResult<()> {
        let shop_roll = self.rng.gen_range(0..=100) < self.settings.shop_chance;
        self.enter_floor_as(floor, FloorKind::route(floor, shop_roll))
    }

    fn enter_floor_as(&mut self, floor: u32, kind: FloorKind) -> TowerResult<()> {
        let mut player = self.map.remove_actor(self.player_id)?;
        let config = GenerationConfig::from_settings(&self.settings, floor, player.player_class);

        let mut map = match generation::generate_floor(&config, kind, &mut self.rng) {
            Ok(map) => map,
            Err(e) => {
                self.map.add_entity(player);
                return Err(e);
            }
        };
        player.set_position(map.player_start);
        map.entities.insert(0, player.into());
        self.map = map;

        if floor > self.current_floor {
            self.statistics.floors_climbed += floor - self.current_floor;
        }
        self.current_floor = floor;
        self.statistics.max_floor_reached = self.statistics.max_floor_reached.max(floor);
        info!("Entered floor {} ({:?})", floor, kind);
        self.update_fov()
    }

    /// Recomputes the player's field of view.
    pub fn update_fov(&mut self) -> TowerResult<()> {
        let origin = self.player_position()?;
        let visible = compute_fov(&self.map, origin, self.settings.fov_radius);
        self.map.set_visibility(visible)
    }

    /// Performs a player action and, if it succeeded, advances the world by
    /// one turn.
    pub fn handle_player_action(&mut self, action: &ConcreteAction) -> TowerResult<TurnOutcome> {
        if self.is_game_over() {
            return Err(TowerError::InvalidState("The player is dead".to_string()));
        }
        if action.actor() != self.player_id {
            return Err(TowerError::InvalidState(format!(
                "Player actions must be performed by the player, not {}",
                action.actor()
            )));
        }

        match action.perform(self) {
            Ok(()) => {}
            Err(TowerError::Impossible(reason)) => {
                self.message_log.add_message(reason.clone(), palette::IMPOSSIBLE);
                // A backfiring scroll can kill without spending the turn.
                if self.is_game_over() {
                    return Ok(TurnOutcome::PlayerDied);
                }
                return Ok(TurnOutcome::Rejected(reason));
            }
            Err(e) => return Err(e),
        }

        self.handle_enemy_turns()?;
        self.update_fov()?;
        self.end_turn()?;

        if self.is_game_over() {
            return Ok(TurnOutcome::PlayerDied);
        }
        Ok(TurnOutcome::Advanced {
            requires_level_up: self.player()?.level.requires_level_up(),
        })
    }

    /// Gives every living non-player actor one AI tick, in map order.
    pub fn handle_enemy_turns(&mut self) -> TowerResult<()> {
        let acting: Vec<EntityId> = self
            .map
            .living_actors()
            .filter(|actor| actor.ai != Some(AiState::PlayerControlled))
            .map(Entity::id)
            .filter(|&id| !self.is_player(id))
            .collect();

        for id in acting {
            if self.is_game_over() {
                break;
            }
            if !self.map.actor(id).map_or(false, Actor::is_alive) {
                continue;
            }
            match ai::take_turn(self, id) {
                Ok(()) => {}
                Err(TowerError::Impossible(reason)) => {
                    debug!("AI action of {} failed: {}", id, reason);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn end_turn(&mut self) -> TowerResult<()> {
        self.turn_number += 1;
        let infinite = self.settings.infinite_stamina;
        let fighter = &mut self.player_mut()?.fighter;
        if infinite {
            fighter.set_stamina(fighter.max_stamina());
        } else {
            fighter.restore_stamina(1);
        }
        Ok(())
    }

    /// Spends a pending level-up on `boost`, then rolls a new affix.
    pub fn level_up(&mut self, boost: StatBoost) -> TowerResult<()> {
        let player = self.player_mut()?;
        if !player.level.requires_level_up() {
            return Err(TowerError::impossible("You are not ready to grow yet."));
        }
        let fighter = &mut player.fighter;
        match boost {
            StatBoost::Constitution => {
                fighter.base_hp += 20;
                fighter.derive_stats(false);
                fighter.heal(20);
            }
            StatBoost::Strength => {
                fighter.base_power += 1;
                fighter.derive_stats(false);
            }
            StatBoost::Agility => {
                fighter.base_defense += 1;
                fighter.derive_stats(false);
            }
            StatBoost::Mana => {
                if !player.is_mage() {
                    return Err(TowerError::impossible("Only a mage can deepen their mana."));
                }
                let fighter = &mut player.fighter;
                fighter.base_mana += 10;
                fighter.derive_stats(false);
                fighter.heal_mana(10);
            }
        }
        player.level.increase_level();
        let level = player.level.current_level;
        let class = player.player_class;

        let affix = Affix::roll(&mut self.rng, class, true);
        let GameState {
            map,
            rng,
            message_log,
            player_id,
            ..
        } = self;
        let player = map
            .actor_mut(*player_id)
            .ok_or(TowerError::EntityNotFound(*player_id))?;
        message_log.add_message(
            format!("You advance to level {}! {}", level, boost.description()),
            palette::STATUS_EFFECT,
        );
        player.gain_affix(affix, rng, message_log);
        info!("Player reached level {}", level);
        Ok(())
    }

    /// Applies a debug command. Fails unless cheats are enabled.
    pub fn apply_cheat(&mut self, command: CheatCommand) -> TowerResult<()> {
        if !self.settings.cheats_enabled {
            return Err(TowerError::impossible("Cheats are disabled."));
        }
        warn!("Cheat applied: {:?}", command);
        match command {
            CheatCommand::SpawnShop => self.enter_floor_as(self.current_floor, FloorKind::Shop)?,
            CheatCommand::FloorUp => self.enter_floor(self.current_floor + 1)?,
            CheatCommand::FloorDown => self.enter_floor(self.current_floor.saturating_sub(1))?,
            CheatCommand::LevelUp => {
                let level = &mut self.player_mut()?.level;
                let missing = level.experience_to_next_level().saturating_sub(level.current_xp);
                level.current_xp += missing;
            }
            CheatCommand::ToggleGodMode => self.settings.god_mode = !self.settings.god_mode,
            CheatCommand::ToggleNoclip => self.settings.noclip = !self.settings.noclip,
        }
        Ok(())
    }

    /// What a renderer needs to draw the current floor.
    pub fn render_snapshot(&self) -> TowerResult<RenderSnapshot> {
        RenderSnapshot::capture(self)
    }

    /// Serializes the whole simulation into an opaque blob.
    pub fn save_to_bytes(&self) -> TowerResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Restores a blob written by [`GameState::save_to_bytes`]. The random
    /// source is re-seeded from entropy.
    pub fn load_from_bytes(bytes: &[u8]) -> TowerResult<Self> {
        let state: GameState = serde_json::from_slice(bytes)?;
        state.player()?;
        Ok(state)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> TowerResult<()> {
        std::fs::write(path.as_ref(), self.save_to_bytes()?)?;
        info!("Game saved to {}", path.as_ref().display());
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> TowerResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::load_from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::actions::{BumpAction, MovementAction, WaitAction};
    use crate::game::world::Tile;
    use crate::game::Direction;
    use crate::generation::factory::{spawn_item, spawn_monster, spawn_player, ItemKind, MonsterKind};

    /// An open 12x8 room with the player at (2, 2).
    fn arena() -> GameState {
        let mut map = GameMap::new(12, 8, 1);
        for y in 1..7 {
            for x in 1..11 {
                map.set_tile(Position::new(x, y), Tile::floor()).unwrap();
            }
        }
        let player = spawn_player(Position::new(2, 2));
        let player_id = player.id();
        map.add_entity(player);
        GameState::with_map(map, player_id, Settings::for_testing(), 7).unwrap()
    }

    #[test]
    fn test_game_state_creation() {
        let state = GameState::new(42, Settings::for_testing()).unwrap();
        assert_eq!(state.current_floor, 0);
        assert_eq!(state.turn_number, 0);
        assert_eq!(state.completion_state, GameCompletionState::Playing);
        let start = state.map.player_start;
        assert_eq!(state.player_position().unwrap(), start);
        assert!(state.map.is_walkable(start));
        assert!(state.map.is_visible(start));
    }

    #[test]
    fn test_wait_advances_turn() {
        let mut state = arena();
        let action = WaitAction::new(state.player_id).into();
        let outcome = state.handle_player_action(&action).unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::Advanced {
                requires_level_up: false
            }
        );
        assert_eq!(state.turn_number, 1);
    }

    #[test]
    fn test_rejected_action_skips_enemy_turns() {
        let mut state = arena();
        let orc = spawn_monster(MonsterKind::Orc, Position::new(8, 2));
        let orc_id = orc.id();
        state.map.add_entity(orc);
        state.update_fov().unwrap();

        // (1, 0) is wall.
        state.player_mut().unwrap().set_position(Position::new(1, 1));
        let action = MovementAction::toward(state.player_id, Direction::North).into();
        let outcome = state.handle_player_action(&action).unwrap();

        assert_eq!(outcome, TurnOutcome::Rejected("Path inaccessible!".to_string()));
        assert_eq!(state.turn_number, 0);
        assert_eq!(state.actor(orc_id).unwrap().position(), Position::new(8, 2));
        assert!(state.message_log.contains("Path inaccessible!"));
    }

    #[test]
    fn test_visible_enemy_approaches() {
        let mut state = arena();
        let orc = spawn_monster(MonsterKind::Orc, Position::new(8, 2));
        let orc_id = orc.id();
        state.map.add_entity(orc);
        state.update_fov().unwrap();

        let action = WaitAction::new(state.player_id).into();
        state.handle_player_action(&action).unwrap();
        let orc_position = state.actor(orc_id).unwrap().position();
        assert_eq!(orc_position.chebyshev_distance(Position::new(2, 2)), 5);
    }

    #[test]
    fn test_death_happens_once() {
        let mut state = arena();
        let orc = spawn_monster(MonsterKind::Orc, Position::new(3, 2));
        let orc_id = orc.id();
        state.map.add_entity(orc);

        state.damage(orc_id, 1000, true).unwrap();
        state.damage(orc_id, 1000, true).unwrap();
        state.die(orc_id).unwrap();

        let corpse = state.actor(orc_id).unwrap();
        assert!(!corpse.is_alive());
        assert_eq!(corpse.name(), "remains of Orc");
        assert!(!corpse.blocks_movement());
        assert_eq!(corpse.render_order(), RenderOrder::Corpse);
        assert_eq!(state.statistics.enemies_defeated, 1);
        assert_eq!(state.player().unwrap().level.current_xp, 35);
    }

    #[test]
    fn test_bump_kills_and_player_eats() {
        let mut state = arena();
        let rat = spawn_monster(MonsterKind::Rat, Position::new(3, 2));
        let rat_id = rat.id();
        state.map.add_entity(rat);
        state.player_mut().unwrap().fighter.base_power = 50;
        state.player_mut().unwrap().fighter.derive_stats(false);
        state.settings.god_mode = true;

        for _ in 0..10 {
            if !state.actor(rat_id).unwrap().is_alive() {
                break;
            }
            let action = BumpAction::new(state.player_id, Direction::East).into();
            state.handle_player_action(&action).unwrap();
        }
        assert!(!state.actor(rat_id).unwrap().is_alive());

        let step = MovementAction::toward(state.player_id, Direction::East).into();
        state.handle_player_action(&step).unwrap();
        let eat = crate::ConsumeCorpseAction::new(state.player_id).into();
        state.handle_player_action(&eat).unwrap();
        assert!(state.map.actor(rat_id).is_none());
        assert_eq!(state.statistics.corpses_consumed, 1);
        assert_eq!(state.player().unwrap().logbook.count("remains of Rat"), 1);
    }

    #[test]
    fn test_god_mode_blocks_damage() {
        let mut state = arena();
        state.settings.god_mode = true;
        let id = state.player_id;
        assert_eq!(state.damage(id, 500, true).unwrap(), 0);
        assert!(state.player().unwrap().is_alive());
    }

    #[test]
    fn test_player_death_ends_game() {
        let mut state = arena();
        let id = state.player_id;
        state.damage(id, 500, true).unwrap();
        assert!(state.is_game_over());
        let action = WaitAction::new(id).into();
        assert!(state.handle_player_action(&action).is_err());
    }

    #[test]
    fn test_corpse_can_drop_item() {
        let mut state = arena();
        state.settings.death_drop_chance = 100;
        let mut orc = spawn_monster(MonsterKind::Orc, Position::new(5, 5));
        orc.inventory.capacity = 1;
        orc.inventory.add(spawn_item(ItemKind::Dagger, Position::origin())).unwrap();
        let orc_id = orc.id();
        state.map.add_entity(orc);

        state.damage(orc_id, 1000, true).unwrap();
        let dropped = state.map.item_at(Position::new(5, 5)).unwrap();
        assert_eq!(dropped.name(), "Dagger");
        assert!(state.actor(orc_id).unwrap().inventory.is_empty());
    }

    #[test]
    fn test_level_up_flow() {
        let mut state = arena();
        assert!(state.level_up(StatBoost::Strength).is_err());

        state.settings.cheats_enabled = true;
        state.apply_cheat(CheatCommand::LevelUp).unwrap();
        let power = state.player().unwrap().fighter.power();
        let affixes = state.player().unwrap().affixes.len();
        state.level_up(StatBoost::Strength).unwrap();

        let player = state.player().unwrap();
        assert_eq!(player.level.current_level, 2);
        assert!(player.fighter.power() >= power + 1);
        assert!(player.affixes.len() > affixes);
    }

    #[test]
    fn test_mana_boost_needs_mage() {
        let mut state = arena();
        state.settings.cheats_enabled = true;
        state.apply_cheat(CheatCommand::LevelUp).unwrap();
        let err = state.level_up(StatBoost::Mana).unwrap_err();
        assert!(err.is_impossible());
        assert_eq!(state.player().unwrap().level.current_level, 1);
    }

    #[test]
    fn test_cheats_need_enabling() {
        let mut state = arena();
        let err = state.apply_cheat(CheatCommand::ToggleGodMode).unwrap_err();
        assert!(err.is_impossible());
        state.settings.cheats_enabled = true;
        state.apply_cheat(CheatCommand::ToggleGodMode).unwrap();
        assert!(state.settings.god_mode);
    }

    #[test]
    fn test_floor_up_moves_player() {
        let mut state = GameState::new(3, Settings::for_testing()).unwrap();
        state.settings.cheats_enabled = true;
        let player_id = state.player_id;
        state.apply_cheat(CheatCommand::FloorUp).unwrap();
        assert_eq!(state.current_floor, 1);
        assert_eq!(state.map.floor, 1);
        assert_eq!(state.player_id, player_id);
        assert_eq!(state.player_position().unwrap(), state.map.player_start);
        assert_eq!(state.statistics.floors_climbed, 1);
    }

    #[test]
    fn test_save_round_trip() {
        let mut state = arena();
        let action = WaitAction::new(state.player_id).into();
        state.handle_player_action(&action).unwrap();

        let bytes = state.save_to_bytes().unwrap();
        let loaded = GameState::load_from_bytes(&bytes).unwrap();
        assert_eq!(loaded.turn_number, 1);
        assert_eq!(loaded.player_id, state.player_id);
        assert_eq!(loaded.map.entities.len(), state.map.entities.len());
        assert_eq!(
            loaded.player_position().unwrap(),
            state.player_position().unwrap()
        );
    }

    #[test]
    fn test_stamina_regenerates_per_turn() {
        let mut state = arena();
        {
            let fighter = &mut state.player_mut().unwrap().fighter;
            fighter.base_stamina = 10;
            fighter.derive_stats(false);
            fighter.set_stamina(0);
        }
        let action = WaitAction::new(state.player_id).into();
        state.handle_player_action(&action).unwrap();
        assert_eq!(state.player().unwrap().fighter.stamina(), 1);
    }
}
