//! # Input Module
//!
//! Turns player intent into game actions. Front ends map their keys to a
//! [`PlayerInput`]; the [`InputHandler`] resolves it against the current
//! state into a [`ConcreteAction`], or into nothing for inputs that are not
//! turns (menus, level-up choices, cheats).

pub mod commands;

pub use commands::*;

use crate::game::actions::{
    BumpAction, BuyAction, CastSpellAction, ConcreteAction, ConsumeCorpseAction, DropItemAction,
    EquipAction, ItemAction, PickupAction, TakeStairsAction, WaitAction,
};
use crate::game::entities::{Actor, Entity};
use crate::game::level::StatBoost;
use crate::game::settings::CheatCommand;
use crate::game::state::GameState;
use crate::game::{Direction, EntityId, Position};
use crate::{TowerError, TowerResult};
use serde::{Deserialize, Serialize};

/// Input handler for processing player commands.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjkl yubn)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleshtower::{Direction, InputHandler, PlayerInput};
    ///
    /// let input_handler = InputHandler::new();
    /// assert_eq!(input_handler.key_to_input('k'), Some(PlayerInput::Move(Direction::North)));
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// Maps a single key press to an input.
    pub fn key_to_input(&self, key: char) -> Option<PlayerInput> {
        let input = match key {
            'w' | '8' => PlayerInput::Move(Direction::North),
            's' | '2' => PlayerInput::Move(Direction::South),
            'a' | '4' => PlayerInput::Move(Direction::West),
            'd' | '6' => PlayerInput::Move(Direction::East),
            '7' => PlayerInput::Move(Direction::Northwest),
            '9' => PlayerInput::Move(Direction::Northeast),
            '1' => PlayerInput::Move(Direction::Southwest),
            '3' => PlayerInput::Move(Direction::Southeast),
            'h' if self.vi_keys_enabled => PlayerInput::Move(Direction::West),
            'j' if self.vi_keys_enabled => PlayerInput::Move(Direction::South),
            'k' if self.vi_keys_enabled => PlayerInput::Move(Direction::North),
            'l' if self.vi_keys_enabled => PlayerInput::Move(Direction::East),
            'y' if self.vi_keys_enabled => PlayerInput::Move(Direction::Northwest),
            'u' if self.vi_keys_enabled => PlayerInput::Move(Direction::Northeast),
            'b' if self.vi_keys_enabled => PlayerInput::Move(Direction::Southwest),
            'n' if self.vi_keys_enabled => PlayerInput::Move(Direction::Southeast),
            '.' | '5' | ' ' => PlayerInput::Wait,
            'g' | ',' => PlayerInput::PickUp,
            '<' => PlayerInput::TakeStairs,
            'e' => PlayerInput::ConsumeCorpse,
            'i' => PlayerInput::ShowInventory,
            '?' => PlayerInput::Help,
            'q' => PlayerInput::Quit,
            _ => return None,
        };
        Some(input)
    }

    /// Converts player input to a concrete game action.
    ///
    /// Inputs that do not take a turn resolve to `Ok(None)`. Inputs that
    /// cannot be carried out fail with an impossible error.
    pub fn input_to_action(
        &self,
        input: PlayerInput,
        game_state: &GameState,
    ) -> TowerResult<Option<ConcreteAction>> {
        let player = game_state.player()?;
        let id = player.id();
        let action: ConcreteAction = match input {
            PlayerInput::Move(direction) => BumpAction::new(id, direction).into(),
            PlayerInput::Wait => WaitAction::new(id).into(),
            PlayerInput::PickUp => PickupAction::new(id).into(),
            PlayerInput::TakeStairs => TakeStairsAction::new(id).into(),
            PlayerInput::ConsumeCorpse => ConsumeCorpseAction::new(id).into(),
            PlayerInput::Equip(index) => EquipAction::new(id, inventory_item(player, index)?).into(),
            PlayerInput::Drop(index) => DropItemAction::new(id, inventory_item(player, index)?).into(),
            PlayerInput::UseItem { index, target } => {
                ItemAction::new(id, inventory_item(player, index)?, target).into()
            }
            PlayerInput::CastSpell(index) => CastSpellAction::new(id, index).into(),
            PlayerInput::Buy(index) => {
                let vendor = adjacent_vendor(game_state, player.position()).ok_or_else(|| {
                    TowerError::impossible("There is no one here to trade with.")
                })?;
                BuyAction::new(id, vendor, index).into()
            }
            PlayerInput::LevelUp(_)
            | PlayerInput::Cheat(_)
            | PlayerInput::ShowInventory
            | PlayerInput::Help
            | PlayerInput::Quit => return Ok(None),
        };
        Ok(Some(action))
    }
}

fn inventory_item(player: &Actor, index: usize) -> TowerResult<EntityId> {
    player
        .inventory
        .id_at(index)
        .ok_or_else(|| TowerError::impossible("You don't have that."))
}

fn adjacent_vendor(state: &GameState, at: Position) -> Option<EntityId> {
    state
        .map
        .living_actors()
        .find(|actor| actor.is_vendor() && actor.position().chebyshev_distance(at) <= 1)
        .map(Entity::id)
}

/// Player input types that can be processed by the input handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerInput {
    /// Move or attack in a direction
    Move(Direction),
    /// Wait/rest for one turn
    Wait,
    /// Pick up item at current position
    PickUp,
    TakeStairs,
    /// Eat the remains underfoot
    ConsumeCorpse,
    /// Equip the inventory item at this index
    Equip(usize),
    Drop(usize),
    /// Use the inventory item at this index, optionally at a tile
    UseItem {
        index: usize,
        target: Option<Position>,
    },
    CastSpell(usize),
    /// Buy the ware at this index from an adjacent vendor
    Buy(usize),
    /// Spend a pending level-up
    LevelUp(StatBoost),
    Cheat(CheatCommand),
    ShowInventory,
    /// Show help information
    Help,
    /// Quit the game
    Quit,
}
