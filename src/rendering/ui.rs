//! # User Interface Elements
//!
//! Status panel contents: the player's vitals, progression and the tail of
//! the message log.

use crate::game::entities::{Actor, Entity};
use crate::game::messages::Message;
use serde::{Deserialize, Serialize};

/// Messages shown under the map.
pub const VISIBLE_MESSAGES: usize = 5;

/// Player numbers shown in the status panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub name: String,
    pub class: String,
    pub hp: i32,
    pub max_hp: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub stamina: i32,
    pub max_stamina: i32,
    pub power: i32,
    pub defense: i32,
    pub damage_reduction: i32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub organs: u32,
    pub floor: u32,
    pub turn: u64,
}

impl Hud {
    pub fn for_player(player: &Actor, floor: u32, turn: u64) -> Self {
        let fighter = &player.fighter;
        Self {
            name: player.name().to_string(),
            class: player.player_class.name().to_string(),
            hp: fighter.hp(),
            max_hp: fighter.max_hp(),
            mana: fighter.mana(),
            max_mana: fighter.max_mana(),
            stamina: fighter.stamina(),
            max_stamina: fighter.max_stamina(),
            power: fighter.power(),
            defense: fighter.defense(),
            damage_reduction: fighter.damage_reduction(),
            level: player.level.current_level,
            xp: player.level.current_xp,
            xp_to_next: player.level.experience_to_next_level(),
            organs: player.organs,
            floor,
            turn,
        }
    }

    /// Status lines, top to bottom.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleshtower::{spawn_player, Hud, Position};
    ///
    /// let player = spawn_player(Position::new(1, 1));
    /// let lines = Hud::for_player(&player, 3, 0).lines();
    /// assert_eq!(lines[1], "HP: 34/34");
    /// ```
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("{} the {} | Floor {} | Turn {}", self.name, self.class, self.floor, self.turn),
            format!("HP: {}/{}", self.hp, self.max_hp),
            format!("MP: {}/{}  SP: {}/{}", self.mana, self.max_mana, self.stamina, self.max_stamina),
            format!(
                "Power {}  Defense {}  Reduction {}%",
                self.power, self.defense, self.damage_reduction
            ),
            format!(
                "Level {} ({}/{} XP)  Organs {}",
                self.level, self.xp, self.xp_to_next, self.organs
            ),
        ]
    }
}

/// A bar of `width` cells filled in proportion to `value / max`.
pub fn bar(value: i32, max: i32, width: usize) -> String {
    let filled = if max <= 0 {
        0
    } else {
        (value.clamp(0, max) as usize * width) / max as usize
    };
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// The message log tail, oldest first, with stack counters.
pub fn message_lines(messages: &[Message]) -> Vec<String> {
    messages.iter().map(Message::full_text).collect()
}
