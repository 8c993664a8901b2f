//! # Settings
//!
//! Runtime configuration and cheat switches, held by the game state rather
//! than living in globals.

use crate::config;
use crate::TowerResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Character archetype chosen on the first floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerClass {
    #[default]
    Generic,
    Fighter,
    Mage,
    Rogue,
}

impl PlayerClass {
    pub fn name(self) -> &'static str {
        match self {
            PlayerClass::Generic => "Wanderer",
            PlayerClass::Fighter => "Fighter",
            PlayerClass::Mage => "Mage",
            PlayerClass::Rogue => "Rogue",
        }
    }
}

/// Tunable game settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enables the cheat commands below
    pub cheats_enabled: bool,
    /// The player takes no damage
    pub god_mode: bool,
    /// Spells cost no mana
    pub infinite_mana: bool,
    /// Stamina is never spent
    pub infinite_stamina: bool,
    /// The player walks through walls
    pub noclip: bool,
    pub fov_radius: i32,
    /// Percent chance that an eligible floor is a shop
    pub shop_chance: u32,
    /// Percent chance that a dying actor drops an item
    pub death_drop_chance: u32,
    pub map_width: u32,
    pub map_height: u32,
    pub max_rooms: u32,
    pub room_min_size: u32,
    pub room_max_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cheats_enabled: false,
            god_mode: false,
            infinite_mana: false,
            infinite_stamina: false,
            noclip: false,
            fov_radius: config::DEFAULT_FOV_RADIUS,
            shop_chance: config::DEFAULT_SHOP_CHANCE,
            death_drop_chance: config::DEFAULT_DEATH_DROP_CHANCE,
            map_width: config::DEFAULT_MAP_WIDTH,
            map_height: config::DEFAULT_MAP_HEIGHT,
            max_rooms: config::DEFAULT_MAX_ROOMS,
            room_min_size: config::DEFAULT_ROOM_MIN_SIZE,
            room_max_size: config::DEFAULT_ROOM_MAX_SIZE,
        }
    }
}

impl Settings {
    /// Smaller floors for fast tests.
    pub fn for_testing() -> Self {
        Self {
            map_width: 50,
            map_height: 40,
            max_rooms: 15,
            room_min_size: 5,
            room_max_size: 8,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> TowerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> TowerResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

/// Debug commands honored only when cheats are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheatCommand {
    /// Regenerate the current floor as a shop
    SpawnShop,
    /// Jump to the next floor
    FloorUp,
    /// Regenerate the previous floor number
    FloorDown,
    /// Grant exactly enough XP for a level-up
    LevelUp,
    ToggleGodMode,
    ToggleNoclip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.cheats_enabled);
        assert!(!settings.god_mode);
        assert_eq!(settings.fov_radius, 8);
        assert_eq!(settings.shop_chance, 20);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "god_mode": true, "map_width": 60 }"#).unwrap();
        assert!(settings.god_mode);
        assert_eq!(settings.map_width, 60);
        assert_eq!(settings.map_height, config::DEFAULT_MAP_HEIGHT);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "cheats_enabled": true }"#).unwrap();
        let settings = Settings::from_json_file(&path).unwrap();
        assert!(settings.cheats_enabled);
        assert!(Settings::from_json_file(dir.path().join("missing.json")).is_err());
    }
}
