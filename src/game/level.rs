//! Experience and character level.

use serde::{Deserialize, Serialize};

/// Stat raise offered when the player levels up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatBoost {
    /// +20 max HP
    Constitution,
    /// +1 power
    Strength,
    /// +1 defense
    Agility,
    /// +10 max mana, mages only
    Mana,
}

impl StatBoost {
    pub fn all() -> [StatBoost; 4] {
        [
            StatBoost::Constitution,
            StatBoost::Strength,
            StatBoost::Agility,
            StatBoost::Mana,
        ]
    }

    pub fn description(self) -> &'static str {
        match self {
            StatBoost::Constitution => "Constitution (+20 HP)",
            StatBoost::Strength => "Strength (+1 attack)",
            StatBoost::Agility => "Agility (+1 defense)",
            StatBoost::Mana => "Mana (+10 mana)",
        }
    }
}

/// XP bookkeeping for an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub current_level: u32,
    pub current_xp: u32,
    /// XP needed for the first level; zero disables leveling
    pub level_up_base: u32,
    pub level_up_factor: u32,
    /// XP granted to the player when this actor dies
    pub xp_given: u32,
}

impl Level {
    /// A level component that only hands out XP.
    pub fn new(xp_given: u32) -> Self {
        Self {
            current_level: 1,
            current_xp: 0,
            level_up_base: 0,
            level_up_factor: 150,
            xp_given,
        }
    }

    /// A level component that can gain levels.
    pub fn progressing(level_up_base: u32, level_up_factor: u32) -> Self {
        Self {
            current_level: 1,
            current_xp: 0,
            level_up_base,
            level_up_factor,
            xp_given: 0,
        }
    }

    /// XP needed to reach the next level.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleshtower::Level;
    ///
    /// let level = Level::progressing(200, 150);
    /// assert_eq!(level.experience_to_next_level(), 350);
    /// ```
    pub fn experience_to_next_level(&self) -> u32 {
        self.level_up_base + self.current_level * self.level_up_factor
    }

    pub fn requires_level_up(&self) -> bool {
        self.level_up_base > 0 && self.current_xp >= self.experience_to_next_level()
    }

    /// Adds XP. Returns false when nothing was gained.
    pub fn add_xp(&mut self, xp: u32) -> bool {
        if xp == 0 || self.level_up_base == 0 {
            return false;
        }
        self.current_xp += xp;
        true
    }

    /// Spends the XP for one level and raises the level.
    pub fn increase_level(&mut self) {
        self.current_xp = self.current_xp.saturating_sub(self.experience_to_next_level());
        self.current_level += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_progressing_level_ignores_xp() {
        let mut level = Level::new(35);
        assert!(!level.add_xp(100));
        assert!(!level.requires_level_up());
        assert_eq!(level.xp_given, 35);
    }

    #[test]
    fn test_level_up_threshold() {
        let mut level = Level::progressing(200, 150);
        assert!(level.add_xp(349));
        assert!(!level.requires_level_up());
        assert!(level.add_xp(11));
        assert!(level.requires_level_up());

        level.increase_level();
        assert_eq!(level.current_level, 2);
        assert_eq!(level.current_xp, 10);
        assert_eq!(level.experience_to_next_level(), 500);
        assert!(!level.requires_level_up());
    }

    #[test]
    fn test_zero_xp_is_not_a_gain() {
        let mut level = Level::progressing(200, 150);
        assert!(!level.add_xp(0));
    }
}
