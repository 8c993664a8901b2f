//! Spells and the spellbook that holds them.

use serde::{Deserialize, Serialize};

/// Roll (0..=100) a learning attempt must reach.
pub const SPELL_LEARN_THRESHOLD: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellKind {
    /// Strikes the nearest visible enemy in range
    Lightning { damage: i32, range: i32 },
    /// Burns every actor around the nearest visible enemy in range
    Fireball { damage: i32, radius: i32, range: i32 },
    /// Scrambles the nearest visible enemy's AI for a number of turns
    Confusion { turns: i32, range: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    pub mana_cost: i32,
    pub kind: SpellKind,
}

impl Spell {
    pub fn lightning() -> Self {
        Self {
            name: "Lightning".to_string(),
            mana_cost: 10,
            kind: SpellKind::Lightning {
                damage: 20,
                range: 8,
            },
        }
    }

    pub fn fireball() -> Self {
        Self {
            name: "Fireball".to_string(),
            mana_cost: 12,
            kind: SpellKind::Fireball {
                damage: 12,
                radius: 3,
                range: 8,
            },
        }
    }

    pub fn confusion() -> Self {
        Self {
            name: "Confusion".to_string(),
            mana_cost: 5,
            kind: SpellKind::Confusion { turns: 10, range: 8 },
        }
    }

    /// Maximum distance to a target.
    pub fn range(&self) -> i32 {
        match self.kind {
            SpellKind::Lightning { range, .. }
            | SpellKind::Fireball { range, .. }
            | SpellKind::Confusion { range, .. } => range,
        }
    }
}

/// Capacity-bounded list of known spells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellBook {
    pub capacity: usize,
    pub spells: Vec<Spell>,
}

impl SpellBook {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            spells: Vec::new(),
        }
    }

    pub fn knows(&self, name: &str) -> bool {
        self.spells.iter().any(|spell| spell.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&Spell> {
        self.spells.get(index)
    }

    /// Attempts to learn a spell given a roll in `0..=100`.
    ///
    /// Succeeds only for casters, on a roll of at least
    /// [`SPELL_LEARN_THRESHOLD`], when the spell is new and there is room.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleshtower::{Spell, SpellBook};
    ///
    /// let mut book = SpellBook::new(3);
    /// assert!(!book.learn_spell(Spell::lightning(), 50, true));
    /// assert!(book.learn_spell(Spell::lightning(), 95, true));
    /// assert!(!book.learn_spell(Spell::lightning(), 95, true));
    /// ```
    pub fn learn_spell(&mut self, spell: Spell, roll: u32, is_caster: bool) -> bool {
        if !is_caster
            || roll < SPELL_LEARN_THRESHOLD
            || self.knows(&spell.name)
            || self.spells.len() >= self.capacity
        {
            return false;
        }
        self.spells.push(spell);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_casters_learn() {
        let mut book = SpellBook::new(5);
        assert!(!book.learn_spell(Spell::fireball(), 100, false));
        assert!(book.spells.is_empty());
    }

    #[test]
    fn test_capacity_is_respected() {
        let mut book = SpellBook::new(1);
        assert!(book.learn_spell(Spell::confusion(), 90, true));
        assert!(!book.learn_spell(Spell::fireball(), 100, true));
        assert_eq!(book.spells.len(), 1);
        assert!(book.knows("Confusion"));
    }

    #[test]
    fn test_spell_ranges() {
        assert_eq!(Spell::lightning().range(), 8);
        assert_eq!(Spell::fireball().range(), 8);
        assert_eq!(Spell::confusion().range(), 8);
    }
}
