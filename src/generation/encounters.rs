//! # Encounter Generation
//!
//! Which monsters a room receives, drawn from depth-bucketed spawn tables.

use crate::generation::factory::MonsterKind;
use crate::generation::utils::{choose_weighted, max_value_for_floor, weights_for_floor};
use crate::{GenerationConfig, Generator, TowerError, TowerResult};
use rand::rngs::StdRng;
use rand::Rng;

/// Monsters per room by floor.
pub const MAX_MONSTERS_BY_FLOOR: [(u32, u32); 3] = [(1, 2), (4, 3), (6, 5)];

/// Monster weights by floor. Every bucket at or below the floor applies.
pub const ENEMY_CHANCES: [(u32, &[(MonsterKind, u32)]); 5] = [
    (0, &[(MonsterKind::Orc, 80), (MonsterKind::Rat, 40)]),
    (
        2,
        &[
            (MonsterKind::Zombie, 30),
            (MonsterKind::OrganTrader, 10),
        ],
    ),
    (
        3,
        &[(MonsterKind::Troll, 15), (MonsterKind::FlayedThrall, 20)],
    ),
    (5, &[(MonsterKind::Troll, 30)]),
    (7, &[(MonsterKind::Troll, 60)]),
];

/// Rolls the monsters for one room.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncounterGenerator;

impl EncounterGenerator {
    /// Rolls exactly `count` monsters for the configured floor.
    pub fn roll(&self, config: &GenerationConfig, count: usize, rng: &mut StdRng) -> Vec<MonsterKind> {
        let weights = weights_for_floor(&ENEMY_CHANCES, config.current_floor);
        choose_weighted(&weights, count, rng)
    }

    pub fn max_monsters(&self, floor: u32) -> u32 {
        max_value_for_floor(&MAX_MONSTERS_BY_FLOOR, floor)
    }
}

impl Generator<Vec<MonsterKind>> for EncounterGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> TowerResult<Vec<MonsterKind>> {
        let count = rng.gen_range(0..=self.max_monsters(config.current_floor));
        Ok(self.roll(config, count as usize, rng))
    }

    fn validate(&self, content: &Vec<MonsterKind>, config: &GenerationConfig) -> TowerResult<()> {
        let max = self.max_monsters(config.current_floor) as usize;
        if content.len() > max {
            return Err(TowerError::GenerationFailed(format!(
                "{} monsters rolled for a room, at most {} allowed",
                content.len(),
                max
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "EncounterGenerator"
    }
}
