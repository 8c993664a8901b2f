//! # Item Generation
//!
//! Which items a room receives, plus the Organ Trader's stock.

use crate::game::settings::PlayerClass;
use crate::generation::factory::ItemKind;
use crate::generation::utils::{choose_weighted, max_value_for_floor, weights_for_floor};
use crate::{GenerationConfig, Generator, TowerError, TowerResult};
use rand::rngs::StdRng;
use rand::Rng;

/// Items per room by floor.
pub const MAX_ITEMS_BY_FLOOR: [(u32, u32); 2] = [(1, 1), (4, 2)];

/// Item weights by floor. Every bucket at or below the floor applies.
pub const ITEM_CHANCES: [(u32, &[(ItemKind, u32)]); 5] = [
    (
        0,
        &[
            (ItemKind::HealthPotion, 35),
            (ItemKind::ManaPotion, 15),
            (ItemKind::Ring, 5),
        ],
    ),
    (
        2,
        &[
            (ItemKind::ConfusionScroll, 10),
            (ItemKind::Dagger, 10),
            (ItemKind::LeatherArmor, 10),
            (ItemKind::SkinHood, 5),
        ],
    ),
    (
        4,
        &[
            (ItemKind::LightningScroll, 25),
            (ItemKind::Sword, 5),
            (ItemKind::LargeHealthPotion, 15),
            (ItemKind::BileGoggles, 5),
            (ItemKind::SinewBracer, 5),
        ],
    ),
    (
        6,
        &[
            (ItemKind::FireballScroll, 25),
            (ItemKind::ChainMail, 15),
            (ItemKind::SkinCloak, 5),
            (ItemKind::GutBelt, 5),
            (ItemKind::BoneGreaves, 5),
            (ItemKind::ToothNecklace, 5),
        ],
    ),
    (8, &[(ItemKind::WeirdRing, 5)]),
];

/// Number of wares the Organ Trader carries.
pub const VENDOR_STOCK: usize = 6;

/// Rolls the items for one room.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemGenerator;

impl ItemGenerator {
    /// Rolls exactly `count` items. Mana potions become health potions
    /// for players who cannot use them.
    pub fn roll(&self, config: &GenerationConfig, count: usize, rng: &mut StdRng) -> Vec<ItemKind> {
        let weights = weights_for_floor(&ITEM_CHANCES, config.current_floor);
        choose_weighted(&weights, count, rng)
            .into_iter()
            .map(|kind| substitute_for_class(kind, config.player_class))
            .collect()
    }

    pub fn max_items(&self, floor: u32) -> u32 {
        max_value_for_floor(&MAX_ITEMS_BY_FLOOR, floor)
    }

    /// What the Organ Trader sells on a floor: always a health potion, then
    /// whatever the floor's table offers.
    pub fn vendor_stock(&self, config: &GenerationConfig, rng: &mut StdRng) -> Vec<ItemKind> {
        let mut stock = vec![ItemKind::HealthPotion];
        stock.extend(self.roll(config, VENDOR_STOCK - 1, rng));
        stock
    }
}

fn substitute_for_class(kind: ItemKind, class: PlayerClass) -> ItemKind {
    match kind {
        ItemKind::ManaPotion if class != PlayerClass::Mage => ItemKind::HealthPotion,
        other => other,
    }
}

impl Generator<Vec<ItemKind>> for ItemGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> TowerResult<Vec<ItemKind>> {
        let count = rng.gen_range(0..=self.max_items(config.current_floor));
        Ok(self.roll(config, count as usize, rng))
    }

    fn validate(&self, content: &Vec<ItemKind>, config: &GenerationConfig) -> TowerResult<()> {
        let max = self.max_items(config.current_floor) as usize;
        if content.len() > max {
            return Err(TowerError::GenerationFailed(format!(
                "{} items rolled for a room, at most {} allowed",
                content.len(),
                max
            )));
        }
        if config.player_class != PlayerClass::Mage && content.contains(&ItemKind::ManaPotion) {
            return Err(TowerError::GenerationFailed(
                "Mana potion rolled for a non-mage".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "ItemGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_no_mana_potions_for_non_mages() {
        let mut rng = StdRng::seed_from_u64(21);
        let config = GenerationConfig::for_testing(1);
        let items = ItemGenerator.roll(&config, 200, &mut rng);
        assert!(!items.contains(&ItemKind::ManaPotion));
        assert!(items.contains(&ItemKind::HealthPotion));
    }

    #[test]
    fn test_mages_can_find_mana() {
        let mut rng = StdRng::seed_from_u64(21);
        let config = GenerationConfig::for_testing(1).with_class(PlayerClass::Mage);
        let items = ItemGenerator.roll(&config, 200, &mut rng);
        assert!(items.contains(&ItemKind::ManaPotion));
    }

    #[test]
    fn test_vendor_stock() {
        let mut rng = StdRng::seed_from_u64(2);
        let stock = ItemGenerator.vendor_stock(&GenerationConfig::for_testing(3), &mut rng);
        assert_eq!(stock.len(), VENDOR_STOCK);
        assert_eq!(stock[0], ItemKind::HealthPotion);
    }

    #[test]
    fn test_generated_items_validate() {
        let generator = ItemGenerator;
        let mut rng = StdRng::seed_from_u64(5);
        for floor in [0, 1, 3, 4, 9] {
            let config = GenerationConfig::for_testing(floor);
            let items = generator.generate(&config, &mut rng).unwrap();
            assert!(generator.validate(&items, &config).is_ok());
        }
    }
}
