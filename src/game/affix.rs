//! # Affixes
//!
//! Permanent random bonuses rolled when the player levels up.
//!
//! An affix is immutable once rolled. Its stat delta goes into the fighter's
//! affix accumulator exactly once, guarded by `is_set`.

use crate::game::entities::Actor;
use crate::game::fighter::Fighter;
use crate::game::messages::{palette, MessageLog};
use crate::game::settings::PlayerClass;
use crate::game::world::Color;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    pub fn color(self) -> Color {
        match self {
            Rarity::Common => (255, 255, 255),
            Rarity::Uncommon => (30, 255, 0),
            Rarity::Rare => (0, 112, 221),
            Rarity::Legendary => (255, 128, 0),
        }
    }
}

/// What an affix does. Percent values are whole percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AffixKind {
    FlatHp(i32),
    PercentHp(i32),
    FlatMana(i32),
    PercentMana(i32),
    FlatMelee(i32),
    PercentMelee(i32),
    FlatDamageReduction(i32),
    PercentDamageReduction(i32),
    FlatStamina(i32),
    PercentStamina(i32),
    AttackCount(i32),
    /// Grants a burst of experience
    Experience,
    /// Grants this many further affixes
    Lucky(u32),
}

/// Affix kinds a roll can land on; magnitudes are filled in separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AffixTemplate {
    FlatHp,
    PercentHp,
    FlatMana,
    PercentMana,
    FlatMelee,
    PercentMelee,
    FlatDamageReduction,
    PercentDamageReduction,
    FlatStamina,
    PercentStamina,
    AttackCount,
    Experience,
    Lucky,
}

const TEMPLATES: [AffixTemplate; 13] = [
    AffixTemplate::FlatHp,
    AffixTemplate::PercentHp,
    AffixTemplate::FlatMana,
    AffixTemplate::PercentMana,
    AffixTemplate::FlatMelee,
    AffixTemplate::PercentMelee,
    AffixTemplate::FlatDamageReduction,
    AffixTemplate::PercentDamageReduction,
    AffixTemplate::FlatStamina,
    AffixTemplate::PercentStamina,
    AffixTemplate::AttackCount,
    AffixTemplate::Experience,
    AffixTemplate::Lucky,
];

impl AffixTemplate {
    fn class_lock(self) -> Option<PlayerClass> {
        match self {
            AffixTemplate::FlatMana | AffixTemplate::PercentMana => Some(PlayerClass::Mage),
            AffixTemplate::FlatStamina | AffixTemplate::PercentStamina => Some(PlayerClass::Rogue),
            _ => None,
        }
    }

    fn roll<R: Rng>(self, rng: &mut R) -> AffixKind {
        let percent = rng.gen_range(1..=10);
        let flat = rng.gen_range(1..=5);
        match self {
            AffixTemplate::FlatHp => AffixKind::FlatHp(flat),
            AffixTemplate::PercentHp => AffixKind::PercentHp(percent),
            AffixTemplate::FlatMana => AffixKind::FlatMana(flat),
            AffixTemplate::PercentMana => AffixKind::PercentMana(percent),
            AffixTemplate::FlatMelee => AffixKind::FlatMelee(flat),
            AffixTemplate::PercentMelee => AffixKind::PercentMelee(percent),
            AffixTemplate::FlatDamageReduction => AffixKind::FlatDamageReduction(flat),
            AffixTemplate::PercentDamageReduction => AffixKind::PercentDamageReduction(percent),
            AffixTemplate::FlatStamina => AffixKind::FlatStamina(flat),
            AffixTemplate::PercentStamina => AffixKind::PercentStamina(percent),
            AffixTemplate::AttackCount => AffixKind::AttackCount(1),
            AffixTemplate::Experience => AffixKind::Experience,
            AffixTemplate::Lucky => AffixKind::Lucky(rng.gen_range(3..=5)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affix {
    pub kind: AffixKind,
    /// Set once the delta has been folded into a fighter
    pub is_set: bool,
}

impl Affix {
    pub fn new(kind: AffixKind) -> Self {
        Self { kind, is_set: false }
    }

    /// Rolls a random affix usable by `class`.
    pub fn roll<R: Rng>(rng: &mut R, class: PlayerClass, allow_lucky: bool) -> Self {
        let candidates: Vec<AffixTemplate> = TEMPLATES
            .iter()
            .copied()
            .filter(|t| t.class_lock().map_or(true, |lock| lock == class))
            .filter(|t| allow_lucky || *t != AffixTemplate::Lucky)
            .collect();
        let template = candidates
            .choose(rng)
            .copied()
            .unwrap_or(AffixTemplate::FlatHp);
        Self::new(template.roll(rng))
    }

    pub fn class_lock(&self) -> Option<PlayerClass> {
        match self.kind {
            AffixKind::FlatMana(_) | AffixKind::PercentMana(_) => Some(PlayerClass::Mage),
            AffixKind::FlatStamina(_) | AffixKind::PercentStamina(_) => Some(PlayerClass::Rogue),
            _ => None,
        }
    }

    pub fn rarity(&self) -> Rarity {
        match self.kind {
            AffixKind::FlatMelee(_) => Rarity::Rare,
            AffixKind::Experience => Rarity::Uncommon,
            AffixKind::AttackCount(_) | AffixKind::Lucky(_) => Rarity::Legendary,
            _ => Rarity::Common,
        }
    }

    pub fn description(&self) -> String {
        match self.kind {
            AffixKind::FlatHp(n) => format!("+{} max HP", n),
            AffixKind::PercentHp(n) => format!("+{}% max HP", n),
            AffixKind::FlatMana(n) => format!("+{} max mana", n),
            AffixKind::PercentMana(n) => format!("+{}% max mana", n),
            AffixKind::FlatMelee(n) => format!("+{} melee damage", n),
            AffixKind::PercentMelee(n) => format!("+{}% melee damage", n),
            AffixKind::FlatDamageReduction(n) => format!("+{} damage reduction", n),
            AffixKind::PercentDamageReduction(n) => format!("+{}% damage reduction", n),
            AffixKind::FlatStamina(n) => format!("+{} max stamina", n),
            AffixKind::PercentStamina(n) => format!("+{}% max stamina", n),
            AffixKind::AttackCount(n) => format!("+{} attacks per strike", n),
            AffixKind::Experience => "A surge of experience".to_string(),
            AffixKind::Lucky(n) => format!("Lucky: {} more affixes", n),
        }
    }

    /// Folds the stat delta into a fighter once. Returns false if already set.
    pub fn apply(&mut self, fighter: &mut Fighter) -> bool {
        if self.is_set {
            return false;
        }
        self.is_set = true;
        let bonus = &mut fighter.affix_bonus;
        match self.kind {
            AffixKind::FlatHp(n) => bonus.flat_hp += n,
            AffixKind::PercentHp(n) => bonus.percent_hp += n,
            AffixKind::FlatMana(n) => bonus.flat_mana += n,
            AffixKind::PercentMana(n) => bonus.percent_mana += n,
            AffixKind::FlatMelee(n) => bonus.flat_power += n,
            AffixKind::PercentMelee(n) => bonus.percent_power += n,
            AffixKind::FlatDamageReduction(n) => bonus.flat_reduction += n,
            AffixKind::PercentDamageReduction(n) => bonus.percent_reduction += n,
            AffixKind::FlatStamina(n) => bonus.flat_stamina += n,
            AffixKind::PercentStamina(n) => bonus.percent_stamina += n,
            AffixKind::AttackCount(n) => bonus.attack_count += n,
            AffixKind::Experience | AffixKind::Lucky(_) => {}
        }
        fighter.derive_stats(false);
        true
    }
}

impl Actor {
    /// Applies an affix and records it on the actor.
    ///
    /// Experience affixes grant between half and double the XP of the next
    /// level; lucky affixes roll and gain further non-lucky affixes.
    pub fn gain_affix<R: Rng>(&mut self, mut affix: Affix, rng: &mut R, log: &mut MessageLog) {
        if !affix.apply(&mut self.fighter) {
            return;
        }
        log.add_message(
            format!("Your flesh twists: {}", affix.description()),
            affix.rarity().color(),
        );

        match affix.kind {
            AffixKind::Experience => {
                let next = self.level.experience_to_next_level();
                let xp = rng.gen_range(next / 2..=next.saturating_mul(2).max(1));
                if self.level.add_xp(xp) {
                    log.add_message(
                        format!("You gain {} experience points.", xp),
                        palette::WHITE,
                    );
                }
            }
            AffixKind::Lucky(extra) => {
                self.affixes.push(affix);
                for _ in 0..extra {
                    let bonus = Affix::roll(rng, self.player_class, false);
                    self.gain_affix(bonus, rng, log);
                }
                return;
            }
            _ => {}
        }
        self.affixes.push(affix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;
    use crate::generation::factory::spawn_player;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_affix_applies_once() {
        let mut fighter = Fighter::new(30, 0, 2);
        let mut affix = Affix::new(AffixKind::FlatHp(5));
        assert!(affix.apply(&mut fighter));
        assert_eq!(fighter.max_hp(), 35);
        assert!(!affix.apply(&mut fighter));
        assert_eq!(fighter.max_hp(), 35);
    }

    #[test]
    fn test_class_locked_rolls() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let affix = Affix::roll(&mut rng, PlayerClass::Fighter, true);
            assert_eq!(affix.class_lock(), None);
            let affix = Affix::roll(&mut rng, PlayerClass::Mage, true);
            assert_ne!(affix.class_lock(), Some(PlayerClass::Rogue));
        }
    }

    #[test]
    fn test_rolled_magnitudes_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            match Affix::roll(&mut rng, PlayerClass::Rogue, true).kind {
                AffixKind::PercentHp(n)
                | AffixKind::PercentMelee(n)
                | AffixKind::PercentDamageReduction(n)
                | AffixKind::PercentStamina(n) => assert!((1..=10).contains(&n)),
                AffixKind::FlatHp(n)
                | AffixKind::FlatMelee(n)
                | AffixKind::FlatDamageReduction(n)
                | AffixKind::FlatStamina(n) => assert!((1..=5).contains(&n)),
                AffixKind::Lucky(n) => assert!((3..=5).contains(&n)),
                AffixKind::FlatMana(_) | AffixKind::PercentMana(_) => {
                    panic!("rogue rolled a mage affix")
                }
                AffixKind::AttackCount(n) => assert_eq!(n, 1),
                AffixKind::Experience => {}
            }
        }
    }

    #[test]
    fn test_no_lucky_when_disallowed() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let affix = Affix::roll(&mut rng, PlayerClass::Generic, false);
            assert!(!matches!(affix.kind, AffixKind::Lucky(_)));
        }
    }

    #[test]
    fn test_lucky_grants_more_affixes() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut player = spawn_player(Position::origin());
        let mut log = MessageLog::new();
        player.gain_affix(Affix::new(AffixKind::Lucky(3)), &mut rng, &mut log);
        assert_eq!(player.affixes.len(), 4);
        assert!(player.affixes.iter().all(|a| a.is_set));
        assert_eq!(
            player
                .affixes
                .iter()
                .filter(|a| matches!(a.kind, AffixKind::Lucky(_)))
                .count(),
            1
        );
    }

    #[test]
    fn test_experience_affix_grants_xp() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut player = spawn_player(Position::origin());
        let mut log = MessageLog::new();
        let next = player.level.experience_to_next_level();
        player.gain_affix(Affix::new(AffixKind::Experience), &mut rng, &mut log);
        assert!(player.level.current_xp >= next / 2);
        assert!(player.level.current_xp <= next * 2);
    }

    #[test]
    fn test_attack_count_affix() {
        let mut fighter = Fighter::new(30, 0, 2);
        Affix::new(AffixKind::AttackCount(1)).apply(&mut fighter);
        assert_eq!(fighter.attack_count(), 2);
    }
}
