//! # Fighter Module
//!
//! Attributes, derived combat statistics and the HP/mana/stamina pools.
//!
//! A [`Fighter`] never stores a derived value it cannot rebuild: every derived
//! stat is recomputed by [`Fighter::derive_stats`] from the base values, the
//! equipment accumulators, the affix accumulator and the mass level. That makes
//! derivation idempotent and lets equipment come off without drift.

use crate::config::MAX_DAMAGE_REDUCTION;
use crate::game::spells::Spell;
use serde::{Deserialize, Serialize};
use std::ops::{AddAssign, SubAssign};

/// Damage reduction gained per mass level.
pub const MASS_REDUCTION_PER_LEVEL: i32 = 2;

/// Max HP gained per mass level.
pub const MASS_HP_PER_LEVEL: i32 = 4;

/// The six character attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    /// Tensile muscle: melee power
    TM,
    /// Nerve sheathing: damage reduction
    NS,
    /// Fibrous integrity: max HP
    FI,
    /// Cortical density: spell damage
    CD,
    /// Psychic ether: max mana
    PE,
    /// Visceral influence: prices and spell cost
    VI,
}

impl Attribute {
    pub fn all() -> [Attribute; 6] {
        [
            Attribute::TM,
            Attribute::NS,
            Attribute::FI,
            Attribute::CD,
            Attribute::PE,
            Attribute::VI,
        ]
    }

    pub fn code(self) -> &'static str {
        match self {
            Attribute::TM => "TM",
            Attribute::NS => "NS",
            Attribute::FI => "FI",
            Attribute::CD => "CD",
            Attribute::PE => "PE",
            Attribute::VI => "VI",
        }
    }
}

/// A full attribute vector. Also used for equipment deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attributes {
    pub tm: i32,
    pub ns: i32,
    pub fi: i32,
    pub cd: i32,
    pub pe: i32,
    pub vi: i32,
}

impl Attributes {
    /// Every attribute set to the same value.
    pub fn uniform(value: i32) -> Self {
        Self {
            tm: value,
            ns: value,
            fi: value,
            cd: value,
            pe: value,
            vi: value,
        }
    }

    /// A delta touching a single attribute.
    pub fn single(attribute: Attribute, amount: i32) -> Self {
        let mut delta = Self::default();
        *delta.get_mut(attribute) = amount;
        delta
    }

    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::TM => self.tm,
            Attribute::NS => self.ns,
            Attribute::FI => self.fi,
            Attribute::CD => self.cd,
            Attribute::PE => self.pe,
            Attribute::VI => self.vi,
        }
    }

    pub fn get_mut(&mut self, attribute: Attribute) -> &mut i32 {
        match attribute {
            Attribute::TM => &mut self.tm,
            Attribute::NS => &mut self.ns,
            Attribute::FI => &mut self.fi,
            Attribute::CD => &mut self.cd,
            Attribute::PE => &mut self.pe,
            Attribute::VI => &mut self.vi,
        }
    }

    pub fn is_zero(&self) -> bool {
        Attribute::all().iter().all(|&a| self.get(a) == 0)
    }
}

impl AddAssign for Attributes {
    fn add_assign(&mut self, other: Self) {
        for attribute in Attribute::all() {
            *self.get_mut(attribute) += other.get(attribute);
        }
    }
}

impl SubAssign for Attributes {
    fn sub_assign(&mut self, other: Self) {
        for attribute in Attribute::all() {
            *self.get_mut(attribute) -= other.get(attribute);
        }
    }
}

/// Attribute modifier: `ceil((value - 8) / 2)`.
///
/// # Examples
///
/// ```
/// use fleshtower::modifier;
///
/// assert_eq!(modifier(8), 0);
/// assert_eq!(modifier(9), 1);
/// assert_eq!(modifier(12), 2);
/// assert_eq!(modifier(7), 0);
/// assert_eq!(modifier(5), -1);
/// ```
pub fn modifier(value: i32) -> i32 {
    -((8 - value).div_euclid(2))
}

/// `value` raised by `percent`, rounding the bonus up.
fn with_percent(value: i32, percent: i32) -> i32 {
    if percent == 0 {
        return value;
    }
    let bonus = value * percent;
    value + -((-bonus).div_euclid(100))
}

/// Accumulated stat deltas granted by affixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AffixBonus {
    pub flat_hp: i32,
    pub percent_hp: i32,
    pub flat_mana: i32,
    pub percent_mana: i32,
    pub flat_power: i32,
    pub percent_power: i32,
    pub flat_reduction: i32,
    pub percent_reduction: i32,
    pub flat_stamina: i32,
    pub percent_stamina: i32,
    pub attack_count: i32,
}

/// Combat statistics and resource pools of an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub attributes: Attributes,
    /// Attribute deltas from equipped items
    pub bonus_stats: Attributes,
    pub base_hp: i32,
    pub base_mana: i32,
    pub base_stamina: i32,
    pub base_power: i32,
    pub base_defense: i32,
    /// Base damage reduction, scaled by the NS modifier
    pub base_reduction: i32,
    pub base_attack_count: i32,
    pub bonus_power: i32,
    pub bonus_defense: i32,
    pub bonus_attack_count: i32,
    pub affix_bonus: AffixBonus,
    pub mass: i32,
    pub max_mass: i32,
    pub mass_level: i32,

    max_hp: i32,
    max_mana: i32,
    max_stamina: i32,
    power: i32,
    defense: i32,
    damage_reduction: i32,
    spell_damage_bonus: i32,
    spell_cost_reduction: i32,
    price_discount: i32,
    attack_count: i32,

    hp: i32,
    mana: i32,
    stamina: i32,
}

impl Fighter {
    /// Creates a fighter with every attribute at 8 and full pools.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleshtower::Fighter;
    ///
    /// let fighter = Fighter::new(30, 1, 2);
    /// assert_eq!(fighter.max_hp(), 30);
    /// assert_eq!(fighter.power(), 2);
    /// assert_eq!(fighter.defense(), 1);
    /// assert_eq!(fighter.hp(), 30);
    /// ```
    pub fn new(base_hp: i32, base_defense: i32, base_power: i32) -> Self {
        let mut fighter = Self {
            attributes: Attributes::uniform(8),
            bonus_stats: Attributes::default(),
            base_hp,
            base_mana: 0,
            base_stamina: 0,
            base_power,
            base_defense,
            base_reduction: 0,
            base_attack_count: 1,
            bonus_power: 0,
            bonus_defense: 0,
            bonus_attack_count: 0,
            affix_bonus: AffixBonus::default(),
            mass: 0,
            max_mass: 100,
            mass_level: 0,
            max_hp: 0,
            max_mana: 0,
            max_stamina: 0,
            power: 0,
            defense: 0,
            damage_reduction: 0,
            spell_damage_bonus: 0,
            spell_cost_reduction: 0,
            price_discount: 0,
            attack_count: 1,
            hp: 0,
            mana: 0,
            stamina: 0,
        };
        fighter.derive_stats(true);
        fighter
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self.derive_stats(true);
        self
    }

    pub fn with_mana(mut self, base_mana: i32) -> Self {
        self.base_mana = base_mana;
        self.derive_stats(true);
        self
    }

    pub fn with_stamina(mut self, base_stamina: i32) -> Self {
        self.base_stamina = base_stamina;
        self.derive_stats(true);
        self
    }

    pub fn with_reduction(mut self, base_reduction: i32) -> Self {
        self.base_reduction = base_reduction;
        self.derive_stats(true);
        self
    }

    /// Base attributes plus equipment deltas.
    pub fn effective_attributes(&self) -> Attributes {
        let mut attributes = self.attributes;
        attributes += self.bonus_stats;
        attributes
    }

    pub fn attribute_modifier(&self, attribute: Attribute) -> i32 {
        modifier(self.effective_attributes().get(attribute))
    }

    /// Recomputes every derived statistic.
    ///
    /// With `reset_resources` the pools are refilled to their new maxima,
    /// otherwise the current values are clamped into range.
    pub fn derive_stats(&mut self, reset_resources: bool) {
        let affix = self.affix_bonus;
        let tm = self.attribute_modifier(Attribute::TM);
        let ns = self.attribute_modifier(Attribute::NS);
        let fi = self.attribute_modifier(Attribute::FI);
        let cd = self.attribute_modifier(Attribute::CD);
        let pe = self.attribute_modifier(Attribute::PE);
        let vi = self.attribute_modifier(Attribute::VI);

        self.power = with_percent(
            self.base_power + self.bonus_power + tm + affix.flat_power,
            affix.percent_power,
        );
        self.defense = self.base_defense + self.bonus_defense;

        let reduction = with_percent(
            self.base_reduction * (ns * 2) + affix.flat_reduction,
            affix.percent_reduction,
        )
        .clamp(0, MAX_DAMAGE_REDUCTION);
        self.damage_reduction =
            (reduction + self.mass_level * MASS_REDUCTION_PER_LEVEL).min(MAX_DAMAGE_REDUCTION);

        self.max_hp = with_percent(
            self.base_hp + fi * 4 + self.mass_level * MASS_HP_PER_LEVEL + affix.flat_hp,
            affix.percent_hp,
        )
        .max(1);
        self.max_mana =
            with_percent(self.base_mana + pe * 4 + affix.flat_mana, affix.percent_mana).max(0);
        self.max_stamina =
            with_percent(self.base_stamina + affix.flat_stamina, affix.percent_stamina).max(0);

        self.spell_damage_bonus = cd;
        self.price_discount = vi;
        self.spell_cost_reduction = vi * 2;
        self.attack_count =
            (self.base_attack_count + self.bonus_attack_count + affix.attack_count).max(1);

        if reset_resources {
            self.hp = self.max_hp;
            self.mana = self.max_mana;
            self.stamina = self.max_stamina;
        } else {
            self.hp = self.hp.clamp(0, self.max_hp);
            self.mana = self.mana.clamp(0, self.max_mana);
            self.stamina = self.stamina.clamp(0, self.max_stamina);
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn mana(&self) -> i32 {
        self.mana
    }

    pub fn stamina(&self) -> i32 {
        self.stamina
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn max_mana(&self) -> i32 {
        self.max_mana
    }

    pub fn max_stamina(&self) -> i32 {
        self.max_stamina
    }

    pub fn power(&self) -> i32 {
        self.power
    }

    pub fn defense(&self) -> i32 {
        self.defense
    }

    pub fn damage_reduction(&self) -> i32 {
        self.damage_reduction
    }

    pub fn spell_damage_bonus(&self) -> i32 {
        self.spell_damage_bonus
    }

    pub fn spell_cost_reduction(&self) -> i32 {
        self.spell_cost_reduction
    }

    pub fn price_discount(&self) -> i32 {
        self.price_discount
    }

    pub fn attack_count(&self) -> i32 {
        self.attack_count
    }

    /// Sets HP clamped to `[0, max_hp]`.
    ///
    /// Returns true when this call took HP from above zero to zero; the owner
    /// is then responsible for running the death sequence.
    pub fn set_hp(&mut self, value: i32) -> bool {
        let was_up = self.hp > 0;
        self.hp = value.clamp(0, self.max_hp);
        was_up && self.hp == 0
    }

    pub fn set_mana(&mut self, value: i32) {
        self.mana = value.clamp(0, self.max_mana);
    }

    pub fn set_stamina(&mut self, value: i32) {
        self.stamina = value.clamp(0, self.max_stamina);
    }

    /// Restores up to `amount` HP and returns how much was actually recovered.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleshtower::Fighter;
    ///
    /// let mut fighter = Fighter::new(20, 0, 1);
    /// assert_eq!(fighter.heal(5), 0);
    /// fighter.take_damage(8, true);
    /// assert_eq!(fighter.heal(5), 5);
    /// assert_eq!(fighter.heal(50), 3);
    /// ```
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.hp >= self.max_hp {
            return 0;
        }
        let before = self.hp;
        self.set_hp(self.hp + amount.max(0));
        self.hp - before
    }

    /// Restores up to `amount` mana and returns how much was recovered.
    pub fn heal_mana(&mut self, amount: i32) -> i32 {
        if self.mana >= self.max_mana {
            return 0;
        }
        let before = self.mana;
        self.set_mana(self.mana + amount.max(0));
        self.mana - before
    }

    pub fn restore_stamina(&mut self, amount: i32) -> i32 {
        let before = self.stamina;
        self.set_stamina(self.stamina + amount.max(0));
        self.stamina - before
    }

    /// Spends stamina if enough is available.
    pub fn spend_stamina(&mut self, amount: i32) -> bool {
        if self.stamina < amount {
            return false;
        }
        self.stamina -= amount;
        true
    }

    /// Applies damage, reduced by defense unless `ignore_defense` is set.
    ///
    /// Damage never goes below zero, so a high defense cannot heal.
    /// Returns the amount actually subtracted from HP.
    pub fn take_damage(&mut self, amount: i32, ignore_defense: bool) -> i32 {
        let damage = if ignore_defense {
            amount
        } else {
            amount - self.defense
        }
        .max(0);
        let before = self.hp;
        self.set_hp(self.hp - damage);
        before - self.hp
    }

    /// Mana cost of a spell after this fighter's cost reduction.
    pub fn spell_cost(&self, base_cost: i32) -> i32 {
        let reduction = self.spell_cost_reduction.clamp(0, 100);
        (base_cost - base_cost * reduction / 100).max(0)
    }

    /// Pays for a spell. Returns false, spending nothing, when mana is short.
    pub fn cast_spell(&mut self, spell: &Spell) -> bool {
        let cost = self.spell_cost(spell.mana_cost);
        if self.mana < cost {
            return false;
        }
        self.mana -= cost;
        true
    }

    /// Adds mass and reports whether the mass bar overflowed into a new level.
    pub fn gain_mass(&mut self, amount: i32) -> bool {
        self.mass += amount.max(0);
        if self.mass < self.max_mass {
            return false;
        }
        self.mass -= self.max_mass;
        self.mass_level += 1;
        self.max_mass += 50;
        self.derive_stats(false);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::spells::Spell;

    #[test]
    fn test_default_attributes_derivation() {
        let fighter = Fighter::new(30, 1, 2);
        assert_eq!(fighter.max_hp(), 30);
        assert_eq!(fighter.power(), 2);
        assert_eq!(fighter.defense(), 1);
        assert_eq!(fighter.damage_reduction(), 0);
        assert_eq!(fighter.max_mana(), 0);
        assert_eq!(fighter.attack_count(), 1);
    }

    #[test]
    fn test_modifier_rounds_up() {
        assert_eq!(modifier(10), 1);
        assert_eq!(modifier(11), 2);
        assert_eq!(modifier(6), -1);
        assert_eq!(modifier(3), -2);
    }

    #[test]
    fn test_attribute_driven_stats() {
        let attributes = Attributes {
            tm: 12,
            ns: 12,
            fi: 12,
            cd: 10,
            pe: 12,
            vi: 12,
        };
        let fighter = Fighter::new(30, 1, 2)
            .with_attributes(attributes)
            .with_reduction(5)
            .with_mana(10);
        assert_eq!(fighter.power(), 4);
        assert_eq!(fighter.max_hp(), 38);
        assert_eq!(fighter.max_mana(), 18);
        assert_eq!(fighter.damage_reduction(), 20);
        assert_eq!(fighter.spell_damage_bonus(), 1);
        assert_eq!(fighter.price_discount(), 2);
        assert_eq!(fighter.spell_cost_reduction(), 4);
    }

    #[test]
    fn test_damage_reduction_cap() {
        let fighter = Fighter::new(10, 0, 1)
            .with_attributes(Attributes::uniform(20))
            .with_reduction(30);
        assert_eq!(fighter.damage_reduction(), 50);
    }

    #[test]
    fn test_derive_is_idempotent() {
        let mut fighter = Fighter::new(30, 2, 3).with_attributes(Attributes::uniform(11));
        fighter.affix_bonus.percent_hp = 7;
        fighter.derive_stats(false);
        let once = fighter.clone();
        fighter.derive_stats(false);
        assert_eq!(fighter, once);
    }

    #[test]
    fn test_take_damage_respects_defense() {
        let mut fighter = Fighter::new(30, 3, 1);
        assert_eq!(fighter.take_damage(10, false), 7);
        assert_eq!(fighter.hp(), 23);
        assert_eq!(fighter.take_damage(10, true), 10);
        assert_eq!(fighter.hp(), 13);
        assert_eq!(fighter.take_damage(2, false), 0);
        assert_eq!(fighter.hp(), 13);
    }

    #[test]
    fn test_hp_clamping_and_death_signal() {
        let mut fighter = Fighter::new(10, 0, 1);
        assert!(!fighter.set_hp(50));
        assert_eq!(fighter.hp(), 10);
        assert!(fighter.set_hp(-5));
        assert_eq!(fighter.hp(), 0);
        assert!(!fighter.set_hp(-5));
    }

    #[test]
    fn test_heal_mana_reports_recovered_amount() {
        let mut fighter = Fighter::new(10, 0, 1).with_mana(20);
        assert_eq!(fighter.heal_mana(5), 0);
        fighter.set_mana(12);
        assert_eq!(fighter.heal_mana(5), 5);
        assert_eq!(fighter.heal_mana(5), 3);
    }

    #[test]
    fn test_cast_spell_requires_mana() {
        let mut fighter = Fighter::new(10, 0, 1).with_mana(12);
        let spell = Spell::lightning();
        assert!(fighter.cast_spell(&spell));
        assert_eq!(fighter.mana(), 2);
        assert!(!fighter.cast_spell(&spell));
        assert_eq!(fighter.mana(), 2);
    }

    #[test]
    fn test_spell_cost_reduction() {
        let fighter = Fighter::new(10, 0, 1).with_attributes(Attributes::single(Attribute::VI, 18));
        assert_eq!(fighter.spell_cost_reduction(), 10);
        assert_eq!(fighter.spell_cost(20), 18);
    }

    #[test]
    fn test_percent_bonus_rounds_up() {
        let mut fighter = Fighter::new(31, 0, 1);
        fighter.affix_bonus.percent_hp = 10;
        fighter.derive_stats(false);
        assert_eq!(fighter.max_hp(), 35);
    }

    #[test]
    fn test_mass_levels_feed_hp_and_reduction() {
        let mut fighter = Fighter::new(20, 0, 1);
        assert!(!fighter.gain_mass(60));
        assert!(fighter.gain_mass(60));
        assert_eq!(fighter.mass_level, 1);
        assert_eq!(fighter.mass, 20);
        assert_eq!(fighter.max_mass, 150);
        assert_eq!(fighter.max_hp(), 24);
        assert_eq!(fighter.damage_reduction(), MASS_REDUCTION_PER_LEVEL);
    }

    #[test]
    fn test_stamina_spending() {
        let mut fighter = Fighter::new(10, 0, 1).with_stamina(6);
        assert!(fighter.spend_stamina(5));
        assert!(!fighter.spend_stamina(5));
        assert_eq!(fighter.restore_stamina(10), 5);
        assert_eq!(fighter.stamina(), 6);
    }
}
