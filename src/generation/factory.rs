//! # Entity Factory
//!
//! One constructor per archetype. Every call returns a fresh entity with its
//! own id, ready to be placed on a map or into an inventory.

use crate::config;
use crate::game::ai::AiState;
use crate::game::consumable::Consumable;
use crate::game::effects::{Boon, ConsumeEffect};
use crate::game::entities::{Actor, EntityData, Item, RenderOrder};
use crate::game::equipment::{EquipmentType, Equippable};
use crate::game::fighter::{Attribute, Attributes, Fighter};
use crate::game::inventory::Inventory;
use crate::game::level::Level;
use crate::game::settings::PlayerClass;
use crate::game::spells::{Spell, SpellBook};
use crate::game::world::Color;
use crate::game::Position;
use serde::{Deserialize, Serialize};

/// Every monster archetype the tower spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    Orc,
    Rat,
    Troll,
    Zombie,
    FlayedThrall,
    OrganTrader,
    WeakMage,
    ViceraAbomination,
    ViceraSpawn,
    BloatedCorpseFly,
}

impl MonsterKind {
    pub fn is_boss(self) -> bool {
        matches!(
            self,
            MonsterKind::WeakMage | MonsterKind::ViceraAbomination | MonsterKind::BloatedCorpseFly
        )
    }
}

/// Every item archetype the tower spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    HealthPotion,
    LargeHealthPotion,
    ManaPotion,
    LightningScroll,
    ConfusionScroll,
    FireballScroll,
    Dagger,
    Sword,
    LeatherArmor,
    ChainMail,
    SkinHood,
    BileGoggles,
    ToothNecklace,
    SkinCloak,
    SinewBracer,
    GutBelt,
    BoneGreaves,
    Ring,
    WeirdRing,
}

/// The player: 30 HP, 1 defense, 3 power, every attribute at 10.
pub fn spawn_player(position: Position) -> Actor {
    let data = EntityData::new(
        position,
        '@',
        (255, 255, 255),
        "Player",
        true,
        RenderOrder::Actor,
    );
    let fighter = Fighter::new(30, 1, 3)
        .with_attributes(Attributes::uniform(10))
        .with_reduction(5);
    Actor::new(data, Some(AiState::PlayerControlled), fighter)
        .with_inventory(Inventory::new(config::PLAYER_INVENTORY_CAPACITY))
        .with_spellbook(SpellBook::new(config::PLAYER_SPELLBOOK_CAPACITY))
        .with_level(Level::progressing(200, 150))
}

struct MonsterTemplate {
    glyph: char,
    color: Color,
    name: &'static str,
    hp: i32,
    defense: i32,
    power: i32,
    xp: u32,
    organs: u32,
    ai: AiState,
    effect: ConsumeEffect,
}

fn monster_template(kind: MonsterKind) -> MonsterTemplate {
    match kind {
        MonsterKind::Orc => MonsterTemplate {
            glyph: 'o',
            color: (63, 127, 63),
            name: "Orc",
            hp: 10,
            defense: 0,
            power: 3,
            xp: 35,
            organs: 2,
            ai: AiState::hostile(),
            effect: ConsumeEffect::FirstTaste(Boon::Power(1)),
        },
        MonsterKind::Rat => MonsterTemplate {
            glyph: 'r',
            color: (127, 127, 127),
            name: "Rat",
            hp: 4,
            defense: 0,
            power: 1,
            xp: 10,
            organs: 1,
            ai: AiState::hostile(),
            effect: ConsumeEffect::Heal { percent: 10 },
        },
        MonsterKind::Troll => MonsterTemplate {
            glyph: 't',
            color: (0, 127, 0),
            name: "Troll",
            hp: 16,
            defense: 1,
            power: 4,
            xp: 100,
            organs: 5,
            ai: AiState::hostile(),
            effect: ConsumeEffect::FirstTaste(Boon::MaxHp(5)),
        },
        MonsterKind::Zombie => MonsterTemplate {
            glyph: 'z',
            color: (100, 140, 100),
            name: "Zombie",
            hp: 18,
            defense: 0,
            power: 3,
            xp: 60,
            organs: 3,
            ai: AiState::hostile(),
            effect: ConsumeEffect::FirstTaste(Boon::Defense(1)),
        },
        MonsterKind::FlayedThrall => MonsterTemplate {
            glyph: 'f',
            color: (200, 80, 80),
            name: "Flayed Thrall",
            hp: 12,
            defense: 1,
            power: 4,
            xp: 70,
            organs: 4,
            ai: AiState::hostile(),
            effect: ConsumeEffect::FirstTaste(Boon::MaxHp(3)),
        },
        MonsterKind::OrganTrader => MonsterTemplate {
            glyph: 'T',
            color: (200, 150, 50),
            name: "Organ Trader",
            hp: 40,
            defense: 2,
            power: 5,
            xp: 0,
            organs: 20,
            ai: AiState::Vendor,
            effect: ConsumeEffect::Inert,
        },
        MonsterKind::WeakMage => MonsterTemplate {
            glyph: 'm',
            color: (0, 127, 50),
            name: "Weak Mage",
            hp: 30,
            defense: 0,
            power: 8,
            xp: 1000,
            organs: 50,
            ai: AiState::caster(2),
            effect: ConsumeEffect::BecomeMage,
        },
        MonsterKind::ViceraAbomination => MonsterTemplate {
            glyph: 'V',
            color: (150, 0, 50),
            name: "Vicera Abomination",
            hp: 60,
            defense: 2,
            power: 6,
            xp: 1200,
            organs: 60,
            ai: AiState::brood(),
            effect: ConsumeEffect::FirstTaste(Boon::MaxHp(10)),
        },
        MonsterKind::ViceraSpawn => MonsterTemplate {
            glyph: 'v',
            color: (190, 60, 90),
            name: "Vicera Spawn",
            hp: 5,
            defense: 0,
            power: 2,
            xp: 5,
            organs: 0,
            ai: AiState::hostile(),
            effect: ConsumeEffect::Inert,
        },
        MonsterKind::BloatedCorpseFly => MonsterTemplate {
            glyph: 'F',
            color: (120, 120, 40),
            name: "Bloated Corpse Fly",
            hp: 40,
            defense: 1,
            power: 5,
            xp: 1100,
            organs: 55,
            ai: AiState::skitter(),
            effect: ConsumeEffect::FirstTaste(Boon::Defense(2)),
        },
    }
}

/// Builds a monster of the given kind at `position`.
///
/// # Examples
///
/// ```
/// use fleshtower::{spawn_monster, Entity, MonsterKind, Position};
///
/// let orc = spawn_monster(MonsterKind::Orc, Position::new(4, 2));
/// assert_eq!(orc.name(), "Orc");
/// assert_eq!(orc.fighter.max_hp(), 10);
/// assert_eq!(orc.level.xp_given, 35);
/// ```
pub fn spawn_monster(kind: MonsterKind, position: Position) -> Actor {
    let template = monster_template(kind);
    let data = EntityData::new(
        position,
        template.glyph,
        template.color,
        template.name,
        true,
        RenderOrder::Actor,
    );
    let mut fighter = Fighter::new(template.hp, template.defense, template.power);
    if kind == MonsterKind::Troll || kind.is_boss() {
        fighter = fighter
            .with_attributes(Attributes {
                ns: 10,
                ..Attributes::uniform(8)
            })
            .with_reduction(5);
    }
    let capacity = match kind {
        MonsterKind::OrganTrader => 10,
        MonsterKind::WeakMage => 2,
        _ => 0,
    };
    Actor::new(data, Some(template.ai), fighter)
        .with_inventory(Inventory::new(capacity))
        .with_level(Level::new(template.xp))
        .with_effect(template.effect)
        .with_organs(template.organs)
}

fn item(position: Position, glyph: char, color: Color, name: &str, price: u32) -> Item {
    Item::new(EntityData::new(position, glyph, color, name, false, RenderOrder::Item))
        .with_price(price)
}

fn gear(position: Position, name: &str, color: Color, price: u32, equippable: Equippable) -> Item {
    let glyph = match equippable.equipment_type {
        EquipmentType::Weapon => '/',
        EquipmentType::Armor => '[',
        EquipmentType::Ring => '=',
        _ => ']',
    };
    item(position, glyph, color, name, price).with_equippable(equippable)
}

/// Builds an item of the given kind at `position`.
pub fn spawn_item(kind: ItemKind, position: Position) -> Item {
    let stat = |attribute: Attribute, amount: i32| Attributes::single(attribute, amount);
    match kind {
        ItemKind::HealthPotion => item(position, '!', (127, 0, 255), "Health Potion", 10)
            .with_consumable(Consumable::Healing { percent: 25 })
            .with_effect(ConsumeEffect::Heal { percent: 10 }),
        ItemKind::LargeHealthPotion => {
            item(position, '!', (255, 0, 127), "Large Health Potion", 25)
                .with_consumable(Consumable::Healing { percent: 50 })
                .with_effect(ConsumeEffect::Heal { percent: 20 })
        }
        ItemKind::ManaPotion => item(position, '!', (0, 0, 255), "Mana Potion", 15)
            .with_consumable(Consumable::Mana { amount: 10 })
            .with_effect(ConsumeEffect::RestoreMana { amount: 5 }),
        ItemKind::LightningScroll => item(position, '~', (255, 255, 0), "Scroll of Lightning", 30)
            .with_consumable(Consumable::Lightning {
                damage: 20,
                max_range: 5,
                fizzles: 0,
            })
            .with_effect(ConsumeEffect::LearnSpell(Spell::lightning())),
        ItemKind::ConfusionScroll => {
            item(position, '~', (207, 63, 255), "Scroll of Confusion", 20)
                .with_consumable(Consumable::Confusion { turns: 10 })
                .with_effect(ConsumeEffect::LearnSpell(Spell::confusion()))
        }
        ItemKind::FireballScroll => item(position, '~', (255, 0, 0), "Scroll of Fireball", 40)
            .with_consumable(Consumable::Fireball {
                damage: 12,
                radius: 3,
            })
            .with_effect(ConsumeEffect::LearnSpell(Spell::fireball())),
        ItemKind::Dagger => gear(
            position,
            "Dagger",
            (0, 191, 255),
            15,
            Equippable::new(EquipmentType::Weapon).with_power(2),
        ),
        ItemKind::Sword => gear(
            position,
            "Sword",
            (0, 191, 255),
            35,
            Equippable::new(EquipmentType::Weapon).with_power(4),
        ),
        ItemKind::LeatherArmor => gear(
            position,
            "Leather Armor",
            (139, 69, 19),
            20,
            Equippable::new(EquipmentType::Armor).with_defense(1),
        ),
        ItemKind::ChainMail => gear(
            position,
            "Chain Mail",
            (139, 69, 19),
            50,
            Equippable::new(EquipmentType::Armor).with_defense(3),
        ),
        ItemKind::SkinHood => gear(
            position,
            "Skin Hood",
            (222, 184, 135),
            15,
            Equippable::new(EquipmentType::Head).with_defense(1),
        ),
        ItemKind::BileGoggles => gear(
            position,
            "Bile Goggles",
            (154, 205, 50),
            20,
            Equippable::new(EquipmentType::Eyes).with_stats(stat(Attribute::PE, 1)),
        ),
        ItemKind::ToothNecklace => gear(
            position,
            "Tooth Necklace",
            (255, 250, 240),
            20,
            Equippable::new(EquipmentType::Necklace).with_stats(stat(Attribute::VI, 1)),
        ),
        ItemKind::SkinCloak => gear(
            position,
            "Skin Cloak",
            (205, 133, 63),
            20,
            Equippable::new(EquipmentType::Cloak).with_stats(stat(Attribute::NS, 1)),
        ),
        ItemKind::SinewBracer => gear(
            position,
            "Sinew Bracer",
            (178, 34, 34),
            20,
            Equippable::new(EquipmentType::Wrist).with_stats(stat(Attribute::TM, 1)),
        ),
        ItemKind::GutBelt => gear(
            position,
            "Gut Belt",
            (160, 82, 45),
            20,
            Equippable::new(EquipmentType::Belt).with_stats(stat(Attribute::FI, 1)),
        ),
        ItemKind::BoneGreaves => gear(
            position,
            "Bone Greaves",
            (245, 245, 220),
            25,
            Equippable::new(EquipmentType::Legs).with_defense(1),
        ),
        ItemKind::Ring => gear(
            position,
            "Ring",
            (255, 215, 0),
            10,
            Equippable::new(EquipmentType::Ring),
        ),
        ItemKind::WeirdRing => gear(
            position,
            "Weird Ring",
            (180, 0, 255),
            60,
            Equippable::new(EquipmentType::Ring).with_stats(stat(Attribute::CD, 5)),
        ),
    }
}

/// A totem whose consumption sets the eater's class.
pub fn spawn_class_totem(class: PlayerClass, position: Position) -> Item {
    let color = match class {
        PlayerClass::Fighter => (200, 40, 40),
        PlayerClass::Mage => (60, 60, 220),
        PlayerClass::Rogue => (40, 180, 40),
        PlayerClass::Generic => (200, 200, 200),
    };
    let name = format!("{} Totem", class.name());
    item(position, '&', color, &name, 0).with_effect(ConsumeEffect::ChooseClass(class))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Entity;

    #[test]
    fn test_player_archetype() {
        let player = spawn_player(Position::new(1, 2));
        assert_eq!(player.fighter.max_hp(), 34);
        assert_eq!(player.fighter.power(), 4);
        assert_eq!(player.fighter.defense(), 1);
        assert_eq!(player.fighter.damage_reduction(), 10);
        assert_eq!(player.inventory.capacity, 26);
        assert_eq!(player.spellbook.capacity, 10);
        assert_eq!(player.level.experience_to_next_level(), 350);
        assert_eq!(player.ai, Some(AiState::PlayerControlled));
        assert_eq!(player.player_class, PlayerClass::Generic);
    }

    #[test]
    fn test_every_monster_spawns_alive_and_blocking() {
        let kinds = [
            MonsterKind::Orc,
            MonsterKind::Rat,
            MonsterKind::Troll,
            MonsterKind::Zombie,
            MonsterKind::FlayedThrall,
            MonsterKind::OrganTrader,
            MonsterKind::WeakMage,
            MonsterKind::ViceraAbomination,
            MonsterKind::ViceraSpawn,
            MonsterKind::BloatedCorpseFly,
        ];
        for kind in kinds {
            let monster = spawn_monster(kind, Position::origin());
            assert!(monster.is_alive(), "{:?}", kind);
            assert!(monster.blocks_movement());
            assert!(monster.fighter.hp() > 0);
        }
    }

    #[test]
    fn test_weak_mage_is_caster() {
        let mage = spawn_monster(MonsterKind::WeakMage, Position::origin());
        assert!(matches!(mage.ai, Some(AiState::Caster { spell_slots: 2, .. })));
        assert_eq!(mage.effect, ConsumeEffect::BecomeMage);
        assert_eq!(mage.level.xp_given, 1000);
    }

    #[test]
    fn test_fresh_ids_per_spawn() {
        let a = spawn_item(ItemKind::Sword, Position::origin());
        let b = spawn_item(ItemKind::Sword, Position::origin());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_equippable_table() {
        let sword = spawn_item(ItemKind::Sword, Position::origin());
        assert_eq!(sword.equippable.as_ref().unwrap().power_bonus, 4);
        let ring = spawn_item(ItemKind::Ring, Position::origin());
        assert!(ring.equippable.as_ref().unwrap().stat_bonus.is_zero());
        let weird = spawn_item(ItemKind::WeirdRing, Position::origin());
        assert_eq!(weird.equippable.as_ref().unwrap().stat_bonus.cd, 5);
        let potion = spawn_item(ItemKind::HealthPotion, Position::origin());
        assert!(potion.equippable.is_none());
        assert!(potion.consumable.is_some());
    }

    #[test]
    fn test_class_totem() {
        let totem = spawn_class_totem(PlayerClass::Rogue, Position::origin());
        assert_eq!(totem.name(), "Rogue Totem");
        assert_eq!(totem.effect, ConsumeEffect::ChooseClass(PlayerClass::Rogue));
    }
}
