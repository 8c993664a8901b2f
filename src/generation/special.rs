//! Single-room floors: class selection, boss lairs and the Organ Trader's shop.

use crate::config;
use crate::game::entities::{Actor, Entity};
use crate::game::settings::PlayerClass;
use crate::game::world::GameMap;
use crate::game::Position;
use crate::generation::factory::{
    spawn_class_totem, spawn_item, spawn_monster, ItemKind, MonsterKind,
};
use crate::generation::items::ItemGenerator;
use crate::generation::utils::{
    carve_room, centered_room, check_dimensions, place_upstairs, validate_map,
};
use crate::{GenerationConfig, Generator, Room, RoomType, TowerError, TowerResult};
use rand::rngs::StdRng;

/// Fills a vendor's inventory with the floor's wares.
pub fn stock_vendor(vendor: &mut Actor, config: &GenerationConfig, rng: &mut StdRng) -> TowerResult<()> {
    let at = vendor.position();
    for kind in ItemGenerator.vendor_stock(config, rng) {
        vendor.inventory.add(spawn_item(kind, at))?;
    }
    Ok(())
}

/// Boss guarding a boss floor.
///
/// # Examples
///
/// ```
/// use fleshtower::{boss_for_floor, MonsterKind};
///
/// assert_eq!(boss_for_floor(5), MonsterKind::WeakMage);
/// assert_eq!(boss_for_floor(10), MonsterKind::BloatedCorpseFly);
/// assert_eq!(boss_for_floor(15), MonsterKind::ViceraAbomination);
/// assert_eq!(boss_for_floor(20), MonsterKind::WeakMage);
/// ```
pub fn boss_for_floor(floor: u32) -> MonsterKind {
    match (floor / config::BOSS_FLOOR_INTERVAL) % 3 {
        1 => MonsterKind::WeakMage,
        2 => MonsterKind::BloatedCorpseFly,
        _ => MonsterKind::ViceraAbomination,
    }
}

/// Carves `room` into a fresh map, or fails if its interior is smaller than
/// `min_inner_width` by `min_inner_height`.
fn single_room_map(
    config: &GenerationConfig,
    room: Room,
    min_inner_width: u32,
    min_inner_height: u32,
) -> TowerResult<(GameMap, Room)> {
    if room.width < min_inner_width + 1 || room.height < min_inner_height + 1 {
        return Err(TowerError::GenerationFailed(format!(
            "{:?} room needs a {}x{} interior, the {}x{} map allows {}x{}",
            room.room_type,
            min_inner_width,
            min_inner_height,
            config.map_width,
            config.map_height,
            room.width.saturating_sub(1),
            room.height.saturating_sub(1)
        )));
    }
    let mut map = GameMap::new(config.map_width, config.map_height, config.current_floor);
    carve_room(&mut map, &room)?;
    Ok((map, room))
}

/// Floor 0: the three class totems and the way up.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassSelectGenerator;

impl Generator<GameMap> for ClassSelectGenerator {
    fn generate(&self, config: &GenerationConfig, _rng: &mut StdRng) -> TowerResult<GameMap> {
        check_dimensions(config)?;
        let room = centered_room(config, 20, 12, RoomType::ClassSelect);
        let (mut map, room) = single_room_map(config, room, 5, 3)?;

        let center = room.center();
        let top = room.y1() + 1;
        let bottom = room.y2() - 1;
        let classes = [PlayerClass::Fighter, PlayerClass::Mage, PlayerClass::Rogue];
        for (offset, class) in [-2, 0, 2].into_iter().zip(classes) {
            map.add_entity(spawn_class_totem(class, Position::new(center.x + offset, top)));
        }

        map.player_start = Position::new(center.x, bottom);
        place_upstairs(&mut map, Position::new(room.x2() - 1, bottom))?;
        map.rooms.push(room);
        Ok(map)
    }

    fn validate(&self, map: &GameMap, _config: &GenerationConfig) -> TowerResult<()> {
        validate_map(map)?;
        let totems = map
            .items()
            .filter(|item| item.name().ends_with("Totem"))
            .count();
        if totems != 3 {
            return Err(TowerError::GenerationFailed(format!(
                "Class selection floor has {} totems",
                totems
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "ClassSelectGenerator"
    }
}

/// Every fifth floor: one long hall, the boss between the player and the stairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BossRoomGenerator;

impl Generator<GameMap> for BossRoomGenerator {
    fn generate(&self, config: &GenerationConfig, _rng: &mut StdRng) -> TowerResult<GameMap> {
        check_dimensions(config)?;
        let room = centered_room(config, 40, 20, RoomType::Boss);
        let (mut map, room) = single_room_map(config, room, 3, 1)?;

        let row = room.center().y;
        let stairs = Position::new(room.x2() - 1, row);
        map.player_start = Position::new(room.x1() + 1, row);

        let kind = boss_for_floor(config.current_floor);
        let mut boss = spawn_monster(kind, Position::new(stairs.x - 1, row));
        if kind == MonsterKind::WeakMage {
            let scroll = spawn_item(ItemKind::LightningScroll, boss.position());
            boss.inventory.add(scroll)?;
        }
        map.add_entity(boss);
        place_upstairs(&mut map, stairs)?;
        map.rooms.push(room);
        Ok(map)
    }

    fn validate(&self, map: &GameMap, config: &GenerationConfig) -> TowerResult<()> {
        validate_map(map)?;
        let expected = boss_for_floor(config.current_floor);
        let boss_name = spawn_monster(expected, Position::origin()).name().to_string();
        if !map.living_actors().any(|actor| actor.name() == boss_name) {
            return Err(TowerError::GenerationFailed(format!(
                "Boss floor {} has no {}",
                config.current_floor, boss_name
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "BossRoomGenerator"
    }
}

/// A quiet floor holding the Organ Trader.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShopGenerator;

impl Generator<GameMap> for ShopGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> TowerResult<GameMap> {
        check_dimensions(config)?;
        let room = centered_room(config, 14, 10, RoomType::Shop);
        let (mut map, room) = single_room_map(config, room, 3, 3)?;

        let mut vendor = spawn_monster(MonsterKind::OrganTrader, room.center());
        stock_vendor(&mut vendor, config, rng)?;
        map.add_entity(vendor);
        map.vendor_spawned = true;

        map.player_start = Position::new(room.x1() + 1, room.y2() - 1);
        place_upstairs(&mut map, Position::new(room.x2() - 1, room.y1() + 1))?;
        map.rooms.push(room);
        Ok(map)
    }

    fn validate(&self, map: &GameMap, _config: &GenerationConfig) -> TowerResult<()> {
        validate_map(map)?;
        if !map.living_actors().any(|actor| actor.is_vendor()) {
            return Err(TowerError::GenerationFailed(
                "Shop floor has no vendor".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "ShopGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_class_select_floor() {
        let config = GenerationConfig::for_testing(0);
        let map = ClassSelectGenerator.generate(&config, &mut rng()).unwrap();
        assert!(ClassSelectGenerator.validate(&map, &config).is_ok());
        assert!(map.is_walkable(map.player_start));
        assert!(map.upstairs.is_some());
        let names: Vec<&str> = map.items().map(|item| item.name()).collect();
        assert_eq!(names, vec!["Fighter Totem", "Mage Totem", "Rogue Totem"]);
        assert!(map.items().all(|item| map.is_walkable(item.position())));
    }

    #[test]
    fn test_class_select_needs_room() {
        let mut config = GenerationConfig::for_testing(0);
        config.map_width = 5;
        config.map_height = 5;
        assert!(ClassSelectGenerator.generate(&config, &mut rng()).is_err());
    }

    #[test]
    fn test_boss_floors() {
        for (floor, name) in [(5, "Weak Mage"), (10, "Bloated Corpse Fly"), (15, "Vicera Abomination")] {
            let config = GenerationConfig::for_testing(floor);
            let map = BossRoomGenerator.generate(&config, &mut rng()).unwrap();
            assert!(BossRoomGenerator.validate(&map, &config).is_ok());
            let boss = map.living_actors().next().unwrap();
            assert_eq!(boss.name(), name);
            let stairs = map.upstairs.unwrap();
            assert!(map.player_start.x < boss.position().x);
            assert!(boss.position().x < stairs.x);
        }
    }

    #[test]
    fn test_weak_mage_carries_a_scroll() {
        let config = GenerationConfig::for_testing(5);
        let map = BossRoomGenerator.generate(&config, &mut rng()).unwrap();
        let mage = map.living_actors().next().unwrap();
        assert_eq!(mage.inventory.len(), 1);
    }

    #[test]
    fn test_shop_floor() {
        let config = GenerationConfig::for_testing(3);
        let map = ShopGenerator.generate(&config, &mut rng()).unwrap();
        assert!(ShopGenerator.validate(&map, &config).is_ok());
        assert!(map.vendor_spawned);
        let vendor = map.living_actors().find(|actor| actor.is_vendor()).unwrap();
        assert_eq!(vendor.inventory.len(), crate::generation::items::VENDOR_STOCK);
        assert_ne!(map.player_start, vendor.position());
        assert_ne!(map.upstairs, Some(vendor.position()));
    }
}
