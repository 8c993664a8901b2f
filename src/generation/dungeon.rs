//! # Dungeon Generation
//!
//! Room-and-corridor floors.
//!
//! Rooms are random rectangles placed without overlap; each accepted room is
//! joined to the previous one by an L-shaped tunnel, so the floor is always
//! connected. The first room is the player's and stays empty; the sixth is a
//! boss room.

use crate::config;
use crate::game::entities::Entity;
use crate::game::world::{GameMap, Tile};
use crate::game::Position;
use crate::generation::encounters::EncounterGenerator;
use crate::generation::factory::{spawn_item, spawn_monster, MonsterKind};
use crate::generation::items::ItemGenerator;
use crate::generation::special::stock_vendor;
use crate::generation::utils::{carve_room, check_dimensions, place_upstairs, tunnel_between, validate_map};
use crate::{GenerationConfig, Generator, Room, RoomType, TowerError, TowerResult};
use log::trace;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Primary dungeon generator using the room-and-corridor algorithm.
///
/// This generator creates floors by:
/// 1. Trying `max_rooms` random rectangles, rejecting any that overlap
/// 2. Tunneling from each new room to the previous one
/// 3. Placing the upstairs in the last room
/// 4. Populating every room but the first
#[derive(Debug, Clone, Default)]
pub struct RoomCorridorGenerator {
    encounters: EncounterGenerator,
    items: ItemGenerator,
}

impl RoomCorridorGenerator {
    /// Creates a new dungeon generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleshtower::{GenerationConfig, Generator, RoomCorridorGenerator};
    /// use rand::SeedableRng;
    ///
    /// let generator = RoomCorridorGenerator::new();
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    /// let map = generator.generate(&GenerationConfig::for_testing(2), &mut rng).unwrap();
    /// assert!(map.is_walkable(map.player_start));
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Places rooms, carving each accepted one along with its tunnel.
    fn place_rooms(
        &self,
        map: &mut GameMap,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> TowerResult<Vec<Room>> {
        let mut rooms: Vec<Room> = Vec::new();
        let max_size = config.room_max_size.max(config.room_min_size);

        for _ in 0..config.max_rooms {
            let width = rng.gen_range(config.room_min_size..=max_size);
            let height = rng.gen_range(config.room_min_size..=max_size);
            if width < 2 || height < 2 || width >= config.map_width || height >= config.map_height {
                continue;
            }
            let x = rng.gen_range(0..config.map_width - width);
            let y = rng.gen_range(0..config.map_height - height);
            let mut room = Room::new(
                rooms.len() as u32,
                Position::new(x as i32, y as i32),
                width,
                height,
                RoomType::Normal,
            );
            if rooms.iter().any(|other| room.intersects(other)) {
                continue;
            }

            carve_room(map, &room)?;
            match rooms.last_mut() {
                None => {
                    room.room_type = RoomType::Start;
                    map.player_start = room.center();
                }
                Some(previous) => {
                    for pos in tunnel_between(previous.center(), room.center(), rng) {
                        map.set_tile(pos, Tile::floor())?;
                    }
                    previous.add_connection(room.id);
                    room.add_connection(previous.id);
                }
            }
            if rooms.len() == config::BOSS_ROOM_INDEX {
                room.room_type = RoomType::Boss;
            }
            trace!("Accepted {:?} room {} at {:?}", room.room_type, room.id, room.top_left);
            rooms.push(room);
        }

        if rooms.is_empty() {
            let room = Room::new(
                0,
                Position::origin(),
                config.map_width - 1,
                config.map_height - 1,
                RoomType::Start,
            );
            carve_room(map, &room)?;
            map.player_start = room.center();
            rooms.push(room);
        }
        Ok(rooms)
    }

    /// Upstairs go in the last room, or anywhere but the start in a lone room.
    fn place_stairs(&self, map: &mut GameMap, rooms: &[Room]) -> TowerResult<()> {
        let stairs = match rooms {
            [only] => only
                .floor_positions()
                .into_iter()
                .find(|&pos| pos != map.player_start),
            [.., last] => Some(last.center()),
            [] => None,
        };
        match stairs {
            Some(pos) => place_upstairs(map, pos),
            None => Ok(()),
        }
    }

    /// Adds the room's monsters and items.
    fn place_entities(
        &self,
        map: &mut GameMap,
        room: &Room,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> TowerResult<()> {
        let tiles = room.floor_positions();
        if tiles.is_empty() {
            return Ok(());
        }

        let max_monsters = self.encounters.max_monsters(config.current_floor);
        let count = if room.room_type == RoomType::Boss {
            max_monsters
        } else {
            rng.gen_range(0..=max_monsters)
        };
        let monsters = self.encounters.roll(config, count as usize, rng);

        for kind in monsters {
            let Some(&pos) = tiles.choose(rng) else { break };
            if map.is_occupied(pos) {
                continue;
            }
            let kind = if kind == MonsterKind::OrganTrader && map.vendor_spawned {
                MonsterKind::Orc
            } else {
                kind
            };
            let mut monster = spawn_monster(kind, pos);
            if monster.is_vendor() {
                stock_vendor(&mut monster, config, rng)?;
                map.vendor_spawned = true;
            }
            trace!("Spawned {} at {:?}", monster.name(), pos);
            map.add_entity(monster);
        }

        if room.room_type == RoomType::Boss {
            let free: Vec<Position> = tiles.iter().copied().filter(|&pos| !map.is_occupied(pos)).collect();
            if let Some(&pos) = free.choose(rng) {
                map.add_entity(spawn_monster(MonsterKind::Troll, pos));
            }
        }

        let item_count = rng.gen_range(0..=self.items.max_items(config.current_floor));
        for kind in self.items.roll(config, item_count as usize, rng) {
            let Some(&pos) = tiles.choose(rng) else { break };
            if map.is_occupied(pos) {
                continue;
            }
            map.add_entity(spawn_item(kind, pos));
        }
        Ok(())
    }
}

impl Generator<GameMap> for RoomCorridorGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> TowerResult<GameMap> {
        check_dimensions(config)?;
        let mut map = GameMap::new(config.map_width, config.map_height, config.current_floor);

        let rooms = self.place_rooms(&mut map, config, rng)?;
        self.place_stairs(&mut map, &rooms)?;
        for room in rooms.iter().skip(1) {
            self.place_entities(&mut map, room, config, rng)?;
        }
        map.rooms = rooms;
        Ok(map)
    }

    fn validate(&self, map: &GameMap, _config: &GenerationConfig) -> TowerResult<()> {
        validate_map(map)?;
        if let Some(entity) = map.entities.iter().find(|e| !map.is_walkable(e.position())) {
            return Err(TowerError::GenerationFailed(format!(
                "{} was placed in a wall at {:?}",
                entity.name(),
                entity.position()
            )));
        }
        let vendors = map.living_actors().filter(|actor| actor.is_vendor()).count();
        if vendors > 1 {
            return Err(TowerError::GenerationFailed(format!(
                "{} vendors on one floor",
                vendors
            )));
        }
        if let Some(start) = map.rooms.first() {
            if map.living_actors().any(|actor| start.contains(actor.position())) {
                return Err(TowerError::GenerationFailed(
                    "Monster placed in the starting room".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "RoomCorridorGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::{HashSet, VecDeque};

    fn reachable_from(map: &GameMap, start: Position) -> HashSet<Position> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(pos) = queue.pop_front() {
            for next in pos.adjacent_positions() {
                if map.is_walkable(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    #[test]
    fn test_dungeon_generation() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::for_testing(3);
        let mut rng = StdRng::seed_from_u64(12345);

        let map = generator.generate(&config, &mut rng).unwrap();
        assert!(generator.validate(&map, &config).is_ok());
        assert!(!map.rooms.is_empty());
        assert_eq!(map.rooms[0].room_type, RoomType::Start);
        assert_eq!(map.player_start, map.rooms[0].center());
    }

    #[test]
    fn test_rooms_never_overlap() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::new(4);
        let mut rng = StdRng::seed_from_u64(99);
        let map = generator.generate(&config, &mut rng).unwrap();
        for (i, a) in map.rooms.iter().enumerate() {
            for b in &map.rooms[i + 1..] {
                assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_every_room_is_reachable() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::new(2);
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let map = generator.generate(&config, &mut rng).unwrap();
            let reachable = reachable_from(&map, map.player_start);
            for room in &map.rooms {
                assert!(reachable.contains(&room.center()));
            }
            if let Some(stairs) = map.upstairs {
                assert!(reachable.contains(&stairs));
            }
        }
    }

    #[test]
    fn test_sixth_room_is_boss() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::new(2);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let map = generator.generate(&config, &mut rng).unwrap();
            for room in &map.rooms {
                let expected = match room.id {
                    0 => RoomType::Start,
                    5 => RoomType::Boss,
                    _ => RoomType::Normal,
                };
                assert_eq!(room.room_type, expected);
            }
            if map.rooms.len() > 5 {
                let boss = &map.rooms[5];
                assert!(map
                    .living_actors()
                    .any(|actor| actor.name() == "Troll" && boss.contains(actor.position())));
            }
        }
    }

    #[test]
    fn test_same_seed_same_floor() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::for_testing(6);
        let a = generator.generate(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = generator.generate(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a.rooms, b.rooms);
        assert_eq!(a.upstairs, b.upstairs);
        let names_a: Vec<&str> = a.entities.iter().map(|e| e.name()).collect();
        let names_b: Vec<&str> = b.entities.iter().map(|e| e.name()).collect();
        assert_eq!(names_a, names_b);
    }

    #[test]
    fn test_at_most_one_vendor() {
        let generator = RoomCorridorGenerator::new();
        let mut config = GenerationConfig::new(2);
        config.max_rooms = 60;
        for seed in 0..15 {
            let mut rng = StdRng::seed_from_u64(seed);
            let map = generator.generate(&config, &mut rng).unwrap();
            let vendors = map.living_actors().filter(|a| a.is_vendor()).count();
            assert!(vendors <= 1);
            assert_eq!(map.vendor_spawned, vendors == 1);
        }
    }

    #[test]
    fn test_tiny_map_falls_back_to_one_room() {
        let generator = RoomCorridorGenerator::new();
        let mut config = GenerationConfig::for_testing(1);
        config.map_width = 3;
        config.map_height = 3;
        let mut rng = StdRng::seed_from_u64(1);
        let map = generator.generate(&config, &mut rng).unwrap();
        assert_eq!(map.rooms.len(), 1);
        assert_eq!(map.player_start, Position::new(1, 1));
        assert!(map.is_walkable(map.player_start));
        assert_eq!(map.upstairs, None);
    }

    #[test]
    fn test_generation_fails_on_degenerate_map() {
        let generator = RoomCorridorGenerator::new();
        let mut config = GenerationConfig::for_testing(1);
        config.map_height = 1;
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generator.generate(&config, &mut rng),
            Err(TowerError::GenerationFailed(_))
        ));
    }
}
