//! # Generation Module
//!
//! Procedural floors for the tower.
//!
//! Each floor is one of four kinds: the class selection floor that opens the
//! climb, boss floors every fifth floor, occasional shop floors and the
//! standard room-and-corridor dungeon. Spawn tables and entity factories live
//! in their own submodules.

pub mod dungeon;
pub mod encounters;
pub mod factory;
pub mod items;
pub mod special;

pub use dungeon::*;
pub use encounters::*;
pub use factory::*;
pub use items::*;
pub use special::*;

use crate::config;
use crate::game::settings::{PlayerClass, Settings};
use crate::game::world::GameMap;
use crate::game::Position;
use crate::TowerResult;
use log::debug;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Parameters for generating one floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub map_width: u32,
    pub map_height: u32,
    /// Placement attempts, not a guaranteed room count
    pub max_rooms: u32,
    pub room_min_size: u32,
    pub room_max_size: u32,
    /// Floor being generated; drives the spawn tables
    pub current_floor: u32,
    /// Class of the player the floor is built for
    pub player_class: PlayerClass,
}

impl GenerationConfig {
    /// Creates a default generation configuration for `floor`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleshtower::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(3);
    /// assert_eq!(config.current_floor, 3);
    /// assert!(config.room_max_size >= config.room_min_size);
    /// ```
    pub fn new(floor: u32) -> Self {
        Self {
            map_width: config::DEFAULT_MAP_WIDTH,
            map_height: config::DEFAULT_MAP_HEIGHT,
            max_rooms: config::DEFAULT_MAX_ROOMS,
            room_min_size: config::DEFAULT_ROOM_MIN_SIZE,
            room_max_size: config::DEFAULT_ROOM_MAX_SIZE,
            current_floor: floor,
            player_class: PlayerClass::Generic,
        }
    }

    /// Creates a configuration for testing with smaller levels.
    pub fn for_testing(floor: u32) -> Self {
        Self {
            map_width: 50,
            map_height: 40,
            max_rooms: 15,
            room_min_size: 5,
            room_max_size: 8,
            current_floor: floor,
            player_class: PlayerClass::Generic,
        }
    }

    /// Takes map and room sizes from the runtime settings.
    pub fn from_settings(settings: &Settings, floor: u32, player_class: PlayerClass) -> Self {
        Self {
            map_width: settings.map_width,
            map_height: settings.map_height,
            max_rooms: settings.max_rooms,
            room_min_size: settings.room_min_size,
            room_max_size: settings.room_max_size,
            current_floor: floor,
            player_class,
        }
    }

    pub fn with_class(mut self, player_class: PlayerClass) -> Self {
        self.player_class = player_class;
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Purpose of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomType {
    /// Standard room with monsters and items
    Normal,
    /// The player's arrival room; never populated
    Start,
    /// Room with a champion or floor boss
    Boss,
    /// The Organ Trader's room
    Shop,
    /// Room holding the class totems
    ClassSelect,
}

/// An axis-aligned room. `x2`/`y2` are exclusive of the carved interior:
/// the walkable tiles are `x1+1..x2` by `y1+1..y2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Index of the room in acceptance order
    pub id: u32,
    pub top_left: Position,
    pub width: u32,
    pub height: u32,
    pub room_type: RoomType,
    /// Ids of rooms joined to this one by a tunnel
    pub connections: Vec<u32>,
}

impl Room {
    /// Creates a new room with the given parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleshtower::{Room, Position, RoomType};
    ///
    /// let room = Room::new(1, Position::new(5, 5), 10, 8, RoomType::Normal);
    /// assert_eq!(room.center(), Position::new(10, 9));
    /// assert!(room.contains(Position::new(6, 6)));
    /// assert!(!room.contains(Position::new(5, 5)));
    /// ```
    pub fn new(id: u32, top_left: Position, width: u32, height: u32, room_type: RoomType) -> Self {
        Self {
            id,
            top_left,
            width,
            height,
            room_type,
            connections: Vec::new(),
        }
    }

    pub fn x1(&self) -> i32 {
        self.top_left.x
    }

    pub fn y1(&self) -> i32 {
        self.top_left.y
    }

    pub fn x2(&self) -> i32 {
        self.top_left.x + self.width as i32
    }

    pub fn y2(&self) -> i32 {
        self.top_left.y + self.height as i32
    }

    pub fn center(&self) -> Position {
        Position::new((self.x1() + self.x2()) / 2, (self.y1() + self.y2()) / 2)
    }

    /// Returns true if `pos` is a carved interior tile of this room.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x > self.x1() && pos.x < self.x2() && pos.y > self.y1() && pos.y < self.y2()
    }

    /// Overlap test on the full rectangles, borders included.
    pub fn intersects(&self, other: &Room) -> bool {
        self.x1() <= other.x2()
            && self.x2() >= other.x1()
            && self.y1() <= other.y2()
            && self.y2() >= other.y1()
    }

    /// All interior tiles, row by row.
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for y in (self.y1() + 1)..self.y2() {
            for x in (self.x1() + 1)..self.x2() {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }

    /// Adds a connection to another room.
    pub fn add_connection(&mut self, room_id: u32) {
        if !self.connections.contains(&room_id) {
            self.connections.push(room_id);
        }
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> TowerResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> TowerResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Which generator builds a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloorKind {
    ClassSelect,
    Boss,
    Shop,
    Dungeon,
}

impl FloorKind {
    /// Routes a floor number to its kind. `shop_roll` is the outcome of the
    /// random shop chance.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleshtower::FloorKind;
    ///
    /// assert_eq!(FloorKind::route(0, true), FloorKind::ClassSelect);
    /// assert_eq!(FloorKind::route(10, true), FloorKind::Boss);
    /// assert_eq!(FloorKind::route(1, true), FloorKind::Dungeon);
    /// assert_eq!(FloorKind::route(3, true), FloorKind::Shop);
    /// assert_eq!(FloorKind::route(3, false), FloorKind::Dungeon);
    /// ```
    pub fn route(floor: u32, shop_roll: bool) -> Self {
        if floor == 0 {
            FloorKind::ClassSelect
        } else if floor % config::BOSS_FLOOR_INTERVAL == 0 {
            FloorKind::Boss
        } else if shop_roll && floor != 1 {
            FloorKind::Shop
        } else {
            FloorKind::Dungeon
        }
    }
}

/// Builds and validates one floor of the given kind.
pub fn generate_floor(
    config: &GenerationConfig,
    kind: FloorKind,
    rng: &mut StdRng,
) -> TowerResult<GameMap> {
    let generator: Box<dyn Generator<GameMap>> = match kind {
        FloorKind::ClassSelect => Box::new(ClassSelectGenerator),
        FloorKind::Boss => Box::new(BossRoomGenerator),
        FloorKind::Shop => Box::new(ShopGenerator),
        FloorKind::Dungeon => Box::new(RoomCorridorGenerator::new()),
    };
    let map = generator.generate(config, rng)?;
    generator.validate(&map, config)?;
    debug!(
        "{} built floor {}: {} rooms, {} entities",
        generator.generator_type(),
        config.current_floor,
        map.rooms.len(),
        map.entities.len()
    );
    Ok(map)
}

/// Standard room-and-corridor floor with the given sizes.
#[allow(clippy::too_many_arguments)]
pub fn generate_dungeon(
    max_rooms: u32,
    room_min_size: u32,
    room_max_size: u32,
    map_width: u32,
    map_height: u32,
    current_floor: u32,
    player_class: PlayerClass,
    rng: &mut StdRng,
) -> TowerResult<GameMap> {
    let config = GenerationConfig {
        map_width,
        map_height,
        max_rooms,
        room_min_size,
        room_max_size,
        current_floor,
        player_class,
    };
    generate_floor(&config, FloorKind::Dungeon, rng)
}

/// Utility functions shared by the generators.
pub mod utils {
    use super::*;
    use crate::game::world::Tile;
    use crate::utils::pathfinding::bresenham_line;
    use crate::TowerError;
    use rand::distributions::{Distribution, WeightedIndex};
    use rand::Rng;

    /// Rejects maps too small to hold a room with an interior.
    pub fn check_dimensions(config: &GenerationConfig) -> TowerResult<()> {
        if config.map_width < 3 || config.map_height < 3 {
            return Err(TowerError::GenerationFailed(format!(
                "Map of {}x{} is too small to hold a room",
                config.map_width, config.map_height
            )));
        }
        Ok(())
    }

    /// Carves a room's interior to floor.
    pub fn carve_room(map: &mut GameMap, room: &Room) -> TowerResult<()> {
        for pos in room.floor_positions() {
            map.set_tile(pos, Tile::floor())?;
        }
        Ok(())
    }

    /// L-shaped tunnel between two points. The corner is picked by coin flip.
    pub fn tunnel_between(start: Position, end: Position, rng: &mut StdRng) -> Vec<Position> {
        let corner = if rng.gen_bool(0.5) {
            Position::new(end.x, start.y)
        } else {
            Position::new(start.x, end.y)
        };
        let mut tiles = bresenham_line(start, corner);
        tiles.extend(bresenham_line(corner, end).into_iter().skip(1));
        tiles
    }

    /// Places the upstairs tile.
    pub fn place_upstairs(map: &mut GameMap, pos: Position) -> TowerResult<()> {
        map.set_tile(pos, Tile::stairs_up())?;
        map.upstairs = Some(pos);
        Ok(())
    }

    /// Checks that a floor can be played.
    pub fn validate_map(map: &GameMap) -> TowerResult<()> {
        if map.walkable_count() == 0 {
            return Err(TowerError::GenerationFailed(
                "Floor has no walkable tiles".to_string(),
            ));
        }
        if !map.is_walkable(map.player_start) {
            return Err(TowerError::GenerationFailed(format!(
                "Player start {:?} is not walkable",
                map.player_start
            )));
        }
        if let Some(stairs) = map.upstairs {
            if !map.is_walkable(stairs) {
                return Err(TowerError::GenerationFailed(format!(
                    "Upstairs {:?} is not walkable",
                    stairs
                )));
            }
        }
        Ok(())
    }

    /// Value of a depth-bucketed table for `floor`: the entry with the
    /// largest key not above the floor, or 0 before the first key.
    pub fn max_value_for_floor(table: &[(u32, u32)], floor: u32) -> u32 {
        table
            .iter()
            .take_while(|(minimum, _)| *minimum <= floor)
            .last()
            .map_or(0, |(_, value)| *value)
    }

    /// Accumulates the weights of every bucket with key at or below `floor`.
    /// A later bucket overrides the weight of a kind listed earlier.
    pub fn weights_for_floor<K: Copy + PartialEq>(
        table: &[(u32, &[(K, u32)])],
        floor: u32,
    ) -> Vec<(K, u32)> {
        let mut weights: Vec<(K, u32)> = Vec::new();
        for (minimum, entries) in table {
            if *minimum > floor {
                break;
            }
            for &(kind, weight) in entries.iter() {
                match weights.iter_mut().find(|(k, _)| *k == kind) {
                    Some(existing) => existing.1 = weight,
                    None => weights.push((kind, weight)),
                }
            }
        }
        weights
    }

    /// Draws `count` kinds with repetition, proportional to their weights.
    pub fn choose_weighted<K: Copy>(weights: &[(K, u32)], count: usize, rng: &mut StdRng) -> Vec<K> {
        let Ok(distribution) = WeightedIndex::new(weights.iter().map(|(_, weight)| *weight)) else {
            return Vec::new();
        };
        (0..count)
            .map(|_| weights[distribution.sample(rng)].0)
            .collect()
    }

    /// Builds a single room roughly centered in the map, at most
    /// `max_width` by `max_height` including its walls.
    pub fn centered_room(
        config: &GenerationConfig,
        max_width: u32,
        max_height: u32,
        room_type: RoomType,
    ) -> Room {
        let width = (config.map_width - 1).min(max_width);
        let height = (config.map_height - 1).min(max_height);
        let x = (config.map_width - 1 - width) / 2;
        let y = (config.map_height - 1 - height) / 2;
        Room::new(0, Position::new(x as i32, y as i32), width, height, room_type)
    }
}
