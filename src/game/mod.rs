//! # Game Module
//!
//! Core simulation types for the tower.
//!
//! This module contains the fundamental building blocks of Flesh Tower:
//! - Tile grid and floor representation
//! - Actors, items and the components they carry
//! - Fighter stats, equipment, affixes, spells and consumption effects
//! - The action pipeline, enemy AI and the turn engine

pub mod actions;
pub mod affix;
pub mod ai;
pub mod autoexplore;
pub mod consumable;
pub mod effects;
pub mod entities;
pub mod equipment;
pub mod fighter;
pub mod inventory;
pub mod level;
pub mod messages;
pub mod settings;
pub mod spells;
pub mod state;
pub mod world;

pub use actions::*;
pub use affix::*;
pub use ai::*;
pub use autoexplore::*;
pub use consumable::*;
pub use effects::*;
pub use entities::*;
pub use equipment::*;
pub use fighter::*;
pub use inventory::*;
pub use level::*;
pub use messages::*;
pub use settings::*;
pub use spells::*;
pub use state::*;
pub use world::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tile coordinate; also used for deltas between tiles.
///
/// # Examples
///
/// ```
/// use fleshtower::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.adjacent_positions().len(), 8);
/// assert_eq!(pos - Position::new(9, 6), Position::new(1, -1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// King-move distance; adjacency for melee and spawning.
    ///
    /// ```
    /// use fleshtower::Position;
    ///
    /// assert_eq!(Position::new(0, 0).chebyshev_distance(Position::new(3, -5)), 5);
    /// ```
    pub fn chebyshev_distance(self, other: Position) -> i32 {
        let d = self - other;
        d.x.abs().max(d.y.abs())
    }

    /// Straight-line distance; spell and caster ranges.
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let d = self - other;
        f64::from(d.x).hypot(f64::from(d.y))
    }

    /// The eight neighbours, in [`Direction::ALL`] order.
    pub fn adjacent_positions(self) -> Vec<Position> {
        Direction::ALL.iter().map(|d| self + d.to_delta()).collect()
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// The eight compass steps an actor can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Northeast,
        Direction::Northwest,
        Direction::Southeast,
        Direction::Southwest,
    ];

    /// ```
    /// use fleshtower::{Direction, Position};
    ///
    /// assert_eq!(Direction::Southwest.to_delta(), Position::new(-1, 1));
    /// ```
    pub fn to_delta(self) -> Position {
        let (x, y) = match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::Northeast => (1, -1),
            Direction::Northwest => (-1, -1),
            Direction::Southeast => (1, 1),
            Direction::Southwest => (-1, 1),
        };
        Position::new(x, y)
    }

    /// The direction of a one-tile step, `None` for anything else.
    pub fn from_delta(delta: Position) -> Option<Direction> {
        Self::ALL.into_iter().find(|d| d.to_delta() == delta)
    }

    pub fn all() -> Vec<Direction> {
        Self::ALL.to_vec()
    }
}

/// Unique identifier for game entities.
pub type EntityId = Uuid;

pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}
