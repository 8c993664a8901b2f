//! # Flesh Tower
//!
//! Simulation core of a turn-based, grid-based roguelike set inside a living
//! tower that the player climbs floor by floor.
//!
//! ## Architecture Overview
//!
//! The crate owns everything that decides *what happens* in a game and leaves
//! presentation to its callers:
//!
//! - **Game State**: [`GameState`] drives turns, enemy AI and field of view
//! - **Entity Model**: actors and items owned by exactly one container
//! - **Fighter Engine**: six attributes feeding derived combat stats
//! - **Action System**: every intent is a [`ConcreteAction`] that either
//!   succeeds and consumes a turn or fails with [`TowerError::Impossible`]
//! - **Generation System**: procedural floors, special rooms and spawn tables
//!
//! Rendering and input devices live outside the crate. They talk to it through
//! [`RenderSnapshot`] and [`PlayerInput`].

pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;

pub use generation::{
    GenerationConfig, Generator, ItemKind, MonsterKind, Room, RoomCorridorGenerator, RoomType,
};

/// Core error type for the Flesh Tower engine.
#[derive(thiserror::Error, Debug)]
pub enum TowerError {
    /// The requested action cannot be performed right now.
    ///
    /// The message is shown to the player verbatim and the turn is not consumed.
    #[error("{0}")]
    Impossible(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// An entity id did not resolve to a live entity
    #[error("Entity not found: {0}")]
    EntityNotFound(game::EntityId),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

impl TowerError {
    /// Shorthand for building the player-facing impossible signal.
    pub fn impossible(message: impl Into<String>) -> Self {
        TowerError::Impossible(message.into())
    }

    /// Whether this error is the recoverable "cannot do that" signal.
    pub fn is_impossible(&self) -> bool {
        matches!(self, TowerError::Impossible(_))
    }
}

/// Result type used throughout the Flesh Tower codebase.
pub type TowerResult<T> = Result<T, TowerError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default map width in tiles
    pub const DEFAULT_MAP_WIDTH: u32 = 80;

    /// Default map height in tiles
    pub const DEFAULT_MAP_HEIGHT: u32 = 45;

    /// Room placement attempts per floor
    pub const DEFAULT_MAX_ROOMS: u32 = 30;

    /// Smallest room edge, walls included
    pub const DEFAULT_ROOM_MIN_SIZE: u32 = 6;

    /// Largest room edge, walls included
    pub const DEFAULT_ROOM_MAX_SIZE: u32 = 10;

    /// Radius of the player's field of view
    pub const DEFAULT_FOV_RADIUS: i32 = 8;

    /// Percent chance that an eligible floor becomes a shop
    pub const DEFAULT_SHOP_CHANCE: u32 = 20;

    /// Percent chance that a dying actor drops one carried item
    pub const DEFAULT_DEATH_DROP_CHANCE: u32 = 50;

    /// Number of ring slots on every equipment set
    pub const RING_SLOTS: usize = 10;

    /// Player inventory capacity
    pub const PLAYER_INVENTORY_CAPACITY: usize = 26;

    /// Player spellbook capacity
    pub const PLAYER_SPELLBOOK_CAPACITY: usize = 10;

    /// Every this many floors the tower places a boss
    pub const BOSS_FLOOR_INTERVAL: u32 = 5;

    /// Accepted-room index that gets flagged as a boss room
    pub const BOSS_ROOM_INDEX: usize = 5;

    /// Hard ceiling on damage reduction percentage
    pub const MAX_DAMAGE_REDUCTION: i32 = 50;
}
