//! # Utilities Module
//!
//! Grid algorithms shared by the AI and the turn engine: line drawing,
//! weighted pathfinding and field of view.

pub mod fov;
pub mod pathfinding;

pub use fov::*;
pub use pathfinding::*;
