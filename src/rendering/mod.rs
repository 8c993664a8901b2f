//! # Rendering Module
//!
//! Backend-agnostic view of the game: a [`RenderSnapshot`] holds everything a
//! front end needs to draw one frame, and can render itself as plain text.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;
