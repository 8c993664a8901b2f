//! # Display Management
//!
//! Captures a drawable frame from the game state. Tiles in view use their
//! light glyph, remembered tiles their dark glyph, and everything else is
//! shroud. Only entities standing in view are included, in draw order.

use crate::game::entities::{Entity, RenderOrder};
use crate::game::messages::Message;
use crate::game::state::GameState;
use crate::game::world::{Color, Glyph, TileType, SHROUD};
use crate::game::Position;
use crate::rendering::ui::{Hud, VISIBLE_MESSAGES};
use crate::{TowerError, TowerResult};
use serde::{Deserialize, Serialize};

/// An entity as drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySprite {
    pub position: Position,
    pub glyph: char,
    pub color: Color,
    pub name: String,
    pub render_order: RenderOrder,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub width: u32,
    pub height: u32,
    /// Row-major glyph per cell
    pub tiles: Vec<Glyph>,
    /// Terrain per cell, `None` where the player has never looked
    pub terrain: Vec<Option<TileType>>,
    pub visible: Vec<bool>,
    pub explored: Vec<bool>,
    /// Visible entities, lowest render order first
    pub entities: Vec<EntitySprite>,
    pub hud: Hud,
    pub messages: Vec<Message>,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> TowerResult<Self> {
        let map = &state.map;
        let cells = (map.width * map.height) as usize;
        let mut tiles = Vec::with_capacity(cells);
        let mut terrain = Vec::with_capacity(cells);

        for y in 0..map.height as i32 {
            for x in 0..map.width as i32 {
                let pos = Position::new(x, y);
                let tile = map.tile(pos).ok_or_else(|| {
                    TowerError::InvalidState(format!("Tile {:?} missing from map", pos))
                })?;
                if map.is_visible(pos) {
                    tiles.push(tile.light);
                    terrain.push(Some(tile.tile_type));
                } else if map.is_explored(pos) {
                    tiles.push(tile.dark);
                    terrain.push(Some(tile.tile_type));
                } else {
                    tiles.push(SHROUD);
                    terrain.push(None);
                }
            }
        }

        let mut entities: Vec<EntitySprite> = map
            .entities
            .iter()
            .filter(|entity| map.is_visible(entity.position()))
            .map(|entity| {
                let data = entity.data();
                EntitySprite {
                    position: data.position,
                    glyph: data.glyph,
                    color: data.color,
                    name: data.name.clone(),
                    render_order: data.render_order,
                }
            })
            .collect();
        entities.sort_by_key(|sprite| sprite.render_order);

        let hud = Hud::for_player(state.player()?, state.current_floor, state.turn_number);

        Ok(Self {
            width: map.width,
            height: map.height,
            tiles,
            terrain,
            visible: map.visible_grid().to_vec(),
            explored: map.explored_grid().to_vec(),
            entities,
            hud,
            messages: state.message_log.recent(VISIBLE_MESSAGES).to_vec(),
        })
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width as i32 || pos.y >= self.height as i32 {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    pub fn glyph_at(&self, pos: Position) -> Option<Glyph> {
        self.index(pos).map(|i| self.tiles[i])
    }

    /// The character drawn at a cell: the topmost entity, else the terrain.
    pub fn char_at(&self, pos: Position) -> char {
        if let Some(sprite) = self.entities.iter().rev().find(|s| s.position == pos) {
            return sprite.glyph;
        }
        match self.index(pos).and_then(|i| self.terrain[i]) {
            Some(TileType::Wall) => '#',
            Some(TileType::Floor) => '.',
            Some(TileType::StairsUp) => '<',
            None => ' ',
        }
    }

    /// The map as text, one line per row.
    pub fn map_text(&self) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height as i32 {
            let row: String = (0..self.width as i32)
                .map(|x| self.char_at(Position::new(x, y)))
                .collect();
            out.push_str(row.trim_end());
            out.push('\n');
        }
        out
    }

    /// Map, status panel and messages as a plain text frame.
    pub fn to_text(&self) -> String {
        let mut out = self.map_text();
        for line in self.hud.lines() {
            out.push_str(&line);
            out.push('\n');
        }
        for message in &self.messages {
            out.push_str(&message.full_text());
            out.push('\n');
        }
        out
    }
}
