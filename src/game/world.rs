//! # World Module
//!
//! Tile definitions and the [`GameMap`] that owns one floor of the tower.

use crate::game::entities::{Actor, ConcreteEntity, Entity, Item};
use crate::game::{EntityId, Position};
use crate::generation::Room;
use crate::{TowerError, TowerResult};
use serde::{Deserialize, Serialize};

/// RGB color triple.
pub type Color = (u8, u8, u8);

/// A single drawable cell: character plus foreground and background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyph {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Glyph {
    pub const fn new(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }
}

/// Glyph for cells the player has never seen.
pub const SHROUD: Glyph = Glyph::new(' ', (255, 255, 255), (0, 0, 0));

/// Kinds of terrain a floor is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Wall,
    Floor,
    StairsUp,
}

/// One cell of terrain.
///
/// Walkability and transparency are independent; tiles never change after
/// the generator is done with a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub tile_type: TileType,
    pub walkable: bool,
    pub transparent: bool,
    /// Drawn when explored but out of view
    pub dark: Glyph,
    /// Drawn when in view
    pub light: Glyph,
}

impl Tile {
    /// Creates the canonical tile for a terrain type.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleshtower::{Tile, TileType};
    ///
    /// let wall = Tile::new(TileType::Wall);
    /// assert!(!wall.walkable);
    /// assert!(!wall.transparent);
    /// assert!(Tile::floor().walkable);
    /// ```
    pub fn new(tile_type: TileType) -> Self {
        match tile_type {
            TileType::Wall => Self {
                tile_type,
                walkable: false,
                transparent: false,
                dark: Glyph::new(' ', (255, 255, 255), (60, 10, 20)),
                light: Glyph::new(' ', (255, 255, 255), (140, 40, 50)),
            },
            TileType::Floor => Self {
                tile_type,
                walkable: true,
                transparent: true,
                dark: Glyph::new(' ', (255, 255, 255), (40, 20, 30)),
                light: Glyph::new(' ', (255, 255, 255), (190, 120, 110)),
            },
            TileType::StairsUp => Self {
                tile_type,
                walkable: true,
                transparent: true,
                dark: Glyph::new('<', (90, 40, 60), (40, 20, 30)),
                light: Glyph::new('<', (255, 255, 255), (190, 120, 110)),
            },
        }
    }

    pub fn wall() -> Self {
        Self::new(TileType::Wall)
    }

    pub fn floor() -> Self {
        Self::new(TileType::Floor)
    }

    pub fn stairs_up() -> Self {
        Self::new(TileType::StairsUp)
    }
}

/// One floor of the tower: terrain, visibility and every entity on it.
///
/// Entities are stored in insertion order, which is also the order enemy
/// turns run in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMap {
    pub width: u32,
    pub height: u32,
    /// Floor number this map was generated for
    pub floor: u32,
    tiles: Vec<Tile>,
    visible: Vec<bool>,
    explored: Vec<bool>,
    /// Every entity currently on the floor, the player included
    pub entities: Vec<ConcreteEntity>,
    /// Where the player arrives
    pub player_start: Position,
    /// Location of the stairs to the next floor
    pub upstairs: Option<Position>,
    /// Rooms accepted by the generator
    pub rooms: Vec<Room>,
    /// Set once a vendor has been placed on this floor
    pub vendor_spawned: bool,
}

impl GameMap {
    /// Creates a map of solid wall.
    pub fn new(width: u32, height: u32, floor: u32) -> Self {
        let cells = (width * height) as usize;
        Self {
            width,
            height,
            floor,
            tiles: vec![Tile::wall(); cells],
            visible: vec![false; cells],
            explored: vec![false; cells],
            entities: Vec::new(),
            player_start: Position::origin(),
            upstairs: None,
            rooms: Vec::new(),
            vendor_spawned: false,
        }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Returns true if the position lies inside the map.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).map(|i| &self.tiles[i])
    }

    /// Replaces the tile at a position. Only generators should call this.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) -> TowerResult<()> {
        let index = self.index(pos).ok_or_else(|| {
            TowerError::InvalidState(format!("Tile position {:?} out of bounds", pos))
        })?;
        self.tiles[index] = tile;
        Ok(())
    }

    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile(pos).map_or(false, |tile| tile.walkable)
    }

    pub fn is_transparent(&self, pos: Position) -> bool {
        self.tile(pos).map_or(false, |tile| tile.transparent)
    }

    pub fn is_visible(&self, pos: Position) -> bool {
        self.index(pos).map_or(false, |i| self.visible[i])
    }

    pub fn is_explored(&self, pos: Position) -> bool {
        self.index(pos).map_or(false, |i| self.explored[i])
    }

    pub fn visible_grid(&self) -> &[bool] {
        &self.visible
    }

    pub fn explored_grid(&self) -> &[bool] {
        &self.explored
    }

    /// Installs a freshly computed visibility grid and folds it into the
    /// explored grid.
    pub fn set_visibility(&mut self, visible: Vec<bool>) -> TowerResult<()> {
        if visible.len() != self.visible.len() {
            return Err(TowerError::InvalidState(format!(
                "Visibility grid has {} cells, map has {}",
                visible.len(),
                self.visible.len()
            )));
        }
        for (explored, &seen) in self.explored.iter_mut().zip(visible.iter()) {
            *explored |= seen;
        }
        self.visible = visible;
        Ok(())
    }

    /// Number of walkable tiles on the floor.
    pub fn walkable_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.walkable).count()
    }

    pub fn add_entity(&mut self, entity: impl Into<ConcreteEntity>) {
        self.entities.push(entity.into());
    }

    /// Removes an entity from the floor, handing ownership to the caller.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<ConcreteEntity> {
        let index = self.entities.iter().position(|e| e.id() == id)?;
        Some(self.entities.remove(index))
    }

    /// Removes an actor from the floor, failing if the id is not an actor.
    pub fn remove_actor(&mut self, id: EntityId) -> TowerResult<Actor> {
        match self.remove_entity(id) {
            Some(ConcreteEntity::Actor(actor)) => Ok(*actor),
            Some(other) => {
                self.entities.push(other);
                Err(TowerError::InvalidState(format!("Entity {} is not an actor", id)))
            }
            None => Err(TowerError::EntityNotFound(id)),
        }
    }

    pub fn entity(&self, id: EntityId) -> Option<&ConcreteEntity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn actor(&self, id: EntityId) -> Option<&Actor> {
        self.entity(id).and_then(ConcreteEntity::as_actor)
    }

    pub fn actor_mut(&mut self, id: EntityId) -> Option<&mut Actor> {
        self.entities
            .iter_mut()
            .find(|e| e.id() == id)
            .and_then(ConcreteEntity::as_actor_mut)
    }

    pub fn item(&self, id: EntityId) -> Option<&Item> {
        self.entity(id).and_then(ConcreteEntity::as_item)
    }

    /// All actors on the floor, corpses included.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.entities.iter().filter_map(ConcreteEntity::as_actor)
    }

    /// Actors that still have an AI.
    pub fn living_actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors().filter(|actor| actor.is_alive())
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.entities.iter().filter_map(ConcreteEntity::as_item)
    }

    pub fn entities_at(&self, pos: Position) -> impl Iterator<Item = &ConcreteEntity> {
        self.entities.iter().filter(move |e| e.position() == pos)
    }

    /// The movement-blocking entity standing on a tile, if any.
    pub fn blocking_entity_at(&self, pos: Position) -> Option<&ConcreteEntity> {
        self.entities_at(pos).find(|e| e.blocks_movement())
    }

    pub fn living_actor_at(&self, pos: Position) -> Option<&Actor> {
        self.living_actors().find(|actor| actor.position() == pos)
    }

    pub fn item_at(&self, pos: Position) -> Option<&Item> {
        self.items().find(|item| item.position() == pos)
    }

    /// Returns true if any entity at all occupies the tile.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.entities_at(pos).next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::factory::{spawn_item, spawn_monster, ItemKind, MonsterKind};

    #[test]
    fn test_tile_flags() {
        assert!(!Tile::wall().walkable);
        assert!(Tile::floor().transparent);
        assert_eq!(Tile::stairs_up().light.ch, '<');
        assert!(Tile::stairs_up().walkable);
    }

    #[test]
    fn test_map_bounds_and_tiles() {
        let mut map = GameMap::new(10, 8, 1);
        assert!(map.in_bounds(Position::new(9, 7)));
        assert!(!map.in_bounds(Position::new(10, 7)));
        assert!(!map.in_bounds(Position::new(-1, 0)));
        assert!(!map.is_walkable(Position::new(3, 3)));

        map.set_tile(Position::new(3, 3), Tile::floor()).unwrap();
        assert!(map.is_walkable(Position::new(3, 3)));
        assert!(map.set_tile(Position::new(30, 3), Tile::floor()).is_err());
        assert_eq!(map.walkable_count(), 1);
    }

    #[test]
    fn test_visibility_accumulates_into_explored() {
        let mut map = GameMap::new(4, 4, 1);
        let mut visible = vec![false; 16];
        visible[5] = true;
        map.set_visibility(visible).unwrap();
        assert!(map.is_visible(Position::new(1, 1)));
        assert!(map.is_explored(Position::new(1, 1)));

        map.set_visibility(vec![false; 16]).unwrap();
        assert!(!map.is_visible(Position::new(1, 1)));
        assert!(map.is_explored(Position::new(1, 1)));

        assert!(map.set_visibility(vec![false; 3]).is_err());
    }

    #[test]
    fn test_entity_lookup_and_removal() {
        let mut map = GameMap::new(10, 10, 1);
        let orc = spawn_monster(MonsterKind::Orc, Position::new(2, 2));
        let potion = spawn_item(ItemKind::HealthPotion, Position::new(2, 2));
        let orc_id = orc.id();
        let potion_id = potion.id();
        map.add_entity(orc);
        map.add_entity(potion);

        assert_eq!(map.entities_at(Position::new(2, 2)).count(), 2);
        assert_eq!(map.blocking_entity_at(Position::new(2, 2)).map(|e| e.id()), Some(orc_id));
        assert_eq!(map.item_at(Position::new(2, 2)).map(|i| i.id()), Some(potion_id));

        assert!(map.remove_actor(potion_id).is_err());
        assert!(map.item(potion_id).is_some());

        let orc = map.remove_actor(orc_id).unwrap();
        assert_eq!(orc.name(), "Orc");
        assert!(map.actor(orc_id).is_none());
        assert!(matches!(
            map.remove_actor(orc_id),
            Err(TowerError::EntityNotFound(_))
        ));
    }
}
