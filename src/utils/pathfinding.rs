//! # Pathfinding
//!
//! Weighted A* over a floor and Bresenham line drawing.
//!
//! Movement is 8-directional with diagonals costing the same as orthogonal
//! steps. Walkable tiles cost 1; a tile holding a blocking entity costs 10
//! more, so actors route around each other when a detour is short but still
//! queue up behind a blocker in a corridor.

use crate::game::entities::Entity;
use crate::game::world::GameMap;
use crate::game::Position;
use pathfinding::prelude::astar;

/// Extra cost for stepping onto a tile occupied by a blocking entity.
pub const BLOCKER_PENALTY: u32 = 10;

/// Per-tile movement costs of a floor. Zero means impassable.
#[derive(Debug, Clone)]
pub struct CostGrid {
    width: i32,
    height: i32,
    costs: Vec<u32>,
}

impl CostGrid {
    /// Builds the cost grid for the current contents of `map`.
    pub fn from_map(map: &GameMap) -> Self {
        let width = map.width as i32;
        let height = map.height as i32;
        let mut costs = Vec::with_capacity((width * height).max(0) as usize);
        for y in 0..height {
            for x in 0..width {
                costs.push(u32::from(map.is_walkable(Position::new(x, y))));
            }
        }
        let mut grid = Self {
            width,
            height,
            costs,
        };
        for entity in map.entities.iter().filter(|e| e.blocks_movement()) {
            if let Some(index) = grid.index(entity.position()) {
                if grid.costs[index] > 0 {
                    grid.costs[index] += BLOCKER_PENALTY;
                }
            }
        }
        grid
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    /// Cost of entering `pos`, or `None` when it cannot be entered.
    pub fn cost(&self, pos: Position) -> Option<u32> {
        self.index(pos)
            .map(|index| self.costs[index])
            .filter(|&cost| cost > 0)
    }

    fn successors(&self, pos: Position) -> Vec<(Position, u32)> {
        pos.adjacent_positions()
            .into_iter()
            .filter_map(|next| self.cost(next).map(|cost| (next, cost * 2)))
            .collect()
    }

    /// Shortest path from `start` to `goal`, excluding `start`.
    ///
    /// The goal itself may be occupied (that is usually the target being
    /// chased), but it must be walkable.
    pub fn path(&self, start: Position, goal: Position) -> Option<Vec<Position>> {
        self.cost(goal)?;
        let (mut path, _cost) = astar(
            &start,
            |&pos| self.successors(pos),
            |&pos| pos.chebyshev_distance(goal) as u32 * 2,
            |&pos| pos == goal,
        )?;
        path.remove(0);
        Some(path)
    }
}

/// Shortest walkable path on `map` from `start` to `goal`, excluding `start`.
///
/// # Examples
///
/// ```
/// use fleshtower::{GameMap, Position, Tile};
/// use fleshtower::utils::find_path;
///
/// let mut map = GameMap::new(5, 5, 1);
/// for x in 1..4 {
///     map.set_tile(Position::new(x, 2), Tile::floor()).unwrap();
/// }
/// let path = find_path(&map, Position::new(1, 2), Position::new(3, 2)).unwrap();
/// assert_eq!(path, vec![Position::new(2, 2), Position::new(3, 2)]);
/// ```
pub fn find_path(map: &GameMap, start: Position, goal: Position) -> Option<Vec<Position>> {
    CostGrid::from_map(map).path(start, goal)
}

/// All grid points on the line from `start` to `end`, both included.
pub fn bresenham_line(start: Position, end: Position) -> Vec<Position> {
    let dx = (end.x - start.x).abs();
    let dy = -(end.y - start.y).abs();
    let sx = if start.x < end.x { 1 } else { -1 };
    let sy = if start.y < end.y { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (start.x, start.y);
    let mut points = Vec::with_capacity((dx.max(-dy) + 1) as usize);

    loop {
        points.push(Position::new(x, y));
        if x == end.x && y == end.y {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            x += sx;
        }
        if doubled <= dx {
            err += dx;
            y += sy;
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::world::Tile;
    use crate::generation::factory::{spawn_monster, MonsterKind};

    fn open_map(width: u32, height: u32) -> GameMap {
        let mut map = GameMap::new(width, height, 1);
        for y in 1..height as i32 - 1 {
            for x in 1..width as i32 - 1 {
                map.set_tile(Position::new(x, y), Tile::floor()).unwrap();
            }
        }
        map
    }

    #[test]
    fn test_bresenham_endpoints() {
        let line = bresenham_line(Position::new(0, 0), Position::new(5, 2));
        assert_eq!(line.first(), Some(&Position::new(0, 0)));
        assert_eq!(line.last(), Some(&Position::new(5, 2)));
        assert_eq!(line.len(), 6);

        let single = bresenham_line(Position::new(3, 3), Position::new(3, 3));
        assert_eq!(single, vec![Position::new(3, 3)]);
    }

    #[test]
    fn test_bresenham_steps_are_adjacent() {
        let line = bresenham_line(Position::new(7, 1), Position::new(0, 9));
        for pair in line.windows(2) {
            assert_eq!(pair[0].chebyshev_distance(pair[1]), 1);
        }
    }

    #[test]
    fn test_diagonal_path_length() {
        let map = open_map(10, 10);
        let path = find_path(&map, Position::new(1, 1), Position::new(6, 6)).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.last(), Some(&Position::new(6, 6)));
    }

    #[test]
    fn test_no_path_through_walls() {
        let mut map = open_map(10, 10);
        for y in 0..10 {
            map.set_tile(Position::new(5, y), Tile::wall()).unwrap();
        }
        assert!(find_path(&map, Position::new(1, 1), Position::new(8, 8)).is_none());
    }

    #[test]
    fn test_path_routes_around_blocker() {
        let map_size = 7;
        let mut map = open_map(map_size, map_size);
        map.add_entity(spawn_monster(MonsterKind::Orc, Position::new(3, 3)));
        let path = find_path(&map, Position::new(1, 3), Position::new(5, 3)).unwrap();
        assert!(!path.contains(&Position::new(3, 3)));
        assert_eq!(path.len(), 4);
    }
}
