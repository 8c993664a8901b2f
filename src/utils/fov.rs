//! # Field of View
//!
//! Ray casting from the viewer to every tile in a square around it. A tile is
//! visible when it lies within the radius and every tile strictly between the
//! viewer and it is transparent; walls therefore light up but hide what is
//! behind them.

use crate::game::world::GameMap;
use crate::game::Position;
use crate::utils::pathfinding::bresenham_line;

/// Computes the visibility grid (row-major, map-sized) seen from `origin`.
pub fn compute_fov(map: &GameMap, origin: Position, radius: i32) -> Vec<bool> {
    let width = map.width as i32;
    let mut visible = vec![false; (map.width * map.height) as usize];
    if !map.in_bounds(origin) {
        return visible;
    }
    let radius = radius.max(0);
    let radius_squared = radius * radius;

    for y in (origin.y - radius).max(0)..=(origin.y + radius).min(map.height as i32 - 1) {
        for x in (origin.x - radius).max(0)..=(origin.x + radius).min(width - 1) {
            let (dx, dy) = (x - origin.x, y - origin.y);
            if dx * dx + dy * dy > radius_squared {
                continue;
            }
            let target = Position::new(x, y);
            let line = bresenham_line(origin, target);
            let clear = line
                .iter()
                .skip(1)
                .take(line.len().saturating_sub(2))
                .all(|&pos| map.is_transparent(pos));
            if clear {
                visible[(y * width + x) as usize] = true;
            }
        }
    }
    visible
}
