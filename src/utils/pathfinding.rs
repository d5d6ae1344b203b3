//! # Pathfinding
//!
//! Shortest paths over passable terrain.
//!
//! Movement is 4-connected with unit cost per step, so a breadth-first
//! search already yields shortest paths. Actors are ignored; callers check
//! occupancy before stepping.

use crate::{Level, Position};
use ::pathfinding::prelude::bfs;

/// Finds a shortest passable path from `start` to `goal`.
///
/// The returned path includes both endpoints. `None` means the goal is
/// unreachable (or impassable).
///
/// # Examples
///
/// ```
/// use delve::{find_path, Level, Position};
///
/// let level = Level::from_ascii(1, "#####\n#...#\n#####").unwrap();
/// let path = find_path(&level, Position::new(1, 1), Position::new(3, 1)).unwrap();
/// assert_eq!(path.len(), 3);
/// ```
pub fn find_path(level: &Level, start: Position, goal: Position) -> Option<Vec<Position>> {
    if !level.is_passable(goal) {
        return None;
    }
    bfs(
        &start,
        |pos| {
            pos.cardinal_adjacent_positions()
                .into_iter()
                .filter(|next| level.is_passable(*next))
                .collect::<Vec<_>>()
        },
        |pos| *pos == goal,
    )
}

/// Finds a shortest passable path from `start` to the nearest cell that
/// satisfies `is_goal`.
pub fn find_path_to<F>(level: &Level, start: Position, is_goal: F) -> Option<Vec<Position>>
where
    F: Fn(Position) -> bool,
{
    bfs(
        &start,
        |pos| {
            pos.cardinal_adjacent_positions()
                .into_iter()
                .filter(|next| level.is_passable(*next))
                .collect::<Vec<_>>()
        },
        |pos| is_goal(*pos),
    )
}
