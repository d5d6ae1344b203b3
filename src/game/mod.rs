//! # Game Module
//!
//! Core simulation state: actors, turn scheduling, combat, items and the map.
//!
//! This module contains the fundamental building blocks of the Delve core:
//! - The level map and its item layer
//! - Actors, species and player progress
//! - The speed-weighted turn scheduler and status effects
//! - Combat resolution and enemy decision logic
//! - The world context that ties them together for a single level

pub mod actions;
pub mod actors;
pub mod ai;
pub mod autoexplore;
pub mod combat;
pub mod effects;
pub mod events;
pub mod items;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod status;
pub mod world;

pub use actions::*;
pub use actors::*;
pub use ai::*;
pub use autoexplore::*;
pub use combat::*;
pub use effects::*;
pub use events::*;
pub use items::*;
pub use scheduler::*;
pub use session::*;
pub use state::*;
pub use status::*;
pub use world::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a 2D coordinate on the level grid.
///
/// # Examples
///
/// ```
/// use delve::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// let neighbours = pos.cardinal_adjacent_positions();
/// assert_eq!(neighbours.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Calculates the Chebyshev (king-move) distance to another position.
    ///
    /// Used for square blast areas and ring searches.
    pub fn chebyshev_distance(self, other: Position) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.y - other.y).unsigned_abs())
    }

    /// Returns the 4 cardinal adjacent positions in [`Direction::ALL`] order.
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        Direction::ALL.iter().map(|dir| self.step(*dir, 1)).collect()
    }

    /// Returns the position `distance` cells away in `direction`.
    pub fn step(self, direction: Direction, distance: i32) -> Position {
        let delta = direction.to_delta();
        Position::new(self.x + delta.x * distance, self.y + delta.y * distance)
    }

    /// Returns every position at exactly Chebyshev distance `radius`,
    /// scanned row by row from the top-left corner of the ring.
    pub fn ring(self, radius: i32) -> Vec<Position> {
        if radius <= 0 {
            return vec![self];
        }
        let mut cells = Vec::with_capacity((radius as usize) * 8);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx.abs() == radius || dy.abs() == radius {
                    cells.push(Position::new(self.x + dx, self.y + dy));
                }
            }
        }
        cells
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

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Orthogonal directions for movement.
///
/// Movement in the core is 4-connected; there are no diagonal steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions in the fixed evaluation order used for tie-breaking.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Converts a direction to a unit position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Direction, Position};
    ///
    /// let delta = Direction::Up.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::Up => Position::new(0, -1),
            Direction::Right => Position::new(1, 0),
            Direction::Down => Position::new(0, 1),
            Direction::Left => Position::new(-1, 0),
        }
    }

    /// Converts a unit position delta to a direction.
    ///
    /// Returns None if the delta isn't a single orthogonal step.
    pub fn from_delta(delta: Position) -> Option<Direction> {
        match (delta.x, delta.y) {
            (0, -1) => Some(Direction::Up),
            (1, 0) => Some(Direction::Right),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            _ => None,
        }
    }
}

/// Unique identifier for actors.
pub type ActorId = Uuid;

/// Creates a new unique actor ID.
pub fn new_actor_id() -> ActorId {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_manhattan_distance() {
        let pos1 = Position::new(0, 0);
        let pos2 = Position::new(3, 4);
        assert_eq!(pos1.manhattan_distance(pos2), 7);
        assert_eq!(pos2.manhattan_distance(pos1), 7);
    }

    #[test]
    fn test_position_chebyshev_distance() {
        let pos1 = Position::new(10, 10);
        assert_eq!(pos1.chebyshev_distance(Position::new(12, 10)), 2);
        assert_eq!(pos1.chebyshev_distance(Position::new(7, 13)), 3);
    }

    #[test]
    fn test_position_cardinal_adjacent_order() {
        let pos = Position::new(5, 5);
        let adjacent = pos.cardinal_adjacent_positions();
        assert_eq!(
            adjacent,
            vec![
                Position::new(5, 4),
                Position::new(6, 5),
                Position::new(5, 6),
                Position::new(4, 5),
            ]
        );
    }

    #[test]
    fn test_position_step() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.step(Direction::Right, 2), Position::new(7, 5));
        assert_eq!(pos.step(Direction::Up, 1), Position::new(5, 4));
    }

    #[test]
    fn test_ring_sizes() {
        let pos = Position::new(0, 0);
        assert_eq!(pos.ring(0), vec![pos]);
        assert_eq!(pos.ring(1).len(), 8);
        assert_eq!(pos.ring(2).len(), 16);
        assert!(pos.ring(3).iter().all(|p| pos.chebyshev_distance(*p) == 3));
    }

    #[test]
    fn test_position_arithmetic() {
        let pos1 = Position::new(5, 10);
        let pos2 = Position::new(3, 2);
        assert_eq!(pos1 + pos2, Position::new(8, 12));
        assert_eq!(pos1 - pos2, Position::new(2, 8));
    }

    #[test]
    fn test_direction_round_trip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_delta(dir.to_delta()), Some(dir));
        }
        assert_eq!(Direction::from_delta(Position::new(1, 1)), None);
    }

    #[test]
    fn test_actor_id_uniqueness() {
        assert_ne!(new_actor_id(), new_actor_id());
    }
}
