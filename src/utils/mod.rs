//! # Utilities Module
//!
//! Grid search helpers shared by the decision engine and the driver.

pub mod pathfinding;

pub use self::pathfinding::*;
