//! # Delve
//!
//! The turn-based simulation core of a dungeon-crawling roguelike.
//!
//! ## Architecture Overview
//!
//! Delve decides, one discrete turn at a time, what every actor may do. The
//! core architecture revolves around several key concepts:
//!
//! - **World State**: an explicit per-level context passed to every operation
//! - **Turn Scheduler**: speed-weighted ordering that locks while the player decides
//! - **Decision Engine**: one strategy per enemy species
//! - **Items**: instant pickups and inventory-held consumables
//! - **Population**: random, non-repeating placement onto the walkable cells
//!
//! Map generation, rendering and input-event wiring live outside this crate.
//! The core consumes a walkable-cell grid and reports narration and redraw
//! notifications as [`GameEvent`]s.

pub mod game;
pub mod generation;
pub mod input;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use utils::*;

/// Core error type for the Delve simulation.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// World state is invalid
    #[error("Invalid world state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Level population could not satisfy its target counts
    #[error("Population failed: {0}")]
    Population(String),

    /// A level layout could not be parsed
    #[error("Invalid layout: {0}")]
    Layout(String),
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation configuration constants.
pub mod config {
    /// Player starting (and maximum) health
    pub const PLAYER_MAX_HEALTH: u32 = 5;

    /// Damage the player deals per attack
    pub const PLAYER_STRENGTH: u32 = 1;

    /// Scheduler speed of an unmodified actor
    pub const BASE_SPEED: u32 = 100;

    /// Scheduler speed while hasted
    pub const HASTED_SPEED: u32 = 200;

    /// Numerator used to turn a speed into a turn duration
    pub const SCHEDULER_TIME_UNIT: u64 = 1_000_000;

    /// Inventory slots a new player starts with
    pub const INITIAL_INVENTORY_CAPACITY: usize = 6;

    /// Hard cap on inventory slots
    pub const MAX_INVENTORY_CAPACITY: usize = 9;

    /// Keys needed to open the level exit
    pub const KEYS_REQUIRED: u32 = 3;

    /// Chebyshev radius of a bomb blast around the player
    pub const BOMB_RADIUS: u32 = 3;

    /// Fixed damage a bomb deals to each actor in range
    pub const BOMB_DAMAGE: u32 = 3;

    /// Own-turn duration of the haste effect
    pub const HASTE_DURATION: u32 = 60;

    /// Own-turn duration of the invulnerability effect
    pub const INVULNERABILITY_DURATION: u32 = 30;

    /// Largest ring searched for a free summoning cell
    pub const SUMMON_SEARCH_RADIUS: i32 = 10;

    /// Cells around the player marked explored after each move
    pub const SIGHT_RADIUS: i32 = 4;
}
