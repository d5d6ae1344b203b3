//! # Generation Module
//!
//! Level population: seeding a level's actors and items onto its free cells.
//!
//! Map layout itself comes from a [`LevelSource`]. Population draws cells
//! from a [`FreeCellPool`] without replacement and places the player first,
//! then enemies in species order, then items in category order.

pub mod layouts;

pub use layouts::*;

use crate::{
    Actor, DelveError, DelveResult, Item, ItemKind, PlayerState, Position, Species, WorldState,
};
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Target counts for one level's population.
///
/// Counts missing from the maps are zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Enemies to place, per species
    pub enemies: BTreeMap<Species, usize>,
    /// Items to place, per kind
    pub items: BTreeMap<ItemKind, usize>,
}

impl PopulationConfig {
    /// Creates an empty configuration.
    pub fn empty() -> Self {
        Self {
            enemies: BTreeMap::new(),
            items: BTreeMap::new(),
        }
    }

    /// The standard mix for a dungeon depth.
    ///
    /// Shallow levels hold only the docile species; the mad variants join
    /// from depth 2 and the assassin from depth 3.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{ItemKind, PopulationConfig, Species};
    ///
    /// let config = PopulationConfig::for_depth(1);
    /// assert_eq!(config.item_count(ItemKind::Key), 3);
    /// assert_eq!(config.item_count(ItemKind::Exit), 1);
    /// assert_eq!(config.enemy_count(Species::Assassin), 0);
    /// ```
    pub fn for_depth(depth: u32) -> Self {
        let depth = depth.max(1) as usize;
        let mut enemies = BTreeMap::new();
        enemies.insert(Species::Snail, 2);
        enemies.insert(Species::Frog, 1 + depth / 2);
        enemies.insert(Species::Rat, 2 + depth / 2);
        if depth >= 2 {
            enemies.insert(Species::MadFrog, depth - 1);
            enemies.insert(Species::MadRat, depth - 1);
        }
        if depth >= 3 {
            enemies.insert(Species::Assassin, (depth - 1) / 2);
        }

        let mut items = BTreeMap::new();
        items.insert(ItemKind::Exit, 1);
        items.insert(ItemKind::Key, crate::config::KEYS_REQUIRED as usize);
        items.insert(ItemKind::Coin, 4 + depth);
        items.insert(ItemKind::Heart, 2);
        items.insert(ItemKind::Belt, 1);
        items.insert(ItemKind::HealthPotion, 1);
        items.insert(ItemKind::Bomb, 1);
        items.insert(ItemKind::InvulnerabilityPotion, 1);
        items.insert(ItemKind::SpeedPotion, 1);
        items.insert(ItemKind::SummonScroll, 1);
        items.insert(ItemKind::MapScroll, 1);

        Self { enemies, items }
    }

    /// Creates a small configuration for tests.
    pub fn for_testing() -> Self {
        let mut config = Self::empty();
        config.enemies.insert(Species::Snail, 1);
        config.enemies.insert(Species::Rat, 1);
        config.items.insert(ItemKind::Exit, 1);
        config.items.insert(ItemKind::Key, 3);
        config.items.insert(ItemKind::Coin, 2);
        config
    }

    pub fn enemy_count(&self, species: Species) -> usize {
        self.enemies.get(&species).copied().unwrap_or(0)
    }

    pub fn item_count(&self, kind: ItemKind) -> usize {
        self.items.get(&kind).copied().unwrap_or(0)
    }

    /// Cells a population pass consumes, the player included.
    pub fn total_placements(&self) -> usize {
        1 + self.enemies.values().sum::<usize>() + self.items.values().sum::<usize>()
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self::for_depth(1)
    }
}

/// Cells not yet assigned to any actor or item.
///
/// A drawn cell leaves the pool immediately, so one pass never yields the
/// same cell twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeCellPool {
    cells: Vec<Position>,
}

impl FreeCellPool {
    pub fn new(cells: Vec<Position>) -> Self {
        Self { cells }
    }

    /// The world's currently free cells.
    pub fn from_world(world: &WorldState) -> Self {
        Self::new(world.free_cells())
    }

    /// Removes and returns a uniformly random cell.
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Option<Position> {
        if self.cells.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.cells.len());
        Some(self.cells.swap_remove(index))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }
}

/// Seeds a fresh world with the player, enemies and items.
///
/// Counts are checked up front: asking for more placements than free cells
/// is a configuration error and nothing is placed. Returns the cells that
/// remain free.
pub fn populate_level(
    world: &mut WorldState,
    mut player: Actor,
    player_state: PlayerState,
    config: &PopulationConfig,
) -> DelveResult<FreeCellPool> {
    let mut pool = FreeCellPool::from_world(world);
    let needed = config.total_placements();
    if needed > pool.len() {
        return Err(DelveError::Population(format!(
            "{} placements requested but only {} free cells on depth {}",
            needed,
            pool.len(),
            world.level.depth
        )));
    }

    player.position = draw_cell(world, &mut pool)?;
    world.spawn_player(player, player_state)?;

    for species in Species::ENEMIES {
        for _ in 0..config.enemy_count(species) {
            let cell = draw_cell(world, &mut pool)?;
            world.spawn_actor(species, cell)?;
        }
    }

    for kind in ItemKind::ALL {
        for _ in 0..config.item_count(kind) {
            let cell = draw_cell(world, &mut pool)?;
            world.place_item(cell, Item::new(kind))?;
        }
    }

    info!(
        "populated depth {}: {} actors, {} items, {} cells left",
        world.level.depth,
        world.actor_count(),
        world.level.item_count(),
        pool.len()
    );
    Ok(pool)
}

fn draw_cell(world: &mut WorldState, pool: &mut FreeCellPool) -> DelveResult<Position> {
    let cell = pool
        .draw(world.rng_mut())
        .ok_or_else(|| DelveError::Population("free cell pool exhausted".to_string()))?;
    debug!("drew cell {}", cell);
    Ok(cell)
}
