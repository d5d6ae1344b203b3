//! Level layouts.
//!
//! The core does not generate maps. A [`LevelSource`] hands it a walkable
//! grid per depth; [`AsciiLayouts`] is the built-in source used by the
//! driver and tests, cycling through a few hand-drawn connected levels.

use crate::{DelveError, DelveResult, Level, PopulationConfig};

/// Supplies the map for each depth.
pub trait LevelSource {
    /// Builds the level for a depth (1-based).
    fn level(&mut self, depth: u32) -> DelveResult<Level>;

    /// Target counts for the depth.
    fn population(&self, depth: u32) -> PopulationConfig {
        PopulationConfig::for_depth(depth)
    }
}

const HALLS: &str = "
##############################
#........#.........#.........#
#........#.........#.........#
#........#.........#.........#
#...................#........#
#........#.........#.........#
#####.#######.###########.####
#........#.........#.........#
#........#.........#.........#
#............................#
#........#.........#.........#
#........#.........#.........#
##############################
";

const PILLARS: &str = "
##############################
#............######..........#
#............######..........#
#...####.....######....###...#
#...####.....................#
#...####.....######....###...#
#............######..........#
######.#############.#########
#..........#.................#
#..........#......#####......#
#............................#
#..........#......#####......#
##############################
";

const CLOISTER: &str = "
##############################
#.....#..............#.......#
#.....#..............#.......#
#.....#....######....#.......#
#..........######............#
#.....#....######....#.......#
###.###..............###.#####
#.....#..............#.......#
#.....######....######.......#
#............................#
#.....######....######.......#
#.....#..............#.......#
##############################
";

/// Hand-drawn layouts, one per depth, repeating once exhausted.
#[derive(Debug, Clone)]
pub struct AsciiLayouts {
    layouts: Vec<String>,
    population: Option<PopulationConfig>,
}

impl AsciiLayouts {
    /// Uses the given layouts. At least one is required.
    pub fn new(layouts: Vec<String>) -> DelveResult<Self> {
        if layouts.is_empty() {
            return Err(DelveError::Layout("no layouts given".to_string()));
        }
        Ok(Self {
            layouts,
            population: None,
        })
    }

    /// The built-in set.
    pub fn builtin() -> Self {
        Self {
            layouts: [HALLS, PILLARS, CLOISTER]
                .iter()
                .map(|layout| layout.to_string())
                .collect(),
            population: None,
        }
    }

    /// Uses one fixed population for every depth.
    pub fn with_population(mut self, population: PopulationConfig) -> Self {
        self.population = Some(population);
        self
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

impl Default for AsciiLayouts {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelSource for AsciiLayouts {
    fn level(&mut self, depth: u32) -> DelveResult<Level> {
        let index = (depth.max(1) as usize - 1) % self.layouts.len();
        Level::from_ascii(depth, &self.layouts[index])
    }

    fn population(&self, depth: u32) -> PopulationConfig {
        self.population
            .clone()
            .unwrap_or_else(|| PopulationConfig::for_depth(depth))
    }
}
