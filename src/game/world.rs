//! # World Module
//!
//! The level map: a dense 2D tile grid plus the item layer.
//!
//! The grid answers terrain passability and exploration queries; cells
//! outside the grid are impassable. Each cell owns at most one item.

use crate::{DelveError, DelveResult, Item, Position};
use std::collections::HashMap;

/// Terrain of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileType {
    Wall,
    Floor,
}

impl TileType {
    /// Whether actors can stand on this terrain.
    pub fn is_passable(self) -> bool {
        matches!(self, TileType::Floor)
    }

    /// Display character for this terrain.
    pub fn glyph(self) -> char {
        match self {
            TileType::Wall => '#',
            TileType::Floor => '.',
        }
    }
}

/// A single map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub tile_type: TileType,
    /// Whether the player has seen this cell
    pub explored: bool,
}

impl Tile {
    /// Creates an unexplored tile of the given type.
    pub fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            explored: false,
        }
    }

    /// Creates an unexplored floor tile.
    pub fn floor() -> Self {
        Self::new(TileType::Floor)
    }

    /// Creates an unexplored wall tile.
    pub fn wall() -> Self {
        Self::new(TileType::Wall)
    }
}

/// One dungeon level: terrain grid and item layer.
#[derive(Debug, Clone)]
pub struct Level {
    /// Depth of this level, starting at 1
    pub depth: u32,
    pub width: u32,
    pub height: u32,
    /// Tiles indexed as `tiles[y][x]`
    pub tiles: Vec<Vec<Tile>>,
    items: HashMap<Position, Item>,
}

impl Level {
    /// Creates a level filled with walls.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Level, Position};
    ///
    /// let level = Level::new(1, 10, 8);
    /// assert!(!level.is_passable(Position::new(3, 3)));
    /// ```
    pub fn new(depth: u32, width: u32, height: u32) -> Self {
        Self {
            depth,
            width,
            height,
            tiles: vec![vec![Tile::wall(); width as usize]; height as usize],
            items: HashMap::new(),
        }
    }

    /// Parses a level from an ASCII layout.
    ///
    /// `.` is floor, `#` and spaces are wall. Blank leading and trailing
    /// lines are ignored; every remaining row must have the same width.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Level, Position};
    ///
    /// let level = Level::from_ascii(1, "####\n#..#\n####").unwrap();
    /// assert_eq!(level.width, 4);
    /// assert!(level.is_passable(Position::new(1, 1)));
    /// assert!(!level.is_passable(Position::new(0, 1)));
    /// ```
    pub fn from_ascii(depth: u32, layout: &str) -> DelveResult<Self> {
        let rows: Vec<&str> = layout
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .skip_while(|line| line.is_empty())
            .collect();
        let rows: Vec<&str> = match rows.iter().rposition(|line| !line.is_empty()) {
            Some(last) => rows[..=last].to_vec(),
            None => return Err(DelveError::Layout("layout is empty".to_string())),
        };

        let width = rows[0].chars().count();
        let mut level = Level::new(depth, width as u32, rows.len() as u32);

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(DelveError::Layout(format!(
                    "row {} has width {}, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            for (x, glyph) in row.chars().enumerate() {
                let tile = match glyph {
                    '.' => Tile::floor(),
                    '#' | ' ' => Tile::wall(),
                    other => {
                        return Err(DelveError::Layout(format!(
                            "unknown glyph '{}' at ({},{})",
                            other, x, y
                        )))
                    }
                };
                level.tiles[y][x] = tile;
            }
        }

        Ok(level)
    }

    /// Checks whether a position lies inside the grid.
    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Gets the tile at a position.
    pub fn get_tile(&self, pos: Position) -> Option<&Tile> {
        if !self.is_valid_position(pos) {
            return None;
        }
        self.tiles
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
    }

    /// Gets the tile at a position mutably.
    pub fn get_tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if !self.is_valid_position(pos) {
            return None;
        }
        self.tiles
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
    }

    /// Terrain passability. Positions outside the grid are impassable.
    pub fn is_passable(&self, pos: Position) -> bool {
        self.get_tile(pos)
            .map(|tile| tile.tile_type.is_passable())
            .unwrap_or(false)
    }

    /// All passable cells in row-major order.
    pub fn passable_cells(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                if tile.tile_type.is_passable() {
                    cells.push(Position::new(x as i32, y as i32));
                }
            }
        }
        cells
    }

    /// Whether the player has seen a cell.
    pub fn is_explored(&self, pos: Position) -> bool {
        self.get_tile(pos).map(|tile| tile.explored).unwrap_or(false)
    }

    /// Marks a cell explored. Returns true if it was not explored before.
    pub fn mark_explored(&mut self, pos: Position) -> bool {
        match self.get_tile_mut(pos) {
            Some(tile) if !tile.explored => {
                tile.explored = true;
                true
            }
            _ => false,
        }
    }

    /// Marks every passable, unexplored cell explored and returns those cells.
    pub fn reveal_all(&mut self) -> Vec<Position> {
        let mut revealed = Vec::new();
        for pos in self.passable_cells() {
            if self.mark_explored(pos) {
                revealed.push(pos);
            }
        }
        revealed
    }

    /// Gets the item lying on a cell.
    pub fn item_at(&self, pos: Position) -> Option<&Item> {
        self.items.get(&pos)
    }

    /// Puts an item on a passable, item-free cell.
    pub fn place_item(&mut self, pos: Position, mut item: Item) -> DelveResult<()> {
        if !self.is_passable(pos) {
            return Err(DelveError::InvalidState(format!(
                "Cannot place {} on impassable cell {}",
                item.name(),
                pos
            )));
        }
        if self.items.contains_key(&pos) {
            return Err(DelveError::InvalidState(format!(
                "Cell {} already holds an item",
                pos
            )));
        }
        item.position = Some(pos);
        self.items.insert(pos, item);
        Ok(())
    }

    /// Removes and returns the item on a cell.
    pub fn take_item(&mut self, pos: Position) -> Option<Item> {
        self.items.remove(&pos).map(|mut item| {
            item.position = None;
            item
        })
    }

    /// Iterates over every item on the map.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Number of items on the map.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
