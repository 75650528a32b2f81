//! Board module - manages the game grid
//!
//! The board is a square grid of tiles whose side length comes from the settings.
//! Uses a flat vector in row-major order for cache locality.
//! Coordinates: (r, c) where r is the row (top to bottom) and c the column
//! (left to right).

use crate::tile::{Tile, TileId};
use crate::types::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};

/// A cell position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub r: usize,
    pub c: usize,
}

impl Pos {
    pub const fn new(r: usize, c: usize) -> Self {
        Self { r, c }
    }
}

/// The game board - `size x size` tiles using flat storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    /// Flat vector of tiles, row-major order (r * size + c)
    cells: Vec<Tile>,
}

impl Board {
    /// Create a new empty board. The side length is clamped to the supported range.
    pub fn new(size: usize) -> Self {
        let size = size.clamp(MIN_BOARD_SIZE, MAX_BOARD_SIZE);
        Self {
            size,
            cells: vec![Tile::EMPTY; size * size],
        }
    }

    /// Calculate flat index from (r, c) coordinates
    #[inline(always)]
    fn index(&self, r: usize, c: usize) -> Option<usize> {
        if r >= self.size || c >= self.size {
            return None;
        }
        Some(r * self.size + c)
    }

    /// Side length of the board
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get tile at position (r, c). Returns None if out of bounds.
    pub fn get(&self, r: usize, c: usize) -> Option<&Tile> {
        self.index(r, c).map(|idx| &self.cells[idx])
    }

    pub fn get_mut(&mut self, r: usize, c: usize) -> Option<&mut Tile> {
        let idx = self.index(r, c)?;
        Some(&mut self.cells[idx])
    }

    pub fn at(&self, pos: Pos) -> Option<&Tile> {
        self.get(pos.r, pos.c)
    }

    /// Value at (r, c), 0 when out of bounds
    pub fn value(&self, r: usize, c: usize) -> u32 {
        self.get(r, c).map(|t| t.value).unwrap_or(0)
    }

    /// Set tile at position (r, c). Returns false if out of bounds.
    pub fn set(&mut self, r: usize, c: usize, tile: Tile) -> bool {
        match self.index(r, c) {
            Some(idx) => {
                self.cells[idx] = tile;
                true
            }
            None => false,
        }
    }

    /// Replace the cell with an empty tile, returning what was there
    pub fn take(&mut self, r: usize, c: usize) -> Option<Tile> {
        let idx = self.index(r, c)?;
        Some(std::mem::replace(&mut self.cells[idx], Tile::EMPTY))
    }

    /// Copy of row `r`
    pub fn row(&self, r: usize) -> &[Tile] {
        let start = r * self.size;
        &self.cells[start..start + self.size]
    }

    /// Overwrite row `r` with `tiles` (extra tiles ignored, missing cells emptied)
    pub fn set_row(&mut self, r: usize, tiles: &[Tile]) {
        if r >= self.size {
            return;
        }
        for c in 0..self.size {
            let tile = tiles.get(c).copied().unwrap_or(Tile::EMPTY);
            self.cells[r * self.size + c] = tile;
        }
    }

    /// Empty every cell in row `r`
    pub fn clear_row(&mut self, r: usize) -> bool {
        if r >= self.size {
            return false;
        }
        let start = r * self.size;
        for cell in &mut self.cells[start..start + self.size] {
            *cell = Tile::EMPTY;
        }
        true
    }

    /// Positions free for a spawn, in scan order (top-left to bottom-right)
    pub fn vacant_cells(&self) -> Vec<Pos> {
        self.positions().filter(|p| self.cells[p.r * self.size + p.c].is_vacant()).collect()
    }

    /// Some cell is empty for the game-over check (phased tiles count)
    pub fn has_open_cell(&self) -> bool {
        self.cells.iter().any(Tile::is_open)
    }

    /// Iterator over all positions in scan order
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.size).flat_map(move |r| (0..self.size).map(move |c| Pos::new(r, c)))
    }

    /// Iterator over `(position, tile)` in scan order
    pub fn iter(&self) -> impl Iterator<Item = (Pos, &Tile)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, t)| (Pos::new(i / self.size, i % self.size), t))
    }

    /// Highest tangible value on the board
    pub fn max_value(&self) -> u32 {
        self.cells.iter().map(|t| t.value).max().unwrap_or(0)
    }

    /// Number of cells holding a tangible tile
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|t| t.is_tangible()).count()
    }

    /// Position of the tile with the given id
    pub fn find(&self, id: TileId) -> Option<Pos> {
        self.iter().find(|(_, t)| t.id == Some(id)).map(|(p, _)| p)
    }

    /// True when any right or down neighbour pair shares a tangible value
    pub fn has_adjacent_match(&self) -> bool {
        for r in 0..self.size {
            for c in 0..self.size {
                let tile = &self.cells[r * self.size + c];
                if !tile.is_tangible() || tile.value == 0 {
                    continue;
                }
                if c + 1 < self.size {
                    let right = &self.cells[r * self.size + c + 1];
                    if right.is_tangible() && right.value == tile.value {
                        return true;
                    }
                }
                if r + 1 < self.size {
                    let down = &self.cells[(r + 1) * self.size + c];
                    if down.is_tangible() && down.value == tile.value {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Get a reference to the internal cells
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Tile::EMPTY;
        }
    }

    /// Values as a 2D grid (phased tiles read as 0)
    pub fn to_values(&self) -> Vec<Vec<u32>> {
        (0..self.size).map(|r| self.row(r).iter().map(|t| t.value).collect()).collect()
    }

    /// Build a board of normal tiles from a value grid, assigning ids in scan order
    /// starting at `first_id`. Returns the board and the next unused id.
    pub fn from_values(values: &[Vec<u32>], first_id: TileId) -> (Self, TileId) {
        let mut board = Board::new(values.len());
        let mut next_id = first_id;
        for (r, row) in values.iter().enumerate().take(board.size) {
            for (c, &v) in row.iter().enumerate().take(board.size) {
                if v != 0 {
                    board.set(r, c, Tile::new(next_id, v));
                    next_id += 1;
                }
            }
        }
        (board, next_id)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_BOARD_SIZE)
    }
}
