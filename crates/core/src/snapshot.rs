use crate::tile::Tile;
use crate::types::{Gravity, TileKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellSnapshot {
    /// Value shown to the player (phased tiles show their hidden value)
    pub value: u32,
    pub kind: TileKind,
    pub phased: bool,
    /// Moves left for an echo twin, if the tile belongs to a live pair
    pub echo_turns: Option<u8>,
}

impl From<Tile> for CellSnapshot {
    fn from(tile: Tile) -> Self {
        Self {
            value: tile.display_value(),
            kind: tile.kind(),
            phased: tile.is_phased(),
            echo_turns: None,
        }
    }
}

impl CellSnapshot {
    pub fn is_empty(&self) -> bool {
        self.value == 0 && self.kind == TileKind::Normal
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub size: usize,
    /// Row-major cells (`r * size + c`)
    pub cells: Vec<CellSnapshot>,
    pub score: u64,
    pub best_score: u64,
    pub crystals: u32,
    pub void_crystals: u32,
    pub highest_tile: u32,
    pub gravity: Gravity,
    /// Gravity will be re-rolled at the start of the next move
    pub gravity_unstable: bool,
    pub history_len: usize,
    pub queued_moves: usize,
    pub resolving: bool,
    pub game_over: bool,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.cells.clear();
        self.cells.resize(self.size * self.size, CellSnapshot::default());
        self.score = 0;
        self.best_score = 0;
        self.crystals = 0;
        self.void_crystals = 0;
        self.highest_tile = 0;
        self.gravity = Gravity::default();
        self.gravity_unstable = false;
        self.history_len = 0;
        self.queued_moves = 0;
        self.resolving = false;
        self.game_over = false;
    }

    pub fn cell(&self, r: usize, c: usize) -> CellSnapshot {
        if r >= self.size || c >= self.size {
            return CellSnapshot::default();
        }
        self.cells[r * self.size + c]
    }

    pub fn playable(&self) -> bool {
        !self.game_over
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            size: crate::types::DEFAULT_BOARD_SIZE,
            cells: Vec::new(),
            score: 0,
            best_score: 0,
            crystals: 0,
            void_crystals: 0,
            highest_tile: 0,
            gravity: Gravity::default(),
            gravity_unstable: false,
            history_len: 0,
            queued_moves: 0,
            resolving: false,
            game_over: false,
        };
        s.clear();
        s
    }
}
