//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, input mapping).
//!
//! # Board Dimensions
//!
//! The board is square. Its side length comes from the settings and is clamped
//! to [`MIN_BOARD_SIZE`]..=[`MAX_BOARD_SIZE`]. The default is a 6x6 grid.
//!
//! # Tuning Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `ECHO_LIFETIME_TURNS` | 4 | Moves an echo pair survives unmerged |
//! | `ECHO_TIMEOUT_PENALTY` | 10 | Score lost when an echo pair expires |
//! | `PHASE_CYCLE_MIN`..`MAX` | 3..=5 | Moves between phase toggles |
//! | `SPAWN_OFFSET_MIN`..`MAX` | 3..=5 | Exponents below the max tile for spawns |
//!
//! # Examples
//!
//! ```
//! use quantum2048_types::{tiles_per_step, Direction, Gravity};
//!
//! // Gravity remaps the requested direction
//! assert_eq!(Gravity::East.remap(Direction::Up), Direction::Right);
//! assert_eq!(Gravity::South.remap(Direction::Up), Direction::Up);
//!
//! // Larger boards spawn more tiles per move
//! assert_eq!(tiles_per_step(6), 2);
//! assert_eq!(tiles_per_step(4), 1);
//! ```

/// Default board side length (6x6)
pub const DEFAULT_BOARD_SIZE: usize = 6;

/// Smallest playable board side length
pub const MIN_BOARD_SIZE: usize = 3;

/// Largest supported board side length
pub const MAX_BOARD_SIZE: usize = 12;

/// Upper bound on merges in a single row pass (every merge consumes two cells)
pub const MAX_ROW_MERGES: usize = MAX_BOARD_SIZE / 2;

/// Default time-rewind crystals at game start
pub const DEFAULT_STARTING_CRYSTALS: u32 = 3;

/// Default number of tiles placed by a new game
pub const DEFAULT_STARTING_TILES: usize = 2;

/// Default probability of a quantum jump per eligible diagonal pair
pub const DEFAULT_QUANTUM_BONUS_CHANCE: f64 = 0.1;

/// Default depth of the rewind history
pub const DEFAULT_MAX_MOVE_HISTORY: usize = 3;

/// Upper bound accepted for the rewind history depth
pub const MAX_MOVE_HISTORY_LIMIT: usize = 50;

/// Default spawn chance of each special tile type
pub const DEFAULT_SPECIAL_SPAWN_CHANCE: f64 = 0.05;

/// Moves an echo pair survives without either twin merging
pub const ECHO_LIFETIME_TURNS: u8 = 4;

/// Score penalty when an echo pair times out (score is floored at zero)
pub const ECHO_TIMEOUT_PENALTY: u64 = 10;

/// Shortest phase-shift cycle (moves)
pub const PHASE_CYCLE_MIN: u8 = 3;

/// Longest phase-shift cycle (moves)
pub const PHASE_CYCLE_MAX: u8 = 5;

/// Smallest exponent offset below the max tile for spawned values
pub const SPAWN_OFFSET_MIN: u32 = 3;

/// Largest exponent offset below the max tile for spawned values
pub const SPAWN_OFFSET_MAX: u32 = 5;

/// Tile milestones and the time crystals they grant, once per game
pub const ACHIEVEMENTS: [(u32, u32); 3] = [(32, 1), (128, 2), (512, 3)];

/// Number of tiles spawned after every successful move.
///
/// `max(1, floor(board_size / 2) - 1)`
pub fn tiles_per_step(board_size: usize) -> usize {
    (board_size / 2).saturating_sub(1).max(1)
}

/// Crystals granted at game start for a given board size.
///
/// Larger boards grant `floor(board_size / 2) - 1` when that beats the setting.
pub fn starting_crystals_for(board_size: usize, configured: u32) -> u32 {
    let scaled = (board_size / 2).saturating_sub(1) as u32;
    configured.max(scaled)
}

/// Requested slide direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All four directions
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// Quarter turn clockwise (up -> right -> down -> left)
    pub fn rotate_cw(&self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Quarter turn counter-clockwise
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    /// Unit step `(dr, dc)` for this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
        }
    }
}

/// Board orientation that remaps input directions.
///
/// `South` is the resting orientation and leaves input untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gravity {
    North,
    East,
    #[default]
    South,
    West,
}

impl Gravity {
    /// All gravities in draw order for randomization
    pub const ALL: [Gravity; 4] = [Gravity::North, Gravity::East, Gravity::South, Gravity::West];

    /// Map a requested direction to the direction tiles actually slide.
    ///
    /// The vertical gravities leave input untouched.
    pub fn remap(&self, direction: Direction) -> Direction {
        match self {
            Gravity::North | Gravity::South => direction,
            Gravity::East => direction.rotate_cw(),
            Gravity::West => direction.rotate_ccw(),
        }
    }

    /// Next gravity clockwise
    pub fn rotate_cw(&self) -> Self {
        match self {
            Gravity::North => Gravity::East,
            Gravity::East => Gravity::South,
            Gravity::South => Gravity::West,
            Gravity::West => Gravity::North,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Gravity::North => "north",
            Gravity::East => "east",
            Gravity::South => "south",
            Gravity::West => "west",
        }
    }

    /// Arrow glyph pointing the way gravity pulls
    pub fn arrow(&self) -> char {
        match self {
            Gravity::North => '↑',
            Gravity::East => '→',
            Gravity::South => '↓',
            Gravity::West => '←',
        }
    }
}

/// Tile type tag (payload-free view of a tile's variant)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileKind {
    #[default]
    Normal,
    Phase,
    Echo,
    Portal,
}

impl TileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::Normal => "normal",
            TileKind::Phase => "phase",
            TileKind::Echo => "echo",
            TileKind::Portal => "portal",
        }
    }
}

/// Commands a front end can issue to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    Move(Direction),
    Rewind,
    ToggleDeleteMode,
    Confirm,
    /// Turn gravity a quarter clockwise
    RotateGravity,
    NewGame,
}
