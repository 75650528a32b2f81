//! Core game logic - the Quantum 2048 rules engine
//!
//! Everything here is pure game logic: no terminal, no threads, and no I/O
//! apart from the settings file in [`settings`]. Randomness is injected, so the
//! same seed replays the same game.
//!
//! # Module Structure
//!
//! - [`board`]: square grid of tiles in flat row-major storage
//! - [`tile`]: a single cell and its special-tile payload
//! - [`transform`]: maps each direction onto a single left-collapse frame
//! - [`collapse`]: slide, merge and teleport one canonical row
//! - [`special`]: phase-shift cycles, echo pairs and merge side effects
//! - [`spawn`]: spawn value, kind and position rules
//! - [`quantum`]: the post-spawn diagonal merge pass
//! - [`history`]: bounded rewind snapshots
//! - [`game_state`]: the move orchestrator tying it all together
//! - [`settings`]: tunables and their JSON persistence
//! - [`report`] / [`snapshot`]: what front ends read back
//!
//! # Game Rules
//!
//! - **Gravity** remaps input: the same key slides tiles a different way once
//!   gravity has rotated. Merging a phase-shift tile re-rolls gravity.
//! - **Phase-shift** tiles blink out every 3-5 moves and are passed through
//!   while intangible.
//! - **Echo** tiles spawn as twins. Merge either within 4 moves for a crystal,
//!   or lose the copy and 10 points.
//! - **Portals** throw the tile behind them to the far end of the row; two
//!   portals merging wipe a random row.
//! - **Quantum jumps** merge equal diagonal neighbours at random after every move.
//! - **Crystals** rewind a move; **void crystals**, earned from new record
//!   tiles, delete a tile.
//!
//! # Example
//!
//! ```
//! use quantum2048_core::{GameState, Settings};
//! use quantum2048_types::Direction;
//!
//! let mut game = GameState::new(Settings::default(), 12345);
//! game.init_game();
//!
//! for dir in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
//!     for report in game.apply_move(dir) {
//!         assert_eq!(report.requested, dir);
//!     }
//! }
//! assert!(game.board().tile_count() >= 1);
//! ```

pub mod board;
pub mod collapse;
pub mod game_state;
pub mod history;
pub mod quantum;
pub mod report;
pub mod rng;
pub mod settings;
pub mod snapshot;
pub mod spawn;
pub mod special;
pub mod tile;
pub mod transform;

pub use quantum2048_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Pos};
pub use collapse::{collapse_row, MergeRecord, RowOutcome};
pub use game_state::{EnginePhase, GameState};
pub use quantum::QuantumPass;
pub use report::{GameEvent, MoveOutcome, MoveReport, MoveVector, QuantumJump, ResolvedMove};
pub use rng::{seeded, GameRng};
pub use settings::{SavedRecord, Settings, SettingsError, SettingsStore};
pub use snapshot::{CellSnapshot, GameSnapshot};
pub use special::{EchoPair, EchoPairs};
pub use tile::{PhaseState, Special, Tile, TileId};
pub use transform::{transform_board, transform_coord};
