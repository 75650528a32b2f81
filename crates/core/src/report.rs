//! Move reports - everything a renderer needs to animate one move
//!
//! The engine never waits on animation. [`ResolvedMove`] is what exists after
//! slide and merge; [`MoveReport`] adds spawn, quantum jumps and the game-over
//! verdict once [`crate::GameState::finalize_move`] runs.

use crate::board::Pos;
use crate::tile::TileId;
use crate::types::{Direction, Gravity};

/// A tile that moved during a slide.
///
/// `(r, c)` is where the tile ended up; `(dr, dc)` is the offset back to where
/// it started, i.e. `origin = (r + dr, c + dc)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveVector {
    pub r: usize,
    pub c: usize,
    pub dr: i32,
    pub dc: i32,
}

/// A diagonal merge performed by the quantum pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuantumJump {
    /// Cell that was cleared
    pub from: Pos,
    /// Cell that holds the doubled value
    pub to: Pos,
    pub value: u32,
}

/// Special-tile and bookkeeping events raised during a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PhaseToggled { pos: Pos, phased: bool },
    GravityShifted { from: Gravity, to: Gravity },
    /// A twin merged: the pair dissolved and a crystal was granted
    EchoMerged { original: TileId, copy: TileId },
    /// A pair timed out: the copy vanished and score was reduced
    EchoExpired { original: TileId, copy: TileId, penalty: u64 },
    /// Two portals merged: a row will be cleared after spawning
    PortalsFused { pos: Pos },
    RowCleared { row: usize },
    NewRecord { value: u32, void_crystal: bool },
    /// First time the board reached `tile` this game
    Achievement { tile: u32, crystals: u32 },
    GameOver,
}

/// Result of the slide/merge half of a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMove {
    /// Direction the caller asked for
    pub requested: Direction,
    /// Direction tiles slid after gravity remapping
    pub applied: Direction,
    /// Merge positions in board coordinates
    pub merges: Vec<Pos>,
    pub moves: Vec<MoveVector>,
    /// Merge score added by this half
    pub score_gained: u64,
    pub events: Vec<GameEvent>,
}

/// Result of a fully completed move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub requested: Direction,
    pub applied: Direction,
    pub merges: Vec<Pos>,
    pub moves: Vec<MoveVector>,
    pub spawned: Vec<Pos>,
    pub quantum_jumps: Vec<QuantumJump>,
    /// Merge score plus quantum score
    pub score_delta: u64,
    pub events: Vec<GameEvent>,
    pub game_over: bool,
}

impl MoveReport {
    pub fn from_resolved(resolved: ResolvedMove) -> Self {
        Self {
            requested: resolved.requested,
            applied: resolved.applied,
            merges: resolved.merges,
            moves: resolved.moves,
            spawned: Vec::new(),
            quantum_jumps: Vec::new(),
            score_delta: resolved.score_gained,
            events: resolved.events,
            game_over: false,
        }
    }
}

/// What happened to a submitted move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The game is not accepting moves
    Inactive,
    /// Another move is resolving; this one waits in the queue
    Queued,
    /// The move ran but nothing slid or merged; per-move decay still applied
    Unchanged { events: Vec<GameEvent> },
    /// Slide and merge done; call `finalize_move` to spawn
    Resolved(ResolvedMove),
}
