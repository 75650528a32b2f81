//! Spawn rules - where new tiles land, what they are worth and which kind they are

use rand::Rng;

use crate::board::{Board, Pos};
use crate::rng::{pick_index, spawn_offset};
use crate::types::TileKind;

/// Per-kind spawn probabilities. Whatever is left over spawns a normal tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnChances {
    pub phase: f64,
    pub echo: f64,
    pub portal: f64,
}

impl SpawnChances {
    /// Only normal tiles
    pub const NONE: SpawnChances = SpawnChances {
        phase: 0.0,
        echo: 0.0,
        portal: 0.0,
    };
}

/// Value for a fresh tile given the current maximum on the board.
///
/// `2^(max(1, floor(log2(max(2, max_tile))) - offset))`
pub fn value_for(max_tile: u32, offset: u32) -> u32 {
    let max_power = max_tile.max(2).ilog2();
    let exponent = max_power.saturating_sub(offset).max(1);
    1u32 << exponent
}

/// Roll a spawn value below the board's current maximum
pub fn spawn_value<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> u32 {
    value_for(board.max_value(), spawn_offset(rng))
}

/// Weighted pick of the kind of the next spawned tile.
///
/// Kinds are checked in a fixed order (phase, echo, portal) against a single
/// uniform draw, so the chances stack rather than compete.
pub fn roll_kind<R: Rng + ?Sized>(chances: &SpawnChances, rng: &mut R) -> TileKind {
    let draw: f64 = rng.gen();
    let mut threshold = 0.0;
    for (kind, chance) in [
        (TileKind::Phase, chances.phase),
        (TileKind::Echo, chances.echo),
        (TileKind::Portal, chances.portal),
    ] {
        threshold += chance.max(0.0);
        if draw < threshold {
            return kind;
        }
    }
    TileKind::Normal
}

/// Uniformly random vacant cell, skipping `exclude`
pub fn pick_vacant<R: Rng + ?Sized>(board: &Board, exclude: Option<Pos>, rng: &mut R) -> Option<Pos> {
    let cells: Vec<Pos> = board
        .vacant_cells()
        .into_iter()
        .filter(|p| Some(*p) != exclude)
        .collect();
    let idx = pick_index(rng, cells.len())?;
    Some(cells[idx])
}
