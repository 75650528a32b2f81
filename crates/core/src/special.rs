//! Special tile rules - phase-shift, echo-duplicate and nexus-portal
//!
//! Row-level behaviour (phased tiles being passed through, portals teleporting
//! their follower) lives in [`crate::collapse`]. This module owns the per-move
//! decay and the side effects a merge triggers once the board is back in its
//! original orientation.

use std::collections::BTreeMap;

use rand::Rng;

use crate::board::{Board, Pos};
use crate::collapse::MergeRecord;
use crate::report::GameEvent;
use crate::rng::{phase_cycle, pick_index};
use crate::tile::{PhaseState, Special, TileId};
use crate::types::{TileKind, ECHO_TIMEOUT_PENALTY};

/// Bookkeeping for one echo pair, keyed by the original's id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoPair {
    pub copy_id: TileId,
    /// Last known position of the copy
    pub copy_pos: Pos,
    pub turns_left: u8,
}

/// All live echo pairs: `original id -> pair`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EchoPairs {
    pairs: BTreeMap<TileId, EchoPair>,
}

impl EchoPairs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, original: TileId, pair: EchoPair) {
        self.pairs.insert(original, pair);
    }

    pub fn get(&self, original: TileId) -> Option<&EchoPair> {
        self.pairs.get(&original)
    }

    pub fn remove(&mut self, original: TileId) -> Option<EchoPair> {
        self.pairs.remove(&original)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileId, &EchoPair)> + '_ {
        self.pairs.iter().map(|(k, v)| (*k, v))
    }

    /// Original id of the pair `id` belongs to (as original or copy)
    pub fn pair_of(&self, id: TileId) -> Option<TileId> {
        if self.pairs.contains_key(&id) {
            return Some(id);
        }
        self.pairs
            .iter()
            .find(|(_, p)| p.copy_id == id)
            .map(|(orig, _)| *orig)
    }

    /// Re-read copy positions from the board after tiles moved
    pub fn refresh_positions(&mut self, board: &Board) {
        for pair in self.pairs.values_mut() {
            if let Some(pos) = board.find(pair.copy_id) {
                pair.copy_pos = pos;
            }
        }
    }

    /// Count down every pair. Expired pairs delete their copy.
    ///
    /// Returns the expiry events; the caller deducts their penalties.
    pub fn tick(&mut self, board: &mut Board) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let mut expired = Vec::new();
        for (orig, pair) in self.pairs.iter_mut() {
            pair.turns_left = pair.turns_left.saturating_sub(1);
            if pair.turns_left == 0 {
                expired.push((*orig, pair.copy_id));
            }
        }
        for (orig, copy) in expired {
            self.pairs.remove(&orig);
            if let Some(pos) = board.find(copy) {
                board.take(pos.r, pos.c);
            }
            events.push(GameEvent::EchoExpired {
                original: orig,
                copy,
                penalty: ECHO_TIMEOUT_PENALTY,
            });
        }
        events
    }
}

/// Advance every phase-shift counter by one move, toggling those that run out.
pub fn advance_phases<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let size = board.size();
    for r in 0..size {
        for c in 0..size {
            let Some(tile) = board.get_mut(r, c) else {
                continue;
            };
            let Special::Phase(mut phase) = tile.special else {
                continue;
            };
            phase.counter = phase.counter.saturating_sub(1);
            if phase.counter == 0 {
                if phase.phased {
                    tile.value = phase.stored_value;
                    phase.stored_value = 0;
                    phase.phased = false;
                } else {
                    phase.stored_value = tile.value;
                    tile.value = 0;
                    phase.phased = true;
                }
                phase.counter = phase_cycle(rng);
                events.push(GameEvent::PhaseToggled {
                    pos: Pos::new(r, c),
                    phased: phase.phased,
                });
            }
            tile.special = Special::Phase(phase);
        }
    }
    events
}

/// Fresh phase state for a newly spawned tile
pub fn new_phase<R: Rng + ?Sized>(rng: &mut R) -> PhaseState {
    PhaseState {
        counter: phase_cycle(rng),
        phased: false,
        stored_value: 0,
    }
}

/// Side effects collected from one move's merges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeEffects {
    /// A phase tile merged: gravity scrambles on the next move
    pub scramble_gravity: bool,
    /// Two portals merged: clear a row after spawning
    pub clear_row: bool,
    /// Crystals earned from echo merges
    pub crystals: u32,
    pub events: Vec<GameEvent>,
}

/// Apply the special-tile consequences of `merges` to the post-move board.
///
/// `merges` carry original-frame positions alongside their records.
pub fn apply_merge_effects(
    merges: &[(Pos, MergeRecord)],
    pairs: &mut EchoPairs,
    board: &mut Board,
) -> MergeEffects {
    let mut effects = MergeEffects::default();

    for (pos, record) in merges {
        if record.involves(TileKind::Phase) {
            effects.scramble_gravity = true;
        }

        if record.both(TileKind::Portal) {
            effects.clear_row = true;
            effects.events.push(GameEvent::PortalsFused { pos: *pos });
        }

        if record.involves(TileKind::Echo) {
            for id in record.source_ids() {
                let Some(orig) = pairs.pair_of(id) else {
                    continue;
                };
                let Some(pair) = pairs.remove(orig) else {
                    continue;
                };
                // The copy may have been consumed by this very merge.
                let consumed = record.source_ids().any(|s| s == pair.copy_id);
                if !consumed {
                    if let Some(at) = board.find(pair.copy_id) {
                        board.take(at.r, at.c);
                    }
                }
                effects.crystals += 1;
                effects.events.push(GameEvent::EchoMerged {
                    original: orig,
                    copy: pair.copy_id,
                });
            }
        }
    }

    effects
}

/// Empty a uniformly random row. Returns the cleared row index.
pub fn clear_random_row<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Option<usize> {
    let row = pick_index(rng, board.size())?;
    board.clear_row(row);
    Some(row)
}
