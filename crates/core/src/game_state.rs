//! Game state module - owns the board and drives every move
//!
//! A move runs in two halves. [`GameState::resolve_move`] applies per-move
//! decay, slides and merges, and leaves the engine `Resolving` so a front end
//! can animate. [`GameState::finalize_move`] spawns, runs the quantum pass,
//! checks for game over and returns to `Idle`. Directions submitted while a
//! move is resolving wait in a FIFO queue that [`GameState::drain_queue`]
//! replays. [`GameState::apply_move`] does all of that in one call.

use std::collections::{BTreeMap, VecDeque};

use rand::Rng;

use crate::board::{Board, Pos};
use crate::collapse::{collapse_row, MergeRecord};
use crate::history::{HistoryEntry, MoveHistory};
use crate::quantum::{quantum_pass, QuantumPass};
use crate::report::{GameEvent, MoveOutcome, MoveReport, MoveVector, ResolvedMove};
use crate::rng::{random_gravity, seeded, GameRng};
use crate::settings::Settings;
use crate::snapshot::{CellSnapshot, GameSnapshot};
use crate::spawn::{pick_vacant, roll_kind, spawn_value};
use crate::special::{
    advance_phases, apply_merge_effects, clear_random_row, new_phase, EchoPair, EchoPairs,
};
use crate::tile::{Special, Tile, TileId};
use crate::transform::{from_canonical, transform_board};
use crate::types::{
    starting_crystals_for, tiles_per_step, Direction, Gravity, TileKind, ACHIEVEMENTS,
    ECHO_LIFETIME_TURNS,
};

/// Where the engine is in the move cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnginePhase {
    /// Accepting moves
    #[default]
    Idle,
    /// Slide and merge are done; spawn is pending and new moves are queued
    Resolving,
    /// No move can change the board
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<R = GameRng> {
    settings: Settings,
    board: Board,
    score: u64,
    best_score: u64,
    crystals: u32,
    void_crystals: u32,
    /// Largest value seen since the game started (lowered by deletes)
    highest_tile: u32,
    /// Milestones from [`ACHIEVEMENTS`] already rewarded this game
    achieved: [bool; ACHIEVEMENTS.len()],
    next_id: TileId,
    gravity: Gravity,
    scramble_pending: bool,
    clear_row_pending: bool,
    echo_pairs: EchoPairs,
    history: MoveHistory,
    queue: VecDeque<Direction>,
    phase: EnginePhase,
    pending: Option<ResolvedMove>,
    rng: R,
}

impl GameState<GameRng> {
    /// Create a game with the default generator seeded from `seed`.
    ///
    /// The board starts empty; call [`GameState::init_game`] to deal the
    /// starting tiles.
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self::with_rng(settings, seeded(seed))
    }
}

impl<R: Rng> GameState<R> {
    pub fn with_rng(settings: Settings, rng: R) -> Self {
        let settings = settings.sanitized();
        Self {
            board: Board::new(settings.board_size),
            score: 0,
            best_score: 0,
            crystals: starting_crystals_for(settings.board_size, settings.starting_crystals),
            void_crystals: 0,
            highest_tile: 0,
            achieved: [false; ACHIEVEMENTS.len()],
            next_id: 1,
            gravity: Gravity::default(),
            scramble_pending: false,
            clear_row_pending: false,
            echo_pairs: EchoPairs::new(),
            history: MoveHistory::new(settings.max_move_history),
            queue: VecDeque::new(),
            phase: EnginePhase::Idle,
            pending: None,
            settings,
            rng,
        }
    }

    /// Start a fresh game with the current settings.
    ///
    /// Starting tiles are normal tiles of increasing value (2, 4, 8, ...)
    /// placed on random cells. The best score is kept.
    pub fn init_game(&mut self) {
        let size = self.settings.board_size;
        self.board = Board::new(size);
        self.score = 0;
        self.crystals = starting_crystals_for(size, self.settings.starting_crystals);
        self.void_crystals = 0;
        self.achieved = [false; ACHIEVEMENTS.len()];
        self.next_id = 1;
        self.gravity = Gravity::default();
        self.scramble_pending = false;
        self.clear_row_pending = false;
        self.echo_pairs.clear();
        self.history = MoveHistory::new(self.settings.max_move_history);
        self.queue.clear();
        self.pending = None;
        self.phase = EnginePhase::Idle;

        for i in 0..self.settings.starting_tiles {
            let Some(pos) = pick_vacant(&self.board, None, &mut self.rng) else {
                break;
            };
            let exponent = (i + 1).min(31) as u32;
            let id = self.alloc_id();
            self.board.set(pos.r, pos.c, Tile::new(id, 1u32 << exponent));
        }
        self.highest_tile = self.board.max_value();
        log::info!(
            "new {}x{} game with {} tiles, {} crystals",
            size,
            size,
            self.board.tile_count(),
            self.crystals
        );
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Seed the best score from a persisted record
    pub fn set_best_score(&mut self, best: u64) {
        self.best_score = best.max(self.score);
    }

    pub fn crystals(&self) -> u32 {
        self.crystals
    }

    pub fn void_crystals(&self) -> u32 {
        self.void_crystals
    }

    pub fn highest_tile(&self) -> u32 {
        self.highest_tile
    }

    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Gravity) {
        self.gravity = gravity;
    }

    /// Turn gravity a quarter clockwise. Ignored unless the engine is idle.
    pub fn rotate_gravity(&mut self) -> bool {
        if self.phase != EnginePhase::Idle {
            return false;
        }
        let from = self.gravity;
        self.gravity = from.rotate_cw();
        log::debug!("gravity rotated {} -> {}", from.as_str(), self.gravity.as_str());
        true
    }

    /// Gravity will be re-rolled at the start of the next move
    pub fn gravity_unstable(&self) -> bool {
        self.scramble_pending
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_resolving(&self) -> bool {
        self.phase == EnginePhase::Resolving
    }

    pub fn queued_moves(&self) -> usize {
        self.queue.len()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn echo_pairs(&self) -> &EchoPairs {
        &self.echo_pairs
    }

    /// Replace the board with normal tiles from a value grid.
    ///
    /// Tiles get fresh ids; echo pairs and history are dropped.
    pub fn load_values(&mut self, values: &[Vec<u32>]) {
        let (board, next_id) = Board::from_values(values, self.next_id);
        self.board = board;
        self.next_id = next_id;
        self.echo_pairs.clear();
        self.history.clear();
        self.highest_tile = self.board.max_value();
        self.phase = if self.is_game_over() {
            EnginePhase::GameOver
        } else {
            EnginePhase::Idle
        };
    }

    fn alloc_id(&mut self) -> TileId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ------------------------------------------------------------------
    // Moves
    // ------------------------------------------------------------------

    /// Slide and merge toward `requested` (after gravity remapping).
    ///
    /// While another move is resolving the direction is queued instead.
    pub fn resolve_move(&mut self, requested: Direction) -> MoveOutcome {
        match self.phase {
            EnginePhase::GameOver => return MoveOutcome::Inactive,
            EnginePhase::Resolving => {
                self.queue.push_back(requested);
                return MoveOutcome::Queued;
            }
            EnginePhase::Idle => {}
        }

        let mut events = self.begin_attempt();
        let snapshot = HistoryEntry {
            board: self.board.clone(),
            score: self.score,
            crystals: self.crystals,
        };

        let applied = self.gravity.remap(requested);
        let size = self.board.size();
        let before = self.board.clone();
        let canonical = transform_board(&self.board, applied, false);

        let mut collapsed = Board::new(size);
        let mut merges: Vec<(Pos, MergeRecord)> = Vec::new();
        let mut gained: u64 = 0;
        let mut changed = false;
        for r in 0..size {
            let outcome = collapse_row(canonical.row(r), size);
            changed |= outcome.changed;
            gained += outcome.score;
            for record in &outcome.merges {
                let pos = from_canonical(Pos::new(r, record.index), applied, size);
                merges.push((pos, *record));
            }
            collapsed.set_row(r, &outcome.row);
        }

        // Every attempt is rewindable, including ones that only decayed
        self.history.push(snapshot);

        if !changed {
            log::debug!("{} ({}) changed nothing", requested.as_str(), applied.as_str());
            if self.is_game_over() {
                self.enter_game_over(&mut events);
            }
            return MoveOutcome::Unchanged { events };
        }

        self.board = transform_board(&collapsed, applied, true);
        self.score += gained;
        self.best_score = self.best_score.max(self.score);

        let effects = apply_merge_effects(&merges, &mut self.echo_pairs, &mut self.board);
        self.scramble_pending |= effects.scramble_gravity;
        self.clear_row_pending |= effects.clear_row;
        self.crystals += effects.crystals;
        events.extend(effects.events);
        self.echo_pairs.refresh_positions(&self.board);

        let moves = movement_vectors(&before, &self.board, &merges);
        log::debug!(
            "{} ({}) merged {} tiles for {} points",
            requested.as_str(),
            applied.as_str(),
            merges.len(),
            gained
        );

        let resolved = ResolvedMove {
            requested,
            applied,
            merges: merges.iter().map(|(pos, _)| *pos).collect(),
            moves,
            score_gained: gained,
            events,
        };
        self.pending = Some(resolved.clone());
        self.phase = EnginePhase::Resolving;
        MoveOutcome::Resolved(resolved)
    }

    /// Complete the resolving move: spawn, clear a row if portals fused, run
    /// the quantum pass and check for game over.
    ///
    /// Returns `None` when no move is resolving.
    pub fn finalize_move(&mut self) -> Option<MoveReport> {
        let resolved = self.pending.take()?;
        let mut report = MoveReport::from_resolved(resolved);

        report.spawned = self.add_random_tiles(tiles_per_step(self.board.size()));

        if self.clear_row_pending {
            self.clear_row_pending = false;
            if let Some(row) = clear_random_row(&mut self.board, &mut self.rng) {
                report.spawned.retain(|p| p.r != row);
                report.events.push(GameEvent::RowCleared { row });
                self.prune_echo_pairs();
            }
        }

        let pass = self.perform_quantum_jumps();
        report.quantum_jumps = pass.jumps;
        report.score_delta += pass.score;

        if let Some(event) = self.track_highest_tile() {
            report.events.push(event);
        }
        report.events.extend(self.check_achievements());

        if self.is_game_over() {
            self.enter_game_over(&mut report.events);
            report.game_over = true;
        } else {
            self.phase = EnginePhase::Idle;
        }
        Some(report)
    }

    /// Run queued directions in submission order until the queue is empty or
    /// the game ends.
    pub fn drain_queue(&mut self) -> Vec<MoveReport> {
        let mut reports = Vec::new();
        while self.phase == EnginePhase::Idle {
            let Some(direction) = self.queue.pop_front() else {
                break;
            };
            if let MoveOutcome::Resolved(_) = self.resolve_move(direction) {
                reports.extend(self.finalize_move());
            }
        }
        if self.phase == EnginePhase::GameOver {
            self.queue.clear();
        }
        reports
    }

    /// Submit a move and carry it, plus anything queued behind it, to completion.
    pub fn apply_move(&mut self, direction: Direction) -> Vec<MoveReport> {
        let mut reports = Vec::new();
        if let MoveOutcome::Resolved(_) = self.resolve_move(direction) {
            reports.extend(self.finalize_move());
        }
        reports.extend(self.drain_queue());
        reports
    }

    /// Per-attempt decay: gravity scramble, phase cycles and echo lifetimes.
    fn begin_attempt(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if self.scramble_pending {
            self.scramble_pending = false;
            let from = self.gravity;
            self.gravity = random_gravity(&mut self.rng);
            events.push(GameEvent::GravityShifted {
                from,
                to: self.gravity,
            });
        }

        events.extend(advance_phases(&mut self.board, &mut self.rng));

        for event in self.echo_pairs.tick(&mut self.board) {
            if let GameEvent::EchoExpired { penalty, .. } = event {
                self.score = self.score.saturating_sub(penalty);
            }
            events.push(event);
        }
        events
    }

    fn enter_game_over(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = EnginePhase::GameOver;
        self.queue.clear();
        events.push(GameEvent::GameOver);
        log::info!("game over with score {}", self.score);
    }

    /// Raise `highest_tile` to the board maximum. Every new record after the
    /// first grants a void crystal.
    fn track_highest_tile(&mut self) -> Option<GameEvent> {
        let max = self.board.max_value();
        if max <= self.highest_tile {
            return None;
        }
        let void_crystal = self.highest_tile > 0;
        if void_crystal {
            self.void_crystals += 1;
        }
        self.highest_tile = max;
        Some(GameEvent::NewRecord {
            value: max,
            void_crystal,
        })
    }

    /// Reward each milestone the board maximum has reached for the first time
    fn check_achievements(&mut self) -> Vec<GameEvent> {
        let max = self.board.max_value();
        let mut events = Vec::new();
        for (done, &(tile, crystals)) in self.achieved.iter_mut().zip(ACHIEVEMENTS.iter()) {
            if *done || max < tile {
                continue;
            }
            *done = true;
            self.crystals += crystals;
            log::info!("reached {}: +{} crystals", tile, crystals);
            events.push(GameEvent::Achievement { tile, crystals });
        }
        events
    }

    /// Drop pairs whose twins are no longer both on the board
    fn prune_echo_pairs(&mut self) {
        let stale: Vec<TileId> = self
            .echo_pairs
            .iter()
            .filter(|(orig, pair)| self.board.find(*orig).is_none() || self.board.find(pair.copy_id).is_none())
            .map(|(orig, _)| orig)
            .collect();
        for orig in stale {
            self.echo_pairs.remove(orig);
        }
    }

    // ------------------------------------------------------------------
    // Actions outside the move cycle
    // ------------------------------------------------------------------

    /// Spend a crystal to restore the state before the last move.
    pub fn rewind_time(&mut self) -> bool {
        if self.phase == EnginePhase::Resolving || self.crystals == 0 {
            return false;
        }
        let Some(entry) = self.history.pop() else {
            return false;
        };
        self.board = entry.board;
        self.score = entry.score;
        self.crystals = entry.crystals.saturating_sub(1);
        self.queue.clear();
        self.prune_echo_pairs();
        self.echo_pairs.refresh_positions(&self.board);
        self.phase = if self.is_game_over() {
            EnginePhase::GameOver
        } else {
            EnginePhase::Idle
        };
        log::info!("rewound to score {}, {} crystals left", self.score, self.crystals);
        true
    }

    /// Spend a void crystal to remove the tile at `(r, c)`.
    pub fn delete_tile_at(&mut self, r: usize, c: usize) -> bool {
        if self.phase == EnginePhase::Resolving || self.void_crystals == 0 {
            return false;
        }
        let Some(id) = self
            .board
            .get(r, c)
            .filter(|t| t.is_tangible())
            .and_then(|t| t.id)
        else {
            return false;
        };
        self.board.take(r, c);
        self.void_crystals -= 1;
        if let Some(orig) = self.echo_pairs.pair_of(id) {
            self.echo_pairs.remove(orig);
        }
        self.highest_tile = self.board.max_value();
        if self.phase == EnginePhase::GameOver && !self.is_game_over() {
            self.phase = EnginePhase::Idle;
        }
        log::debug!("deleted tile {} at ({}, {})", id, r, c);
        true
    }

    /// No open cell and no tangible equal neighbours to the right or below.
    ///
    /// A phased tile counts as open, so a board holding one is never over.
    pub fn is_game_over(&self) -> bool {
        !self.board.has_open_cell() && !self.board.has_adjacent_match()
    }

    /// Run one quantum pass over the board and bank its score.
    pub fn perform_quantum_jumps(&mut self) -> QuantumPass {
        let pass = quantum_pass(
            &mut self.board,
            self.settings.quantum_bonus_chance,
            &mut self.rng,
        );
        if !pass.jumps.is_empty() {
            self.score += pass.score;
            self.best_score = self.best_score.max(self.score);
            self.prune_echo_pairs();
            self.echo_pairs.refresh_positions(&self.board);
        }
        pass
    }

    // ------------------------------------------------------------------
    // Spawning
    // ------------------------------------------------------------------

    /// Spawn one tile on a random vacant cell. Returns every cell filled
    /// (two for an echo pair, none when the board is full).
    pub fn add_random_tile(&mut self) -> Vec<Pos> {
        let Some(pos) = pick_vacant(&self.board, None, &mut self.rng) else {
            return Vec::new();
        };
        let value = spawn_value(&self.board, &mut self.rng);
        let kind = roll_kind(&self.settings.spawn_chances(), &mut self.rng);
        log::debug!("spawn {} {} at ({}, {})", kind.as_str(), value, pos.r, pos.c);

        match kind {
            TileKind::Echo => match self.spawn_echo_tile(pos.r, pos.c, value) {
                Some((_, Some(copy))) => vec![pos, copy],
                Some((_, None)) => vec![pos],
                None => Vec::new(),
            },
            kind => self
                .place_tile(pos.r, pos.c, value, kind)
                .map(|_| vec![pos])
                .unwrap_or_default(),
        }
    }

    pub fn add_random_tiles(&mut self, count: usize) -> Vec<Pos> {
        let mut spawned = Vec::new();
        for _ in 0..count {
            let placed = self.add_random_tile();
            if placed.is_empty() {
                break;
            }
            spawned.extend(placed);
        }
        spawned
    }

    /// Put a single tile of `kind` on a vacant cell.
    ///
    /// Echo tiles placed this way have no twin; use
    /// [`GameState::spawn_echo_tile`] for a pair.
    pub fn place_tile(&mut self, r: usize, c: usize, value: u32, kind: TileKind) -> Option<TileId> {
        if !self.board.get(r, c)?.is_vacant() {
            return None;
        }
        let special = match kind {
            TileKind::Normal => Special::Normal,
            TileKind::Phase => Special::Phase(new_phase(&mut self.rng)),
            TileKind::Echo => Special::Echo,
            TileKind::Portal => Special::Portal,
        };
        let id = self.alloc_id();
        self.board.set(r, c, Tile::with_special(id, value, special));
        Some(id)
    }

    pub fn spawn_phase_tile(&mut self, r: usize, c: usize, value: u32) -> Option<TileId> {
        self.place_tile(r, c, value, TileKind::Phase)
    }

    pub fn spawn_portal_tile(&mut self, r: usize, c: usize, value: u32) -> Option<TileId> {
        self.place_tile(r, c, value, TileKind::Portal)
    }

    /// Spawn an echo twin pair: the original at `(r, c)` and a copy of equal
    /// value on another random vacant cell.
    ///
    /// Without room for the copy the original is placed as a normal tile.
    /// Returns the original's id and the copy's position.
    pub fn spawn_echo_tile(&mut self, r: usize, c: usize, value: u32) -> Option<(TileId, Option<Pos>)> {
        if !self.board.get(r, c)?.is_vacant() {
            return None;
        }
        let origin = Pos::new(r, c);
        let Some(copy_pos) = pick_vacant(&self.board, Some(origin), &mut self.rng) else {
            let id = self.place_tile(r, c, value, TileKind::Normal)?;
            return Some((id, None));
        };
        let original = self.place_tile(r, c, value, TileKind::Echo)?;
        let copy_id = self.place_tile(copy_pos.r, copy_pos.c, value, TileKind::Echo)?;
        self.echo_pairs.insert(
            original,
            EchoPair {
                copy_id,
                copy_pos,
                turns_left: ECHO_LIFETIME_TURNS,
            },
        );
        Some((original, Some(copy_pos)))
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.size = self.board.size();
        out.cells.clear();
        out.cells
            .extend(self.board.cells().iter().map(|t| CellSnapshot::from(*t)));
        for (orig, pair) in self.echo_pairs.iter() {
            for id in [orig, pair.copy_id] {
                if let Some(pos) = self.board.find(id) {
                    out.cells[pos.r * out.size + pos.c].echo_turns = Some(pair.turns_left);
                }
            }
        }
        out.score = self.score;
        out.best_score = self.best_score;
        out.crystals = self.crystals;
        out.void_crystals = self.void_crystals;
        out.highest_tile = self.highest_tile;
        out.gravity = self.gravity;
        out.gravity_unstable = self.scramble_pending;
        out.history_len = self.history.len();
        out.queued_moves = self.queue.len();
        out.resolving = self.phase == EnginePhase::Resolving;
        out.game_over = self.phase == EnginePhase::GameOver;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

/// Movement vectors from diffing ids between two boards.
///
/// A merged tile animates from the position of the tile it absorbed.
fn movement_vectors(before: &Board, after: &Board, merges: &[(Pos, MergeRecord)]) -> Vec<MoveVector> {
    let origins: BTreeMap<TileId, Pos> = before
        .iter()
        .filter_map(|(pos, t)| t.id.map(|id| (id, pos)))
        .collect();
    let absorbed: BTreeMap<Pos, TileId> = merges
        .iter()
        .filter_map(|(pos, m)| m.absorbed_id.map(|id| (*pos, id)))
        .collect();

    let mut moves = Vec::new();
    for (pos, tile) in after.iter() {
        let Some(id) = tile.id else {
            continue;
        };
        let source = absorbed.get(&pos).copied().unwrap_or(id);
        let Some(origin) = origins.get(&source) else {
            continue;
        };
        if *origin != pos {
            moves.push(MoveVector {
                r: pos.r,
                c: pos.c,
                dr: origin.r as i32 - pos.r as i32,
                dc: origin.c as i32 - pos.c as i32,
            });
        }
    }
    moves
}
