//! Terminal Quantum 2048 runner (default binary).
//!
//! Settings and the best score come from the settings file (see
//! `QUANTUM2048_SETTINGS_PATH`); `QUANTUM2048_SEED` pins the random stream.
//! Moves are split into a short slide phase and a spawn phase so keys pressed
//! in between are queued by the engine rather than dropped.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};

use quantum2048::core::{GameState, MoveOutcome, Pos, SavedRecord, SettingsStore};
use quantum2048::input::{handle_key_event, should_quit};
use quantum2048::term::{FrameBuffer, GameView, Overlay, TerminalRenderer, Viewport};
use quantum2048::types::{Direction, GameCommand};

/// How long the slid board stays on screen before new tiles appear
const SLIDE_HOLD: Duration = Duration::from_millis(90);
const IDLE_POLL: Duration = Duration::from_millis(100);

const SEED_ENV: &str = "QUANTUM2048_SEED";

fn main() -> Result<()> {
    let store = SettingsStore::from_env();
    let record = store.load();

    let mut game = GameState::new(record.settings, seed_from_env());
    game.set_best_score(record.best_score);
    game.init_game();

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut game);

    // Always try to restore terminal state.
    let _ = term.exit();

    if game.best_score() > record.best_score {
        let updated = SavedRecord {
            settings: *game.settings(),
            best_score: game.best_score(),
        };
        store
            .save(&updated)
            .with_context(|| format!("saving best score to {}", store.path().display()))?;
    }
    result
}

fn seed_from_env() -> u64 {
    if let Some(seed) = std::env::var(SEED_ENV).ok().and_then(|s| s.trim().parse().ok()) {
        return seed;
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Front-end state layered over the engine
#[derive(Default)]
struct Ui {
    delete_cursor: Option<Pos>,
    message: Option<&'static str>,
    resolving_since: Option<Instant>,
}

impl Ui {
    fn command(&mut self, game: &mut GameState, cmd: GameCommand) {
        self.message = None;
        match cmd {
            GameCommand::Move(dir) => match self.delete_cursor {
                Some(cursor) => {
                    self.delete_cursor = Some(step_cursor(cursor, dir, game.board().size()));
                }
                None => match game.resolve_move(dir) {
                    MoveOutcome::Resolved(_) => self.resolving_since = Some(Instant::now()),
                    MoveOutcome::Inactive => self.message = Some("game over"),
                    MoveOutcome::Queued | MoveOutcome::Unchanged { .. } => {}
                },
            },
            GameCommand::Rewind => {
                self.message = Some(if game.rewind_time() {
                    "time rewound"
                } else {
                    "cannot rewind"
                });
            }
            GameCommand::ToggleDeleteMode => {
                if self.delete_cursor.take().is_none() {
                    if game.void_crystals() == 0 {
                        self.message = Some("no void crystals");
                    } else {
                        self.delete_cursor = Some(Pos::new(0, 0));
                    }
                }
            }
            GameCommand::Confirm => {
                if let Some(cursor) = self.delete_cursor {
                    if game.delete_tile_at(cursor.r, cursor.c) {
                        self.delete_cursor = None;
                        self.message = Some("tile removed");
                    } else {
                        self.message = Some("nothing to remove");
                    }
                }
            }
            GameCommand::RotateGravity => {
                if !game.rotate_gravity() {
                    self.message = Some("gravity is locked");
                }
            }
            GameCommand::NewGame => {
                game.init_game();
                *self = Ui::default();
            }
        }
    }

    /// Finish the resolving move once its slide has been shown.
    fn settle(&mut self, game: &mut GameState) {
        let Some(since) = self.resolving_since else {
            return;
        };
        if since.elapsed() < SLIDE_HOLD {
            return;
        }
        self.resolving_since = None;
        game.finalize_move();
        game.drain_queue();
    }

    fn poll_timeout(&self) -> Duration {
        match self.resolving_since {
            Some(since) => SLIDE_HOLD.saturating_sub(since.elapsed()),
            None => IDLE_POLL,
        }
    }
}

fn step_cursor(cursor: Pos, dir: Direction, size: usize) -> Pos {
    let (dr, dc) = dir.delta();
    let clamp = |v: usize, d: i32| (v as i32 + d).clamp(0, size as i32 - 1) as usize;
    Pos::new(clamp(cursor.r, dr), clamp(cursor.c, dc))
}

fn run(term: &mut TerminalRenderer, game: &mut GameState) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut ui = Ui::default();

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let overlay = Overlay {
            delete_cursor: ui.delete_cursor,
            message: ui.message,
        };
        view.render_into(&game.snapshot(), &overlay, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        if event::poll(ui.poll_timeout())? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(cmd) = handle_key_event(key) {
                        ui.command(game, cmd);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        ui.settle(game);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_stays_on_board() {
        let p = step_cursor(Pos::new(0, 0), Direction::Up, 4);
        assert_eq!(p, Pos::new(0, 0));
        let p = step_cursor(Pos::new(3, 2), Direction::Right, 4);
        assert_eq!(p, Pos::new(3, 3));
        let p = step_cursor(p, Direction::Right, 4);
        assert_eq!(p, Pos::new(3, 3));
    }
}
