//! Whole-game flows: queueing, game over, rewind and void crystals

use quantum2048::core::{EnginePhase, GameEvent, GameState, MoveOutcome, Pos, QuantumJump, Settings};
use quantum2048::types::{Direction, TileKind};
use rand::rngs::mock::StepRng;

fn quiet(board_size: usize) -> Settings {
    Settings {
        board_size,
        quantum_bonus_chance: 0.0,
        phase_spawn_chance: 0.0,
        echo_spawn_chance: 0.0,
        portal_spawn_chance: 0.0,
        ..Settings::default()
    }
}

fn game(board_size: usize, values: &[Vec<u32>]) -> GameState<StepRng> {
    let mut g = GameState::with_rng(quiet(board_size), StepRng::new(0, 0));
    g.load_values(values);
    g
}

#[test]
fn test_same_seed_replays_same_game() {
    let moves = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
    let mut a = GameState::new(Settings::default(), 2048);
    let mut b = GameState::new(Settings::default(), 2048);
    a.init_game();
    b.init_game();
    for _ in 0..10 {
        for dir in moves {
            assert_eq!(a.apply_move(dir), b.apply_move(dir));
        }
    }
    assert_eq!(a.board(), b.board());
    assert_eq!(a.score(), b.score());
}

#[test]
fn test_queued_moves_run_in_submission_order() {
    let mut g = game(4, &[vec![2, 0, 0, 2], vec![0; 4], vec![0; 4], vec![0; 4]]);
    assert!(matches!(g.resolve_move(Direction::Left), MoveOutcome::Resolved(_)));
    for dir in [Direction::Down, Direction::Right, Direction::Up] {
        assert_eq!(g.resolve_move(dir), MoveOutcome::Queued);
    }
    assert_eq!(g.snapshot().queued_moves, 3);
    assert!(g.snapshot().resolving);

    let first = g.finalize_move().unwrap();
    assert_eq!(first.requested, Direction::Left);

    let rest: Vec<Direction> = g.drain_queue().iter().map(|r| r.requested).collect();
    assert_eq!(rest, vec![Direction::Down, Direction::Right, Direction::Up]);
    assert_eq!(g.phase(), EnginePhase::Idle);
}

#[test]
fn test_checkerboard_is_game_over() {
    let mut g = game(
        4,
        &[
            vec![2, 4, 2, 4],
            vec![4, 2, 4, 2],
            vec![2, 4, 2, 4],
            vec![4, 2, 4, 2],
        ],
    );
    assert!(g.is_game_over());
    assert_eq!(g.phase(), EnginePhase::GameOver);
    assert!(g.snapshot().game_over);
    for dir in Direction::ALL {
        assert_eq!(g.resolve_move(dir), MoveOutcome::Inactive);
    }
    assert!(g.apply_move(Direction::Left).is_empty());
}

#[test]
fn test_full_board_with_a_pair_is_playable() {
    let g = game(3, &[vec![2, 4, 2], vec![4, 2, 4], vec![2, 4, 4]]);
    assert!(!g.is_game_over());
    assert_eq!(g.phase(), EnginePhase::Idle);
}

#[test]
fn test_move_into_deadlock_ends_game_then_rewind_recovers() {
    let start = vec![vec![2, 4, 2], vec![4, 2, 4], vec![8, 16, 0]];
    let mut g = game(3, &start);
    let crystals = g.crystals();

    // The slide opens (2, 0); the spawned 2 leaves no pair anywhere.
    let reports = g.apply_move(Direction::Right);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].game_over);
    assert!(reports[0].events.contains(&GameEvent::GameOver));
    assert_eq!(g.board().to_values(), vec![vec![2, 4, 2], vec![4, 2, 4], vec![2, 8, 16]]);
    assert_eq!(g.phase(), EnginePhase::GameOver);

    assert!(g.rewind_time());
    assert_eq!(g.board().to_values(), start);
    assert_eq!(g.crystals(), crystals - 1);
    assert_eq!(g.phase(), EnginePhase::Idle);
}

#[test]
fn test_rewind_without_crystals_or_history_fails() {
    let mut g = game(3, &[vec![2, 2, 0], vec![0; 3], vec![0; 3]]);
    assert!(!g.rewind_time(), "nothing to rewind yet");

    let mut g = GameState::with_rng(
        Settings {
            starting_crystals: 0,
            ..quiet(3)
        },
        StepRng::new(0, 0),
    );
    g.load_values(&[vec![2, 2, 0], vec![0; 3], vec![0; 3]]);
    g.apply_move(Direction::Left);
    assert_eq!(g.crystals(), 0);
    assert_eq!(g.history_len(), 1);
    assert!(!g.rewind_time());
}

#[test]
fn test_history_is_capped() {
    let mut g = GameState::with_rng(
        Settings {
            max_move_history: 2,
            ..quiet(6)
        },
        StepRng::new(0, 0),
    );
    g.load_values(&vec![vec![0; 6]; 6]);
    g.place_tile(5, 5, 2, TileKind::Normal);
    for dir in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
        g.apply_move(dir);
    }
    assert_eq!(g.history_len(), 2);
}

#[test]
fn test_new_record_void_crystal_deletes_tile() {
    let mut g = game(3, &[vec![2, 2, 0], vec![0; 3], vec![0; 3]]);
    g.apply_move(Direction::Left);
    assert_eq!(g.highest_tile(), 4);
    assert_eq!(g.void_crystals(), 1);

    assert!(!g.delete_tile_at(2, 2), "empty cell");
    assert!(g.delete_tile_at(0, 0));
    assert_eq!(g.board().value(0, 0), 0);
    assert_eq!(g.void_crystals(), 0);
    assert!(!g.delete_tile_at(0, 1), "no void crystals left");
}

#[test]
fn test_best_score_tracks_score() {
    let mut g = game(3, &[vec![2, 2, 0], vec![0; 3], vec![0; 3]]);
    g.set_best_score(100);
    g.apply_move(Direction::Left);
    assert_eq!(g.score(), 4);
    assert_eq!(g.best_score(), 100);

    let mut g = game(3, &[vec![2, 2, 0], vec![0; 3], vec![0; 3]]);
    g.apply_move(Direction::Left);
    assert_eq!(g.best_score(), 4);
}

#[test]
fn test_quantum_jump_after_move_is_scored_and_reported() {
    let mut g = GameState::with_rng(
        Settings {
            quantum_bonus_chance: 1.0,
            ..quiet(6)
        },
        StepRng::new(0, 0),
    );
    let mut values = vec![vec![0; 6]; 6];
    values[0][0] = 8;
    values[1][0] = 4;
    values[1][1] = 8;
    values[3][0] = 2;
    values[3][1] = 2;
    g.load_values(&values);

    let reports = g.apply_move(Direction::Left);
    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(
        report.quantum_jumps,
        vec![QuantumJump {
            from: Pos::new(1, 1),
            to: Pos::new(0, 0),
            value: 16
        }]
    );
    // 4 from the merge in row 3, 16 from the jump
    assert_eq!(report.score_delta, 20);
    assert_eq!(g.score(), 20);
    assert_eq!(g.board().value(0, 0), 16);
    assert_eq!(g.board().value(1, 1), 0);
}
