//! Special tile behaviour driven through the public game API.
//!
//! Every game here uses a zero-stepping RNG: spawns land on the first vacant
//! cell, special spawns and quantum jumps never fire, and phase cycles take
//! the shortest length.

use quantum2048::core::{GameEvent, GameState, MoveOutcome, Pos, Settings, TileId};
use quantum2048::types::{
    Direction, Gravity, TileKind, ECHO_LIFETIME_TURNS, ECHO_TIMEOUT_PENALTY, PHASE_CYCLE_MIN,
};
use rand::rngs::mock::StepRng;

fn quiet() -> Settings {
    Settings {
        quantum_bonus_chance: 0.0,
        phase_spawn_chance: 0.0,
        echo_spawn_chance: 0.0,
        portal_spawn_chance: 0.0,
        ..Settings::default()
    }
}

fn empty_game() -> GameState<StepRng> {
    let mut g = GameState::with_rng(quiet(), StepRng::new(0, 0));
    g.load_values(&vec![vec![0; 6]; 6]);
    g
}

fn outcome_events(outcome: MoveOutcome) -> Vec<GameEvent> {
    match outcome {
        MoveOutcome::Resolved(resolved) => resolved.events,
        MoveOutcome::Unchanged { events } => events,
        MoveOutcome::Inactive | MoveOutcome::Queued => Vec::new(),
    }
}

#[test]
fn test_echo_copy_expires_after_lifetime() {
    let mut g = empty_game();
    g.place_tile(0, 1, 8, TileKind::Normal);
    let (orig, copy) = g.spawn_echo_tile(0, 0, 64).unwrap();
    let copy = copy.unwrap();
    assert_eq!((copy.r, copy.c), (0, 2));
    let copy_id = g.echo_pairs().get(orig).unwrap().copy_id;

    // Row 0 is already packed to the left, so every attempt is a no-op that
    // still ages the pair.
    for _ in 1..ECHO_LIFETIME_TURNS {
        let events = outcome_events(g.resolve_move(Direction::Left));
        assert!(events.is_empty());
    }
    assert_eq!(g.echo_pairs().len(), 1);

    let events = outcome_events(g.resolve_move(Direction::Left));
    assert_eq!(
        events,
        vec![GameEvent::EchoExpired {
            original: orig,
            copy: copy_id,
            penalty: 10
        }]
    );
    assert!(g.echo_pairs().is_empty());
    assert_eq!(g.board().value(0, 2), 0);
    assert!(g.board().find(orig).is_some());
    // Penalty never drives the score negative.
    assert_eq!(g.score(), 0);
}

#[test]
fn test_echo_expiry_takes_penalty_from_score() {
    let mut g = empty_game();
    g.place_tile(0, 0, 8, TileKind::Normal);
    g.place_tile(0, 1, 8, TileKind::Normal);
    g.apply_move(Direction::Left);
    assert_eq!(g.score(), 16);
    assert_eq!(g.board().to_values()[0], vec![16, 2, 2, 0, 0, 0]);

    let (orig, copy) = g.spawn_echo_tile(1, 0, 64).unwrap();
    assert_eq!(copy, Some(Pos::new(0, 3)));

    // Everything already rests against the top edge.
    for _ in 1..ECHO_LIFETIME_TURNS {
        g.resolve_move(Direction::Up);
    }
    assert_eq!(g.score(), 16);
    let events = outcome_events(g.resolve_move(Direction::Up));
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::EchoExpired { original, .. } if *original == orig)));
    assert_eq!(g.score(), 16 - ECHO_TIMEOUT_PENALTY);
    assert_eq!(g.board().value(0, 3), 0);
}

fn spawn_only(phase: f64, echo: f64, portal: f64) -> GameState {
    GameState::new(
        Settings {
            phase_spawn_chance: phase,
            echo_spawn_chance: echo,
            portal_spawn_chance: portal,
            ..quiet()
        },
        5,
    )
}

#[test]
fn test_random_spawn_follows_certain_chance() {
    let mut g = spawn_only(1.0, 0.0, 0.0);
    let placed = g.add_random_tile();
    assert_eq!(placed.len(), 1);
    let tile = g.board().at(placed[0]).unwrap();
    assert_eq!(tile.kind(), TileKind::Phase);
    assert!(tile.is_tangible());

    let mut g = spawn_only(0.0, 0.0, 1.0);
    let placed = g.add_random_tile();
    assert_eq!(placed.len(), 1);
    assert_eq!(g.board().at(placed[0]).unwrap().kind(), TileKind::Portal);
}

#[test]
fn test_random_echo_spawn_registers_one_pair() {
    let mut g = spawn_only(0.0, 1.0, 0.0);
    let placed = g.add_random_tile();
    assert_eq!(placed.len(), 2);
    assert_ne!(placed[0], placed[1]);
    assert_eq!(g.echo_pairs().len(), 1);
    for pos in &placed {
        assert_eq!(g.board().at(*pos).unwrap().kind(), TileKind::Echo);
    }
    assert_eq!(g.board().value(placed[0].r, placed[0].c), g.board().value(placed[1].r, placed[1].c));
}

#[test]
fn test_echo_twins_merging_grant_crystal() {
    let mut g = empty_game();
    let crystals = g.crystals();
    let (orig, copy) = g.spawn_echo_tile(0, 0, 4).unwrap();
    assert_eq!(copy.map(|p| (p.r, p.c)), Some((0, 1)));

    let reports = g.apply_move(Direction::Left);
    assert_eq!(reports.len(), 1);
    assert_eq!(g.board().value(0, 0), 8);
    assert_eq!(g.board().get(0, 0).unwrap().kind(), TileKind::Normal);
    assert_eq!(g.crystals(), crystals + 1);
    assert!(g.echo_pairs().is_empty());
    assert!(reports[0]
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::EchoMerged { original, .. } if *original == orig)));
}

#[test]
fn test_echo_merging_with_stranger_removes_copy() {
    let mut g = empty_game();
    g.place_tile(0, 1, 4, TileKind::Normal);
    let (orig, _) = g.spawn_echo_tile(0, 0, 4).unwrap();
    let copy_id: TileId = g.echo_pairs().get(orig).unwrap().copy_id;
    assert_eq!(g.board().find(copy_id).map(|p| (p.r, p.c)), Some((0, 2)));

    let crystals = g.crystals();
    g.apply_move(Direction::Left);
    assert_eq!(g.board().value(0, 0), 8);
    assert!(g.board().find(copy_id).is_none());
    assert_eq!(g.crystals(), crystals + 1);
}

#[test]
fn test_portal_teleports_follower_to_row_end() {
    let mut g = empty_game();
    g.spawn_portal_tile(0, 0, 2);
    g.place_tile(0, 1, 4, TileKind::Normal);

    assert!(matches!(g.resolve_move(Direction::Left), MoveOutcome::Resolved(_)));
    assert_eq!(g.board().to_values()[0], vec![2, 0, 0, 0, 0, 4]);
    assert!(g.board().get(0, 0).unwrap().is_portal());
}

#[test]
fn test_fused_portals_clear_a_row_after_spawning() {
    let mut g = empty_game();
    g.spawn_portal_tile(1, 0, 4);
    g.spawn_portal_tile(1, 1, 4);

    let reports = g.apply_move(Direction::Left);
    let report = &reports[0];
    assert!(report.events.iter().any(|e| matches!(e, GameEvent::PortalsFused { .. })));

    // Spawns land on row 0 first, then the zero stream picks row 0 to clear.
    assert!(report.events.contains(&GameEvent::RowCleared { row: 0 }));
    assert!(g.board().row(0).iter().all(|t| t.value == 0));
    assert!(report.spawned.iter().all(|p| p.r != 0));
    assert_eq!(g.board().value(1, 0), 8);
    assert!(!g.board().get(1, 0).unwrap().is_portal());
}

#[test]
fn test_phase_tile_blinks_out_and_is_passed_through() {
    let mut g = empty_game();
    g.spawn_phase_tile(0, 0, 2);

    for _ in 0..PHASE_CYCLE_MIN - 1 {
        g.resolve_move(Direction::Left);
    }
    assert!(!g.board().get(0, 0).unwrap().is_phased());

    let events = outcome_events(g.resolve_move(Direction::Left));
    assert!(events.contains(&GameEvent::PhaseToggled {
        pos: Pos::new(0, 0),
        phased: true
    }));
    assert_eq!(g.board().value(0, 0), 0);
    let snap = g.snapshot();
    assert!(snap.cell(0, 0).phased);
    assert_eq!(snap.cell(0, 0).value, 2);

    // A phased tile keeps its slot; others settle around it.
    g.place_tile(0, 3, 4, TileKind::Normal);
    assert!(matches!(g.resolve_move(Direction::Left), MoveOutcome::Resolved(_)));
    assert_eq!(g.board().value(0, 1), 4);
    assert!(g.board().get(0, 0).unwrap().is_phased());
}

#[test]
fn test_phase_merge_scrambles_gravity_next_move() {
    let mut g = empty_game();
    g.spawn_phase_tile(0, 0, 2);
    g.place_tile(0, 1, 2, TileKind::Normal);

    g.apply_move(Direction::Left);
    assert_eq!(g.board().value(0, 0), 4);
    assert!(g.gravity_unstable());
    assert_eq!(g.gravity(), Gravity::South);

    let events = outcome_events(g.resolve_move(Direction::Up));
    assert!(events.contains(&GameEvent::GravityShifted {
        from: Gravity::South,
        to: Gravity::North
    }));
    assert!(!g.gravity_unstable());
    assert_eq!(g.gravity(), Gravity::North);
}
