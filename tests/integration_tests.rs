//! Integration tests for the session controller

use heatfall::core::junk::{junk_age, junk_batch_size, junk_interval};
use heatfall::core::{GameState, JunkScheduler, Piece, ResolveMode};
use heatfall::engine::{apply_place, Policy, RandomPolicy};
use heatfall::types::{
    Cell, DeathCause, GameAction, Phase, ShapeKind, GRID_ROWS, HIT_STOP_CHAIN, HIT_STOP_MS,
    JUNK_START, RESOLVE_STEP_MS,
};

fn single(level: u8) -> Piece {
    Piece::new(ShapeKind::Single, &[level])
}

fn immediate(seed: u32) -> GameState {
    let mut state = GameState::with_mode(seed, ResolveMode::Immediate);
    state.start();
    state
}

/// Drop a single tile of `level` into `col`
fn drop_single(state: &mut GameState, col: i8, level: u8) {
    assert!(state.set_active(single(level).at(0, col)));
    assert!(state.apply_action(GameAction::HardDrop));
}

#[test]
fn test_game_lifecycle() {
    let mut state = GameState::new(12345);
    assert_eq!(state.phase(), Phase::Ready);
    assert!(!state.apply_action(GameAction::HardDrop));

    state.start();
    assert_eq!(state.phase(), Phase::Playing);
    assert!(state.active().is_some());
    assert_eq!(state.turn(), 0);
    assert_eq!(state.score(), 0);
}

#[test]
fn test_two_level_two_singles_merge_for_sixty() {
    let mut state = immediate(1);
    assert!(state.set_active(single(2).at(11, 0)));
    state.lock_piece();
    assert!(state.set_active(single(2).at(11, 1)));
    state.lock_piece();

    assert_eq!(state.grid().get(11, 0), Some(Cell::Tile(3)));
    assert_eq!(state.grid().get(11, 1), Some(Cell::Empty));
    assert_eq!(state.grid().occupied_count(), 1);
    assert_eq!(state.score(), 60);
}

#[test]
fn test_heat_fires_on_tenth_lock() {
    let mut state = immediate(5);
    for i in 0..9 {
        drop_single(&mut state, 0, if i % 2 == 0 { 1 } else { 2 });
        assert!(!state.take_last_report().unwrap().heat);
    }
    assert_eq!(state.grid().get(11, 0), Some(Cell::Tile(1)));

    drop_single(&mut state, 5, 1);

    let report = state.take_last_report().unwrap();
    assert_eq!(report.turn, 10);
    assert!(report.heat);
    assert_eq!(report.merges, 0);
    assert_eq!(state.grid().get(11, 0), Some(Cell::Tile(2)));
    assert_eq!(state.grid().get(10, 0), Some(Cell::Tile(3)));
    assert_eq!(state.grid().get(3, 0), Some(Cell::Tile(2)));
    assert_eq!(state.grid().get(11, 5), Some(Cell::Tile(2)));
}

#[test]
fn test_heat_detonates_capped_tiles() {
    let mut state = immediate(5);
    for i in 0..9 {
        drop_single(&mut state, 0, if i % 2 == 0 { 1 } else { 2 });
    }
    state.grid_mut().set(11, 5, Cell::Tile(5));
    state.grid_mut().set(10, 5, Cell::Tile(1));
    state.grid_mut().set(11, 4, Cell::Junk);

    drop_single(&mut state, 3, 2);

    let report = state.take_last_report().unwrap();
    assert!(report.heat);
    assert_eq!(report.merges, 0);
    assert_eq!(report.explosions, 1);
    assert_eq!(report.chain, 1);
    assert_eq!(report.score_gained, 200);
    // Raised by heat, raised again by the blast, then fell into the crater.
    assert_eq!(state.grid().get(11, 5), Some(Cell::Tile(3)));
    assert_eq!(state.grid().get(10, 5), Some(Cell::Empty));
    assert_eq!(state.grid().get(11, 4), Some(Cell::Empty));
    assert_eq!(state.grid().get(11, 3), Some(Cell::Tile(3)));
}

#[test]
fn test_long_chain_triggers_hit_stop() {
    let mut state = GameState::new(3);
    state.start();
    state.grid_mut().set(11, 0, Cell::Tile(1));
    state.grid_mut().set(10, 0, Cell::Tile(2));
    state.grid_mut().set(9, 0, Cell::Tile(3));
    assert!(state.set_active(single(1).at(11, 1)));

    state.lock_piece();
    assert_eq!(state.phase(), Phase::Resolving);

    // One resolver iteration per step: three merges, then the stable check.
    assert!(state.tick(RESOLVE_STEP_MS, false));
    assert_eq!(state.chain(), 1);
    assert!(state.tick(RESOLVE_STEP_MS * 3, false));

    assert_eq!(state.phase(), Phase::HitStop);
    assert!(state.chain() >= HIT_STOP_CHAIN);
    assert_eq!(state.grid().get(11, 0), Some(Cell::Tile(4)));
    assert_eq!(state.score(), 30 + 60 + 180);
    let report = state.take_last_report().unwrap();
    assert_eq!((report.chain, report.merges), (3, 3));

    assert!(!state.apply_action(GameAction::MoveLeft));
    state.tick(HIT_STOP_MS - 1, false);
    assert_eq!(state.phase(), Phase::HitStop);
    state.tick(1, false);
    assert_eq!(state.phase(), Phase::Playing);
}

#[test]
fn test_immediate_mode_never_hit_stops() {
    let mut state = immediate(3);
    state.grid_mut().set(11, 0, Cell::Tile(1));
    state.grid_mut().set(10, 0, Cell::Tile(2));
    state.grid_mut().set(9, 0, Cell::Tile(3));
    assert!(state.set_active(single(1).at(11, 1)));

    state.lock_piece();

    assert_eq!(state.phase(), Phase::Playing);
    assert_eq!(state.score(), 270);
}

#[test]
fn test_terminal_state_is_irreversible() {
    let mut state = immediate(11);
    for row in 0..GRID_ROWS as i8 {
        state.grid_mut().set(row, 2, Cell::Junk);
    }
    assert!(state.set_active(single(1).at(11, 0)));
    state.lock_piece();

    assert_eq!(state.phase(), Phase::Dead);
    let death = state.take_death_report().unwrap();
    assert_eq!(death.cause, DeathCause::SpawnBlocked);
    assert_eq!((death.score, death.turn), (0, 1));
    assert!(state.take_death_report().is_none());

    let frozen = state.snapshot();
    for action in [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::HardDrop,
        GameAction::RotateCw,
        GameAction::RotateCcw,
        GameAction::Hold,
    ] {
        assert!(!state.apply_action(action));
    }
    assert!(!state.tick(100_000, true));
    state.lock_piece();
    state.resolve_now();
    assert!(!state.step_resolver());
    assert!(!state.set_active(single(1).at(11, 5)));

    assert_eq!(state.snapshot(), frozen);
    assert_eq!(state.score(), 0);
    assert_eq!(state.turn(), 1);
}

#[test]
fn test_junk_cadence_is_deterministic() {
    let mut a = JunkScheduler::new(2024);
    let mut b = JunkScheduler::new(2024);
    for turn in 0..200 {
        let batch = a.plan_next(turn);
        assert_eq!(batch, b.plan_next(turn));

        let expected = match junk_age(turn) {
            Some(ne) if ne % junk_interval(ne) == 0 => junk_batch_size(ne) as usize,
            _ => 0,
        };
        assert_eq!(batch.len(), expected, "turn {}", turn);
    }
}

#[test]
fn test_junk_warning_precedes_injection() {
    let mut state = immediate(8);
    // The first batch is planned when turn JUNK_START + 5 finishes.
    let mut col = 0i8;
    let mut level = 1u8;
    while state.turn() < JUNK_START + 5 {
        drop_single(&mut state, col, level);
        col = (col + 1) % 6;
        level = level % 5 + 1;
        assert!(!state.is_dead());
    }
    let warned: Vec<u8> = state.junk_warning().to_vec();
    assert!(!warned.is_empty());
    let snapshot = state.snapshot();
    for &c in &warned {
        assert!(snapshot.junk_warning[c as usize]);
    }

    drop_single(&mut state, 0, 1);
    let report = state.take_last_report().unwrap();
    assert!(report.junk_injected > 0);
    assert!(report.junk_injected as usize <= warned.len());
}

#[test]
fn test_same_seed_same_match() {
    fn play(seed: u32) -> Vec<u64> {
        let mut state = immediate(seed);
        let mut policy = RandomPolicy::new(seed);
        let mut hashes = Vec::new();
        while let Some(p) = policy.choose(&state) {
            apply_place(&mut state, p.col, p.rotation_steps, p.use_hold).unwrap();
            hashes.push(state.snapshot().board_hash);
            if state.turn() >= 80 {
                break;
            }
        }
        hashes
    }

    let first = play(77);
    assert!(!first.is_empty());
    assert_eq!(first, play(77));
}

#[test]
fn test_next_piece_becomes_active() {
    let mut state = immediate(21);
    let queued = state.next_piece().clone();

    assert!(state.apply_action(GameAction::HardDrop));

    let active = state.active().unwrap();
    assert_eq!(active.kind, queued.kind);
    assert_eq!(active.levels(), queued.levels());
}
