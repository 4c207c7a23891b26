use tetris3d::core::{
    BoardSettings, FlowEvent, GameFlow, GameOverReason, GameSettings, Phase, ScoreTable,
    ShapeCatalog, ShapeDef, ShapeId,
};
use tetris3d::types::{Axis, Cell, GameAction, Rgb, TurnDir};

fn shape(id: &str, cells: &[(i32, i32, i32)]) -> ShapeDef {
    ShapeDef {
        id: id.into(),
        cells: cells.iter().map(|&(x, y, z)| Cell::new(x, y, z)).collect(),
        pivot: Cell::ZERO,
        color: Rgb::new(120, 200, 40),
        weight: 1.0,
        complexity: 1,
    }
}

fn board(width: i32, height: i32, depth: i32, spawn: Cell) -> GameSettings {
    GameSettings {
        board: BoardSettings {
            width,
            height,
            depth,
            ..BoardSettings::default()
        },
        spawn_pivot: spawn,
        ..GameSettings::default()
    }
}

fn started(settings: GameSettings, shapes: Vec<ShapeDef>, seed: u64) -> GameFlow {
    let mut game = GameFlow::new(settings, ShapeCatalog::new(shapes).unwrap(), seed).unwrap();
    game.start();
    game
}

/// Soft-drop until the current piece locks (or the game ends).
fn drop_piece(game: &mut GameFlow) -> Vec<FlowEvent> {
    let _ = game.drain_events().count();
    for _ in 0..1000 {
        game.soft_drop();
        let events: Vec<_> = game.drain_events().collect();
        if events
            .iter()
            .any(|e| matches!(e, FlowEvent::Locked { .. } | FlowEvent::GameOver(_)))
        {
            return events;
        }
    }
    panic!("piece never locked");
}

fn spawned_shapes(game: &mut GameFlow, pieces: usize) -> Vec<ShapeId> {
    let mut shapes = vec![game.active().unwrap().shape()];
    for _ in 0..pieces {
        for event in drop_piece(game) {
            if let FlowEvent::Spawned(id) = event {
                shapes.push(id);
            }
        }
    }
    shapes
}

#[test]
fn start_spawns_and_reserves_next() {
    let mut game =
        GameFlow::new(GameSettings::default(), ShapeCatalog::builtin(), 77).unwrap();
    assert!(!game.started());
    assert_eq!(game.phase(), Phase::Spawning);

    game.start();
    assert!(game.started());
    assert_eq!(game.phase(), Phase::Falling);
    assert!(game.next().is_some());
    let piece = game.active().unwrap();
    assert_eq!(piece.pivot(), game.settings().spawn_pivot);

    let events: Vec<_> = game.drain_events().collect();
    assert_eq!(events, vec![FlowEvent::Spawned(piece_shape(&game))]);
}

fn piece_shape(game: &GameFlow) -> ShapeId {
    game.active().map(|p| p.shape()).unwrap()
}

#[test]
fn same_seed_gives_same_piece_sequence() {
    let mut a = GameFlow::new(GameSettings::default(), ShapeCatalog::builtin(), 2024).unwrap();
    let mut b = GameFlow::new(GameSettings::default(), ShapeCatalog::builtin(), 2024).unwrap();
    a.start();
    b.start();
    assert_eq!(spawned_shapes(&mut a, 8), spawned_shapes(&mut b, 8));
    assert_eq!(a.seed(), 2024);
}

#[test]
fn two_layer_clear_scores_the_pair_bonus() {
    let mut game = started(
        board(1, 4, 1, Cell::new(0, 3, 0)),
        vec![shape("pillar", &[(0, 0, 0), (0, -1, 0)])],
        1,
    );

    let events = drop_piece(&mut game);
    assert!(events.contains(&FlowEvent::LayersCleared { count: 2, total: 2 }));
    assert_eq!(game.score(), 300);
    assert_eq!(game.layers_cleared(), 2);
    assert_eq!(game.level(), 2);
    assert_eq!(game.grid().occupied_count(), 0);
}

#[test]
fn disabled_scoring_still_counts_layers() {
    let mut settings = board(1, 4, 1, Cell::new(0, 3, 0));
    settings.scoring = ScoreTable {
        enabled: false,
        ..ScoreTable::default()
    };
    let mut game = started(settings, vec![shape("cube", &[(0, 0, 0)])], 1);

    drop_piece(&mut game);
    drop_piece(&mut game);
    assert_eq!(game.score(), 0);
    assert_eq!(game.layers_cleared(), 2);
    assert_eq!(game.level(), 2);
}

#[test]
fn level_up_shortens_the_fall_interval() {
    let mut game = started(
        board(1, 4, 1, Cell::new(0, 3, 0)),
        vec![shape("cube", &[(0, 0, 0)])],
        1,
    );
    let slow = game.fall_interval_ms();
    for _ in 0..8 {
        drop_piece(&mut game);
    }
    assert_eq!(game.level(), 5);
    assert!(game.fall_interval_ms() < slow);
    assert_eq!(game.hud().fall_interval_ms, game.fall_interval_ms());
}

#[test]
fn partial_layer_is_kept() {
    let mut game = started(
        board(2, 4, 1, Cell::new(0, 3, 0)),
        vec![shape("cube", &[(0, 0, 0)])],
        1,
    );
    let events = drop_piece(&mut game);
    assert!(events.contains(&FlowEvent::Locked {
        shape: piece_shape(&game),
        placed: 1
    }));
    assert!(!events
        .iter()
        .any(|e| matches!(e, FlowEvent::LayersCleared { .. })));
    assert!(game.grid().is_occupied(Cell::new(0, 0, 0)));
    assert_eq!(game.score(), 0);
}

#[test]
fn actions_dispatch_to_moves_and_rotations() {
    let mut game = started(
        GameSettings::default(),
        vec![shape("bar", &[(-1, 0, 0), (0, 0, 0), (1, 0, 0)])],
        5,
    );
    let start = game.active().unwrap().pivot();

    assert!(game.apply_action(GameAction::MoveRight));
    assert!(game.apply_action(GameAction::MoveForward));
    assert_eq!(game.active().unwrap().pivot(), start + Cell::new(1, 0, 1));
    assert!(game.apply_action(GameAction::MoveLeft));
    assert!(game.apply_action(GameAction::MoveBack));
    assert_eq!(game.active().unwrap().pivot(), start);

    assert!(game.apply_action(GameAction::Rotate(Axis::Y, TurnDir::Cw)));
    assert!(game.active_cells().iter().all(|c| c.x == start.x));
    assert!(game.apply_action(GameAction::Rotate(Axis::Y, TurnDir::Ccw)));
    assert!(game.active_cells().iter().all(|c| c.z == start.z));

    // Bar lies in the top layer: turning about Z would poke above the pit.
    assert!(!game.apply_action(GameAction::Rotate(Axis::Z, TurnDir::Cw)));

    assert!(game.apply_action(GameAction::SoftDrop));
    assert_eq!(game.active().unwrap().pivot().y, start.y - 1);
}

#[test]
fn moves_stop_at_the_walls() {
    let mut game = started(
        GameSettings::default(),
        vec![shape("cube", &[(0, 0, 0)])],
        5,
    );
    let mut moved = 0;
    while game.apply_action(GameAction::MoveLeft) {
        moved += 1;
    }
    assert_eq!(moved, 4);
    assert_eq!(game.active().unwrap().pivot().x, 0);
}

#[test]
fn hold_with_empty_slot_brings_in_next() {
    let mut game = GameFlow::new(GameSettings::default(), ShapeCatalog::builtin(), 8).unwrap();
    game.start();
    let first = piece_shape(&game);
    let next = game.next().unwrap();
    let _ = game.drain_events().count();

    assert!(game.apply_action(GameAction::Hold));
    assert_eq!(game.held(), Some(first));
    assert_eq!(piece_shape(&game), next);
    assert!(!game.hud().can_hold);

    let events: Vec<_> = game.drain_events().collect();
    assert_eq!(
        events,
        vec![
            FlowEvent::Held {
                stashed: first,
                released: None
            },
            FlowEvent::Spawned(next),
        ]
    );

    drop_piece(&mut game);
    assert!(game.can_hold());
}

#[test]
fn pause_freezes_gravity() {
    let mut game = GameFlow::new(GameSettings::default(), ShapeCatalog::builtin(), 3).unwrap();
    game.start();
    let pivot = game.active().unwrap().pivot();

    assert!(game.apply_action(GameAction::Pause));
    assert!(game.hud().paused);
    assert!(!game.hud().playable());
    for _ in 0..100 {
        assert!(!game.tick(1000));
    }
    assert_eq!(game.active().unwrap().pivot(), pivot);

    assert!(game.apply_action(GameAction::Pause));
    assert!(game.tick(game.fall_interval_ms()));
    assert_eq!(game.active().unwrap().pivot(), pivot - Cell::Y);
}

#[test]
fn stacking_in_place_eventually_tops_out() {
    let mut game = GameFlow::new(GameSettings::default(), ShapeCatalog::builtin(), 99).unwrap();
    game.start();

    let mut reason = None;
    for _ in 0..20_000 {
        game.soft_drop();
        if let Some(r) = game.drain_events().find_map(|e| match e {
            FlowEvent::GameOver(r) => Some(r),
            _ => None,
        }) {
            reason = Some(r);
            break;
        }
    }

    assert_eq!(reason, Some(GameOverReason::ToppedOut));
    assert!(game.is_game_over());
    assert!(game.active().is_none());
    assert!(game.active_cells().is_empty());
    assert!(game.hud().game_over);
    assert!(!game.apply_action(GameAction::SoftDrop));
    assert!(!game.apply_action(GameAction::Pause));

    // Restart is the only way out.
    assert!(game.apply_action(GameAction::Restart));
    assert_eq!(game.phase(), Phase::Falling);
    assert_eq!(game.grid().occupied_count(), 0);
    assert!(game.drain_events().any(|e| e == FlowEvent::Restarted));
}

#[test]
fn tick_accumulates_small_frames() {
    let mut game = started(
        GameSettings::default(),
        vec![shape("cube", &[(0, 0, 0)])],
        1,
    );
    let interval = game.fall_interval_ms();
    let frame = 16;
    let mut frames = 0;
    while !game.tick(frame) {
        frames += 1;
        assert!(frames < 1000);
    }
    assert_eq!(frames, interval.div_ceil(frame) - 1);
    assert_eq!(game.active().unwrap().pivot().y, 18);
}
