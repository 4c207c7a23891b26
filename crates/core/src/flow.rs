//! Game flow module - the turn state machine
//!
//! A turn runs `Spawning -> Falling -> Locking -> Clearing -> Spawning`, with
//! `GameOver` reachable from `Spawning`. Every public operation drives the
//! machine until it settles, so callers only ever observe `Falling` or
//! `GameOver`. Pausing is a separate flag that freezes gravity and input without
//! changing the phase.
//!
//! # Timing
//!
//! The front end calls [`GameFlow::tick`] with the elapsed milliseconds of each
//! frame. Elapsed time accumulates until it reaches the fall interval of the
//! current level; the accumulator is then zeroed (not reduced) and the piece
//! tries to drop one layer.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::GameSettings;
use crate::error::ConfigError;
use crate::grid::{Block, Grid};
use crate::piece::{ActivePiece, CellSet};
use crate::scoring::level_for;
use crate::shapes::{ShapeCatalog, ShapeId};
use crate::snapshot::{FlowEvent, GameOverReason, HudSnapshot};
use crate::types::{Axis, Cell, GameAction, TurnDir};

/// Turn phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Spawning,
    Falling,
    Locking,
    Clearing,
    GameOver,
}

/// A single game: grid, active piece, next/hold slots and progression.
#[derive(Debug, Clone)]
pub struct GameFlow {
    settings: GameSettings,
    catalog: ShapeCatalog,
    grid: Grid,
    rng: ChaCha8Rng,
    seed: u64,
    phase: Phase,
    active: Option<ActivePiece>,
    next: Option<ShapeId>,
    held: Option<ShapeId>,
    /// Shape released from the hold slot, spawned instead of `next`.
    swap_in: Option<ShapeId>,
    hold_used: bool,
    level: u32,
    layers_cleared: u32,
    score: u32,
    fall_timer_ms: u32,
    paused: bool,
    started: bool,
    fault: Option<ConfigError>,
    events: Vec<FlowEvent>,
}

impl GameFlow {
    /// Build a game. Nothing spawns until [`start`](Self::start).
    pub fn new(
        settings: GameSettings,
        catalog: ShapeCatalog,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let grid = Grid::new(settings.board.dims(), settings.board.geometry())?;
        let level = settings.start_level;

        Ok(Self {
            settings,
            catalog,
            grid,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            phase: Phase::Spawning,
            active: None,
            next: None,
            held: None,
            swap_in: None,
            hold_used: false,
            level,
            layers_cleared: 0,
            score: 0,
            fall_timer_ms: 0,
            paused: false,
            started: false,
            fault: None,
            events: Vec::new(),
        })
    }

    /// Reserve the first "next" shape and spawn the first piece.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        log::info!("game started (seed {})", self.seed);
        self.phase = Phase::Spawning;
        self.run_until_settled();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn layers_cleared(&self) -> u32 {
        self.layers_cleared
    }

    pub fn next(&self) -> Option<ShapeId> {
        self.next
    }

    pub fn held(&self) -> Option<ShapeId> {
        self.held
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Configuration problem that ended the game, if any.
    pub fn fault(&self) -> Option<&ConfigError> {
        self.fault.as_ref()
    }

    /// Current gravity interval.
    pub fn fall_interval_ms(&self) -> u32 {
        self.settings.fall.interval_ms(self.level)
    }

    /// World cells of the active piece (empty when there is none).
    pub fn active_cells(&self) -> CellSet {
        self.active
            .as_ref()
            .map(ActivePiece::world_cells)
            .unwrap_or_default()
    }

    /// True if a hold would currently be accepted.
    pub fn can_hold(&self) -> bool {
        self.can_act() && !self.hold_used
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.score,
            level: self.level,
            layers_cleared: self.layers_cleared,
            next: self.next,
            held: self.held,
            can_hold: self.can_hold(),
            paused: self.paused,
            game_over: self.is_game_over(),
            fall_interval_ms: self.fall_interval_ms(),
        }
    }

    /// Take all events queued since the last call, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = FlowEvent> + '_ {
        self.events.drain(..)
    }

    /// Advance gravity by `elapsed_ms`. Returns true if the piece moved or locked.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.can_act() {
            return false;
        }

        self.fall_timer_ms = self.fall_timer_ms.saturating_add(elapsed_ms);
        if self.fall_timer_ms < self.fall_interval_ms() {
            return false;
        }
        self.fall_timer_ms = 0;
        self.step_fall();
        true
    }

    /// Shift the active piece by `delta`.
    pub fn try_move(&mut self, delta: Cell) -> bool {
        if !self.can_act() {
            return false;
        }
        let grid = &self.grid;
        self.active
            .as_mut()
            .is_some_and(|piece| piece.try_move(grid, delta))
    }

    /// Rotate the active piece a quarter turn about `axis`.
    pub fn try_rotate(&mut self, axis: Axis, dir: TurnDir) -> bool {
        if !self.can_act() {
            return false;
        }
        let grid = &self.grid;
        self.active
            .as_mut()
            .is_some_and(|piece| piece.try_rotate(grid, axis, dir))
    }

    /// One immediate gravity step (drop a layer or lock), restarting the fall timer.
    pub fn soft_drop(&mut self) -> bool {
        if !self.can_act() {
            return false;
        }
        self.fall_timer_ms = 0;
        self.step_fall();
        true
    }

    /// Bank the current shape; once per locked piece.
    ///
    /// With an empty slot the next piece comes in (and a new next is reserved).
    /// Otherwise the banked shape comes back at the spawn pivot and the next
    /// piece is left alone.
    pub fn hold(&mut self) -> bool {
        if !self.can_hold() {
            return false;
        }
        let Some(piece) = self.active.take() else {
            return false;
        };

        let stashed = piece.shape();
        let released = self.held.replace(stashed);
        self.swap_in = released;
        self.hold_used = true;
        log::debug!("hold: stashed {:?}, released {:?}", stashed, released);
        self.events.push(FlowEvent::Held { stashed, released });

        self.phase = Phase::Spawning;
        self.run_until_settled();
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        let paused = !self.paused;
        self.set_paused(paused)
    }

    /// Returns true if the flag changed.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        if self.is_game_over() || self.paused == paused {
            return false;
        }
        self.paused = paused;
        log::debug!("paused: {}", paused);
        self.events.push(FlowEvent::Paused(paused));
        true
    }

    /// Start over with an empty grid. The RNG stream continues.
    pub fn restart(&mut self) {
        self.grid.clear_all();
        self.active = None;
        self.next = None;
        self.held = None;
        self.swap_in = None;
        self.hold_used = false;
        self.level = self.settings.start_level;
        self.layers_cleared = 0;
        self.score = 0;
        self.fall_timer_ms = 0;
        self.paused = false;
        self.fault = None;
        self.started = true;

        log::info!("game restarted");
        self.events.push(FlowEvent::Restarted);

        self.phase = Phase::Spawning;
        self.run_until_settled();
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.try_move(Cell::NEG_X),
            GameAction::MoveRight => self.try_move(Cell::X),
            GameAction::MoveForward => self.try_move(Cell::Z),
            GameAction::MoveBack => self.try_move(Cell::NEG_Z),
            GameAction::Rotate(axis, dir) => self.try_rotate(axis, dir),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::Hold => self.hold(),
            GameAction::Pause => self.toggle_pause(),
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }

    fn can_act(&self) -> bool {
        self.started && !self.paused && self.phase == Phase::Falling && self.active.is_some()
    }

    fn step_fall(&mut self) {
        let grid = &self.grid;
        let moved = self
            .active
            .as_mut()
            .is_some_and(|piece| piece.try_move(grid, Cell::NEG_Y));
        if !moved {
            self.phase = Phase::Locking;
            self.run_until_settled();
        }
    }

    fn run_until_settled(&mut self) {
        loop {
            match self.phase {
                Phase::Spawning => self.spawn_step(),
                Phase::Locking => self.lock_step(),
                Phase::Clearing => self.clear_step(),
                Phase::Falling | Phase::GameOver => break,
            }
        }
    }

    fn spawn_step(&mut self) {
        let shape = match self.swap_in.take() {
            Some(id) => id,
            None => {
                let drawn = self
                    .next
                    .take()
                    .or_else(|| self.catalog.pick(&mut self.rng));
                let Some(id) = drawn else {
                    self.fail_config(ConfigError::EmptyShapePool);
                    return;
                };
                self.next = self.catalog.pick(&mut self.rng);
                id
            }
        };

        let Some(piece) = ActivePiece::spawn(&self.catalog, shape, self.settings.spawn_pivot) else {
            self.fail_config(ConfigError::EmptyShapePool);
            return;
        };

        if !self.grid.can_place(&piece.world_cells()) {
            self.end_game(GameOverReason::ToppedOut);
            return;
        }

        self.active = Some(piece);
        self.fall_timer_ms = 0;
        self.events.push(FlowEvent::Spawned(shape));
        self.phase = Phase::Falling;
    }

    fn lock_step(&mut self) {
        let Some(piece) = self.active.take() else {
            self.phase = Phase::Spawning;
            return;
        };

        let shape = piece.shape();
        let color = self
            .catalog
            .get(shape)
            .map(|s| s.color())
            .unwrap_or_default();
        let cells = piece.world_cells();
        let placed = self.grid.place_cells(&cells, Block { color, shape });
        if placed < cells.len() {
            log::warn!(
                "lock of {:?} placed {} of {} cells",
                shape,
                placed,
                cells.len()
            );
        }
        log::debug!("locked {:?} at {}", shape, piece.pivot());

        self.hold_used = false;
        self.events.push(FlowEvent::Locked { shape, placed });
        self.phase = Phase::Clearing;
    }

    fn clear_step(&mut self) {
        self.phase = Phase::Spawning;

        let cleared = self.grid.clear_full_layers();
        if cleared == 0 {
            return;
        }

        self.layers_cleared = self.layers_cleared.saturating_add(cleared as u32);
        self.score = self
            .score
            .saturating_add(self.settings.scoring.points_for(cleared));
        log::debug!(
            "cleared {} layer(s), total {}, score {}",
            cleared,
            self.layers_cleared,
            self.score
        );
        self.events.push(FlowEvent::LayersCleared {
            count: cleared,
            total: self.layers_cleared,
        });

        let level = self
            .level
            .max(level_for(self.layers_cleared, self.settings.level_up_every_clears));
        if level > self.level {
            self.level = level;
            log::info!("level up: {}", level);
            self.events.push(FlowEvent::LevelUp(level));
        }
    }

    fn fail_config(&mut self, err: ConfigError) {
        log::error!("cannot continue: {}", err);
        self.fault = Some(err.clone());
        self.end_game(GameOverReason::Config(err));
    }

    fn end_game(&mut self, reason: GameOverReason) {
        log::info!(
            "game over ({:?}): score {}, level {}, layers {}",
            reason,
            self.score,
            self.level,
            self.layers_cleared
        );
        self.active = None;
        self.phase = Phase::GameOver;
        self.events.push(FlowEvent::GameOver(reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardSettings;
    use crate::shapes::ShapeDef;
    use crate::types::Rgb;

    fn cube_catalog() -> ShapeCatalog {
        ShapeCatalog::new(vec![ShapeDef {
            id: "cube".into(),
            cells: vec![Cell::ZERO],
            pivot: Cell::ZERO,
            color: Rgb::new(200, 200, 0),
            weight: 1.0,
            complexity: 1,
        }])
        .unwrap()
    }

    fn settings(width: i32, height: i32, depth: i32, spawn: Cell) -> GameSettings {
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

    /// 1x4x1 shaft: every cube lands on the floor and clears it.
    fn shaft() -> GameFlow {
        let mut flow = GameFlow::new(settings(1, 4, 1, Cell::new(0, 3, 0)), cube_catalog(), 1).unwrap();
        flow.start();
        flow
    }

    fn drop_to_lock(flow: &mut GameFlow) {
        let before = flow.events.len();
        while flow.soft_drop() {
            if flow.events[before..]
                .iter()
                .any(|e| matches!(e, FlowEvent::Locked { .. }))
            {
                break;
            }
        }
    }

    #[test]
    fn test_new_does_not_spawn() {
        let flow = GameFlow::new(GameSettings::default(), ShapeCatalog::builtin(), 3).unwrap();
        assert!(!flow.started());
        assert!(flow.active().is_none());
        assert_eq!(flow.next(), None);
        assert_eq!(flow.level(), 1);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut flow = GameFlow::new(GameSettings::default(), ShapeCatalog::builtin(), 3).unwrap();
        flow.start();
        let piece = flow.active().cloned();
        let next = flow.next();
        flow.start();
        assert_eq!(flow.active().cloned(), piece);
        assert_eq!(flow.next(), next);
        assert_eq!(flow.phase(), Phase::Falling);
    }

    #[test]
    fn test_single_cell_falls_nineteen_layers() {
        let mut flow =
            GameFlow::new(GameSettings::default(), cube_catalog(), 9).unwrap();
        flow.start();
        assert_eq!(flow.active().unwrap().pivot(), Cell::new(4, 19, 4));

        let interval = flow.fall_interval_ms();
        for _ in 0..19 {
            assert!(flow.tick(interval));
        }
        assert_eq!(flow.active().unwrap().pivot(), Cell::new(4, 0, 4));
        assert_eq!(flow.grid().occupied_count(), 0);

        // Next step locks and respawns.
        assert!(flow.tick(interval));
        assert_eq!(flow.grid().occupied_count(), 1);
        assert!(flow.grid().is_occupied(Cell::new(4, 0, 4)));
        assert_eq!(flow.layers_cleared(), 0);
        assert_eq!(flow.active().unwrap().pivot(), Cell::new(4, 19, 4));
    }

    #[test]
    fn test_tick_accumulates_and_resets() {
        let mut flow = GameFlow::new(GameSettings::default(), cube_catalog(), 9).unwrap();
        flow.start();
        let interval = flow.fall_interval_ms();

        assert!(!flow.tick(interval - 1));
        assert_eq!(flow.active().unwrap().pivot().y, 19);
        // Overshoot is discarded rather than carried.
        assert!(flow.tick(interval));
        assert_eq!(flow.active().unwrap().pivot().y, 18);
        assert!(!flow.tick(interval - 1));
        assert_eq!(flow.active().unwrap().pivot().y, 18);
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let mut flow = GameFlow::new(GameSettings::default(), cube_catalog(), 9).unwrap();
        assert!(!flow.tick(10_000));
        assert!(!flow.soft_drop());
        assert!(!flow.hold());
    }

    #[test]
    fn test_clear_scores_and_levels_up() {
        let mut flow = shaft();

        drop_to_lock(&mut flow);
        assert_eq!(flow.layers_cleared(), 1);
        assert_eq!(flow.score(), 100);
        assert_eq!(flow.level(), 1);
        assert_eq!(flow.grid().occupied_count(), 0);

        drop_to_lock(&mut flow);
        assert_eq!(flow.layers_cleared(), 2);
        assert_eq!(flow.score(), 200);
        assert_eq!(flow.level(), 2);

        let events: Vec<_> = flow.drain_events().collect();
        assert!(events.contains(&FlowEvent::LevelUp(2)));
        assert!(events.contains(&FlowEvent::LayersCleared { count: 1, total: 2 }));
        assert_eq!(flow.drain_events().count(), 0);
    }

    #[test]
    fn test_start_level_is_a_floor() {
        let mut s = settings(1, 4, 1, Cell::new(0, 3, 0));
        s.start_level = 3;
        let mut flow = GameFlow::new(s, cube_catalog(), 1).unwrap();
        flow.start();
        for _ in 0..4 {
            drop_to_lock(&mut flow);
        }
        // 1 + 4 / 2 = 3: no change yet
        assert_eq!(flow.level(), 3);
        drop_to_lock(&mut flow);
        drop_to_lock(&mut flow);
        assert_eq!(flow.level(), 4);
    }

    #[test]
    fn test_hold_empty_slot_consumes_next() {
        let mut flow = GameFlow::new(GameSettings::default(), ShapeCatalog::builtin(), 42).unwrap();
        flow.start();
        let current = flow.active().unwrap().shape();
        let next = flow.next().unwrap();

        assert!(flow.hold());
        assert_eq!(flow.held(), Some(current));
        assert_eq!(flow.active().unwrap().shape(), next);
        assert!(flow.next().is_some());
        assert!(!flow.can_hold());
    }

    #[test]
    fn test_hold_twice_in_one_turn_is_noop() {
        let mut flow = GameFlow::new(GameSettings::default(), ShapeCatalog::builtin(), 42).unwrap();
        flow.start();
        assert!(flow.hold());
        let snapshot = (flow.active().cloned(), flow.held(), flow.next());
        assert!(!flow.hold());
        assert_eq!((flow.active().cloned(), flow.held(), flow.next()), snapshot);
    }

    #[test]
    fn test_hold_swap_leaves_next_untouched() {
        let mut flow = GameFlow::new(GameSettings::default(), ShapeCatalog::builtin(), 42).unwrap();
        flow.start();
        assert!(flow.hold());
        let banked = flow.held().unwrap();

        drop_to_lock(&mut flow);
        assert!(flow.can_hold());

        let current = flow.active().unwrap().shape();
        let next = flow.next();
        assert!(flow.hold());
        assert_eq!(flow.active().unwrap().shape(), banked);
        assert_eq!(flow.active().unwrap().pivot(), flow.settings().spawn_pivot);
        assert_eq!(flow.held(), Some(current));
        assert_eq!(flow.next(), next);
    }

    #[test]
    fn test_pause_blocks_everything_but_unpause() {
        let mut flow = GameFlow::new(GameSettings::default(), cube_catalog(), 5).unwrap();
        flow.start();
        let pivot = flow.active().unwrap().pivot();

        assert!(flow.toggle_pause());
        assert!(!flow.tick(100_000));
        assert!(!flow.try_move(Cell::X));
        assert!(!flow.try_rotate(Axis::Y, TurnDir::Cw));
        assert!(!flow.soft_drop());
        assert!(!flow.hold());
        assert!(!flow.hud().can_hold);
        assert_eq!(flow.active().unwrap().pivot(), pivot);

        assert!(!flow.set_paused(true));
        assert!(flow.apply_action(GameAction::Pause));
        assert!(flow.try_move(Cell::X));
    }

    #[test]
    fn test_tops_out_when_spawn_is_blocked() {
        let mut flow = GameFlow::new(settings(2, 2, 1, Cell::new(0, 1, 0)), cube_catalog(), 1).unwrap();
        flow.start();
        drop_to_lock(&mut flow);
        drop_to_lock(&mut flow);

        assert!(flow.is_game_over());
        assert!(flow.active().is_none());
        assert!(flow.fault().is_none());
        assert!(flow
            .drain_events()
            .any(|e| e == FlowEvent::GameOver(GameOverReason::ToppedOut)));

        assert!(!flow.toggle_pause());
        assert!(!flow.tick(10_000));
        assert!(!flow.apply_action(GameAction::MoveRight));
    }

    #[test]
    fn test_empty_pool_is_config_fault() {
        let mut flow =
            GameFlow::new(GameSettings::default(), ShapeCatalog::new(vec![]).unwrap(), 1).unwrap();
        flow.start();
        assert!(flow.is_game_over());
        assert_eq!(flow.fault(), Some(&ConfigError::EmptyShapePool));
        assert!(flow.hud().game_over);
    }

    #[test]
    fn test_restart_resets_progress() {
        let mut flow = shaft();
        drop_to_lock(&mut flow);
        drop_to_lock(&mut flow);
        flow.soft_drop();
        flow.toggle_pause();
        assert!(flow.score() > 0);

        assert!(flow.apply_action(GameAction::Restart));
        assert_eq!(flow.score(), 0);
        assert_eq!(flow.level(), 1);
        assert_eq!(flow.layers_cleared(), 0);
        assert_eq!(flow.grid().occupied_count(), 0);
        assert!(!flow.paused());
        assert_eq!(flow.held(), None);
        assert_eq!(flow.phase(), Phase::Falling);
        assert_eq!(flow.active().unwrap().pivot(), Cell::new(0, 3, 0));
    }

    #[test]
    fn test_restart_recovers_from_game_over() {
        let mut flow = GameFlow::new(settings(2, 2, 1, Cell::new(0, 1, 0)), cube_catalog(), 1).unwrap();
        flow.start();
        drop_to_lock(&mut flow);
        drop_to_lock(&mut flow);
        assert!(flow.is_game_over());

        flow.restart();
        assert!(!flow.is_game_over());
        assert!(flow.active().is_some());
    }

    #[test]
    fn test_move_actions_match_move_delta() {
        let mut flow = GameFlow::new(GameSettings::default(), cube_catalog(), 2).unwrap();
        flow.start();
        for action in [
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::MoveForward,
            GameAction::MoveBack,
        ] {
            let before = flow.active().unwrap().pivot();
            assert!(flow.apply_action(action), "{:?}", action);
            assert_eq!(
                Some(flow.active().unwrap().pivot() - before),
                action.move_delta()
            );
        }
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let mut s = GameSettings::default();
        s.level_up_every_clears = 0;
        assert_eq!(
            GameFlow::new(s, ShapeCatalog::builtin(), 0).unwrap_err(),
            ConfigError::InvalidLevelUpCadence
        );
    }
}
