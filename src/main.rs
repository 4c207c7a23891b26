//! Terminal runner for the 3D pit (default binary).
//!
//! Fixed-timestep loop: render, poll input until the next tick, then advance
//! move repeat and gravity by `TICK_MS`.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use tetris3d::core::{FlowEvent, GameFlow};
use tetris3d::input::{map_key, resolve, should_quit, CameraYaw, InputEvent, MoveRepeat};
use tetris3d::settings;
use tetris3d::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tetris3d::types::TICK_MS;

fn main() -> Result<()> {
    tetris3d::logging::install()?;

    // Config errors are reported before the terminal is taken over.
    let config = settings::load_config()?;
    let seed = settings::seed_from_env()?;
    let mut game = settings::build_game(config, seed)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut game);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(err) = &result {
        log::error!("exiting with error: {err:#}");
    }
    result
}

fn run(term: &mut TerminalRenderer, game: &mut GameFlow) -> Result<()> {
    game.start();

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut repeat = MoveRepeat::new();
    let mut yaw = CameraYaw::default();

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(game, yaw.index(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            log::info!("quit requested (score {})", game.score());
                            return Ok(());
                        }

                        if let Some(dir) = repeat.handle_key_press(key.code) {
                            if let Some(action) = resolve(InputEvent::Move(dir), yaw) {
                                game.apply_action(action);
                            }
                        }

                        match map_key(key) {
                            // Moves go through the repeat tracker above.
                            Some(InputEvent::Move(_)) | None => {}
                            Some(InputEvent::OrbitLeft) => yaw = yaw.orbit_left(),
                            Some(InputEvent::OrbitRight) => yaw = yaw.orbit_right(),
                            Some(input) => {
                                if let Some(action) = resolve(input, yaw) {
                                    game.apply_action(action);
                                }
                            }
                        }
                    }
                    KeyEventKind::Repeat => {
                        // Terminal auto-repeat is ignored; MoveRepeat times repeats itself.
                    }
                    KeyEventKind::Release => {
                        repeat.handle_key_release(key.code);
                    }
                },
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            for dir in repeat.update(TICK_MS) {
                if let Some(action) = resolve(InputEvent::Move(dir), yaw) {
                    game.apply_action(action);
                }
            }

            game.tick(TICK_MS);

            for event in game.drain_events() {
                match event {
                    FlowEvent::GameOver(reason) => log::info!("game over: {reason:?}"),
                    other => log::debug!("{other:?}"),
                }
            }
        }
    }
}
