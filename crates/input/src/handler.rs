//! Move auto-repeat for terminal environments.
//!
//! The first press of a movement key moves at once; while the key stays held,
//! the move repeats every `repeat_ms`. Supports terminals that do not emit key
//! release events by using a timeout.

use std::time::Instant;

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::map::{move_dir, MoveDir};
use crate::types::MOVE_REPEAT_MS;

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state that triggers repeats.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Tracks the held movement key.
#[derive(Debug, Clone)]
pub struct MoveRepeat {
    held: Option<MoveDir>,
    last_key_time: Instant,
    repeat_timer_ms: u32,
    repeat_ms: u32,
    key_release_timeout_ms: u32,
}

impl MoveRepeat {
    pub fn new() -> Self {
        Self::with_repeat_ms(MOVE_REPEAT_MS)
    }

    pub fn with_repeat_ms(repeat_ms: u32) -> Self {
        Self {
            held: None,
            last_key_time: Instant::now(),
            repeat_timer_ms: 0,
            repeat_ms: repeat_ms.max(1),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn held(&self) -> Option<MoveDir> {
        self.held
    }

    /// Returns the direction to move now, if this press starts a new hold.
    ///
    /// Repeated presses of the held key (terminal autorepeat) only refresh the
    /// release timeout.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<MoveDir> {
        let dir = move_dir(code)?;
        self.last_key_time = Instant::now();
        if self.held == Some(dir) {
            return None;
        }
        self.held = Some(dir);
        self.repeat_timer_ms = 0;
        Some(dir)
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        if move_dir(code).is_some() && move_dir(code) == self.held {
            self.release();
        }
    }

    /// Advance the repeat timer; returns the moves due this frame.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<MoveDir, 8> {
        let mut moves = ArrayVec::new();

        // Auto-release when terminal does not emit release events.
        let since_last_key = self.last_key_time.elapsed().as_millis();
        if since_last_key > u128::from(self.key_release_timeout_ms) {
            self.release();
        }

        let Some(dir) = self.held else {
            return moves;
        };

        self.repeat_timer_ms = self.repeat_timer_ms.saturating_add(elapsed_ms);
        while self.repeat_timer_ms >= self.repeat_ms {
            if moves.try_push(dir).is_err() {
                self.repeat_timer_ms = 0;
                break;
            }
            self.repeat_timer_ms -= self.repeat_ms;
        }
        moves
    }

    pub fn reset(&mut self) {
        self.release();
        self.last_key_time = Instant::now();
    }

    fn release(&mut self) {
        self.held = None;
        self.repeat_timer_ms = 0;
    }
}

impl Default for MoveRepeat {
    fn default() -> Self {
        Self::new()
    }
}
