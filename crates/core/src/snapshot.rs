//! Read-only views of a running game for HUDs and renderers.

use crate::error::ConfigError;
use crate::shapes::ShapeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HudSnapshot {
    pub score: u32,
    pub level: u32,
    pub layers_cleared: u32,
    pub next: Option<ShapeId>,
    pub held: Option<ShapeId>,
    pub can_hold: bool,
    pub paused: bool,
    pub game_over: bool,
    pub fall_interval_ms: u32,
}

impl HudSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}

/// Why a game ended.
#[derive(Debug, Clone, PartialEq)]
pub enum GameOverReason {
    /// A new piece could not be placed at the spawn pivot.
    ToppedOut,
    /// The configuration cannot produce a piece.
    Config(ConfigError),
}

/// State changes, queued in order and drained by the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    Spawned(ShapeId),
    /// A piece was written into the grid; `placed` counts blocks actually stored.
    Locked { shape: ShapeId, placed: usize },
    LayersCleared { count: usize, total: u32 },
    LevelUp(u32),
    Held { stashed: ShapeId, released: Option<ShapeId> },
    Paused(bool),
    GameOver(GameOverReason),
    Restarted,
}
