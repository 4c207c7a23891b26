//! Config module - game settings and their validation
//!
//! Everything here is plain serde data with defaults for every field, so a
//! config file only needs to name what it changes. Validation happens once,
//! when a [`GameFlow`](crate::GameFlow) is built.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::{Dims, GridGeometry};
use crate::scoring::{FallCurve, ScoreTable};
use crate::shapes::{builtin_shape_defs, ShapeCatalog, ShapeDef};
use crate::types::{
    Cell, WorldPos, DEFAULT_BOARD_DEPTH, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH,
    DEFAULT_CELL_SIZE, DEFAULT_LEVEL_UP_EVERY_CLEARS, DEFAULT_SPAWN_PIVOT, DEFAULT_START_LEVEL,
};

/// Board size and world placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub width: i32,
    pub depth: i32,
    pub height: i32,
    pub cell_size: f32,
    pub origin: WorldPos,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            depth: DEFAULT_BOARD_DEPTH,
            height: DEFAULT_BOARD_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            origin: WorldPos::ZERO,
        }
    }
}

impl BoardSettings {
    pub fn dims(&self) -> Dims {
        Dims::new(self.width, self.height, self.depth)
    }

    pub fn geometry(&self) -> GridGeometry {
        GridGeometry {
            origin: self.origin,
            cell_size: self.cell_size,
        }
    }
}

/// Rules of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub board: BoardSettings,
    pub spawn_pivot: Cell,
    pub start_level: u32,
    pub level_up_every_clears: u32,
    pub fall: FallCurve,
    pub scoring: ScoreTable,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            board: BoardSettings::default(),
            spawn_pivot: DEFAULT_SPAWN_PIVOT,
            start_level: DEFAULT_START_LEVEL,
            level_up_every_clears: DEFAULT_LEVEL_UP_EVERY_CLEARS,
            fall: FallCurve::default(),
            scoring: ScoreTable::default(),
        }
    }
}

impl GameSettings {
    /// Reject settings a game cannot run with.
    ///
    /// A spawn pivot outside the board is allowed; every spawn then tops out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.board.dims().validate()?;
        let size = self.board.cell_size;
        if !(size.is_finite() && size > 0.0) {
            return Err(ConfigError::InvalidCellSize(size));
        }
        if self.start_level < 1 {
            return Err(ConfigError::InvalidStartLevel);
        }
        if self.level_up_every_clears < 1 {
            return Err(ConfigError::InvalidLevelUpCadence);
        }
        self.fall.validate()
    }
}

/// A complete game configuration: rules plus the shape list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub settings: GameSettings,
    pub shapes: Vec<ShapeDef>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl GameConfig {
    /// Default rules with the compiled-in shapes.
    pub fn builtin() -> Self {
        Self {
            settings: GameSettings::default(),
            shapes: builtin_shape_defs(),
        }
    }

    /// Validate everything and split into what [`GameFlow::new`](crate::GameFlow::new) takes.
    pub fn into_parts(self) -> Result<(GameSettings, ShapeCatalog), ConfigError> {
        self.settings.validate()?;
        let catalog = ShapeCatalog::new(self.shapes)?;
        Ok((self.settings, catalog))
    }
}
