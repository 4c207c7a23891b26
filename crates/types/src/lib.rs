//! Core types module - shared data structures and constants
//!
//! This crate defines the vocabulary used by every other crate in the workspace:
//! the integer cell coordinate, rotation axes and directions, player actions and
//! colors. Everything here is plain data, usable by the core simulation, the
//! input mapping and the terminal renderer alike.
//!
//! # Coordinates
//!
//! The pit is indexed by `(x, y, z)` with `y` pointing up. Layer `y = 0` is the
//! floor; pieces spawn near the top and fall towards negative `y`.
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_BOARD_WIDTH` | 10 | Cells along X |
//! | `DEFAULT_BOARD_DEPTH` | 10 | Cells along Z |
//! | `DEFAULT_BOARD_HEIGHT` | 20 | Cells along Y |
//! | `DEFAULT_SPAWN_PIVOT` | (4, 19, 4) | Pivot cell of freshly spawned pieces |
//! | `TICK_MS` | 16 | Fixed timestep of the runner (~60 FPS) |
//! | `FALL_INTERVAL_MIN_MS` | 120 | Fastest gravity regardless of level |
//! | `MOVE_REPEAT_MS` | 120 | Auto-repeat period of held movement keys |
//!
//! # Examples
//!
//! ```
//! use tetris3d_types::{Axis, Cell, GameAction, TurnDir};
//!
//! let action = GameAction::from_str("moveForward").unwrap();
//! assert_eq!(action.move_delta(), Some(Cell::new(0, 0, 1)));
//!
//! assert_eq!(Axis::from_str("y"), Some(Axis::Y));
//! assert_eq!(TurnDir::Cw.reversed(), TurnDir::Ccw);
//! ```

use serde::{Deserialize, Serialize};

/// Integer lattice coordinate, used for both grid-absolute and piece-local cells.
pub type Cell = glam::IVec3;

/// World-space position produced by the cell-to-world mapping.
pub type WorldPos = glam::Vec3;

/// Default board width in cells (X).
pub const DEFAULT_BOARD_WIDTH: i32 = 10;

/// Default board depth in cells (Z).
pub const DEFAULT_BOARD_DEPTH: i32 = 10;

/// Default board height in cells (Y).
pub const DEFAULT_BOARD_HEIGHT: i32 = 20;

/// Default edge length of one cell in world units.
pub const DEFAULT_CELL_SIZE: f32 = 1.0;

/// Default pivot for newly spawned pieces.
pub const DEFAULT_SPAWN_PIVOT: Cell = Cell::new(4, 19, 4);

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Level the game starts at.
pub const DEFAULT_START_LEVEL: u32 = 1;

/// Level increases after this many cleared layers.
pub const DEFAULT_LEVEL_UP_EVERY_CLEARS: u32 = 2;

/// Fall interval keyframes as `(level, interval_ms)`.
///
/// Intervals between keyframes are interpolated linearly; beyond the last
/// keyframe the last interval holds.
pub const FALL_CURVE_KEYFRAMES: [(u32, u32); 4] = [(1, 900), (5, 650), (10, 400), (20, 200)];

/// Fall interval floor (120ms).
pub const FALL_INTERVAL_MIN_MS: u32 = 120;

/// Points for clearing 1, 2, 3 and 4-or-more layers with a single lock.
pub const SCORE_PER_1: u32 = 100;
pub const SCORE_PER_2: u32 = 300;
pub const SCORE_PER_3: u32 = 500;
pub const SCORE_PER_4_PLUS: u32 = 800;

/// Auto-repeat period for held movement keys (milliseconds).
pub const MOVE_REPEAT_MS: u32 = 120;

/// Upper bound on cells per shape (a full 3x3x3 block).
///
/// Keeps piece cell sets stack-allocated on the move/rotate hot paths.
pub const MAX_SHAPE_CELLS: usize = 27;

/// Rotation axis in the piece-local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Parse axis from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnDir {
    Cw,
    Ccw,
}

impl TurnDir {
    /// `+1` for clockwise, `-1` for counter-clockwise.
    #[inline]
    pub fn sign(&self) -> i32 {
        match self {
            TurnDir::Cw => 1,
            TurnDir::Ccw => -1,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            TurnDir::Cw => TurnDir::Ccw,
            TurnDir::Ccw => TurnDir::Cw,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cw" => Some(TurnDir::Cw),
            "ccw" => Some(TurnDir::Ccw),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TurnDir::Cw => "cw",
            TurnDir::Ccw => "ccw",
        }
    }
}

/// Game actions in grid space.
///
/// Camera-relative input is resolved to these before reaching the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// -X
    MoveLeft,
    /// +X
    MoveRight,
    /// +Z
    MoveForward,
    /// -Z
    MoveBack,
    Rotate(Axis, TurnDir),
    SoftDrop,
    Hold,
    Pause,
    Restart,
}

impl GameAction {
    /// Grid delta for the horizontal moves, `None` for everything else.
    pub fn move_delta(&self) -> Option<Cell> {
        match self {
            GameAction::MoveLeft => Some(Cell::NEG_X),
            GameAction::MoveRight => Some(Cell::X),
            GameAction::MoveForward => Some(Cell::Z),
            GameAction::MoveBack => Some(Cell::NEG_Z),
            _ => None,
        }
    }

    /// Parse action from string.
    ///
    /// Rotations use the `rotate<Axis><Dir>` form, e.g. `rotateXCw`.
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "moveforward" => Some(GameAction::MoveForward),
            "moveback" => Some(GameAction::MoveBack),
            "softdrop" => Some(GameAction::SoftDrop),
            "hold" => Some(GameAction::Hold),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => {
                let rest = lower.strip_prefix("rotate")?;
                let axis = Axis::from_str(rest.get(..1)?)?;
                let dir = TurnDir::from_str(rest.get(1..)?)?;
                Some(GameAction::Rotate(axis, dir))
            }
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::MoveForward => "moveForward",
            GameAction::MoveBack => "moveBack",
            GameAction::Rotate(Axis::X, TurnDir::Cw) => "rotateXCw",
            GameAction::Rotate(Axis::X, TurnDir::Ccw) => "rotateXCcw",
            GameAction::Rotate(Axis::Y, TurnDir::Cw) => "rotateYCw",
            GameAction::Rotate(Axis::Y, TurnDir::Ccw) => "rotateYCcw",
            GameAction::Rotate(Axis::Z, TurnDir::Cw) => "rotateZCw",
            GameAction::Rotate(Axis::Z, TurnDir::Ccw) => "rotateZCcw",
            GameAction::SoftDrop => "softDrop",
            GameAction::Hold => "hold",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}

/// 24-bit RGB color.
///
/// Serialized as a `[r, g, b]` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale brightness by `num / den` (used for depth shading).
    pub fn scaled(self, num: u16, den: u16) -> Self {
        let f = |c: u8| ((c as u16 * num) / den.max(1)).min(255) as u8;
        Self::new(f(self.r), f(self.g), f(self.b))
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}
