//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the rules of the 3D falling-block game: the voxel grid, the
//! shape catalog, the active piece and the turn state machine. It does no I/O;
//! the terminal front end and input mapping live in sibling crates.
//!
//! Same seed, same settings, same inputs: same game.
//!
//! # Module Structure
//!
//! - [`grid`]: occupancy store, placement checks and layer clearing
//! - [`shapes`]: validated shape catalog and weighted selection
//! - [`piece`]: the falling piece and its quarter-turn rotation
//! - [`flow`]: spawn, fall, lock, clear, hold, pause, restart
//! - [`scoring`]: points table, level progression, fall curve
//! - [`config`]: serde settings with defaults and validation
//! - [`snapshot`]: HUD view and the event queue payload
//!
//! # Rules
//!
//! - **Gravity**: one layer per fall interval; the interval shrinks with level
//! - **Lock**: a piece that cannot drop is written into the grid immediately
//! - **Clear**: every completely filled horizontal layer is removed at once
//! - **Hold**: bank the current shape once per locked piece
//! - **No kicks**: a rotation that collides is simply refused
//!
//! # Example
//!
//! ```
//! use tetris3d_core::{GameFlow, GameSettings, ShapeCatalog};
//! use tetris3d_core::types::{Axis, GameAction, TurnDir};
//!
//! let mut game = GameFlow::new(GameSettings::default(), ShapeCatalog::builtin(), 12345).unwrap();
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate(Axis::Y, TurnDir::Cw));
//! game.apply_action(GameAction::SoftDrop);
//!
//! assert!(!game.is_game_over());
//! assert_eq!(game.level(), 1);
//! ```

pub mod config;
pub mod error;
pub mod flow;
pub mod grid;
pub mod piece;
pub mod scoring;
pub mod shapes;
pub mod snapshot;

pub use tetris3d_types as types;

// Re-export commonly used types for convenience
pub use config::{BoardSettings, GameConfig, GameSettings};
pub use error::ConfigError;
pub use flow::{GameFlow, Phase};
pub use grid::{compact_layers, Block, Dims, Grid, GridGeometry};
pub use piece::{rotate_cell, ActivePiece, CellSet};
pub use scoring::{level_for, FallCurve, ScoreTable};
pub use shapes::{builtin_shape_defs, pick_weighted, Shape, ShapeCatalog, ShapeDef, ShapeId};
pub use snapshot::{FlowEvent, GameOverReason, HudSnapshot};
