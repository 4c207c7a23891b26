//! Configuration errors.
//!
//! Placement failures are not errors: moves and rotations that collide simply
//! return `false`. Everything here describes data that makes a game impossible
//! to start or continue.

use crate::types::Cell;

/// Invalid board, shape or rule configuration.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("board dimensions must be at least 1 in every axis (got {width}x{height}x{depth})")]
    InvalidBoardDims { width: i32, height: i32, depth: i32 },

    #[error("cell size must be positive and finite (got {0})")]
    InvalidCellSize(f32),

    #[error("shape {id:?} has no cells")]
    EmptyShape { id: String },

    #[error("shape {id:?} lists cell {cell} more than once")]
    DuplicateCell { id: String, cell: Cell },

    #[error("shape {id:?} has {count} cells (limit {limit})")]
    TooManyCells { id: String, count: usize, limit: usize },

    #[error("shape {index} has an empty id")]
    MissingShapeId { index: usize },

    #[error("shape {id:?} has a non-finite weight")]
    InvalidWeight { id: String },

    #[error("shape {id:?} has complexity 0 (must be at least 1)")]
    InvalidComplexity { id: String },

    #[error("too many shapes in catalog ({0})")]
    TooManyShapes(usize),

    #[error("shape weights add up to more than f32 can hold")]
    WeightOverflow,

    #[error("no shape has a positive weight")]
    EmptyShapePool,

    #[error("start level must be at least 1")]
    InvalidStartLevel,

    #[error("level-up cadence must be at least 1 cleared layer")]
    InvalidLevelUpCadence,

    #[error("fall curve: {0}")]
    InvalidFallCurve(&'static str),
}
