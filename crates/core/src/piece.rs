//! Piece module - the active falling piece and its quarter-turn rotation
//!
//! A piece is a pivot cell plus a set of local offsets. Moving shifts the pivot;
//! rotating replaces every local offset with its image under a 90° lattice
//! rotation about the pivot. There is no kick table: a rotation that collides is
//! rejected outright and the piece keeps its previous orientation.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::shapes::{ShapeCatalog, ShapeId};
use crate::types::{Axis, Cell, TurnDir, MAX_SHAPE_CELLS};

/// Stack-allocated cell list sized for the largest legal shape.
pub type CellSet = ArrayVec<Cell, MAX_SHAPE_CELLS>;

/// Rotate a local offset a quarter turn about `axis`.
///
/// With `s = +1` for [`TurnDir::Cw`] and `-1` for [`TurnDir::Ccw`]:
///
/// ```text
/// X: (x, y, z) -> (x, -s*z,  s*y)
/// Y: (x, y, z) -> (s*z,  y, -s*x)
/// Z: (x, y, z) -> (-s*y, s*x,  z)
/// ```
#[inline]
pub fn rotate_cell(c: Cell, axis: Axis, dir: TurnDir) -> Cell {
    let s = dir.sign();
    match axis {
        Axis::X => Cell::new(c.x, -s * c.z, s * c.y),
        Axis::Y => Cell::new(s * c.z, c.y, -s * c.x),
        Axis::Z => Cell::new(-s * c.y, s * c.x, c.z),
    }
}

fn compose(pivot: Cell, locals: &[Cell]) -> CellSet {
    locals.iter().map(|&c| pivot + c).collect()
}

/// The piece currently under player control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    shape: ShapeId,
    pivot: Cell,
    locals: CellSet,
}

impl ActivePiece {
    /// Instantiate `shape` at `spawn_pivot` in its default orientation.
    ///
    /// Returns `None` if the id does not belong to `catalog`. Legality of the
    /// spawn position is the caller's concern.
    pub fn spawn(catalog: &ShapeCatalog, shape: ShapeId, spawn_pivot: Cell) -> Option<Self> {
        let def = catalog.get(shape)?;
        Some(Self {
            shape,
            pivot: spawn_pivot,
            locals: def.cells().iter().copied().collect(),
        })
    }

    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    pub fn pivot(&self) -> Cell {
        self.pivot
    }

    pub fn locals(&self) -> &[Cell] {
        &self.locals
    }

    /// Cells occupied in grid space: `pivot + local` for every local offset.
    pub fn world_cells(&self) -> CellSet {
        compose(self.pivot, &self.locals)
    }

    /// Check whether the piece could be shifted by `delta`.
    pub fn can_move(&self, grid: &Grid, delta: Cell) -> bool {
        grid.can_place(&compose(self.pivot + delta, &self.locals))
    }

    /// Shift the pivot by `delta` if the result is placeable.
    pub fn try_move(&mut self, grid: &Grid, delta: Cell) -> bool {
        let next = self.pivot + delta;
        if !grid.can_place(&compose(next, &self.locals)) {
            return false;
        }
        self.pivot = next;
        true
    }

    /// Rotate every local offset a quarter turn if the result is placeable.
    pub fn try_rotate(&mut self, grid: &Grid, axis: Axis, dir: TurnDir) -> bool {
        let rotated: CellSet = self
            .locals
            .iter()
            .map(|&c| rotate_cell(c, axis, dir))
            .collect();

        if !grid.can_place(&compose(self.pivot, &rotated)) {
            return false;
        }
        self.locals = rotated;
        true
    }
}
