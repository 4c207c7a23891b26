//! Grid module - the voxel pit of locked blocks
//!
//! The grid is a `width x height x depth` box where each cell is either empty or
//! holds one locked block. Storage is a flat vector in layer-major order
//! (`(y * depth + z) * width + x`), so every horizontal layer is one contiguous
//! slice and layer compaction is a series of `copy_within` calls.
//!
//! Coordinates outside the box count as occupied, which lets boundary checks and
//! stacking checks share a single rule.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::shapes::ShapeId;
use crate::types::{Cell, Rgb, WorldPos};

/// Board size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dims {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
}

impl Dims {
    pub const fn new(width: i32, height: i32, depth: i32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Number of cells in one horizontal layer.
    #[inline]
    pub fn layer_len(&self) -> usize {
        (self.width as usize) * (self.depth as usize)
    }

    pub(crate) fn validate(&self) -> Result<usize, ConfigError> {
        let err = ConfigError::InvalidBoardDims {
            width: self.width,
            height: self.height,
            depth: self.depth,
        };
        if self.width < 1 || self.height < 1 || self.depth < 1 {
            return Err(err);
        }
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(self.depth as usize))
            .ok_or(err)
    }
}

/// Placement of the grid in world space (for renderers only).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub origin: WorldPos,
    pub cell_size: f32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            origin: WorldPos::ZERO,
            cell_size: crate::types::DEFAULT_CELL_SIZE,
        }
    }
}

/// A locked block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    pub color: Rgb,
    /// Shape of the piece this block was locked from.
    pub shape: ShapeId,
}

/// The voxel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    dims: Dims,
    geometry: GridGeometry,
    cells: Vec<Option<Block>>,
}

impl Grid {
    /// Allocate an empty grid.
    pub fn new(dims: Dims, geometry: GridGeometry) -> Result<Self, ConfigError> {
        let volume = dims.validate()?;
        if !(geometry.cell_size.is_finite() && geometry.cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(geometry.cell_size));
        }
        Ok(Self {
            dims,
            geometry,
            cells: vec![None; volume],
        })
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn width(&self) -> i32 {
        self.dims.width
    }

    pub fn height(&self) -> i32 {
        self.dims.height
    }

    pub fn depth(&self) -> i32 {
        self.dims.depth
    }

    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    #[inline(always)]
    fn index(&self, c: Cell) -> Option<usize> {
        if !self.in_bounds(c) {
            return None;
        }
        let (w, d) = (self.dims.width as usize, self.dims.depth as usize);
        Some(((c.y as usize) * d + (c.z as usize)) * w + (c.x as usize))
    }

    fn cell_at(&self, idx: usize) -> Cell {
        let (w, d) = (self.dims.width as usize, self.dims.depth as usize);
        let x = idx % w;
        let z = (idx / w) % d;
        let y = idx / (w * d);
        Cell::new(x as i32, y as i32, z as i32)
    }

    /// True iff all three coordinates are inside the box.
    #[inline]
    pub fn in_bounds(&self, c: Cell) -> bool {
        (0..self.dims.width).contains(&c.x)
            && (0..self.dims.height).contains(&c.y)
            && (0..self.dims.depth).contains(&c.z)
    }

    /// Out-of-bounds cells are reported as occupied.
    pub fn is_occupied(&self, c: Cell) -> bool {
        match self.index(c) {
            Some(i) => self.cells[i].is_some(),
            None => true,
        }
    }

    /// Block at `c`, `None` if empty or out of bounds.
    pub fn get(&self, c: Cell) -> Option<Block> {
        self.index(c).and_then(|i| self.cells[i])
    }

    /// True iff every cell is in bounds and empty.
    pub fn can_place(&self, cells: &[Cell]) -> bool {
        cells
            .iter()
            .all(|&c| self.index(c).is_some_and(|i| self.cells[i].is_none()))
    }

    /// Lock `block` into every listed cell that is in bounds and empty.
    ///
    /// Cells that are already occupied or out of bounds are skipped. Returns the
    /// number of blocks actually placed.
    pub fn place_cells(&mut self, cells: &[Cell], block: Block) -> usize {
        let mut placed = 0;
        for &c in cells {
            let Some(i) = self.index(c) else {
                continue;
            };
            if self.cells[i].is_none() {
                self.cells[i] = Some(block);
                placed += 1;
            }
        }
        placed
    }

    /// Check if layer `y` is completely filled.
    pub fn is_layer_full(&self, y: i32) -> bool {
        if !(0..self.dims.height).contains(&y) {
            return false;
        }
        let len = self.dims.layer_len();
        let start = y as usize * len;
        self.cells[start..start + len].iter().all(Option::is_some)
    }

    /// Indices of full layers, bottom to top.
    pub fn full_layers(&self) -> Vec<i32> {
        (0..self.dims.height)
            .filter(|&y| self.is_layer_full(y))
            .collect()
    }

    /// Remove every full layer and drop the layers above into the gaps.
    ///
    /// Returns the number of layers removed.
    pub fn clear_full_layers(&mut self) -> usize {
        let len = self.dims.layer_len();
        compact_layers(&mut self.cells, len)
    }

    /// Empty the whole grid.
    pub fn clear_all(&mut self) {
        self.cells.fill(None);
    }

    /// Map a cell to the world position of its corner: `origin + cell * cell_size`.
    pub fn cell_to_world(&self, c: Cell) -> WorldPos {
        self.geometry.origin + c.as_vec3() * self.geometry.cell_size
    }

    /// Iterate over all locked blocks.
    pub fn occupied(&self) -> impl Iterator<Item = (Cell, Block)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.map(|b| (self.cell_at(i), b)))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Highest locked block in column `(x, z)`.
    pub fn top_block(&self, x: i32, z: i32) -> Option<(i32, Block)> {
        (0..self.dims.height)
            .rev()
            .find_map(|y| self.get(Cell::new(x, y, z)).map(|b| (y, b)))
    }
}

/// Remove full layers from a layer-major occupancy slice.
///
/// `cells` is split into consecutive layers of `layer_len` entries, layer 0 being
/// the floor. Every layer whose entries are all `Some` is dropped; the remaining
/// layers move down, keeping their relative order, and the vacated layers at the
/// top are emptied. Returns the number of layers removed.
///
/// Two-pointer pass, no allocation.
pub fn compact_layers<T: Copy>(cells: &mut [Option<T>], layer_len: usize) -> usize {
    if layer_len == 0 {
        return 0;
    }
    let layers = cells.len() / layer_len;
    let mut write = 0usize;
    let mut cleared = 0usize;

    for read in 0..layers {
        let start = read * layer_len;
        if cells[start..start + layer_len].iter().all(Option::is_some) {
            cleared += 1;
            continue;
        }
        if write != read {
            cells.copy_within(start..start + layer_len, write * layer_len);
        }
        write += 1;
    }

    cells[write * layer_len..layers * layer_len].fill(None);
    cleared
}
