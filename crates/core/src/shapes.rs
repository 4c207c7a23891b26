//! Shapes module - the immutable piece catalog and weighted selection
//!
//! Shapes are loaded once (from config or the built-in set), validated, and then
//! referenced by [`ShapeId`] for the rest of the game. Pieces never copy or
//! mutate a shape; they only read its cells at spawn time.

use std::collections::HashSet;

use arrayvec::ArrayVec;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Cell, Rgb, MAX_SHAPE_CELLS};

/// Handle to a shape inside a [`ShapeCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u16);

impl ShapeId {
    pub(crate) const fn from_index(i: u16) -> Self {
        Self(i)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Shape definition as supplied by configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDef {
    pub id: String,
    /// Local cell offsets relative to the pivot.
    pub cells: Vec<Cell>,
    /// Local rotation pivot (conventionally the origin).
    #[serde(default)]
    pub pivot: Cell,
    pub color: Rgb,
    #[serde(default = "default_weight")]
    pub weight: f32,
    /// Difficulty tier, informational only.
    #[serde(default = "default_complexity")]
    pub complexity: u8,
}

fn default_weight() -> f32 {
    1.0
}

fn default_complexity() -> u8 {
    1
}

/// Validated, immutable shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: String,
    cells: ArrayVec<Cell, MAX_SHAPE_CELLS>,
    pivot: Cell,
    color: Rgb,
    weight: f32,
    complexity: u8,
}

impl Shape {
    fn from_def(index: usize, def: ShapeDef) -> Result<Self, ConfigError> {
        if def.id.trim().is_empty() {
            return Err(ConfigError::MissingShapeId { index });
        }
        if def.cells.is_empty() {
            return Err(ConfigError::EmptyShape { id: def.id });
        }
        if def.cells.len() > MAX_SHAPE_CELLS {
            return Err(ConfigError::TooManyCells {
                count: def.cells.len(),
                limit: MAX_SHAPE_CELLS,
                id: def.id,
            });
        }
        if !def.weight.is_finite() {
            return Err(ConfigError::InvalidWeight { id: def.id });
        }
        if def.complexity == 0 {
            return Err(ConfigError::InvalidComplexity { id: def.id });
        }

        let mut seen = HashSet::with_capacity(def.cells.len());
        let mut cells = ArrayVec::new();
        for &c in &def.cells {
            if !seen.insert(c) {
                return Err(ConfigError::DuplicateCell { id: def.id, cell: c });
            }
            cells.push(c);
        }

        Ok(Self {
            id: def.id,
            cells,
            pivot: def.pivot,
            color: def.color,
            weight: def.weight,
            complexity: def.complexity,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn pivot(&self) -> Cell {
        self.pivot
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn complexity(&self) -> u8 {
        self.complexity
    }
}

/// Read-only set of shapes available to a game.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeCatalog {
    shapes: Vec<Shape>,
    weights: Vec<f32>,
    total_weight: f32,
}

impl ShapeCatalog {
    /// Validate and freeze a list of shape definitions.
    ///
    /// An empty list is accepted; drawing from it yields no shape, which the
    /// game reports as a configuration fault.
    pub fn new(defs: Vec<ShapeDef>) -> Result<Self, ConfigError> {
        if defs.len() > u16::MAX as usize {
            return Err(ConfigError::TooManyShapes(defs.len()));
        }
        let shapes = defs
            .into_iter()
            .enumerate()
            .map(|(i, def)| Shape::from_def(i, def))
            .collect::<Result<Vec<_>, _>>()?;
        let weights: Vec<f32> = shapes.iter().map(|s| s.weight).collect();
        let total_weight: f32 = weights.iter().filter(|&&w| w > 0.0).sum();
        if !total_weight.is_finite() {
            return Err(ConfigError::WeightOverflow);
        }
        Ok(Self {
            shapes,
            weights,
            total_weight,
        })
    }

    /// The compiled-in shape set.
    pub fn builtin() -> Self {
        // The built-in table is covered by tests; it cannot fail validation.
        Self::new(builtin_shape_defs()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.index())
    }

    /// Look up a shape by its configured identifier.
    pub fn find(&self, id: &str) -> Option<ShapeId> {
        self.shapes
            .iter()
            .position(|s| s.id == id)
            .map(|i| ShapeId::from_index(i as u16))
    }

    pub fn ids(&self) -> impl Iterator<Item = ShapeId> {
        (0..self.shapes.len() as u16).map(ShapeId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.ids().zip(self.shapes.iter())
    }

    /// Sum of all positive weights.
    pub fn total_weight(&self) -> f32 {
        self.total_weight
    }

    /// True if at least one shape can be drawn.
    pub fn has_pool(&self) -> bool {
        self.total_weight > 0.0
    }

    /// Draw a shape at random, proportionally to its weight.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<ShapeId> {
        if !self.has_pool() {
            return None;
        }
        // Drawn in f64: rand cannot scale an f32 range that reaches f32::MAX.
        let draw = rng.gen_range(0.0..=f64::from(self.total_weight)) as f32;
        pick_weighted(&self.weights, draw).map(|i| ShapeId::from_index(i as u16))
    }
}

/// Weighted pick over an explicit weight list.
///
/// Entries with weight `<= 0` (or NaN) are skipped. Returns the first entry whose
/// cumulative weight is `>= draw`; if rounding leaves `draw` above the final sum,
/// the last eligible entry is returned. `None` when no entry is eligible.
pub fn pick_weighted(weights: &[f32], draw: f32) -> Option<usize> {
    let mut acc = 0.0f32;
    let mut last = None;
    for (i, &w) in weights.iter().enumerate() {
        if !(w > 0.0) {
            continue;
        }
        acc += w;
        last = Some(i);
        if draw <= acc {
            return Some(i);
        }
    }
    last
}

fn def(id: &str, cells: &[(i32, i32, i32)], color: Rgb, weight: f32, complexity: u8) -> ShapeDef {
    ShapeDef {
        id: id.to_string(),
        cells: cells.iter().map(|&(x, y, z)| Cell::new(x, y, z)).collect(),
        pivot: Cell::ZERO,
        color,
        weight,
        complexity,
    }
}

/// Built-in shapes: flat pieces first, then true 3D pieces.
///
/// All shapes fit within one cell below the pivot so they can spawn on the top
/// layer of a default board.
pub fn builtin_shape_defs() -> Vec<ShapeDef> {
    vec![
        def("cube", &[(0, 0, 0)], Rgb::new(240, 220, 80), 1.0, 1),
        def("bar2", &[(0, 0, 0), (1, 0, 0)], Rgb::new(100, 200, 255), 1.0, 1),
        def("bar3", &[(-1, 0, 0), (0, 0, 0), (1, 0, 0)], Rgb::new(100, 255, 200), 1.0, 1),
        def(
            "bar4",
            &[(-1, 0, 0), (0, 0, 0), (1, 0, 0), (2, 0, 0)],
            Rgb::new(80, 220, 220),
            0.8,
            2,
        ),
        def(
            "square",
            &[(0, 0, 0), (1, 0, 0), (0, 0, 1), (1, 0, 1)],
            Rgb::new(255, 165, 0),
            0.8,
            2,
        ),
        def(
            "ell",
            &[(-1, 0, 0), (0, 0, 0), (1, 0, 0), (1, 0, 1)],
            Rgb::new(80, 120, 220),
            0.8,
            2,
        ),
        def(
            "tee",
            &[(-1, 0, 0), (0, 0, 0), (1, 0, 0), (0, 0, 1)],
            Rgb::new(200, 120, 220),
            0.8,
            2,
        ),
        def(
            "skew",
            &[(-1, 0, 0), (0, 0, 0), (0, 0, 1), (1, 0, 1)],
            Rgb::new(100, 220, 120),
            0.8,
            2,
        ),
        def(
            "corner",
            &[(0, 0, 0), (1, 0, 0), (0, 0, 1), (0, -1, 0)],
            Rgb::new(220, 80, 80),
            0.5,
            3,
        ),
        def(
            "screw",
            &[(0, 0, 0), (1, 0, 0), (1, 0, 1), (0, -1, 0)],
            Rgb::new(255, 120, 160),
            0.5,
            3,
        ),
        def(
            "step",
            &[(0, 0, 0), (1, 0, 0), (1, -1, 0), (1, -1, 1)],
            Rgb::new(180, 180, 255),
            0.5,
            3,
        ),
    ]
}
