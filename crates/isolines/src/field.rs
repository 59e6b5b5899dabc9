//! Scalar field sources consumed by the isoline builder.
//!
//! A field is a `width × height` lattice of samples with a matching lattice
//! of positions. Positions may be warped (curvilinear grids); the tracer only
//! ever interpolates along the straight edge between two neighboring nodes.

use crate::error::{IsolineError, Result};
use serde::{Deserialize, Serialize};

/// A point in field coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between two points.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Point at `t` along the segment from `self` to `other`.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + t * (other.x - self.x),
            self.y + t * (other.y - self.y),
        )
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Minimum and maximum of a field's defined samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Map a value into `[0, 1]` relative to this range.
    ///
    /// A degenerate range maps everything to 0.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        if span > 0.0 {
            (value - self.min) / span
        } else {
            0.0
        }
    }
}

/// A 2D scalar field sampled on a (possibly irregular) grid.
///
/// Indices are `(i, j)` with `i` along the width and `j` along the height;
/// `j = 0` is the bottom row.
pub trait ScalarField: Sync {
    /// Number of nodes along the first axis.
    fn width(&self) -> usize;

    /// Number of nodes along the second axis.
    fn height(&self) -> usize;

    /// Raw sample at node `(i, j)`. May be NaN or the missing-value sentinel.
    fn value(&self, i: usize, j: usize) -> f64;

    /// Position of node `(i, j)`.
    fn position(&self, i: usize, j: usize) -> Point;

    /// Sentinel marking absent samples.
    fn missing_value(&self) -> Option<f64> {
        None
    }

    /// Precomputed value range, if the source knows it.
    fn range(&self) -> Option<ValueRange> {
        None
    }

    /// Sample at node `(i, j)`, or `None` where there is no data.
    fn sample(&self, i: usize, j: usize) -> Option<f64> {
        let value = self.value(i, j);
        if value.is_nan() || self.missing_value() == Some(value) {
            None
        } else {
            Some(value)
        }
    }

    /// The declared range, or the range of all defined samples.
    ///
    /// Returns `None` when the field has no defined sample at all.
    fn value_range(&self) -> Option<ValueRange> {
        if let Some(range) = self.range() {
            return Some(range);
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for j in 0..self.height() {
            for i in 0..self.width() {
                if let Some(v) = self.sample(i, j) {
                    min = min.min(v);
                    max = max.max(v);
                }
            }
        }

        (min <= max).then(|| ValueRange::new(min, max))
    }
}

/// How node indices map to positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GridGeometry {
    /// Evenly spaced nodes: `origin + (i * dx, j * dy)`.
    Regular { origin: Point, dx: f64, dy: f64 },
    /// One explicit position per node, row-major.
    Curvilinear(Vec<Point>),
}

/// An owned scalar field stored in row-major order (`j * width + i`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridField {
    width: usize,
    height: usize,
    data: Vec<f64>,
    geometry: GridGeometry,
    missing_value: Option<f64>,
    range: Option<ValueRange>,
}

impl GridField {
    /// Create a field on the unit lattice (node `(i, j)` sits at `(i, j)`).
    pub fn new(width: usize, height: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != width * height {
            return Err(IsolineError::invalid_field(format!(
                "expected {} samples for a {}x{} grid, got {}",
                width * height,
                width,
                height,
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            data,
            geometry: GridGeometry::Regular {
                origin: Point::default(),
                dx: 1.0,
                dy: 1.0,
            },
            missing_value: None,
            range: None,
        })
    }

    /// Build a field on the unit lattice by evaluating `f(i, j)` at every node.
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for j in 0..height {
            for i in 0..width {
                data.push(f(i, j));
            }
        }

        Self {
            width,
            height,
            data,
            geometry: GridGeometry::Regular {
                origin: Point::default(),
                dx: 1.0,
                dy: 1.0,
            },
            missing_value: None,
            range: None,
        }
    }

    /// Replace the node geometry.
    pub fn with_geometry(mut self, geometry: GridGeometry) -> Result<Self> {
        if let GridGeometry::Curvilinear(points) = &geometry {
            if points.len() != self.width * self.height {
                return Err(IsolineError::invalid_field(format!(
                    "expected {} positions for a {}x{} grid, got {}",
                    self.width * self.height,
                    self.width,
                    self.height,
                    points.len()
                )));
            }
        }
        self.geometry = geometry;
        Ok(self)
    }

    /// Mark a sentinel value as "no data".
    pub fn with_missing_value(mut self, missing: f64) -> Self {
        self.missing_value = Some(missing);
        self
    }

    /// Declare the value range instead of scanning for it.
    pub fn with_range(mut self, min: f64, max: f64) -> Result<Self> {
        if !(min <= max) {
            return Err(IsolineError::invalid_field(format!(
                "range min {min} exceeds max {max}"
            )));
        }
        self.range = Some(ValueRange::new(min, max));
        Ok(self)
    }

    /// Overwrite one sample.
    pub fn set_value(&mut self, i: usize, j: usize, value: f64) {
        let idx = self.flat_index(i, j);
        self.data[idx] = value;
    }

    /// Raw samples in row-major order.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    fn flat_index(&self, i: usize, j: usize) -> usize {
        j * self.width + i
    }
}

impl ScalarField for GridField {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn value(&self, i: usize, j: usize) -> f64 {
        self.data[self.flat_index(i, j)]
    }

    fn position(&self, i: usize, j: usize) -> Point {
        match &self.geometry {
            GridGeometry::Regular { origin, dx, dy } => {
                Point::new(origin.x + i as f64 * dx, origin.y + j as f64 * dy)
            }
            GridGeometry::Curvilinear(points) => points[self.flat_index(i, j)],
        }
    }

    fn missing_value(&self) -> Option<f64> {
        self.missing_value
    }

    fn range(&self) -> Option<ValueRange> {
        self.range
    }
}
