//! Per-cell values and geometry.
//!
//! Corner values are `Option<f64>`: `None` is a missing sample and never
//! counts as above the level. Edge midpoints are only defined when both
//! edge corners are; the center is the mean of whatever corners are defined.

use crate::edge::{CellBitmask, Corner, Edge, Quadrant};
use crate::error::{IsolineError, Result};
use crate::field::{Point, ScalarField};

/// The four corner values of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuesInCell {
    pub left_bottom: Option<f64>,
    pub left_top: Option<f64>,
    pub right_top: Option<f64>,
    pub right_bottom: Option<f64>,
}

impl ValuesInCell {
    pub fn new(
        left_bottom: Option<f64>,
        left_top: Option<f64>,
        right_top: Option<f64>,
        right_bottom: Option<f64>,
    ) -> Self {
        Self {
            left_bottom,
            left_top,
            right_top,
            right_bottom,
        }
    }

    pub fn corner(&self, corner: Corner) -> Option<f64> {
        match corner {
            Corner::LeftBottom => self.left_bottom,
            Corner::LeftTop => self.left_top,
            Corner::RightTop => self.right_top,
            Corner::RightBottom => self.right_bottom,
        }
    }

    fn defined(&self) -> impl Iterator<Item = f64> {
        [self.left_bottom, self.left_top, self.right_top, self.right_bottom]
            .into_iter()
            .flatten()
    }

    /// True when all four corners are defined.
    pub fn is_complete(&self) -> bool {
        self.defined().count() == 4
    }

    /// Smallest defined corner value.
    pub fn min(&self) -> Option<f64> {
        self.defined().reduce(f64::min)
    }

    /// Largest defined corner value.
    pub fn max(&self) -> Option<f64> {
        self.defined().reduce(f64::max)
    }

    /// True iff `min ≤ level ≤ max` over the defined corners.
    pub fn value_belongs_to(&self, level: f64) -> bool {
        match (self.min(), self.max()) {
            (Some(min), Some(max)) => min <= level && level <= max,
            _ => false,
        }
    }

    /// Bit per defined corner strictly above `level`.
    pub fn bitmask(&self, level: f64) -> CellBitmask {
        Corner::ALL
            .into_iter()
            .filter(|c| self.corner(*c).is_some_and(|v| v > level))
            .fold(CellBitmask::NONE, |mask, c| mask | c.bit())
    }

    /// Mean of the two corners of `edge`.
    pub fn edge_mid(&self, edge: Edge) -> Option<f64> {
        let (a, b) = edge.corners()?;
        Some((self.corner(a)? + self.corner(b)?) / 2.0)
    }

    /// Mean of all defined corners.
    pub fn center(&self) -> Option<f64> {
        let (sum, count) = self.defined().fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        (count > 0).then(|| sum / count as f64)
    }

    /// Values of the quadrant holding `quadrant`'s corner.
    pub fn sub_cell(&self, quadrant: Quadrant) -> ValuesInCell {
        let center = self.center();
        match quadrant {
            Corner::LeftBottom => ValuesInCell::new(
                self.left_bottom,
                self.edge_mid(Edge::Left),
                center,
                self.edge_mid(Edge::Bottom),
            ),
            Corner::LeftTop => ValuesInCell::new(
                self.edge_mid(Edge::Left),
                self.left_top,
                self.edge_mid(Edge::Top),
                center,
            ),
            Corner::RightTop => ValuesInCell::new(
                center,
                self.edge_mid(Edge::Top),
                self.right_top,
                self.edge_mid(Edge::Right),
            ),
            Corner::RightBottom => ValuesInCell::new(
                self.edge_mid(Edge::Bottom),
                center,
                self.edge_mid(Edge::Right),
                self.right_bottom,
            ),
        }
    }
}

/// The four corner positions of a cell. Need not be axis aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrregularCell {
    pub left_bottom: Point,
    pub left_top: Point,
    pub right_top: Point,
    pub right_bottom: Point,
}

impl IrregularCell {
    pub fn new(left_bottom: Point, left_top: Point, right_top: Point, right_bottom: Point) -> Self {
        Self {
            left_bottom,
            left_top,
            right_top,
            right_bottom,
        }
    }

    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::LeftBottom => self.left_bottom,
            Corner::LeftTop => self.left_top,
            Corner::RightTop => self.right_top,
            Corner::RightBottom => self.right_bottom,
        }
    }

    /// Midpoint of `edge`. `Edge::None` maps to the center.
    pub fn edge_mid(&self, edge: Edge) -> Point {
        match edge.corners() {
            Some((a, b)) => self.corner(a).midpoint(self.corner(b)),
            None => self.center(),
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left_bottom.x + self.left_top.x + self.right_top.x + self.right_bottom.x) / 4.0,
            (self.left_bottom.y + self.left_top.y + self.right_top.y + self.right_bottom.y) / 4.0,
        )
    }

    pub fn sub_cell(&self, quadrant: Quadrant) -> IrregularCell {
        let center = self.center();
        match quadrant {
            Corner::LeftBottom => IrregularCell::new(
                self.left_bottom,
                self.edge_mid(Edge::Left),
                center,
                self.edge_mid(Edge::Bottom),
            ),
            Corner::LeftTop => IrregularCell::new(
                self.edge_mid(Edge::Left),
                self.left_top,
                self.edge_mid(Edge::Top),
                center,
            ),
            Corner::RightTop => IrregularCell::new(
                center,
                self.edge_mid(Edge::Top),
                self.right_top,
                self.edge_mid(Edge::Right),
            ),
            Corner::RightBottom => IrregularCell::new(
                self.edge_mid(Edge::Bottom),
                center,
                self.edge_mid(Edge::Right),
                self.right_bottom,
            ),
        }
    }
}

/// Values and positions of one cell (or sub-cell) together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellInfo {
    pub values: ValuesInCell,
    pub geometry: IrregularCell,
}

impl CellInfo {
    /// Read cell `(i, j)` from a field. The caller keeps `i + 1 < width`
    /// and `j + 1 < height`.
    pub fn from_field<F: ScalarField + ?Sized>(field: &F, i: usize, j: usize) -> Self {
        Self {
            values: ValuesInCell::new(
                field.sample(i, j),
                field.sample(i, j + 1),
                field.sample(i + 1, j + 1),
                field.sample(i + 1, j),
            ),
            geometry: IrregularCell::new(
                field.position(i, j),
                field.position(i, j + 1),
                field.position(i + 1, j + 1),
                field.position(i + 1, j),
            ),
        }
    }

    pub fn sub_cell(&self, quadrant: Quadrant) -> CellInfo {
        CellInfo {
            values: self.values.sub_cell(quadrant),
            geometry: self.geometry.sub_cell(quadrant),
        }
    }

    /// Both endpoint values of `edge`, if defined.
    pub fn edge_values(&self, edge: Edge) -> Option<(f64, f64)> {
        let (a, b) = edge.corners()?;
        Some((self.values.corner(a)?, self.values.corner(b)?))
    }

    /// The one other crossed edge with both endpoints defined.
    ///
    /// Cells with a missing corner are not subdivided; the entry is paired
    /// with whatever defined crossed edge remains. `None` when there is no
    /// such edge, or more than one.
    pub fn paired_exit(&self, entry: Edge, level: f64) -> Option<Edge> {
        let mut crossed = Edge::ALL.into_iter().filter(|&edge| {
            edge != entry
                && self
                    .edge_values(edge)
                    .is_some_and(|(a, b)| (a > level) != (b > level))
        });
        match (crossed.next(), crossed.next()) {
            (Some(exit), None) => Some(exit),
            _ => None,
        }
    }

    /// Where the field crosses `level` along `edge`.
    pub fn crossing(&self, edge: Edge, level: f64, near_zero: f64) -> Result<Point> {
        let (a, b) = edge
            .corners()
            .ok_or_else(|| IsolineError::inconsistent("no crossing on Edge::None"))?;
        let (va, vb) = self.edge_values(edge).ok_or_else(|| {
            IsolineError::inconsistent(format!("{edge:?} edge has an undefined endpoint"))
        })?;
        get_point(
            level,
            va,
            vb,
            self.geometry.corner(a),
            self.geometry.corner(b),
            near_zero,
        )
    }
}

/// Linear interpolation of the crossing between two samples.
///
/// A level equal to one endpoint is nudged by `near_zero` of the edge span
/// toward the other endpoint so the point never lands on a grid node.
pub fn get_point(level: f64, va: f64, vb: f64, pa: Point, pb: Point, near_zero: f64) -> Result<Point> {
    let span = vb - va;
    if span == 0.0 {
        return Err(IsolineError::InterpolationOutOfRange { ratio: f64::NAN });
    }

    let level = if level == va {
        va + near_zero * span
    } else if level == vb {
        vb - near_zero * span
    } else {
        level
    };

    let ratio = (level - va) / span;
    if !(0.0..=1.0).contains(&ratio) {
        return Err(IsolineError::InterpolationOutOfRange { ratio });
    }

    Ok(pa.lerp(pb, ratio))
}
