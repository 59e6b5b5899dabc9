//! Traced lines and the collection handed to renderers.

use crate::field::Point;
use serde::{Deserialize, Serialize};

/// One traced polyline at a single level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLine {
    pub start_point: Point,
    pub other_points: Vec<Point>,
    /// The level this line was traced at.
    pub real_value: f64,
    /// `real_value` normalized into the field's min–max range.
    pub value01: f64,
    /// The line returned to its seed edge; its last point repeats the first.
    pub closed: bool,
}

impl LevelLine {
    pub fn new(start_point: Point, real_value: f64, value01: f64) -> Self {
        Self {
            start_point,
            other_points: Vec::new(),
            real_value,
            value01,
            closed: false,
        }
    }

    /// Start point followed by every other point.
    pub fn points(&self) -> impl Iterator<Item = &Point> + '_ {
        std::iter::once(&self.start_point).chain(self.other_points.iter())
    }

    /// Total number of points, start included.
    pub fn len(&self) -> usize {
        1 + self.other_points.len()
    }

    /// A line is empty when nothing was traced past its start point.
    pub fn is_empty(&self) -> bool {
        self.other_points.is_empty()
    }

    /// Arclength of the polyline.
    pub fn length(&self) -> f64 {
        let mut length = 0.0;
        let mut prev = self.start_point;
        for &p in &self.other_points {
            length += prev.distance(p);
            prev = p;
        }
        length
    }
}

/// Lines for one or more levels, in discovery order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IsolineCollection {
    lines: Vec<LevelLine>,
    pub min: f64,
    pub max: f64,
}

impl IsolineCollection {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            lines: Vec::new(),
            min,
            max,
        }
    }

    /// Append a line. Lines with no points past the start are dropped.
    pub fn push(&mut self, line: LevelLine) {
        if !line.is_empty() {
            self.lines.push(line);
        }
    }

    /// Append every line of `other`, keeping its order.
    pub fn extend_from(&mut self, other: IsolineCollection) {
        for line in other.lines {
            self.push(line);
        }
    }

    pub fn lines(&self) -> &[LevelLine] {
        &self.lines
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LevelLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Distinct levels in the order they first appear.
    pub fn levels(&self) -> Vec<f64> {
        let mut levels: Vec<f64> = Vec::new();
        for line in &self.lines {
            if !levels.contains(&line.real_value) {
                levels.push(line.real_value);
            }
        }
        levels
    }

    /// Lines traced at exactly `level`.
    pub fn lines_at(&self, level: f64) -> impl Iterator<Item = &LevelLine> + '_ {
        self.lines.iter().filter(move |l| l.real_value == level)
    }

    /// Number of points across all lines.
    pub fn total_points(&self) -> usize {
        self.lines.iter().map(LevelLine::len).sum()
    }
}

impl IntoIterator for IsolineCollection {
    type Item = LevelLine;
    type IntoIter = std::vec::IntoIter<LevelLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.into_iter()
    }
}

impl<'a> IntoIterator for &'a IsolineCollection {
    type Item = &'a LevelLine;
    type IntoIter = std::slice::Iter<'a, LevelLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
