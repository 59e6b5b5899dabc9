//! Single-level contour tracing.
//!
//! Lines are seeded at crossed grid edges in a fixed order (left, bottom,
//! right and top boundaries, then interior horizontal and vertical edges)
//! and followed cell to cell until they close on their seed edge, leave the
//! grid, or run into missing data. An edge is crossed iff exactly one of its
//! two defined endpoints lies strictly above the level.

use crate::cell::CellInfo;
use crate::collection::LevelLine;
use crate::edge::{classify, Crossing, Edge};
use crate::error::{IsolineError, Result};
use crate::field::{Point, ScalarField, ValueRange};
use crate::saddle::resolve_saddle;

const LEFT_PASSED: u8 = 0b01;
const BOTTOM_PASSED: u8 = 0b10;

/// An edge of the node lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridEdge {
    /// From node `(i, j)` up to `(i, j + 1)`.
    Vertical { i: usize, j: usize },
    /// From node `(i, j)` right to `(i + 1, j)`.
    Horizontal { i: usize, j: usize },
}

impl GridEdge {
    /// The lattice edge that is side `edge` of cell `(i, j)`.
    pub fn of_cell(i: usize, j: usize, edge: Edge) -> Option<GridEdge> {
        match edge {
            Edge::Left => Some(GridEdge::Vertical { i, j }),
            Edge::Right => Some(GridEdge::Vertical { i: i + 1, j }),
            Edge::Bottom => Some(GridEdge::Horizontal { i, j }),
            Edge::Top => Some(GridEdge::Horizontal { i, j: j + 1 }),
            Edge::None => None,
        }
    }

    pub fn endpoints(self) -> ((usize, usize), (usize, usize)) {
        match self {
            GridEdge::Vertical { i, j } => ((i, j), (i, j + 1)),
            GridEdge::Horizontal { i, j } => ((i, j), (i + 1, j)),
        }
    }

    /// Cells sharing this edge, each with the side through which a walk
    /// enters it. The right/upper cell comes first.
    fn sides(self, width: usize, height: usize) -> [Option<(usize, usize, Edge)>; 2] {
        match self {
            GridEdge::Vertical { i, j } => [
                (i + 1 < width).then_some((i, j, Edge::Left)),
                (i >= 1).then(|| (i - 1, j, Edge::Right)),
            ],
            GridEdge::Horizontal { i, j } => [
                (j + 1 < height).then_some((i, j, Edge::Bottom)),
                (j >= 1).then(|| (i, j - 1, Edge::Top)),
            ],
        }
    }
}

/// Working state for one level: which lattice edges already carry a line
/// and which cells a walk has entered.
#[derive(Debug, Clone)]
pub struct TraceBuffers {
    width: usize,
    height: usize,
    edges: Vec<u8>,
    processed: Vec<bool>,
}

impl TraceBuffers {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            edges: vec![0; width * height],
            processed: vec![false; width * height],
        }
    }

    /// Clear all marks, keeping the allocation.
    pub fn reset(&mut self) {
        self.edges.fill(0);
        self.processed.fill(false);
    }

    fn index(&self, i: usize, j: usize) -> usize {
        j * self.width + i
    }

    pub fn is_passed(&self, edge: GridEdge) -> bool {
        match edge {
            GridEdge::Vertical { i, j } => self.edges[self.index(i, j)] & LEFT_PASSED != 0,
            GridEdge::Horizontal { i, j } => self.edges[self.index(i, j)] & BOTTOM_PASSED != 0,
        }
    }

    fn mark_passed(&mut self, edge: GridEdge) {
        match edge {
            GridEdge::Vertical { i, j } => {
                let idx = self.index(i, j);
                self.edges[idx] |= LEFT_PASSED;
            }
            GridEdge::Horizontal { i, j } => {
                let idx = self.index(i, j);
                self.edges[idx] |= BOTTOM_PASSED;
            }
        }
    }

    fn mark_processed(&mut self, i: usize, j: usize) {
        let idx = self.index(i, j);
        self.processed[idx] = true;
    }

    /// Number of cells entered by any walk since the last reset.
    pub fn cells_visited(&self) -> usize {
        self.processed.iter().filter(|p| **p).count()
    }

    fn fits(&self, width: usize, height: usize) -> bool {
        self.width == width && self.height == height
    }
}

/// Counters collected while tracing one level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    pub lines: usize,
    pub points: usize,
    pub cells_visited: usize,
    pub saddle_cells: usize,
}

struct Walk {
    points: Vec<Point>,
    closed: bool,
}

/// Traces every line of one level over a field.
pub struct LevelTracer<'a, F: ScalarField + ?Sized> {
    field: &'a F,
    level: f64,
    value01: f64,
    near_zero: f64,
    max_saddle_iterations: usize,
    stats: TraceStats,
}

impl<'a, F: ScalarField + ?Sized> LevelTracer<'a, F> {
    pub fn new(field: &'a F, level: f64, range: ValueRange) -> Self {
        Self {
            field,
            level,
            value01: range.normalize(level),
            near_zero: 1e-4,
            max_saddle_iterations: 1000,
            stats: TraceStats::default(),
        }
    }

    pub fn with_near_zero(mut self, near_zero: f64) -> Self {
        self.near_zero = near_zero;
        self
    }

    pub fn with_max_saddle_iterations(mut self, max: usize) -> Self {
        self.max_saddle_iterations = max;
        self
    }

    /// Trace the level. `buffers` are reset (or reallocated when the field
    /// size changed) before use.
    pub fn trace(mut self, buffers: &mut TraceBuffers) -> Result<(Vec<LevelLine>, TraceStats)> {
        let width = self.field.width();
        let height = self.field.height();
        let mut lines = Vec::new();

        if width < 2 || height < 2 {
            return Ok((lines, self.stats));
        }

        if buffers.fits(width, height) {
            buffers.reset();
        } else {
            *buffers = TraceBuffers::new(width, height);
        }

        let boundary = (0..height - 1)
            .map(|j| GridEdge::Vertical { i: 0, j })
            .chain((0..width - 1).map(|i| GridEdge::Horizontal { i, j: 0 }))
            .chain((0..height - 1).map(|j| GridEdge::Vertical { i: width - 1, j }))
            .chain((0..width - 1).map(|i| GridEdge::Horizontal { i, j: height - 1 }));
        let interior_horizontal = (1..height - 1)
            .flat_map(|j| (0..width - 1).map(move |i| GridEdge::Horizontal { i, j }));
        let interior_vertical = (1..width - 1)
            .flat_map(|i| (0..height - 1).map(move |j| GridEdge::Vertical { i, j }));

        for seed in boundary.chain(interior_horizontal).chain(interior_vertical) {
            if buffers.is_passed(seed) || !self.is_crossed(seed) {
                continue;
            }
            if let Some(line) = self.trace_line(seed, buffers)? {
                self.stats.lines += 1;
                self.stats.points += line.len();
                lines.push(line);
            }
        }

        self.stats.cells_visited = buffers.cells_visited();
        Ok((lines, self.stats))
    }

    fn is_crossed(&self, edge: GridEdge) -> bool {
        let ((ai, aj), (bi, bj)) = edge.endpoints();
        match (self.field.sample(ai, aj), self.field.sample(bi, bj)) {
            (Some(a), Some(b)) => (a > self.level) != (b > self.level),
            _ => false,
        }
    }

    fn trace_line(&mut self, seed: GridEdge, buffers: &mut TraceBuffers) -> Result<Option<LevelLine>> {
        let mut sides = seed
            .sides(self.field.width(), self.field.height())
            .into_iter()
            .flatten();
        let Some(first) = sides.next() else {
            return Ok(None);
        };

        buffers.mark_passed(seed);
        let (ci, cj, entry) = first;
        let start = CellInfo::from_field(self.field, ci, cj).crossing(entry, self.level, self.near_zero)?;

        let forward = self.walk(first, seed, buffers)?;
        let mut points = Vec::new();
        if !forward.closed {
            // Seeded mid-line: pick up the half behind the seed as well.
            if let Some(second) = sides.next() {
                let backward = self.walk(second, seed, buffers)?;
                points.extend(backward.points.into_iter().rev());
            }
        }
        points.push(start);
        points.extend(forward.points);
        if forward.closed {
            points.push(start);
        }

        let mut points = points.into_iter();
        let Some(start_point) = points.next() else {
            return Ok(None);
        };
        let mut line = LevelLine::new(start_point, self.level, self.value01);
        line.other_points = points.collect();
        line.closed = forward.closed;

        tracing::trace!(
            level = self.level,
            seed = ?seed,
            points = line.len(),
            closed = line.closed,
            "Traced isoline"
        );

        Ok((!line.is_empty()).then_some(line))
    }

    /// Follow the contour from `(ci, cj)` entered through `entry`.
    fn walk(
        &mut self,
        (mut ci, mut cj, mut entry): (usize, usize, Edge),
        seed: GridEdge,
        buffers: &mut TraceBuffers,
    ) -> Result<Walk> {
        let width = self.field.width();
        let height = self.field.height();
        let mut points = Vec::new();

        loop {
            buffers.mark_processed(ci, cj);
            let cell = CellInfo::from_field(self.field, ci, cj);

            if !cell.values.value_belongs_to(self.level) {
                return Err(IsolineError::LevelOutsideCell {
                    level: self.level,
                    min: cell.values.min().unwrap_or(f64::NAN),
                    max: cell.values.max().unwrap_or(f64::NAN),
                });
            }

            let (exit, crossing_cell) = if !cell.values.is_complete() {
                // A missing corner is never subdivided around.
                match cell.paired_exit(entry, self.level) {
                    Some(exit) => (exit, cell),
                    None => {
                        return Ok(Walk {
                            points,
                            closed: false,
                        })
                    }
                }
            } else {
                match classify(entry, cell.values.bitmask(self.level)) {
                    Crossing::Exit(exit) => (exit, cell),
                    Crossing::Saddle => {
                        self.stats.saddle_cells += 1;
                        let resolved =
                            resolve_saddle(&cell, entry, self.level, self.max_saddle_iterations)?;
                        (resolved.edge, resolved.crossing_cell)
                    }
                    Crossing::NoCrossing => {
                        return Err(IsolineError::inconsistent(format!(
                            "cell ({ci}, {cj}) entered through uncrossed {entry:?} edge"
                        )));
                    }
                }
            };

            // No data on the far side: the line stops here.
            if cell.edge_values(exit).is_none() {
                return Ok(Walk {
                    points,
                    closed: false,
                });
            }

            let Some(grid_edge) = GridEdge::of_cell(ci, cj, exit) else {
                return Ok(Walk {
                    points,
                    closed: false,
                });
            };

            // Back on the seed edge the caller repeats the start point itself.
            if buffers.is_passed(grid_edge) {
                return Ok(Walk {
                    points,
                    closed: grid_edge == seed,
                });
            }

            let point = crossing_cell.crossing(exit, self.level, self.near_zero)?;
            buffers.mark_passed(grid_edge);
            points.push(point);

            let next = match exit {
                Edge::Left => ci.checked_sub(1).map(|i| (i, cj)),
                Edge::Right => (ci + 2 < width).then_some((ci + 1, cj)),
                Edge::Bottom => cj.checked_sub(1).map(|j| (ci, j)),
                Edge::Top => (cj + 2 < height).then_some((ci, cj + 1)),
                Edge::None => None,
            };
            match next {
                Some((ni, nj)) => {
                    ci = ni;
                    cj = nj;
                    entry = exit.opposite();
                }
                None => {
                    return Ok(Walk {
                        points,
                        closed: false,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::GridField;

    fn trace(field: &GridField, level: f64) -> Vec<LevelLine> {
        let range = field.value_range().unwrap();
        let mut buffers = TraceBuffers::new(field.width(), field.height());
        LevelTracer::new(field, level, range)
            .trace(&mut buffers)
            .unwrap()
            .0
    }

    #[test]
    fn test_grid_edge_sides() {
        let sides = GridEdge::Vertical { i: 0, j: 0 }.sides(3, 3);
        assert_eq!(sides, [Some((0, 0, Edge::Left)), None]);

        let sides = GridEdge::Vertical { i: 2, j: 1 }.sides(3, 3);
        assert_eq!(sides, [None, Some((1, 1, Edge::Right))]);

        let sides = GridEdge::Horizontal { i: 1, j: 1 }.sides(3, 3);
        assert_eq!(sides, [Some((1, 1, Edge::Bottom)), Some((1, 0, Edge::Top))]);
    }

    #[test]
    fn test_buffers_track_passed_edges() {
        let mut buffers = TraceBuffers::new(3, 3);
        let v = GridEdge::Vertical { i: 1, j: 1 };
        let h = GridEdge::Horizontal { i: 1, j: 1 };

        buffers.mark_passed(v);
        assert!(buffers.is_passed(v));
        assert!(!buffers.is_passed(h));

        buffers.mark_passed(h);
        buffers.reset();
        assert!(!buffers.is_passed(v));
        assert!(!buffers.is_passed(h));
    }

    #[test]
    fn test_peak_traces_one_closed_loop() {
        let field = GridField::from_fn(3, 3, |i, j| if i == 1 && j == 1 { 10.0 } else { 0.0 });
        let lines = trace(&field, 5.0);

        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert!(line.closed);
        // Four crossings plus the repeated start point.
        assert_eq!(line.len(), 5);
        assert_eq!(line.start_point, *line.other_points.last().unwrap());
    }

    #[test]
    fn test_interior_seed_collects_both_halves() {
        // A circle of radius 2.5 cut open by missing columns on the right.
        // The first crossed edge in scan order sits in the middle of the arc.
        let mut field = GridField::from_fn(7, 7, |i, j| {
            let dx = i as f64 - 3.0;
            let dy = j as f64 - 3.0;
            (dx * dx + dy * dy).sqrt()
        })
        .with_missing_value(-1.0);
        for j in 0..7 {
            field.set_value(5, j, -1.0);
            field.set_value(6, j, -1.0);
        }
        let lines = trace(&field, 2.5);

        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert!(!line.closed);

        let first = line.start_point;
        let last = *line.other_points.last().unwrap();
        assert_eq!(first.x, 4.0);
        assert!(first.y > 0.0 && first.y < 1.0);
        assert_eq!(last.x, 4.0);
        assert!(last.y > 5.0 && last.y < 6.0);
    }

    #[test]
    fn test_stats_count_cells_and_saddles() {
        let field = GridField::new(2, 2, vec![0.0, 10.0, 10.0, 0.0]).unwrap();
        let range = field.value_range().unwrap();
        let mut buffers = TraceBuffers::new(2, 2);
        let (lines, stats) = LevelTracer::new(&field, range.min + 5.0, range)
            .trace(&mut buffers)
            .unwrap();

        assert_eq!(stats.lines, lines.len());
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.saddle_cells, 2);
        assert_eq!(stats.cells_visited, 1);
    }

    #[test]
    fn test_buffers_are_resized_for_new_field() {
        let field = GridField::from_fn(4, 3, |i, _| i as f64);
        let range = field.value_range().unwrap();
        let mut buffers = TraceBuffers::new(2, 2);
        let (lines, _) = LevelTracer::new(&field, 1.5, range)
            .trace(&mut buffers)
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert!(buffers.fits(4, 3));
    }

    #[test]
    fn test_walk_rejects_cell_outside_level() {
        let field = GridField::new(2, 2, vec![0.0, 1.0, 0.0, 1.0]).unwrap();
        let range = field.value_range().unwrap();
        let mut buffers = TraceBuffers::new(2, 2);
        let mut tracer = LevelTracer::new(&field, 5.0, range);

        let seed = GridEdge::Vertical { i: 0, j: 0 };
        match tracer.walk((0, 0, Edge::Left), seed, &mut buffers) {
            Err(err) => assert_eq!(
                err,
                IsolineError::LevelOutsideCell {
                    level: 5.0,
                    min: 0.0,
                    max: 1.0
                }
            ),
            Ok(_) => panic!("walk accepted a cell that does not bracket the level"),
        }
    }

    #[test]
    fn test_missing_corner_saddle_pairs_defined_edges() {
        let field = GridField::new(2, 2, vec![3.0, 1.0, f64::NAN, 4.0]).unwrap();
        let mut lines = trace(&field, 2.5);

        assert_eq!(lines.len(), 1);
        let line = lines.remove(0);
        assert_eq!(line.len(), 2);
        assert_eq!(line.start_point.y, 0.0);
        assert_eq!(line.other_points[0].x, 1.0);
    }
}
