//! Resolution of ambiguous (saddle) cells by recursive quartering.
//!
//! The cell is split into four quadrants around its center value. The walk
//! enters the quadrant whose half of the entry edge brackets the level, then
//! follows the contour quadrant to quadrant until it leaves through an outer
//! edge. A quadrant that is itself a saddle is quartered again. The nesting
//! is kept on an explicit stack, and every quadrant step counts against a
//! fixed budget.

use crate::cell::CellInfo;
use crate::edge::{classify, Corner, Crossing, Edge, Quadrant};
use crate::error::{IsolineError, Result};

/// The exit found for an ambiguous cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaddleExit {
    /// Exit edge of the original cell.
    pub edge: Edge,
    /// The innermost sub-cell whose `edge` side lies on that exit.
    pub crossing_cell: CellInfo,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    cell: CellInfo,
    quadrant: Quadrant,
    entry: Edge,
}

impl Frame {
    fn enter(cell: CellInfo, entry: Edge, level: f64) -> Result<Self> {
        let (a, b) = entry
            .corners()
            .ok_or_else(|| IsolineError::inconsistent("saddle entered through Edge::None"))?;
        let mid = cell.values.edge_mid(entry);

        let above = |v: Option<f64>| v.is_some_and(|v| v > level);
        let straddles = |c: Corner| above(cell.values.corner(c)) != above(mid);

        let quadrant = match (straddles(a), straddles(b)) {
            (true, false) => a,
            (false, true) => b,
            _ => closest_quadrant(&cell, a, b, mid, level),
        };

        Ok(Self {
            cell,
            quadrant,
            entry,
        })
    }
}

/// Of the two quadrants along the entry edge, the one whose near samples
/// lie closest to the level.
fn closest_quadrant(cell: &CellInfo, a: Corner, b: Corner, mid: Option<f64>, level: f64) -> Quadrant {
    let distance = |c: Corner| {
        [cell.values.corner(c), mid]
            .into_iter()
            .flatten()
            .map(|v| (v - level).abs())
            .fold(f64::INFINITY, f64::min)
    };
    if distance(b) < distance(a) {
        b
    } else {
        a
    }
}

/// Find where a contour entering `cell` through `entry` leaves it, for a
/// cell whose corner mask is diagonal.
pub fn resolve_saddle(
    cell: &CellInfo,
    entry: Edge,
    level: f64,
    max_iterations: usize,
) -> Result<SaddleExit> {
    let mut stack = vec![Frame::enter(*cell, entry, level)?];

    for _ in 0..max_iterations {
        let Some(frame) = stack.last().copied() else {
            break;
        };
        let sub = frame.cell.sub_cell(frame.quadrant);

        let exit = match classify(frame.entry, sub.values.bitmask(level)) {
            Crossing::Exit(exit) => exit,
            Crossing::Saddle => {
                stack.push(Frame::enter(sub, frame.entry, level)?);
                continue;
            }
            Crossing::NoCrossing => {
                return Err(IsolineError::inconsistent(format!(
                    "{:?} quadrant has no exit for {:?} entry at level {level}",
                    frame.quadrant, frame.entry
                )));
            }
        };

        // Unwind every frame the exit leaves through its outer boundary;
        // the first frame it stays inside moves on to the next quadrant.
        while let Some(frame) = stack.last_mut() {
            if frame.quadrant.is_outer(exit) {
                stack.pop();
                continue;
            }
            frame.quadrant = frame.quadrant.adjacent(exit).ok_or_else(|| {
                IsolineError::inconsistent(format!(
                    "no quadrant beyond {:?} of {:?}",
                    exit, frame.quadrant
                ))
            })?;
            frame.entry = exit.opposite();
            break;
        }

        if stack.is_empty() {
            return Ok(SaddleExit {
                edge: exit,
                crossing_cell: sub,
            });
        }
    }

    Err(IsolineError::SaddleUnresolved {
        iterations: max_iterations,
    })
}
