//! Cell edges, corner bitmasks and the exit-edge lookup tables.
//!
//! A cell has corners LeftBottom `(i, j)`, RightBottom `(i + 1, j)`,
//! RightTop `(i + 1, j + 1)` and LeftTop `(i, j + 1)`. A corner's bit is set
//! when its value is defined and strictly greater than the traced level.

use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// A side of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
    /// No edge: the walk has ended.
    None,
}

impl Edge {
    /// The four real edges in a fixed order.
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Top, Edge::Right, Edge::Bottom];

    /// The same physical edge as seen from the neighboring cell.
    pub fn opposite(self) -> Edge {
        match self {
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
            Edge::None => Edge::None,
        }
    }

    /// The two corners bounding this edge, lower/left one first.
    pub fn corners(self) -> Option<(Corner, Corner)> {
        match self {
            Edge::Left => Some((Corner::LeftBottom, Corner::LeftTop)),
            Edge::Top => Some((Corner::LeftTop, Corner::RightTop)),
            Edge::Right => Some((Corner::RightBottom, Corner::RightTop)),
            Edge::Bottom => Some((Corner::LeftBottom, Corner::RightBottom)),
            Edge::None => None,
        }
    }
}

/// A corner of a cell. Also names the quadrant of a cell containing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    LeftBottom,
    LeftTop,
    RightTop,
    RightBottom,
}

/// Quadrants of a subdivided cell, named after the original corner they hold.
pub type Quadrant = Corner;

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::LeftBottom,
        Corner::LeftTop,
        Corner::RightTop,
        Corner::RightBottom,
    ];

    pub fn bit(self) -> CellBitmask {
        match self {
            Corner::LeftTop => CellBitmask::LEFT_TOP,
            Corner::RightTop => CellBitmask::RIGHT_TOP,
            Corner::RightBottom => CellBitmask::RIGHT_BOTTOM,
            Corner::LeftBottom => CellBitmask::LEFT_BOTTOM,
        }
    }

    /// Whether `edge` of this quadrant lies on the outer boundary of the
    /// parent cell.
    pub fn is_outer(self, edge: Edge) -> bool {
        matches!(
            (self, edge),
            (Corner::LeftBottom, Edge::Left | Edge::Bottom)
                | (Corner::LeftTop, Edge::Left | Edge::Top)
                | (Corner::RightTop, Edge::Right | Edge::Top)
                | (Corner::RightBottom, Edge::Right | Edge::Bottom)
        )
    }

    /// The quadrant on the other side of an inner `edge` of this quadrant.
    pub fn adjacent(self, edge: Edge) -> Option<Quadrant> {
        match (self, edge) {
            (Corner::LeftBottom, Edge::Right) => Some(Corner::RightBottom),
            (Corner::LeftBottom, Edge::Top) => Some(Corner::LeftTop),
            (Corner::LeftTop, Edge::Bottom) => Some(Corner::LeftBottom),
            (Corner::LeftTop, Edge::Right) => Some(Corner::RightTop),
            (Corner::RightTop, Edge::Left) => Some(Corner::LeftTop),
            (Corner::RightTop, Edge::Bottom) => Some(Corner::RightBottom),
            (Corner::RightBottom, Edge::Left) => Some(Corner::LeftBottom),
            (Corner::RightBottom, Edge::Top) => Some(Corner::RightTop),
            _ => None,
        }
    }
}

/// One bit per corner whose value lies above the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellBitmask(u8);

impl CellBitmask {
    pub const NONE: CellBitmask = CellBitmask(0);
    pub const LEFT_TOP: CellBitmask = CellBitmask(1);
    pub const RIGHT_TOP: CellBitmask = CellBitmask(2);
    pub const RIGHT_BOTTOM: CellBitmask = CellBitmask(4);
    pub const LEFT_BOTTOM: CellBitmask = CellBitmask(8);
    pub const ALL: CellBitmask = CellBitmask(15);

    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0x0f)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, corner: Corner) -> bool {
        self.0 & corner.bit().0 != 0
    }

    /// The two diagonal masks where the crossing topology is ambiguous.
    pub fn is_saddle(self) -> bool {
        self == Self::LEFT_TOP | Self::RIGHT_BOTTOM || self == Self::LEFT_BOTTOM | Self::RIGHT_TOP
    }

    /// Whether the level crosses `edge` under this mask.
    pub fn crosses(self, edge: Edge) -> bool {
        match edge.corners() {
            Some((a, b)) => self.contains(a) != self.contains(b),
            None => false,
        }
    }
}

impl BitOr for CellBitmask {
    type Output = CellBitmask;

    fn bitor(self, rhs: Self) -> Self {
        CellBitmask(self.0 | rhs.0)
    }
}

/// How a contour entering a cell leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// Unambiguous exit edge.
    Exit(Edge),
    /// Diagonal mask: needs sub-cell resolution.
    Saddle,
    /// The entry edge is not crossed under this mask.
    NoCrossing,
}

use Edge::{Bottom as B, Left as L, None as N, Right as R, Top as T};

// Exit edge indexed by bitmask, one table per entry edge. `N` marks masks
// where the entry edge is not crossed, plus the two saddle masks (5 and 10).
static LEFT_EXITS: [Edge; 16] = [N, T, N, R, N, N, N, B, B, N, N, N, R, N, T, N];
static TOP_EXITS: [Edge; 16] = [N, L, R, N, N, N, B, N, N, B, N, N, N, R, L, N];
static RIGHT_EXITS: [Edge; 16] = [N, N, T, L, B, N, N, N, N, N, N, B, L, T, N, N];
static BOTTOM_EXITS: [Edge; 16] = [N, N, N, N, R, N, T, L, L, T, N, R, N, N, N, N];

/// Table lookup: the exit edge for a contour entering through `entry`.
pub fn exit_edge(entry: Edge, mask: CellBitmask) -> Edge {
    let idx = mask.bits() as usize;
    match entry {
        Edge::Left => LEFT_EXITS[idx],
        Edge::Top => TOP_EXITS[idx],
        Edge::Right => RIGHT_EXITS[idx],
        Edge::Bottom => BOTTOM_EXITS[idx],
        Edge::None => Edge::None,
    }
}

/// Decide how a contour entering through `entry` crosses a cell with `mask`.
pub fn classify(entry: Edge, mask: CellBitmask) -> Crossing {
    if !mask.crosses(entry) {
        return Crossing::NoCrossing;
    }
    if mask.is_saddle() {
        return Crossing::Saddle;
    }
    match exit_edge(entry, mask) {
        Edge::None => Crossing::NoCrossing,
        exit => Crossing::Exit(exit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_match_crossed_edges() {
        // For every unambiguous mask, entering through one crossed edge must
        // leave through the only other crossed edge.
        for bits in 0..16u8 {
            let mask = CellBitmask::from_bits(bits);
            let crossed: Vec<Edge> = Edge::ALL.into_iter().filter(|e| mask.crosses(*e)).collect();

            for entry in Edge::ALL {
                let exit = exit_edge(entry, mask);
                if mask.is_saddle() || !crossed.contains(&entry) {
                    assert_eq!(exit, Edge::None, "mask {bits} entry {entry:?}");
                } else {
                    assert_eq!(crossed.len(), 2, "mask {bits}");
                    let other = crossed.iter().find(|e| **e != entry).copied();
                    assert_eq!(Some(exit), other, "mask {bits} entry {entry:?}");
                }
            }
        }
    }

    #[test]
    fn test_saddle_masks() {
        let saddles: Vec<u8> = (0..16)
            .filter(|b| CellBitmask::from_bits(*b).is_saddle())
            .collect();
        assert_eq!(saddles, vec![5, 10]);
        assert_eq!(classify(Edge::Left, CellBitmask::from_bits(5)), Crossing::Saddle);
        assert_eq!(classify(Edge::Top, CellBitmask::from_bits(10)), Crossing::Saddle);
    }

    #[test]
    fn test_classify_uncrossed_entry() {
        // Only the left-top corner is above: the bottom edge is not crossed.
        assert_eq!(
            classify(Edge::Bottom, CellBitmask::LEFT_TOP),
            Crossing::NoCrossing
        );
        assert_eq!(
            classify(Edge::Left, CellBitmask::LEFT_TOP),
            Crossing::Exit(Edge::Top)
        );
        assert_eq!(classify(Edge::Left, CellBitmask::NONE), Crossing::NoCrossing);
        assert_eq!(classify(Edge::Left, CellBitmask::ALL), Crossing::NoCrossing);
    }

    #[test]
    fn test_quadrant_adjacency_is_symmetric() {
        for quadrant in Corner::ALL {
            for edge in Edge::ALL {
                match quadrant.adjacent(edge) {
                    Some(next) => {
                        assert!(!quadrant.is_outer(edge));
                        assert_eq!(next.adjacent(edge.opposite()), Some(quadrant));
                    }
                    None => assert!(quadrant.is_outer(edge)),
                }
            }
        }
    }

    #[test]
    fn test_opposite() {
        for edge in Edge::ALL {
            assert_eq!(edge.opposite().opposite(), edge);
            assert_ne!(edge.opposite(), edge);
        }
        assert_eq!(Edge::None.opposite(), Edge::None);
    }
}
