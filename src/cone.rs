use crate::grid::Point;
use crate::line::{push_lower, push_upper, tangent, Height, SightLine};
use smallvec::{smallvec, SmallVec};
use std::cmp::Ordering;

/// Hull storage. A cone gains at most one point per side per column, so
/// scans up to radius 7 never leave the inline buffer.
type Hull = SmallVec<[Point; 8]>;

/// Cone is the set of sight lines still open while one octant is scanned.
///
/// It is stored in the octant's canonical frame as two hulls of lattice
/// points: every line in the cone passes strictly above each `under` point
/// and strictly below each `over` point. The starting cone only pins the
/// observer's own cell, `(0, 0)` under and `(0, 1)` over.
///
/// The highest height the cone reaches at any later column lies on a single
/// line through an `under` point and an `over` point to its right (`steep`).
/// The lowest lies on a line through an `over` point and an `under` point to
/// its right (`shallow`). Both are cached and only revisited when a new point
/// cuts them off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cone {
    /// Upper hull of the points the lines must clear from above
    under: Hull,
    /// Lower hull of the points the lines must stay beneath
    over: Hull,
    /// `None` while the cone is unbounded above
    steep: Option<SightLine>,
    /// `None` while the cone is unbounded below
    shallow: Option<SightLine>,
}

impl Cone {
    /// Every line leaving the observer's cell
    pub fn full() -> Self {
        Cone {
            under: smallvec![Point::new(0, 0)],
            over: smallvec![Point::new(0, 1)],
            steep: None,
            shallow: None,
        }
    }

    /// Exact bounds of the heights the cone's lines take at column `col`.
    ///
    /// Returns `(lowest, highest)`; `None` means the side is still unbounded.
    /// The cone is open, so neither bound is reached. `col` must lie to the
    /// right of every point the cone was built from.
    pub fn reach(&self, col: i32) -> (Option<Height>, Option<Height>) {
        (
            self.shallow.map(|line| line.height_at(col)),
            self.steep.map(|line| line.height_at(col)),
        )
    }

    /// Rows of column `col` the cone reaches inside the octant (`0..=col`),
    /// as an inclusive `(first, last)` pair, or `None` if it reaches none.
    pub fn row_span(&self, col: i32) -> Option<(i32, i32)> {
        let (lowest, highest) = self.reach(col);
        let limit = i64::from(col);
        let first = lowest.map_or(0, |h| h.floor().clamp(0, limit + 1));
        let last = highest.map_or(limit, |h| (h.ceil() - 1).clamp(-1, limit));
        if first > last {
            None
        } else {
            Some((first as i32, last as i32))
        }
    }

    /// Sub-cone of lines passing above `floor` (if any) and below `ceiling`
    /// (if any). Both points must lie in the column being scanned.
    pub fn narrowed(&self, floor: Option<Point>, ceiling: Option<Point>) -> Cone {
        let mut cone = self.clone();
        if let Some(p) = ceiling {
            let clears = |line: &SightLine| line.height_at(p.x) <= Height::integer(i64::from(p.y));
            if !cone.steep.as_ref().is_some_and(clears) {
                cone.steep = tangent(&self.under, p, Ordering::Less);
            }
            push_lower(&mut cone.over, p);
        }
        if let Some(p) = floor {
            let clears = |line: &SightLine| line.height_at(p.x) >= Height::integer(i64::from(p.y));
            if !cone.shallow.as_ref().is_some_and(clears) {
                cone.shallow = tangent(&self.over, p, Ordering::Greater);
            }
            push_upper(&mut cone.under, p);
        }
        cone
    }
}
