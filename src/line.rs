//! Exact integer geometry for digital sight lines.
//!
//! A sight line in an octant's canonical frame is a real line `h(x) = s + m * x`.
//! It occupies cell `(x, floor(h(x)))` of every column it crosses, so every
//! constraint the engine needs reduces to "pass above lattice point `p`" or
//! "pass below lattice point `p`". Everything here is integer arithmetic on
//! `i64`; heights are kept as exact fractions.

use crate::grid::Point;
use smallvec::{Array, SmallVec};
use std::cmp::Ordering;

/// Exact rational height `num / den` of a line at some column, with `den > 0`
#[derive(Debug, Clone, Copy)]
pub struct Height {
    num: i64,
    den: i64,
}

impl Height {
    pub fn new(num: i64, den: i64) -> Self {
        if den < 0 {
            Height { num: -num, den: -den }
        } else {
            Height { num, den }
        }
    }

    pub fn integer(value: i64) -> Self {
        Height { num: value, den: 1 }
    }

    pub fn floor(self) -> i64 {
        self.num.div_euclid(self.den)
    }

    pub fn ceil(self) -> i64 {
        -(-self.num).div_euclid(self.den)
    }
}

impl PartialEq for Height {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Height {}

impl PartialOrd for Height {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Height {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.num * other.den).cmp(&(other.num * self.den))
    }
}

/// The line through two lattice points with different x
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SightLine {
    from: Point,
    to: Point,
}

impl SightLine {
    pub fn through(from: Point, to: Point) -> Self {
        debug_assert_ne!(from.x, to.x, "sight lines are never vertical");
        SightLine { from, to }
    }

    /// Height of the line at column `x`:
    /// `from.y + (to.y - from.y) * (x - from.x) / (to.x - from.x)`
    pub fn height_at(&self, x: i32) -> Height {
        let run = i64::from(self.to.x) - i64::from(self.from.x);
        let rise = i64::from(self.to.y) - i64::from(self.from.y);
        let num = i64::from(self.from.y) * run + rise * (i64::from(x) - i64::from(self.from.x));
        Height::new(num, run)
    }
}

/// Twice the signed area of the triangle `o, a, b`; positive for a left turn
pub fn cross(o: Point, a: Point, b: Point) -> i64 {
    let (ox, oy) = (i64::from(o.x), i64::from(o.y));
    (i64::from(a.x) - ox) * (i64::from(b.y) - oy) - (i64::from(a.y) - oy) * (i64::from(b.x) - ox)
}

/// Append `p` to an upper hull whose points arrive in increasing x.
///
/// Only upper hull vertices of the "pass above" points can ever bound a sight
/// line, so the others are dropped as soon as they fall inside.
pub fn push_upper<A: Array<Item = Point>>(hull: &mut SmallVec<A>, p: Point) {
    while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) >= 0 {
        hull.pop();
    }
    hull.push(p);
}

/// Append `p` to a lower hull whose points arrive in increasing x
pub fn push_lower<A: Array<Item = Point>>(hull: &mut SmallVec<A>, p: Point) {
    while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
        hull.pop();
    }
    hull.push(p);
}

/// Line through `p` and the hull vertex left of `p` that makes it extreme.
///
/// With `want == Less` the result is the shallowest such line (use on an upper
/// hull); with `Greater` the steepest (use on a lower hull). Slopes along a
/// hull seen from a point to its right are unimodal, so the walk starts at the
/// right end and stops at the first vertex that does not improve.
pub fn tangent(hull: &[Point], p: Point, want: Ordering) -> Option<SightLine> {
    let ahead = p.x + 1;
    let slope = |v: Point| SightLine::through(v, p).height_at(ahead);

    let mut best = hull.iter().rposition(|v| v.x < p.x)?;
    while best > 0 && slope(hull[best - 1]).cmp(&slope(hull[best])) == want {
        best -= 1;
    }
    Some(SightLine::through(hull[best], p))
}

/// Whether the chain `lower` lies strictly below the chain `upper` everywhere.
///
/// Both chains must be x-monotone with distinct x per vertex, at least two
/// vertices each, and share the same first and last x. The gap between a
/// lower hull and an upper hull is convex, so checking every vertex of both
/// chains is enough.
pub fn strictly_below(lower: &[Point], upper: &[Point]) -> bool {
    vertices_clear(lower, upper, Ordering::Less) && vertices_clear(upper, lower, Ordering::Greater)
}

/// Compare each vertex against the height of `chain` at the vertex's x.
/// Every comparison must come out as `want`.
fn vertices_clear(vertices: &[Point], chain: &[Point], want: Ordering) -> bool {
    let mut seg = 0;
    for &v in vertices {
        while seg + 2 < chain.len() && chain[seg + 1].x < v.x {
            seg += 1;
        }
        let height = SightLine::through(chain[seg], chain[seg + 1]).height_at(v.x);
        if Height::integer(i64::from(v.y)).cmp(&height) != want {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_height_rounding() {
        let h = Height::new(7, 2);
        assert_eq!(h.floor(), 3);
        assert_eq!(h.ceil(), 4);

        let neg = Height::new(-7, 2);
        assert_eq!(neg.floor(), -4);
        assert_eq!(neg.ceil(), -3);

        let exact = Height::new(6, -3);
        assert_eq!(exact.floor(), -2);
        assert_eq!(exact.ceil(), -2);
    }

    #[test]
    fn test_height_ordering() {
        assert_eq!(Height::new(1, 2), Height::new(2, 4));
        assert!(Height::new(1, 3) < Height::new(1, 2));
        assert!(Height::integer(2) > Height::new(3, 2));
    }

    #[test]
    fn test_sight_line_height() {
        // Through (0, 1) and (4, 3): slope 1/2
        let line = SightLine::through(Point::new(0, 1), Point::new(4, 3));
        assert_eq!(line.height_at(2), Height::integer(2));
        assert_eq!(line.height_at(5), Height::new(7, 2));

        // Same line given right to left
        let reversed = SightLine::through(Point::new(4, 3), Point::new(0, 1));
        assert_eq!(reversed.height_at(5), Height::new(7, 2));
    }

    #[test]
    fn test_upper_hull_drops_inner_points() {
        let mut hull: SmallVec<[Point; 4]> = smallvec![Point::new(0, 0)];
        push_upper(&mut hull, Point::new(1, 0));
        push_upper(&mut hull, Point::new(2, 2));
        assert_eq!(hull[..], [Point::new(0, 0), Point::new(2, 2)]);

        push_upper(&mut hull, Point::new(4, 3));
        assert_eq!(hull[..], [Point::new(0, 0), Point::new(2, 2), Point::new(4, 3)]);
    }

    #[test]
    fn test_lower_hull_drops_inner_points() {
        let mut hull: SmallVec<[Point; 4]> = smallvec![Point::new(0, 1)];
        push_lower(&mut hull, Point::new(2, 3));
        push_lower(&mut hull, Point::new(4, 3));
        assert_eq!(hull[..], [Point::new(0, 1), Point::new(4, 3)]);
    }

    #[test]
    fn test_hull_spills_past_inline_capacity() {
        // Points on a parabola are all upper hull vertices
        let mut hull: SmallVec<[Point; 2]> = SmallVec::new();
        for x in 0..6 {
            push_upper(&mut hull, Point::new(x, -x * x));
        }
        assert_eq!(hull.len(), 6);
        assert!(hull.spilled());
    }

    #[test]
    fn test_tangent_walks_to_extreme_vertex() {
        let upper = [Point::new(0, 0), Point::new(2, 2), Point::new(4, 3)];
        // Slopes to (6, 5): 5/6, 3/4, 1
        assert_eq!(
            tangent(&upper, Point::new(6, 5), Ordering::Less),
            Some(SightLine::through(Point::new(2, 2), Point::new(6, 5)))
        );
        // Slopes to (6, 2): 1/3, 0, -1/2
        assert_eq!(
            tangent(&upper, Point::new(6, 2), Ordering::Less),
            Some(SightLine::through(Point::new(4, 3), Point::new(6, 2)))
        );

        let lower = [Point::new(0, 1), Point::new(4, 3)];
        // Slopes to (5, 2): 1/5, -1
        assert_eq!(
            tangent(&lower, Point::new(5, 2), Ordering::Greater),
            Some(SightLine::through(Point::new(0, 1), Point::new(5, 2)))
        );
    }

    #[test]
    fn test_tangent_needs_a_vertex_to_the_left() {
        assert_eq!(tangent(&[Point::new(3, 0)], Point::new(3, 5), Ordering::Less), None);
    }

    #[test]
    fn test_strictly_below() {
        let lower = [Point::new(0, 0), Point::new(4, 2)];
        let upper = [Point::new(0, 1), Point::new(2, 2), Point::new(4, 3)];
        assert!(strictly_below(&lower, &upper));

        // A lower vertex touching the upper chain is not strictly below it
        let touching = [Point::new(0, 0), Point::new(2, 2), Point::new(4, 2)];
        assert!(!strictly_below(&touching, &upper));
    }
}
