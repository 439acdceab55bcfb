use crate::grid::Point;
use std::ops::Index;

/// FOV output: a `(2r+1) x (2r+1)` square of flags centred on the observer.
///
/// The caller allocates it for a radius and hands it to the engine by `&mut`.
/// Absolute cell `(x, y)` lives at index `(x - cx + r, y - cy + r)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityMap {
    radius: i32,
    center: Point,
    cells: Vec<bool>,
}

impl VisibilityMap {
    pub fn new(radius: i32) -> Self {
        let radius = radius.max(0);
        let side = (2 * radius + 1) as usize;
        VisibilityMap {
            radius,
            center: Point::new(0, 0),
            cells: vec![false; side * side],
        }
    }

    /// Resize for a new radius, reusing the allocation where possible.
    /// All flags are cleared.
    pub fn reshape(&mut self, radius: i32) {
        let radius = radius.max(0);
        let side = (2 * radius + 1) as usize;
        self.radius = radius;
        self.cells.clear();
        self.cells.resize(side * side, false);
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Length of one side, `2r + 1`
    pub fn side(&self) -> i32 {
        2 * self.radius + 1
    }

    /// Observer of the last completed FOV call
    pub fn center(&self) -> Point {
        self.center
    }

    fn offset_index(&self, dx: i32, dy: i32) -> Option<usize> {
        let r = self.radius;
        if dx < -r || dx > r || dy < -r || dy > r {
            return None;
        }
        Some(((dx + r) + (dy + r) * self.side()) as usize)
    }

    /// Visibility of the cell at offset `(dx, dy)` from the centre.
    /// Offsets outside the square are never visible.
    pub fn get(&self, dx: i32, dy: i32) -> bool {
        self.offset_index(dx, dy).map_or(false, |i| self.cells[i])
    }

    /// Visibility of absolute cell `(x, y)`
    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.get(x - self.center.x, y - self.center.y)
    }

    pub fn count_visible(&self) -> usize {
        self.cells.iter().filter(|&&lit| lit).count()
    }

    /// Absolute coordinates of every visible cell, row by row
    pub fn iter_visible(&self) -> impl Iterator<Item = Point> + '_ {
        let side = self.side();
        let origin = Point::new(self.center.x - self.radius, self.center.y - self.radius);
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &lit)| lit)
            .map(move |(i, _)| {
                let i = i as i32;
                Point::new(origin.x + i % side, origin.y + i / side)
            })
    }

    pub(crate) fn reset(&mut self, center: Point) {
        self.center = center;
        self.cells.iter_mut().for_each(|lit| *lit = false);
    }

    pub(crate) fn set(&mut self, dx: i32, dy: i32, lit: bool) {
        if let Some(i) = self.offset_index(dx, dy) {
            self.cells[i] = lit;
        }
    }
}

/// Index by output coordinates `(dx + r, dy + r)`
impl Index<(usize, usize)> for VisibilityMap {
    type Output = bool;

    fn index(&self, (ix, iy): (usize, usize)) -> &bool {
        let side = self.side() as usize;
        assert!(ix < side && iy < side, "index ({}, {}) outside {}x{}", ix, iy, side, side);
        &self.cells[ix + iy * side]
    }
}
