/// One of the eight 45 degree wedges around the observer.
///
/// Each octant maps canonical `(col, row)` with `0 <= row <= col` onto a world
/// offset `(dx, dy)`. The table is ordered counter-clockwise starting from +x,
/// so octant `k` and `k + 1` share an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Octant {
    index: u8,
    xx: i32,
    xy: i32,
    yx: i32,
    yy: i32,
}

const fn octant(index: u8, xx: i32, xy: i32, yx: i32, yy: i32) -> Octant {
    Octant { index, xx, xy, yx, yy }
}

pub const OCTANTS: [Octant; 8] = [
    octant(0, 1, 0, 0, 1),
    octant(1, 0, 1, 1, 0),
    octant(2, 0, -1, 1, 0),
    octant(3, -1, 0, 0, 1),
    octant(4, -1, 0, 0, -1),
    octant(5, 0, -1, -1, 0),
    octant(6, 0, 1, -1, 0),
    octant(7, 1, 0, 0, -1),
];

impl Octant {
    pub fn index(&self) -> u8 {
        self.index
    }

    /// World offset of canonical `(col, row)`
    pub fn to_world(&self, col: i32, row: i32) -> (i32, i32) {
        (col * self.xx + row * self.xy, col * self.yx + row * self.yy)
    }

    /// Even octants own both of their edges (the axis, `row == 0`, and the
    /// diagonal, `row == col`); odd octants own neither. Every edge cell is
    /// therefore owned by exactly one octant.
    pub fn owns(&self, col: i32, row: i32) -> bool {
        self.index % 2 == 0 || (row > 0 && row < col)
    }

    /// The octant holding world offset `(dx, dy)`, with its canonical
    /// coordinates `(col, row)`. Returns `None` for the origin.
    pub fn containing(dx: i32, dy: i32) -> Option<(Octant, i32, i32)> {
        if dx == 0 && dy == 0 {
            return None;
        }
        let col = dx.abs().max(dy.abs());
        let row = dx.abs().min(dy.abs());
        OCTANTS
            .iter()
            .find(|oct| oct.to_world(col, row) == (dx, dy))
            .map(|&oct| (oct, col, row))
    }
}
