use serde::{Deserialize, Serialize};

/// A cell coordinate, either on the wall map or in an octant's canonical frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Read-only opacity query over a rectangular map.
///
/// The engine only calls `is_wall` for cells inside `width` x `height`;
/// implementations do not need to handle anything else.
pub trait WallMap {
    fn width(&self) -> i32;

    fn height(&self) -> i32;

    fn is_wall(&self, x: i32, y: i32) -> bool;

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width() && y >= 0 && y < self.height()
    }
}

impl<M: WallMap + ?Sized> WallMap for &M {
    fn width(&self) -> i32 {
        (**self).width()
    }

    fn height(&self) -> i32 {
        (**self).height()
    }

    fn is_wall(&self, x: i32, y: i32) -> bool {
        (**self).is_wall(x, y)
    }
}

/// Owned wall map stored as one contiguous row-major buffer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub rows: i32,
    pub cols: i32,
    walls: Vec<bool>,
    /// Revision number - incremented whenever a cell changes
    revision: u64,
}

impl Grid {
    /// Create a new grid with every cell open
    pub fn new(rows: i32, cols: i32) -> Self {
        let rows = rows.max(0);
        let cols = cols.max(0);
        Grid {
            rows,
            cols,
            walls: vec![false; (rows * cols) as usize],
            revision: 0,
        }
    }

    /// Create a grid with specific wall cells (given as cell ids)
    pub fn with_walls(rows: i32, cols: i32, walls: &[i32]) -> Self {
        let mut grid = Self::new(rows, cols);
        for &cell_id in walls {
            if cell_id >= 0 && cell_id < grid.rows * grid.cols {
                grid.walls[cell_id as usize] = true;
            }
        }
        grid
    }

    /// Check if the cell at (x, y) is a wall. Out of bounds is treated as a wall.
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return true;
        }
        self.walls[self.get_id(x, y) as usize]
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    /// Convert (x, y) coordinates to cell ID
    pub fn get_id(&self, x: i32, y: i32) -> i32 {
        x + y * self.cols
    }

    /// Convert cell ID to (x, y) coordinates; `None` for ids off the grid
    pub fn get_coords(&self, id: i32) -> Option<(i32, i32)> {
        if id < 0 || id >= self.rows * self.cols {
            return None;
        }
        Some((id % self.cols, id / self.cols))
    }

    /// Set the wall flag at (x, y). Out of bounds writes are ignored.
    pub fn set_wall(&mut self, x: i32, y: i32, wall: bool) {
        if self.in_bounds(x, y) {
            let id = self.get_id(x, y) as usize;
            if self.walls[id] != wall {
                self.walls[id] = wall;
                self.revision += 1;
            }
        }
    }

    pub fn toggle(&mut self, x: i32, y: i32) {
        if self.in_bounds(x, y) {
            let wall = self.is_blocked(x, y);
            self.set_wall(x, y, !wall);
        }
    }

    /// Cell ids of every wall, in row-major order
    pub fn wall_ids(&self) -> Vec<i32> {
        self.walls
            .iter()
            .enumerate()
            .filter(|&(_, &wall)| wall)
            .map(|(id, _)| id as i32)
            .collect()
    }

    /// Get current grid revision number
    pub fn get_revision(&self) -> u64 {
        self.revision
    }
}

impl WallMap for Grid {
    fn width(&self) -> i32 {
        self.cols
    }

    fn height(&self) -> i32 {
        self.rows
    }

    fn is_wall(&self, x: i32, y: i32) -> bool {
        self.is_blocked(x, y)
    }
}
