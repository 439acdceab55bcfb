//! Plain-text map layouts.
//!
//! One character per cell, one line per row:
//! - `s`: observer (an open cell)
//! - `■` or `#`: wall
//! - `□`, `.` or space: open cell
//! - `o`: open cell expected to be visible from the observer
//!
//! The grid ends at the first line whose width differs or that holds another
//! character. After it, a `radius=N` line may set the FOV radius.

use crate::grid::{Grid, Point};
use crate::visibility_map::VisibilityMap;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to read layout: {0}")]
    Io(#[from] std::io::Error),

    #[error("no grid rows found")]
    Empty,

    #[error("more than one observer 's' in the layout")]
    MultipleObservers,

    #[error("bad radius line {0:?}")]
    BadRadius(String),

    #[error("layout radius {radius} is outside 1..={max}")]
    RadiusOutOfRange { radius: i32, max: i32 },
}

/// A parsed layout
#[derive(Debug, Clone)]
pub struct Layout {
    pub grid: Grid,
    pub observer: Option<Point>,
    /// Cells marked `s` or `o`
    pub expected_visible: HashSet<Point>,
    pub radius: Option<i32>,
}

impl Layout {
    /// Radius to scan with: the layout's own `radius=` line, else `default`.
    /// Rejected unless it lies in `1..=max`, before any output is sized from it.
    pub fn radius_within(&self, default: i32, max: i32) -> Result<i32, LayoutError> {
        let radius = self.radius.unwrap_or(default);
        if (1..=max).contains(&radius) {
            Ok(radius)
        } else {
            Err(LayoutError::RadiusOutOfRange { radius, max })
        }
    }
}

const WALL_GLYPHS: [char; 2] = ['■', '#'];
const OPEN_GLYPHS: [char; 3] = ['□', '.', ' '];

fn is_grid_glyph(c: char) -> bool {
    c == 's' || c == 'o' || WALL_GLYPHS.contains(&c) || OPEN_GLYPHS.contains(&c)
}

pub fn parse(contents: &str) -> Result<Layout, LayoutError> {
    // Blank lines before the grid are skipped; inside it a row of spaces is open floor
    let mut lines = contents.lines().skip_while(|line| line.trim().is_empty()).peekable();

    // Determine grid width from first line
    let cols = match lines.peek() {
        Some(first) => first.chars().count(),
        None => return Err(LayoutError::Empty),
    };

    // Collect only valid grid rows (same width and valid characters)
    let mut grid_lines = Vec::new();
    while let Some(line) = lines.peek() {
        if line.chars().count() != cols || !line.chars().all(is_grid_glyph) {
            break;
        }
        grid_lines.push(*line);
        lines.next();
    }
    if grid_lines.is_empty() {
        return Err(LayoutError::Empty);
    }

    let mut grid = Grid::new(grid_lines.len() as i32, cols as i32);
    let mut observer = None;
    let mut expected_visible = HashSet::new();

    for (y, line) in grid_lines.iter().enumerate() {
        for (x, ch) in line.chars().enumerate() {
            let p = Point::new(x as i32, y as i32);
            match ch {
                's' => {
                    if observer.replace(p).is_some() {
                        return Err(LayoutError::MultipleObservers);
                    }
                    expected_visible.insert(p);
                }
                'o' => {
                    expected_visible.insert(p);
                }
                c if WALL_GLYPHS.contains(&c) => grid.set_wall(p.x, p.y, true),
                _ => {}
            }
        }
    }

    let mut radius = None;
    for line in lines {
        if let Some(value) = line.trim().strip_prefix("radius=") {
            let parsed = value
                .trim()
                .parse::<i32>()
                .map_err(|_| LayoutError::BadRadius(line.to_string()))?;
            radius = Some(parsed);
        }
    }

    Ok(Layout {
        grid,
        observer,
        expected_visible,
        radius,
    })
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<Layout, LayoutError> {
    let contents = fs::read_to_string(path)?;
    parse(&contents)
}

/// Render a grid with the cells visible in `fov` marked `o` and the
/// observer of that FOV marked `s`
pub fn render(grid: &Grid, fov: &VisibilityMap) -> String {
    let observer = fov.center();
    let mut result = String::new();

    for y in 0..grid.rows {
        for x in 0..grid.cols {
            let symbol = if x == observer.x && y == observer.y {
                's'
            } else if grid.is_blocked(x, y) {
                '■'
            } else if fov.is_visible(x, y) {
                'o'
            } else {
                '□'
            };
            result.push(symbol);
        }
        result.push('\n');
    }

    result
}
