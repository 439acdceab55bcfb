#![allow(dead_code)]

use digital_fov::layout::{self, Layout};
use digital_fov::{fov, Grid, Point, VisibilityMap};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One LOS query and its expected answer
#[derive(Debug, Clone, Deserialize)]
pub struct LosQuery {
    pub from: Point,
    pub to: Point,
    pub visible: bool,
}

/// A map with a batch of LOS queries, as stored in test_data/los
#[derive(Debug, Clone, Deserialize)]
pub struct LosCase {
    pub name: String,
    pub rows: i32,
    pub cols: i32,
    pub walls: Vec<i32>,
    pub queries: Vec<LosQuery>,
}

impl LosCase {
    pub fn grid(&self) -> Grid {
        Grid::with_walls(self.rows, self.cols, &self.walls)
    }
}

/// Load an LOS case from a JSON file
pub fn load_los_case(path: &Path) -> Result<LosCase, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    let case: LosCase = serde_json::from_str(&contents)?;
    Ok(case)
}

/// Files in `dir` with the given extension, sorted by name
pub fn fixture_files(dir: &str, extension: &str) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) == Some(extension))
            .collect(),
        Err(_) => Vec::new(),
    };
    paths.sort();
    paths
}

/// Build a grid from an ASCII picture: `#` is a wall, anything else open
pub fn grid_from_rows(rows: &[&str]) -> Grid {
    let mut grid = Grid::new(rows.len() as i32, rows[0].chars().count() as i32);
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            if ch == '#' {
                grid.set_wall(x as i32, y as i32, true);
            }
        }
    }
    grid
}

fn flip_layout<F: Fn(Point) -> Point>(layout: &Layout, flip: F) -> Layout {
    let mut grid = Grid::new(layout.grid.rows, layout.grid.cols);
    for (x, y) in layout.grid.wall_ids().into_iter().filter_map(|id| layout.grid.get_coords(id)) {
        let p = flip(Point::new(x, y));
        grid.set_wall(p.x, p.y, true);
    }

    Layout {
        grid,
        observer: layout.observer.map(&flip),
        expected_visible: layout.expected_visible.iter().map(|&p| flip(p)).collect(),
        radius: layout.radius,
    }
}

/// Flip layout horizontally (mirror left-right)
pub fn flip_horizontal(layout: &Layout) -> Layout {
    let cols = layout.grid.cols;
    flip_layout(layout, |p| Point::new(cols - 1 - p.x, p.y))
}

/// Flip layout vertically (mirror top-bottom)
pub fn flip_vertical(layout: &Layout) -> Layout {
    let rows = layout.grid.rows;
    flip_layout(layout, |p| Point::new(p.x, rows - 1 - p.y))
}

/// Flip layout both horizontally and vertically
pub fn flip_both(layout: &Layout) -> Layout {
    flip_vertical(&flip_horizontal(layout))
}

/// Open cells the FOV marks visible, the form the layout records
pub fn visible_open_cells(layout: &Layout) -> Result<HashSet<Point>, Box<dyn std::error::Error>> {
    let observer = layout.observer.ok_or("no observer 's' in layout")?;
    let radius = layout.radius.ok_or("no radius line in layout")?;

    let mut out = VisibilityMap::new(radius);
    fov(&layout.grid, observer, radius, &mut out)?;

    Ok(out
        .iter_visible()
        .filter(|p| !layout.grid.is_blocked(p.x, p.y))
        .collect())
}

/// Run a layout in all 4 variants (original, h_flip, v_flip, hv_flip)
/// Returns the first failing variant with its missing and extra counts
pub fn run_layout(layout: &Layout) -> Result<Option<(&'static str, usize, usize)>, Box<dyn std::error::Error>> {
    let variants = [
        ("original", layout.clone()),
        ("h_flip", flip_horizontal(layout)),
        ("v_flip", flip_vertical(layout)),
        ("hv_flip", flip_both(layout)),
    ];

    for (variant_name, variant) in variants {
        let actual = visible_open_cells(&variant)?;
        let missing = variant.expected_visible.difference(&actual).count();
        let extra = actual.difference(&variant.expected_visible).count();
        if missing > 0 || extra > 0 {
            return Ok(Some((variant_name, missing, extra)));
        }
    }

    Ok(None)
}

pub fn load_layout(path: &Path) -> Result<Layout, Box<dyn std::error::Error>> {
    Ok(layout::load(path)?)
}
