//! Digital line of sight and field of vision on a grid of walls.
//!
//! A cell is visible from the observer when some mathematically ideal line
//! between the two crosses only open cells; see `los` for the exact rule.
//! `fov` answers the same question for every cell within a radius using
//! recursive shadowcasting, and agrees with `los` cell for cell.

pub mod config;
pub mod cone;
pub mod error;
pub mod fov;
pub mod grid;
pub mod layout;
pub mod line;
pub mod los;
pub mod octant;
pub mod query_log;
pub mod visibility_map;

pub use error::FovError;
pub use fov::{fov, Fov, FovOptions, RangeFilter, MAX_FOV_RADIUS};
pub use grid::{Grid, Point, WallMap};
pub use los::los;
pub use visibility_map::VisibilityMap;
