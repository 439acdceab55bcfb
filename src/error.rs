use crate::grid::{Point, WallMap};
use thiserror::Error;

/// Precondition failures for LOS and FOV calls.
///
/// Validation happens before the engine reads the map or writes any output,
/// so a failed call leaves the caller's buffers untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FovError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} wall map")]
    OutOfBounds { x: i32, y: i32, width: i32, height: i32 },

    #[error("radius {radius} is outside 1..={max}")]
    InvalidRadius { radius: i32, max: i32 },

    #[error("visibility map side is {actual}, expected {expected}")]
    OutputSizeMismatch { expected: i32, actual: i32 },
}

pub(crate) fn check_in_bounds<M: WallMap + ?Sized>(map: &M, p: Point) -> Result<(), FovError> {
    if map.contains(p.x, p.y) {
        Ok(())
    } else {
        Err(FovError::OutOfBounds {
            x: p.x,
            y: p.y,
            width: map.width(),
            height: map.height(),
        })
    }
}
