// model.rs - Capability interface of a grid engine
//
// The renderer never sees an engine's internals; anything that can answer
// these calls (in-process, over IPC, in a subprocess) can drive it.

use crate::error::{RenderError, RenderResult};
use crate::memory::{LinearMemory, Pointer};

pub trait GridModel {
    /// Fixed for the model's lifetime.
    fn width(&self) -> u32;

    /// Fixed for the model's lifetime.
    fn height(&self) -> u32;

    fn cell_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Address of `width * height` cell bytes, row-major. Expires on the next
    /// `step`.
    fn snapshot(&self) -> Pointer;

    /// Advance one generation and return the address of the diff buffer.
    /// Expires every pointer issued before the call.
    fn step(&mut self) -> RenderResult<Pointer>;

    /// Entry count of the diff produced by the most recent `step`.
    fn diff_count(&self) -> RenderResult<usize>;

    fn memory(&self) -> &LinearMemory;
}

/// Validate constructor arguments for a `width` x `height` grid.
///
/// Every cell index must be encodable as a diff entry, so the cell count is
/// capped at `i32::MAX`.
pub fn validate_dimensions(width: i32, height: i32) -> RenderResult<(u32, u32)> {
    let config_error = RenderError::Config {
        width: i64::from(width),
        height: i64::from(height),
    };
    if width <= 0 || height <= 0 {
        return Err(config_error);
    }
    let cells = i64::from(width) * i64::from(height);
    if cells > i64::from(i32::MAX) {
        return Err(config_error);
    }
    Ok((width.unsigned_abs(), height.unsigned_abs()))
}
