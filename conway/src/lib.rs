// lib.rs - Life-like cellular automaton engine on a torus
//
// `Model` implements `grid_display::GridModel`: it keeps the grid and
// the latest diff in a `grid_display::LinearMemory` and recomputes a
// generation as one coroutine per row.

mod error;
mod model;
pub mod patterns;
mod rows;
mod rule;

pub use error::{EngineError, EngineResult};
pub use model::Model;
pub use patterns::{PATTERNS, Pattern};
pub use rule::Rule;
