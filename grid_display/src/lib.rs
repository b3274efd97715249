// lib.rs - Incremental rendering of a cellular-automaton grid
//
// A `GridModel` owns the grid and exposes it through pointers into its
// `LinearMemory`. The renderer paints the full snapshot once with
// `draw_all`, then a `RenderLoop` repaints only the cells named in each
// step's diff.

pub mod bridge;
pub mod cell;
pub mod diff;
pub mod error;
pub mod geometry;
pub mod initial;
pub mod memory;
pub mod model;
pub mod render_loop;
pub mod scripted;
pub mod surface;

pub use bridge::{DiffView, SnapshotView, View, diff_view, snapshot_view};
pub use cell::CellState;
pub use diff::{DiffEntry, decode_entry};
pub use error::{BoundsError, RenderError, RenderResult};
pub use geometry::{CellRect, ColorError, DEFAULT_CELL_SIZE, Geometry, Palette, Rgba};
pub use initial::draw_all;
pub use memory::{Epoch, LinearMemory, Pointer};
pub use model::{GridModel, validate_dimensions};
pub use render_loop::{CancelToken, FrameScheduler, FrameStats, LoopState, ManualScheduler, RenderLoop, TickOutcome};
pub use scripted::ScriptedModel;
pub use surface::{PaintOp, PixelSurface, RecordingSurface, Surface};
