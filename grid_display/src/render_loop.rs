// render_loop.rs - Diff-driven render loop
//
// After one full `draw_all` pass, every scheduled frame steps the model,
// decodes the diff it reports and repaints only the cells named in it. The
// loop owns its model, surface and cancellation token; the host only
// provides a `FrameScheduler` and calls `RenderLoop::tick` once per
// frame callback.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace};

use crate::bridge::diff_view;
use crate::cell::CellState;
use crate::diff::decode_entry;
use crate::error::{RenderError, RenderResult};
use crate::geometry::{CellRect, Geometry, Palette};
use crate::initial::draw_all;
use crate::model::GridModel;
use crate::surface::Surface;

/// Shared stop flag. Setting it stops the loop on its next tick.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Host-side frame callback scheduling.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

impl<F: FrameScheduler + ?Sized> FrameScheduler for &mut F {
    fn request_frame(&mut self) {
        (**self).request_frame();
    }
}

/// Scheduler for hosts that drive frames themselves.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: bool,
    requested: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the outstanding frame request, if any.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn requested(&self) -> u64 {
        self.requested
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        self.requested += 1;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Constructed; initial draw not done yet.
    Idle,
    Scheduled,
    Running,
    Stopped,
    Faulted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Frame rendered; carries the number of cells repainted.
    Painted(usize),
    Stopped,
    Faulted,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    pub cells_painted: u64,
    pub last_diff: usize,
}

pub struct RenderLoop<M, S> {
    model: M,
    surface: S,
    geometry: Geometry,
    palette: Palette,
    cancel: CancelToken,
    state: LoopState,
    stats: FrameStats,
    // Decoded cells of the current frame; cleared at the start of each frame.
    pending: Vec<(CellRect, CellState)>,
}

impl<M: GridModel, S: Surface> RenderLoop<M, S> {
    pub fn new(model: M, surface: S, cell_size: u32, palette: Palette) -> RenderResult<Self> {
        let geometry = Geometry::for_model(&model, cell_size)?;
        Ok(Self {
            model,
            surface,
            geometry,
            palette,
            cancel: CancelToken::new(),
            state: LoopState::Idle,
            stats: FrameStats::default(),
            pending: Vec::new(),
        })
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_parts(self) -> (M, S) {
        (self.model, self.surface)
    }

    /// Full repaint from the current snapshot, then request the first frame.
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) -> RenderResult<usize> {
        if self.state != LoopState::Idle {
            return Err(RenderError::protocol_order("render loop started twice"));
        }
        match draw_all(&self.model, &self.geometry, &self.palette, &mut self.surface) {
            Ok(painted) => {
                self.state = LoopState::Scheduled;
                scheduler.request_frame();
                Ok(painted)
            }
            Err(err) => {
                self.state = LoopState::Faulted;
                Err(err)
            }
        }
    }

    /// Run one frame callback. A failed frame paints nothing, moves the loop
    /// to [`LoopState::Faulted`] and is not rescheduled.
    pub fn tick(&mut self, scheduler: &mut impl FrameScheduler) -> RenderResult<TickOutcome> {
        match self.state {
            LoopState::Scheduled => {}
            LoopState::Idle => {
                return Err(RenderError::protocol_order("tick before initial draw"));
            }
            LoopState::Running => {
                return Err(RenderError::protocol_order("overlapping frame callbacks"));
            }
            LoopState::Stopped => return Ok(TickOutcome::Stopped),
            LoopState::Faulted => return Ok(TickOutcome::Faulted),
        }

        if self.cancel.is_cancelled() {
            debug!(frames = self.stats.frames, "render loop stopped");
            self.state = LoopState::Stopped;
            return Ok(TickOutcome::Stopped);
        }

        self.state = LoopState::Running;
        match self.render_frame() {
            Ok(painted) => {
                self.stats.frames += 1;
                self.stats.cells_painted += painted as u64;
                self.stats.last_diff = painted;
                trace!(frame = self.stats.frames, painted, "frame rendered");
                self.state = LoopState::Scheduled;
                scheduler.request_frame();
                Ok(TickOutcome::Painted(painted))
            }
            Err(err) => {
                self.state = LoopState::Faulted;
                Err(err)
            }
        }
    }

    fn render_frame(&mut self) -> RenderResult<usize> {
        let diff_ptr = self.model.step()?;
        let count = self.model.diff_count()?;
        let diff = diff_view(&self.model, diff_ptr, count)?;

        // Decode everything before painting anything.
        let cells = self.geometry.cell_count();
        self.pending.clear();
        for (position, raw) in diff.iter().enumerate() {
            let (index, state) = decode_entry(position, raw, cells)?;
            let (col, row) = self.geometry.locate(index)?;
            self.pending.push((self.geometry.cell_rect(col, row), state));
        }

        for &(rect, state) in &self.pending {
            self.surface.fill_rect(rect, self.palette.color(state));
        }
        Ok(self.pending.len())
    }
}
