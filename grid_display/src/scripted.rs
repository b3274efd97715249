// scripted.rs - A grid model that replays a recorded sequence of diffs
//
// Useful for replaying a captured run without the engine that produced it.
// Each step lays the next diff out after the cell bytes, resizing memory as
// needed, so readers see the same relocation behaviour as with a real
// engine.

use std::collections::VecDeque;

use crate::cell::CellState;
use crate::error::{RenderError, RenderResult};
use crate::memory::{LinearMemory, Pointer};
use crate::model::{GridModel, validate_dimensions};

#[derive(Debug)]
pub struct ScriptedModel {
    width: u32,
    height: u32,
    memory: LinearMemory,
    diffs: VecDeque<Vec<i32>>,
    diff_len: Option<usize>,
}

impl ScriptedModel {
    pub fn new(width: i32, height: i32, cells: &[u8]) -> RenderResult<Self> {
        let (w, h) = validate_dimensions(width, height)?;
        if cells.len() != w as usize * h as usize {
            return Err(RenderError::Config {
                width: i64::from(width),
                height: i64::from(height),
            });
        }
        let mut memory = LinearMemory::with_len(cells.len());
        memory.write(0, cells)?;
        Ok(Self {
            width: w,
            height: h,
            memory,
            diffs: VecDeque::new(),
            diff_len: None,
        })
    }

    /// Queue the diff returned by a later `step`. Steps with nothing queued
    /// report an empty diff.
    pub fn push_diff(&mut self, entries: impl Into<Vec<i32>>) -> &mut Self {
        self.diffs.push_back(entries.into());
        self
    }

    fn cells(&self) -> usize {
        self.cell_count()
    }

    fn diff_address(&self) -> u32 {
        // Cell bytes first, entries 4-aligned after them.
        (self.cells().div_ceil(4) * 4) as u32
    }
}

impl GridModel for ScriptedModel {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn snapshot(&self) -> Pointer {
        self.memory.pointer(0)
    }

    fn step(&mut self) -> RenderResult<Pointer> {
        let entries = self.diffs.pop_front().unwrap_or_default();
        let cells = self.cells();

        let mut snapshot = self.memory.bytes()[..cells].to_vec();
        for &raw in &entries {
            let index = raw.unsigned_abs() as usize;
            if raw != 0 && index <= cells {
                snapshot[index - 1] = CellState::from_alive(raw > 0).as_byte();
            }
        }

        let address = self.diff_address();
        self.memory.resize(address as usize + entries.len() * 4);
        self.memory.write(0, &snapshot)?;
        self.memory.write(address, bytemuck::cast_slice(&entries))?;
        self.diff_len = Some(entries.len());
        Ok(self.memory.pointer(address))
    }

    fn diff_count(&self) -> RenderResult<usize> {
        self.diff_len
            .ok_or(RenderError::protocol_order("diff_count queried before any step"))
    }

    fn memory(&self) -> &LinearMemory {
        &self.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{diff_view, snapshot_view};
    use crate::error::BoundsError;

    #[test]
    fn diff_count_before_step_is_a_protocol_error() {
        let model = ScriptedModel::new(3, 2, &[1, 0, 0, 1, 0, 0]).unwrap();
        assert!(matches!(model.diff_count(), Err(RenderError::ProtocolOrder(_))));
    }

    #[test]
    fn step_applies_diff_to_snapshot() {
        let mut model = ScriptedModel::new(3, 2, &[1, 0, 0, 1, 0, 0]).unwrap();
        model.push_diff([-1, 4]);
        let ptr = model.step().unwrap();
        assert_eq!(model.diff_count(), Ok(2));
        let diff = diff_view(&model, ptr, 2).unwrap();
        assert_eq!(diff.iter().collect::<Vec<_>>(), vec![-1, 4]);
        let cells = snapshot_view(&model).unwrap();
        assert_eq!(cells.iter().collect::<Vec<_>>(), vec![0, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn pointers_expire_on_step() {
        let mut model = ScriptedModel::new(2, 2, &[0; 4]).unwrap();
        let snapshot = model.snapshot();
        let first = model.step().unwrap();
        model.step().unwrap();
        assert!(matches!(
            diff_view(&model, first, 0),
            Err(RenderError::Bounds(BoundsError::Stale { .. }))
        ));
        assert!(matches!(
            crate::bridge::SnapshotView::derive(model.memory(), snapshot, 4),
            Err(BoundsError::Stale { .. })
        ));
    }

    #[test]
    fn rejects_mismatched_cell_buffer() {
        assert!(matches!(ScriptedModel::new(3, 2, &[0; 5]), Err(RenderError::Config { .. })));
        assert!(matches!(ScriptedModel::new(0, 2, &[]), Err(RenderError::Config { .. })));
    }
}
