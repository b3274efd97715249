// model.rs - The engine's `GridModel`: grid state, diff buffer and stepping
//
// Memory layout: the `width * height` cell bytes start at address 0; the
// diff buffer follows at the next 4-byte boundary. The diff buffer only
// grows, and growing it reallocates the whole memory.

use std::sync::Arc;

use grid_display::{BoundsError, CellState, DiffEntry, GridModel, LinearMemory, Pointer, RenderError, RenderResult, validate_dimensions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::runtime::Runtime;
use tracing::{info, trace};

use crate::error::{EngineError, EngineResult};
use crate::patterns::Pattern;
use crate::rows::{Torus, next_generation};
use crate::rule::Rule;

pub struct Model {
    torus: Torus,
    rule: Rule,
    memory: LinearMemory,
    diff_address: u32,
    diff_capacity: usize,
    diff_len: Option<usize>,
    generation: u64,
    runtime: Runtime,
}

impl Model {
    /// All cells dead.
    pub fn new(width: i32, height: i32, rule: Rule) -> EngineResult<Self> {
        Self::build(width, height, rule, |_| Ok(()))
    }

    /// Each cell alive with probability `density`. Without a seed the
    /// generator is seeded from the OS.
    pub fn random(width: i32, height: i32, rule: Rule, density: f64, seed: Option<u64>) -> EngineResult<Self> {
        if !(0.0..=1.0).contains(&density) {
            return Err(EngineError::Density(density));
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::build(width, height, rule, |cells| {
            for cell in cells.iter_mut() {
                *cell = CellState::from_alive(rng.gen_bool(density)).as_byte();
            }
            Ok(())
        })
    }

    pub fn with_pattern(width: i32, height: i32, rule: Rule, pattern: &Pattern) -> EngineResult<Self> {
        Self::build(width, height, rule, |cells| {
            let (w, h) = validate_dimensions(width, height)?;
            pattern.stamp(cells, w, h)
        })
    }

    pub fn from_cells(width: i32, height: i32, rule: Rule, states: &[CellState]) -> EngineResult<Self> {
        Self::build(width, height, rule, |cells| {
            if states.len() != cells.len() {
                return Err(RenderError::Config {
                    width: i64::from(width),
                    height: i64::from(height),
                }
                .into());
            }
            for (cell, state) in cells.iter_mut().zip(states) {
                *cell = state.as_byte();
            }
            Ok(())
        })
    }

    fn build(
        width: i32,
        height: i32,
        rule: Rule,
        fill: impl FnOnce(&mut [u8]) -> EngineResult<()>,
    ) -> EngineResult<Self> {
        let (width, height) = validate_dimensions(width, height)?;
        rule.validate()?;

        let cells = width as usize * height as usize;
        let mut world = vec![CellState::Dead.as_byte(); cells];
        fill(&mut world)?;

        let diff_address = cells.div_ceil(4) * 4;
        let mut memory = LinearMemory::with_len(diff_address);
        memory.write(0, &world).map_err(RenderError::from)?;

        let runtime = tokio::runtime::Builder::new_current_thread().build()?;
        info!(width, height, ?rule, "grid model created");
        Ok(Self {
            torus: Torus { width, height },
            rule,
            memory,
            diff_address: diff_address as u32,
            diff_capacity: 0,
            diff_len: None,
            generation: 0,
            runtime,
        })
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// Steps taken since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn cells(&self) -> &[u8] {
        &self.memory.bytes()[..self.cell_count()]
    }

    pub fn cell(&self, col: u32, row: u32) -> Option<CellState> {
        if col >= self.torus.width || row >= self.torus.height {
            return None;
        }
        let index = row as usize * self.torus.width as usize + col as usize;
        CellState::from_byte(self.cells()[index])
    }

    pub fn population(&self) -> usize {
        self.cells()
            .iter()
            .filter(|&&byte| byte == CellState::Alive.as_byte())
            .count()
    }

    /// The grid as text, `X` for alive and a space for dead, one line per row.
    pub fn render_text(&self) -> String {
        let mut out = String::with_capacity(self.cell_count() + self.torus.height as usize);
        for row in self.cells().chunks(self.torus.width as usize) {
            for &byte in row {
                out.push(if byte == CellState::Alive.as_byte() { 'X' } else { ' ' });
            }
            out.push('\n');
        }
        out
    }

    fn reserve_diff(&mut self, entries: usize) {
        if entries <= self.diff_capacity {
            self.memory.invalidate();
            return;
        }
        let capacity = entries.max(self.diff_capacity * 2);
        self.memory.resize(self.diff_address as usize + capacity * 4);
        trace!(capacity, "diff buffer relocated");
        self.diff_capacity = capacity;
    }
}

impl GridModel for Model {
    fn width(&self) -> u32 {
        self.torus.width
    }

    fn height(&self) -> u32 {
        self.torus.height
    }

    fn snapshot(&self) -> Pointer {
        self.memory.pointer(0)
    }

    fn step(&mut self) -> RenderResult<Pointer> {
        let world: Arc<[u8]> = Arc::from(self.cells());
        let next = next_generation(&self.runtime, Arc::clone(&world), self.torus, self.rule)?;

        let mut diff = Vec::new();
        for (index, (&before, &after)) in world.iter().zip(&next).enumerate() {
            if before == after {
                continue;
            }
            let state = CellState::from_alive(after == CellState::Alive.as_byte());
            diff.push(encode_change(index, state, world.len())?);
        }

        self.reserve_diff(diff.len());
        self.memory.write(0, &next)?;
        self.memory.write(self.diff_address, bytemuck::cast_slice(&diff))?;
        self.diff_len = Some(diff.len());
        self.generation += 1;
        trace!(generation = self.generation, changed = diff.len(), "generation computed");
        Ok(self.memory.pointer(self.diff_address))
    }

    fn diff_count(&self) -> RenderResult<usize> {
        self.diff_len
            .ok_or(RenderError::protocol_order("diff_count queried before any step"))
    }

    fn memory(&self) -> &LinearMemory {
        &self.memory
    }
}

/// Raw diff entry for a cell that changed; an index past the encodable
/// range is an error rather than a dropped entry.
fn encode_change(index: usize, state: CellState, cells: usize) -> RenderResult<i32> {
    u32::try_from(index)
        .ok()
        .and_then(|index| DiffEntry::encode(index, state))
        .map(DiffEntry::raw)
        .ok_or(RenderError::Bounds(BoundsError::Cell { index, cells }))
}

#[cfg(test)]
mod tests {
    use grid_display::{DiffView, SnapshotView, decode_entry, diff_view, snapshot_view};

    use super::*;
    use crate::patterns;

    fn snapshot_bytes(model: &Model) -> Vec<u8> {
        snapshot_view(model).unwrap().iter().collect()
    }

    #[test]
    fn rejects_invalid_construction() {
        assert!(matches!(
            Model::new(0, 4, Rule::CONWAY),
            Err(EngineError::Render(RenderError::Config { .. }))
        ));
        assert!(matches!(
            Model::random(4, 4, Rule::CONWAY, 1.5, Some(1)),
            Err(EngineError::Density(_))
        ));
        assert!(matches!(
            Model::from_cells(2, 2, Rule::CONWAY, &[CellState::Alive]),
            Err(EngineError::Render(RenderError::Config { .. }))
        ));
    }

    #[test]
    fn seeded_random_models_are_reproducible() {
        let a = Model::random(16, 9, Rule::CONWAY, 0.5, Some(42)).unwrap();
        let b = Model::random(16, 9, Rule::CONWAY, 0.5, Some(42)).unwrap();
        assert_eq!(snapshot_bytes(&a), snapshot_bytes(&b));
        assert!(snapshot_bytes(&a).iter().all(|&byte| byte <= 1));

        let empty = Model::random(16, 9, Rule::CONWAY, 0.0, None).unwrap();
        assert_eq!(empty.population(), 0);
        let full = Model::random(16, 9, Rule::CONWAY, 1.0, None).unwrap();
        assert_eq!(full.population(), 16 * 9);
    }

    #[test]
    fn diff_count_requires_a_step() {
        let mut model = Model::new(4, 4, Rule::CONWAY).unwrap();
        assert!(matches!(model.diff_count(), Err(RenderError::ProtocolOrder(_))));
        model.step().unwrap();
        assert_eq!(model.diff_count(), Ok(0));
    }

    #[test]
    fn blinker_oscillates_with_four_changes_per_step() {
        let blinker = patterns::find("blinker").unwrap();
        let mut model = Model::with_pattern(5, 5, Rule::CONWAY, blinker).unwrap();
        let start = snapshot_bytes(&model);

        let ptr = model.step().unwrap();
        let count = model.diff_count().unwrap();
        assert_eq!(count, 4);
        let mut decoded: Vec<_> = diff_view(&model, ptr, count)
            .unwrap()
            .iter()
            .enumerate()
            .map(|(position, raw)| decode_entry(position, raw, 25).unwrap())
            .collect();
        decoded.sort_unstable_by_key(|&(index, _)| index);
        assert_eq!(
            decoded,
            vec![
                (7, CellState::Alive),
                (11, CellState::Dead),
                (13, CellState::Dead),
                (17, CellState::Alive),
            ]
        );

        model.step().unwrap();
        assert_eq!(snapshot_bytes(&model), start);
        assert_eq!(model.generation(), 2);
    }

    #[test]
    fn diff_applied_to_previous_snapshot_gives_next_snapshot() {
        let mut model = Model::random(23, 17, Rule::CONWAY, 0.4, Some(7)).unwrap();
        for _ in 0..10 {
            let mut expected = snapshot_bytes(&model);
            let ptr = model.step().unwrap();
            let count = model.diff_count().unwrap();
            let diff = DiffView::derive(model.memory(), ptr, count).unwrap();
            for (position, raw) in diff.iter().enumerate() {
                let (index, state) = decode_entry(position, raw, expected.len()).unwrap();
                assert_ne!(expected[index], state.as_byte(), "entry names an unchanged cell");
                expected[index] = state.as_byte();
            }
            assert_eq!(snapshot_bytes(&model), expected);
        }
    }

    #[test]
    fn glider_wraps_around_the_torus() {
        let glider = patterns::find("glider").unwrap();
        let mut model = Model::with_pattern(8, 8, Rule::CONWAY, glider).unwrap();
        let start = snapshot_bytes(&model);
        // One diagonal cell every four generations; eight cells to come home.
        for _ in 0..32 {
            model.step().unwrap();
            assert_eq!(model.population(), 5);
        }
        assert_eq!(snapshot_bytes(&model), start);
    }

    #[test]
    fn step_expires_earlier_pointers() {
        let mut model = Model::random(10, 10, Rule::CONWAY, 0.5, Some(3)).unwrap();
        let snapshot = model.snapshot();
        let first = model.step().unwrap();
        let count = model.diff_count().unwrap();
        model.step().unwrap();

        assert!(matches!(
            SnapshotView::derive(model.memory(), snapshot, 100),
            Err(BoundsError::Stale { .. })
        ));
        assert!(matches!(
            diff_view(&model, first, count),
            Err(RenderError::Bounds(BoundsError::Stale { .. }))
        ));
    }

    #[test]
    fn render_text_marks_live_cells() {
        let model = Model::from_cells(
            3,
            2,
            Rule::CONWAY,
            &[
                CellState::Alive,
                CellState::Dead,
                CellState::Dead,
                CellState::Alive,
                CellState::Dead,
                CellState::Dead,
            ],
        )
        .unwrap();
        assert_eq!(model.render_text(), "X  \nX  \n");
        assert_eq!(model.cell(0, 1), Some(CellState::Alive));
        assert_eq!(model.cell(1, 1), Some(CellState::Dead));
        assert_eq!(model.cell(3, 0), None);
    }

    #[test]
    fn unencodable_change_is_an_error() {
        assert_eq!(encode_change(4, CellState::Alive, 9).unwrap(), 5);
        assert_eq!(encode_change(0, CellState::Dead, 9).unwrap(), -1);
        let last = i32::MAX as usize;
        assert_eq!(
            encode_change(last, CellState::Alive, last + 1).unwrap_err(),
            RenderError::Bounds(BoundsError::Cell { index: last, cells: last + 1 })
        );
    }
}
