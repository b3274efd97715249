// rows.rs - One generation as a set of row coroutines on a torus
//
// Every row is computed by its own task on a single-threaded runtime; tasks
// yield cooperatively while scanning their row. `next_generation` blocks
// until all rows are in, so callers see a synchronous step.

use std::sync::Arc;

use grid_display::{CellState, RenderError, RenderResult};
use tokio::runtime::Runtime;

use crate::rule::Rule;

// Cells scanned between cooperative yields.
const YIELD_EVERY: u32 = 64;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Torus {
    pub width: u32,
    pub height: u32,
}

impl Torus {
    /// Live cells among the eight neighbours of `(row, col)`, wrapping at
    /// the edges.
    pub fn neighbours(&self, world: &[u8], row: u32, col: u32) -> u8 {
        let (w, h) = (self.width, self.height);
        let mut count = 0;
        for r in [(row + h - 1) % h, row, (row + 1) % h] {
            for c in [(col + w - 1) % w, col, (col + 1) % w] {
                count += world[(r * w + c) as usize];
            }
        }
        count - world[(row * w + col) as usize]
    }
}

async fn process_row(row: u32, world: Arc<[u8]>, torus: Torus, rule: Rule) -> (u32, Vec<u8>) {
    let mut row_result = Vec::with_capacity(torus.width as usize);
    for col in 0..torus.width {
        let alive = world[(row * torus.width + col) as usize] == CellState::Alive.as_byte();
        let neighbours = torus.neighbours(&world, row, col);
        row_result.push(CellState::from_alive(rule.next(alive, neighbours)).as_byte());

        if (col + 1) % YIELD_EVERY == 0 {
            tokio::task::yield_now().await; // Cooperative yielding
        }
    }
    (row, row_result)
}

pub(crate) fn next_generation(
    runtime: &Runtime,
    world: Arc<[u8]>,
    torus: Torus,
    rule: Rule,
) -> RenderResult<Vec<u8>> {
    runtime.block_on(async {
        let handles: Vec<_> = (0..torus.height)
            .map(|row| tokio::spawn(process_row(row, Arc::clone(&world), torus, rule)))
            .collect();

        let width = torus.width as usize;
        let mut next = vec![CellState::Dead.as_byte(); world.len()];
        for handle in handles {
            let (row, cells) = handle
                .await
                .map_err(|err| RenderError::engine(format!("row task failed: {err}")))?;
            let start = row as usize * width;
            next[start..start + width].copy_from_slice(&cells);
        }
        Ok::<_, RenderError>(next)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> Runtime {
        tokio::runtime::Builder::new_current_thread().build().unwrap()
    }

    #[test]
    fn neighbours_wrap_around_edges() {
        let torus = Torus { width: 4, height: 3 };
        #[rustfmt::skip]
        let world = [
            1, 0, 0, 1,
            0, 0, 0, 0,
            1, 0, 0, 0,
        ];
        // (0,0) sees (0,3), (2,0) across the edges
        assert_eq!(torus.neighbours(&world, 0, 0), 2);
        // (2,3) sees (0,3), (0,0), (2,0) across the edges
        assert_eq!(torus.neighbours(&world, 2, 3), 3);
        assert_eq!(torus.neighbours(&world, 1, 1), 2);
    }

    #[test]
    fn blinker_flips_orientation() {
        let torus = Torus { width: 5, height: 5 };
        let mut world = vec![0u8; 25];
        for col in 1..4 {
            world[2 * 5 + col] = 1;
        }
        let next = next_generation(&runtime(), Arc::from(world.as_slice()), torus, Rule::CONWAY).unwrap();
        let alive: Vec<usize> = (0..25).filter(|&i| next[i] == 1).collect();
        assert_eq!(alive, vec![7, 12, 17]);
    }

    #[test]
    fn rows_wider_than_the_yield_interval_are_complete() {
        let torus = Torus { width: 200, height: 3 };
        let world = vec![1u8; 600];
        let next = next_generation(&runtime(), Arc::from(world.as_slice()), torus, Rule::CONWAY).unwrap();
        // Every cell has 8 live neighbours and dies.
        assert!(next.iter().all(|&cell| cell == 0));
        assert_eq!(next.len(), 600);
    }
}
