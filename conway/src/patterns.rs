// patterns.rs - Built-in seed patterns
//
// Cells are (row, col) offsets from the pattern's top-left corner. Patterns
// are stamped centred on the grid.

use grid_display::CellState;

use crate::error::{EngineError, EngineResult};

pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(u32, u32)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "Glider",
        cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
    },
    Pattern {
        name: "Blinker",
        cells: &[(0, 0), (0, 1), (0, 2)],
    },
    Pattern {
        name: "Toad",
        cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
    },
    Pattern {
        name: "Beacon",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)],
    },
    Pattern {
        name: "Pulsar",
        cells: &[
            // Top half
            (0, 2), (0, 3), (0, 4), (0, 8), (0, 9), (0, 10),
            (2, 0), (2, 5), (2, 7), (2, 12),
            (3, 0), (3, 5), (3, 7), (3, 12),
            (4, 0), (4, 5), (4, 7), (4, 12),
            (5, 2), (5, 3), (5, 4), (5, 8), (5, 9), (5, 10),
            // Bottom half (mirrored)
            (7, 2), (7, 3), (7, 4), (7, 8), (7, 9), (7, 10),
            (8, 0), (8, 5), (8, 7), (8, 12),
            (9, 0), (9, 5), (9, 7), (9, 12),
            (10, 0), (10, 5), (10, 7), (10, 12),
            (12, 2), (12, 3), (12, 4), (12, 8), (12, 9), (12, 10),
        ],
    },
    Pattern {
        name: "R-pentomino",
        cells: &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
    },
    Pattern {
        name: "Gosper Glider Gun",
        cells: &[
            (4, 0), (4, 1), (5, 0), (5, 1),
            (4, 10), (5, 10), (6, 10), (3, 11), (7, 11), (2, 12), (8, 12),
            (2, 13), (8, 13), (5, 14), (3, 15), (7, 15), (4, 16), (5, 16),
            (6, 16), (5, 17), (2, 20), (3, 20), (4, 20), (2, 21), (3, 21),
            (4, 21), (1, 22), (5, 22), (0, 24), (1, 24), (5, 24), (6, 24),
            (2, 34), (3, 34), (2, 35), (3, 35),
        ],
    },
];

/// Case-insensitive lookup by name.
pub fn find(name: &str) -> EngineResult<&'static Pattern> {
    PATTERNS
        .iter()
        .find(|pattern| pattern.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| EngineError::UnknownPattern(name.to_owned()))
}

impl Pattern {
    /// `(rows, cols)` of the pattern's bounding box.
    pub fn extent(&self) -> (u32, u32) {
        self.cells
            .iter()
            .fold((0, 0), |(rows, cols), &(row, col)| (rows.max(row + 1), cols.max(col + 1)))
    }

    /// Clear `cells` and stamp the pattern centred in a `width` x `height`
    /// row-major grid.
    pub fn stamp(&self, cells: &mut [u8], width: u32, height: u32) -> EngineResult<()> {
        let (rows, cols) = self.extent();
        if rows > height || cols > width {
            return Err(EngineError::PatternTooLarge {
                name: self.name,
                rows,
                cols,
                width,
                height,
            });
        }

        cells.fill(CellState::Dead.as_byte());
        let (top, left) = ((height - rows) / 2, (width - cols) / 2);
        for &(row, col) in self.cells {
            let index = (top + row) as usize * width as usize + (left + col) as usize;
            cells[index] = CellState::Alive.as_byte();
        }
        Ok(())
    }
}
