// diff.rs - Diff entry encoding
//
// A diff entry names one cell that changed during the most recent step:
// its magnitude is the cell's row-major index plus one, its sign the new
// state (positive for alive, negative for dead). Zero is never a valid entry.

use std::num::NonZeroI32;

use crate::cell::CellState;
use crate::error::{BoundsError, RenderError, RenderResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DiffEntry(NonZeroI32);

impl DiffEntry {
    /// `None` when `index + 1` does not fit in an `i32`.
    pub fn encode(index: u32, state: CellState) -> Option<Self> {
        let magnitude = i32::try_from(index).ok()?.checked_add(1)?;
        let raw = if state.is_alive() { magnitude } else { -magnitude };
        NonZeroI32::new(raw).map(DiffEntry)
    }

    pub fn from_raw(raw: i32) -> Option<Self> {
        NonZeroI32::new(raw).map(DiffEntry)
    }

    pub fn raw(self) -> i32 {
        self.0.get()
    }

    pub fn index(self) -> u32 {
        self.0.get().unsigned_abs() - 1
    }

    pub fn state(self) -> CellState {
        CellState::from_alive(self.0.get() > 0)
    }

    pub fn decode(self) -> (u32, CellState) {
        (self.index(), self.state())
    }
}

/// Decode the raw entry found at `position` of a diff for a grid of `cells`
/// cells.
pub fn decode_entry(position: usize, raw: i32, cells: usize) -> RenderResult<(usize, CellState)> {
    let entry = DiffEntry::from_raw(raw).ok_or(RenderError::MalformedEntry {
        position,
        entry: raw,
    })?;
    let index = entry.index() as usize;
    if index >= cells {
        return Err(BoundsError::Cell { index, cells }.into());
    }
    Ok((index, entry.state()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_inverts_encode_for_every_cell() {
        let cells = 7 * 5;
        for index in 0..cells {
            for state in [CellState::Alive, CellState::Dead] {
                let entry = DiffEntry::encode(index, state).unwrap();
                assert_ne!(entry.raw(), 0);
                assert_eq!(entry.decode(), (index, state));
                assert_eq!(
                    decode_entry(0, entry.raw(), cells as usize),
                    Ok((index as usize, state))
                );
            }
        }
    }

    #[test]
    fn boundary_indices() {
        assert_eq!(DiffEntry::encode(0, CellState::Alive).map(DiffEntry::raw), Some(1));
        assert_eq!(DiffEntry::encode(0, CellState::Dead).map(DiffEntry::raw), Some(-1));

        let cells = 6;
        let last = DiffEntry::encode(cells - 1, CellState::Alive).unwrap();
        assert_eq!(last.raw(), 6);
        assert!(decode_entry(0, 7, cells as usize).is_err());

        let max = DiffEntry::encode(i32::MAX as u32 - 1, CellState::Dead).unwrap();
        assert_eq!(max.raw(), -i32::MAX);
        assert_eq!(DiffEntry::encode(i32::MAX as u32, CellState::Alive), None);
    }

    #[test]
    fn zero_is_malformed() {
        assert_eq!(DiffEntry::from_raw(0), None);
        assert_eq!(
            decode_entry(3, 0, 10),
            Err(RenderError::MalformedEntry { position: 3, entry: 0 })
        );
    }

    #[test]
    fn out_of_grid_index_is_a_bounds_error() {
        assert_eq!(
            decode_entry(1, -11, 10),
            Err(RenderError::Bounds(BoundsError::Cell { index: 10, cells: 10 }))
        );
        assert!(decode_entry(0, i32::MIN, 10).is_err());
    }

    #[test]
    fn sign_carries_the_new_state() {
        assert_eq!(decode_entry(0, -1, 6), Ok((0, CellState::Dead)));
        assert_eq!(decode_entry(1, 4, 6), Ok((3, CellState::Alive)));
    }
}
