// cell.rs - Per-cell state as stored in snapshot buffers

/// One grid cell. The discriminants are the snapshot byte encoding.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl CellState {
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    pub const fn is_alive(self) -> bool {
        matches!(self, CellState::Alive)
    }

    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(CellState::Dead),
            1 => Some(CellState::Alive),
            _ => None,
        }
    }

    pub const fn from_alive(alive: bool) -> Self {
        if alive { CellState::Alive } else { CellState::Dead }
    }
}
