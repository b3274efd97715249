// geometry.rs - Surface geometry and colors
//
// Cells are tightly packed: cell `(col, row)` covers
// `[col*S, (col+1)*S) x [row*S, (row+1)*S)` for cell size `S`, and the
// surface is exactly `columns*S` by `rows*S` pixels.

use serde::Deserialize;

use crate::cell::CellState;
use crate::error::{BoundsError, RenderError, RenderResult};
use crate::model::GridModel;

pub const DEFAULT_CELL_SIZE: u32 = 5;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color {0:?}: expected #rrggbb or #rrggbbaa")]
pub struct ColorError(String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba([r, g, b, 0xff])
    }

    pub fn parse_hex(text: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError(text.to_owned());
        let digits = text.strip_prefix('#').ok_or_else(invalid)?;
        if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let mut channels = [0xff; 4];
        for (channel, pair) in channels.iter_mut().zip(digits.as_bytes().chunks(2)) {
            let pair = std::str::from_utf8(pair).map_err(|_| invalid())?;
            *channel = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        }
        Ok(Rgba(channels))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Rgba::parse_hex(&text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub dead: Rgba,
    pub alive: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            dead: Rgba::rgb(0x0f, 0x2e, 0x1c),
            alive: Rgba::rgb(0x16, 0x9e, 0x51),
        }
    }
}

impl Palette {
    pub fn color(&self, state: CellState) -> Rgba {
        match state {
            CellState::Dead => self.dead,
            CellState::Alive => self.alive,
        }
    }
}

/// Pixel rectangle covered by one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    columns: u32,
    rows: u32,
    cell_size: u32,
}

impl Geometry {
    pub fn new(columns: u32, rows: u32, cell_size: u32) -> RenderResult<Self> {
        if columns == 0 || rows == 0 {
            return Err(RenderError::Config {
                width: i64::from(columns),
                height: i64::from(rows),
            });
        }
        if cell_size == 0 || columns.checked_mul(cell_size).is_none() || rows.checked_mul(cell_size).is_none() {
            return Err(RenderError::CellSize(cell_size));
        }
        Ok(Self {
            columns,
            rows,
            cell_size,
        })
    }

    pub fn for_model<M: GridModel + ?Sized>(model: &M, cell_size: u32) -> RenderResult<Self> {
        Self::new(model.width(), model.height(), cell_size)
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// `(col, row)` of a row-major cell index.
    pub fn locate(&self, index: usize) -> Result<(u32, u32), BoundsError> {
        let cells = self.cell_count();
        if index >= cells {
            return Err(BoundsError::Cell { index, cells });
        }
        let columns = self.columns as usize;
        Ok(((index % columns) as u32, (index / columns) as u32))
    }

    pub fn index_of(&self, col: u32, row: u32) -> usize {
        row as usize * self.columns as usize + col as usize
    }

    pub fn cell_rect(&self, col: u32, row: u32) -> CellRect {
        CellRect {
            x: col * self.cell_size,
            y: row * self.cell_size,
            size: self.cell_size,
        }
    }

    /// Surface `(width, height)` in pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        (self.columns * self.cell_size, self.rows * self.cell_size)
    }
}
