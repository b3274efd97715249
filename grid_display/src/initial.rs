// initial.rs - One full pass over the snapshot before the render loop starts

use tracing::debug;

use crate::bridge::snapshot_view;
use crate::cell::CellState;
use crate::error::{RenderError, RenderResult};
use crate::geometry::{Geometry, Palette};
use crate::model::GridModel;
use crate::surface::Surface;

/// Paint every cell of `model` onto `surface`. Returns the number of cells
/// painted. Nothing is painted if any snapshot byte is not a cell state.
pub fn draw_all<M, S>(
    model: &M,
    geometry: &Geometry,
    palette: &Palette,
    surface: &mut S,
) -> RenderResult<usize>
where
    M: GridModel + ?Sized,
    S: Surface + ?Sized,
{
    if geometry.columns() != model.width() || geometry.rows() != model.height() {
        return Err(RenderError::Config {
            width: i64::from(model.width()),
            height: i64::from(model.height()),
        });
    }

    let cells = snapshot_view(model)?;
    let states = cells
        .iter()
        .enumerate()
        .map(|(index, value)| CellState::from_byte(value).ok_or(RenderError::InvalidCell { index, value }))
        .collect::<RenderResult<Vec<_>>>()?;

    for (index, &state) in states.iter().enumerate() {
        let (col, row) = geometry.locate(index)?;
        surface.fill_rect(geometry.cell_rect(col, row), palette.color(state));
    }

    debug!(cells = states.len(), "initial draw complete");
    Ok(states.len())
}
