// surface.rs - Drawing surfaces that accumulate cell paint operations

use crate::geometry::{CellRect, Rgba};

pub trait Surface {
    fn fill_rect(&mut self, rect: CellRect, color: Rgba);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn fill_rect(&mut self, rect: CellRect, color: Rgba) {
        (**self).fill_rect(rect, color);
    }
}

/// RGBA8 framebuffer, row-major, 4 bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[start..start + 4]);
        Some(Rgba(rgba))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    /// Copy out the pixels under `rect`, clipped to the surface.
    pub fn read_rect(&self, rect: CellRect) -> Vec<u8> {
        let (x0, x1) = (rect.x.min(self.width), rect.x.saturating_add(rect.size).min(self.width));
        let (y0, y1) = (rect.y.min(self.height), rect.y.saturating_add(rect.size).min(self.height));
        let mut out = Vec::with_capacity((x1 - x0) as usize * (y1 - y0) as usize * 4);
        for y in y0..y1 {
            let start = (y as usize * self.width as usize + x0 as usize) * 4;
            let end = (y as usize * self.width as usize + x1 as usize) * 4;
            out.extend_from_slice(&self.pixels[start..end]);
        }
        out
    }
}

impl Surface for PixelSurface {
    fn fill_rect(&mut self, rect: CellRect, color: Rgba) {
        let x1 = rect.x.saturating_add(rect.size).min(self.width);
        let y1 = rect.y.saturating_add(rect.size).min(self.height);
        for y in rect.y.min(y1)..y1 {
            let row = y as usize * self.width as usize;
            for x in rect.x.min(x1)..x1 {
                let start = (row + x as usize) * 4;
                self.pixels[start..start + 4].copy_from_slice(&color.0);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaintOp {
    pub rect: CellRect,
    pub color: Rgba,
}

/// Keeps every paint operation in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<PaintOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    pub fn take(&mut self) -> Vec<PaintOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: CellRect, color: Rgba) {
        self.ops.push(PaintOp { rect, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::rgb(255, 0, 0);
    const BLUE: Rgba = Rgba::rgb(0, 0, 255);

    #[test]
    fn fill_rect_paints_only_the_rect() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill_rect(CellRect { x: 2, y: 0, size: 2 }, RED);
        assert_eq!(surface.pixel(2, 0), Some(RED));
        assert_eq!(surface.pixel(3, 1), Some(RED));
        assert_eq!(surface.pixel(1, 0), Some(Rgba([0; 4])));
        assert_eq!(surface.pixel(2, 2), Some(Rgba([0; 4])));
        assert_eq!(surface.pixel(4, 0), None);
    }

    #[test]
    fn fill_rect_clips_at_edges() {
        let mut surface = PixelSurface::new(3, 3);
        surface.fill_rect(CellRect { x: 2, y: 2, size: 5 }, BLUE);
        surface.fill_rect(CellRect { x: 9, y: 9, size: 5 }, RED);
        assert_eq!(surface.pixel(2, 2), Some(BLUE));
        assert_eq!(surface.as_bytes().len(), 36);
    }

    #[test]
    fn read_rect_returns_rect_pixels() {
        let mut surface = PixelSurface::new(4, 2);
        surface.fill_rect(CellRect { x: 2, y: 0, size: 2 }, RED);
        let bytes = surface.read_rect(CellRect { x: 2, y: 0, size: 2 });
        assert_eq!(bytes.len(), 16);
        assert!(bytes.chunks(4).all(|px| px == RED.0));
    }

    #[test]
    fn recording_surface_keeps_order() {
        let mut surface = RecordingSurface::new();
        surface.fill_rect(CellRect { x: 0, y: 0, size: 1 }, RED);
        surface.fill_rect(CellRect { x: 1, y: 0, size: 1 }, BLUE);
        let ops = surface.take();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[1].color, BLUE);
        assert!(surface.ops().is_empty());
    }
}
