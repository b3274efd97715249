// texture.rs - egui texture surface that re-uploads only painted cells

use egui::{ColorImage, TextureHandle, TextureOptions};
use grid_display::{CellRect, PixelSurface, Rgba, Surface};

pub struct TextureSurface {
    pixels: PixelSurface,
    texture: Option<TextureHandle>,
    dirty: Vec<CellRect>,
}

impl TextureSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: PixelSurface::new(width, height),
            texture: None,
            dirty: Vec::new(),
        }
    }

    pub fn texture(&self) -> Option<&TextureHandle> {
        self.texture.as_ref()
    }

    /// Upload the cells painted since the last flush. Falls back to one full
    /// upload when most of the surface changed.
    pub fn flush(&mut self, ctx: &egui::Context) {
        if self.texture.is_none() {
            self.texture = Some(ctx.load_texture("grid", full_image(&self.pixels), TextureOptions::NEAREST));
            self.dirty.clear();
            return;
        }
        let Some(texture) = self.texture.as_mut() else {
            return;
        };
        if self.dirty.is_empty() {
            return;
        }

        let surface_area = self.pixels.width() as usize * self.pixels.height() as usize;
        let dirty_area: usize = self.dirty.iter().map(|rect| rect.size as usize * rect.size as usize).sum();
        if dirty_area * 4 >= surface_area {
            texture.set(full_image(&self.pixels), TextureOptions::NEAREST);
        } else {
            for rect in &self.dirty {
                let size = [rect.size as usize, rect.size as usize];
                let image = ColorImage::from_rgba_unmultiplied(size, &self.pixels.read_rect(*rect));
                texture.set_partial([rect.x as usize, rect.y as usize], image, TextureOptions::NEAREST);
            }
        }
        self.dirty.clear();
    }
}

impl Surface for TextureSurface {
    fn fill_rect(&mut self, rect: CellRect, color: Rgba) {
        self.pixels.fill_rect(rect, color);
        self.dirty.push(rect);
    }
}

fn full_image(pixels: &PixelSurface) -> ColorImage {
    let size = [pixels.width() as usize, pixels.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, pixels.as_bytes())
}
