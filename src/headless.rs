// headless.rs - Offscreen run that writes the final frame as a PNG

use std::path::Path;

use anyhow::Context as _;
use grid_display::{Geometry, ManualScheduler, PixelSurface, RenderLoop};
use tracing::info;

use crate::config::AppConfig;

pub fn run(config: &AppConfig, frames: u64, out: &Path, print: bool) -> anyhow::Result<()> {
    let model = crate::build_model(config)?;
    let geometry = Geometry::for_model(&model, config.render.cell_size)?;
    let (width, height) = geometry.surface_size();

    let mut render = RenderLoop::new(model, PixelSurface::new(width, height), config.render.cell_size, config.palette)?;
    let mut scheduler = ManualScheduler::new();
    render.start(&mut scheduler)?;
    while render.stats().frames < frames && scheduler.take_pending() {
        render.tick(&mut scheduler)?;
    }

    let stats = render.stats();
    info!(
        frames = stats.frames,
        cells_painted = stats.cells_painted,
        last_diff = stats.last_diff,
        "headless run complete"
    );

    let (model, surface) = render.into_parts();
    if print {
        print!("{}", model.render_text());
    }
    let image = image::RgbaImage::from_raw(width, height, surface.into_bytes())
        .context("framebuffer does not match surface size")?;
    image
        .save(out)
        .with_context(|| format!("write '{}'", out.display()))?;
    info!(path = %out.display(), width, height, "frame written");
    Ok(())
}
