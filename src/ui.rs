// ui.rs - eframe host: every repaint is one frame callback of the render loop

use std::time::{Duration, Instant};

use conway::Model;
use eframe::egui;
use egui::{Color32, Rect, Vec2};
use grid_display::{CancelToken, FrameScheduler, Geometry, LoopState, RenderError, RenderLoop, RenderResult};
use tracing::{error, info};

use crate::config::{AppConfig, GENERATION_RATE, frame_interval};
use crate::texture::TextureSurface;

pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let model = crate::build_model(&config)?;
    let app = LifeApp::new(model, &config)?;
    let (width, height) = app.render.geometry().surface_size();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32 + 32.0, height as f32 + 120.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Diff-rendered Game of Life",
        options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|err| anyhow::anyhow!("window closed with error: {err}"))
}

/// Frame requests become egui repaint requests.
struct RepaintScheduler<'a> {
    ctx: &'a egui::Context,
    interval: Duration,
}

impl FrameScheduler for RepaintScheduler<'_> {
    fn request_frame(&mut self) {
        self.ctx.request_repaint_after(self.interval);
    }
}

pub struct LifeApp {
    render: RenderLoop<Model, TextureSurface>,
    cancel: CancelToken,
    fault: Option<RenderError>,
    last_tick: Instant,
    update_interval: Duration,
}

impl LifeApp {
    fn new(model: Model, config: &AppConfig) -> RenderResult<Self> {
        let geometry = Geometry::for_model(&model, config.render.cell_size)?;
        let (width, height) = geometry.surface_size();
        let render = RenderLoop::new(
            model,
            TextureSurface::new(width, height),
            config.render.cell_size,
            config.palette,
        )?;
        Ok(Self {
            cancel: render.cancel_token(),
            render,
            fault: None,
            last_tick: Instant::now(),
            update_interval: frame_interval(config.render.generations_per_second),
        })
    }

    fn drive(&mut self, ctx: &egui::Context) {
        let mut scheduler = RepaintScheduler {
            ctx,
            interval: self.update_interval,
        };
        let result = match self.render.state() {
            LoopState::Idle => self.render.start(&mut scheduler).map(|painted| {
                info!(painted, "initial frame drawn");
            }),
            LoopState::Scheduled => {
                // Repaints triggered by input arrive early; wait out the interval.
                let elapsed = self.last_tick.elapsed();
                if elapsed < self.update_interval {
                    ctx.request_repaint_after(self.update_interval - elapsed);
                    return;
                }
                self.last_tick = Instant::now();
                self.render.tick(&mut scheduler).map(|_| ())
            }
            LoopState::Running | LoopState::Stopped | LoopState::Faulted => Ok(()),
        };
        if let Err(err) = result {
            error!(%err, "render loop halted");
            self.fault = Some(err);
        }
    }
}

impl eframe::App for LifeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drive(ctx);
        self.render.surface_mut().flush(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Diff-rendered Game of Life");

            // Controls
            ui.horizontal(|ui| {
                let running = self.render.state() == LoopState::Scheduled;
                if ui.add_enabled(running, egui::Button::new("⏹ Stop")).clicked() {
                    self.cancel.cancel();
                    ctx.request_repaint();
                }

                ui.separator();

                ui.label("Speed:");
                let mut speed = 1.0 / self.update_interval.as_secs_f32();
                if ui.add(egui::Slider::new(&mut speed, *GENERATION_RATE.start()..=120.0).suffix(" gen/sec")).changed() {
                    self.update_interval = frame_interval(speed);
                }

                ui.separator();

                let stats = self.render.stats();
                ui.label(format!("Generation: {}", self.render.model().generation()));
                ui.label(format!("Changed: {}", stats.last_diff));
                ui.label(format!("Painted: {}", stats.cells_painted));
            });

            match (&self.fault, self.render.state()) {
                (Some(err), _) => {
                    ui.colored_label(Color32::from_rgb(220, 60, 60), format!("Halted: {err}"));
                }
                (None, LoopState::Stopped) => {
                    ui.label("Stopped.");
                }
                _ => {}
            }

            ui.separator();

            let (width, height) = self.render.geometry().surface_size();
            let size = Vec2::new(width as f32, height as f32);
            let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
            if let Some(texture) = self.render.surface().texture() {
                painter.image(
                    texture.id(),
                    response.rect,
                    Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
        });
    }
}
