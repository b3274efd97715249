// main.rs - Diff-rendered Game of Life: window and headless front ends

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use conway::{Model, PATTERNS};
use tracing_subscriber::EnvFilter;

mod config;
mod headless;
mod texture;
mod ui;

use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "life_diff", version, about = "Game of Life that repaints only the cells that changed")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Grid width in cells.
    #[arg(long, global = true)]
    width: Option<i32>,

    /// Grid height in cells.
    #[arg(long, global = true)]
    height: Option<i32>,

    /// Seed for the random initial fill.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Probability that a cell starts alive.
    #[arg(long, global = true)]
    density: Option<f64>,

    /// Start from a built-in pattern instead of a random fill.
    #[arg(long, global = true)]
    pattern: Option<String>,

    /// Cell edge length in pixels.
    #[arg(long, global = true)]
    cell_size: Option<u32>,

    /// Log filter, e.g. `info` or `conway=trace`. Falls back to RUST_LOG.
    #[arg(long, global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a window (default).
    Window,
    /// Render frames offscreen and write the last one as a PNG.
    Headless {
        /// Frames to render after the initial draw.
        #[arg(long, default_value_t = 100)]
        frames: u64,

        /// Output PNG path.
        #[arg(long)]
        out: PathBuf,

        /// Print the final grid as text.
        #[arg(long)]
        print: bool,
    },
    /// List built-in patterns.
    Patterns,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(width) = self.width {
            config.grid.width = width;
        }
        if let Some(height) = self.height {
            config.grid.height = height;
        }
        if let Some(seed) = self.seed {
            config.grid.seed = Some(seed);
        }
        if let Some(density) = self.density {
            config.grid.density = density;
        }
        if let Some(pattern) = &self.pattern {
            config.grid.pattern = Some(pattern.clone());
        }
        if let Some(cell_size) = self.cell_size {
            config.render.cell_size = cell_size;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_filter.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    cli.apply_overrides(&mut config);

    match cli.cmd.unwrap_or(Command::Window) {
        Command::Window => ui::run(config),
        Command::Headless { frames, out, print } => headless::run(&config, frames, &out, print),
        Command::Patterns => {
            for pattern in PATTERNS {
                let (rows, cols) = pattern.extent();
                println!("{:<20} {rows}x{cols}", pattern.name);
            }
            Ok(())
        }
    }
}

fn init_tracing(filter: Option<&str>) -> anyhow::Result<()> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}

pub(crate) fn build_model(config: &AppConfig) -> anyhow::Result<Model> {
    let grid = &config.grid;
    let model = match &grid.pattern {
        Some(name) => Model::with_pattern(grid.width, grid.height, config.rule, conway::patterns::find(name)?)?,
        None => Model::random(grid.width, grid.height, config.rule, grid.density, grid.seed)?,
    };
    Ok(model)
}
