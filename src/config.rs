// config.rs - TOML configuration; command line flags override file values

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;
use conway::Rule;
use grid_display::{DEFAULT_CELL_SIZE, Palette};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub grid: GridConfig,
    pub rule: Rule,
    pub render: RenderConfig,
    pub palette: Palette,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    /// Seed for the random fill; entropy when absent.
    pub seed: Option<u64>,
    /// Probability that a cell starts alive.
    pub density: f64,
    /// Stamp a built-in pattern instead of a random fill.
    pub pattern: Option<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            seed: None,
            density: 0.5,
            pattern: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub cell_size: u32,
    /// Upper bound on generations per second in the window.
    pub generations_per_second: f32,
}

/// Accepted range for `render.generations_per_second`.
pub const GENERATION_RATE: RangeInclusive<f32> = 0.5..=1000.0;

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            generations_per_second: 60.0,
        }
    }
}

/// Time between generations at `rate`, clamped into [`GENERATION_RATE`].
pub fn frame_interval(rate: f32) -> Duration {
    let rate = if rate.is_nan() {
        *GENERATION_RATE.start()
    } else {
        rate.clamp(*GENERATION_RATE.start(), *GENERATION_RATE.end())
    };
    Duration::from_secs_f32(1.0 / rate)
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("read config '{}'", path.display()))?;
        Self::parse(&text).with_context(|| format!("parse config '{}'", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(text)?;
        config.rule.validate()?;
        let rate = config.render.generations_per_second;
        anyhow::ensure!(
            GENERATION_RATE.contains(&rate),
            "render.generations_per_second must be within {}..={}, got {rate}",
            GENERATION_RATE.start(),
            GENERATION_RATE.end()
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use grid_display::Rgba;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.grid.width, 300);
        assert_eq!(config.grid.density, 0.5);
        assert_eq!(config.rule, Rule::CONWAY);
        assert_eq!(config.render.cell_size, 5);
        assert_eq!(config.palette, Palette::default());
    }

    #[test]
    fn parses_every_section() {
        let config = AppConfig::parse(
            r##"
            [grid]
            width = 64
            height = 48
            seed = 9
            pattern = "pulsar"

            [rule]
            birth_min = 3
            birth_max = 3
            alive_min = 2
            alive_max = 3

            [render]
            cell_size = 8
            generations_per_second = 10.0

            [palette]
            dead = "#000000"
            alive = "#ffffff"
            "##,
        )
        .unwrap();
        assert_eq!((config.grid.width, config.grid.height), (64, 48));
        assert_eq!(config.grid.seed, Some(9));
        assert_eq!(config.grid.pattern.as_deref(), Some("pulsar"));
        assert_eq!(config.render.cell_size, 8);
        assert_eq!(config.palette.alive, Rgba::rgb(255, 255, 255));
    }

    #[test]
    fn sample_config_parses() {
        let config = AppConfig::parse(include_str!("../life_diff.toml")).unwrap();
        assert_eq!(config.grid.width, 300);
        assert_eq!(config.palette, Palette::default());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(AppConfig::parse("[palette]\nalive = \"green\"").is_err());
        assert!(AppConfig::parse("[grid]\nwidht = 3").is_err());
        assert!(AppConfig::parse("[rule]\nbirth_min = 5\nbirth_max = 4").is_err());
        assert!(AppConfig::parse("[render]\ngenerations_per_second = 0.0").is_err());
        assert!(AppConfig::parse("[render]\ngenerations_per_second = 1e-30").is_err());
        assert!(AppConfig::parse("[render]\ngenerations_per_second = 1e30").is_err());
        assert!(AppConfig::parse("[render]\ngenerations_per_second = nan").is_err());
    }

    #[test]
    fn frame_interval_never_leaves_the_rate_range() {
        assert_eq!(frame_interval(2.0), Duration::from_millis(500));
        assert_eq!(frame_interval(1e-30), Duration::from_secs(2));
        assert_eq!(frame_interval(f32::NAN), Duration::from_secs(2));
        let fastest = frame_interval(1e30);
        assert!(fastest > Duration::from_micros(999) && fastest < Duration::from_micros(1001));
    }

    #[test]
    fn accepts_the_rate_bounds() {
        for rate in [*GENERATION_RATE.start(), *GENERATION_RATE.end()] {
            let config = AppConfig::parse(&format!("[render]\ngenerations_per_second = {rate:?}")).unwrap();
            assert_eq!(config.render.generations_per_second, rate);
        }
    }
}
