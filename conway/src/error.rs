// error.rs - Engine construction errors

use grid_display::RenderError;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("unknown pattern {0:?}")]
    UnknownPattern(String),

    #[error("pattern {name} ({rows}x{cols}) does not fit a {width}x{height} grid")]
    PatternTooLarge {
        name: &'static str,
        rows: u32,
        cols: u32,
        width: u32,
        height: u32,
    },

    #[error("invalid rule: {0}")]
    Rule(String),

    #[error("density {0} outside [0, 1]")]
    Density(f64),

    #[error("failed to build row runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl EngineError {
    pub fn rule(msg: impl Into<String>) -> Self {
        Self::Rule(msg.into())
    }
}
