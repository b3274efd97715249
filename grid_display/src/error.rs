// error.rs - Error taxonomy shared by the renderer and grid engines

pub type RenderResult<T> = Result<T, RenderError>;

/// A read outside a buffer's declared extent, or through an expired pointer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoundsError {
    #[error("index {index} out of range for view of length {len}")]
    Index { index: usize, len: usize },

    #[error("region at {address:#x} of {size} bytes exceeds linear memory of {memory_len} bytes")]
    Region {
        address: u32,
        size: usize,
        memory_len: usize,
    },

    #[error("stale pointer: issued at epoch {issued}, memory is at epoch {current}")]
    Stale { issued: u64, current: u64 },

    #[error("cell index {index} outside grid of {cells} cells")]
    Cell { index: usize, cells: usize },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("invalid grid dimensions {width}x{height}: both must be positive and the cell count must fit in i32")]
    Config { width: i64, height: i64 },

    #[error("invalid cell size {0}: must be positive")]
    CellSize(u32),

    #[error(transparent)]
    Bounds(#[from] BoundsError),

    #[error("protocol order violation: {0}")]
    ProtocolOrder(&'static str),

    #[error("malformed diff entry {entry} at position {position}")]
    MalformedEntry { position: usize, entry: i32 },

    #[error("snapshot byte {value} at index {index} is not a cell state")]
    InvalidCell { index: usize, value: u8 },

    #[error("grid engine failed: {0}")]
    Engine(String),
}

impl RenderError {
    pub fn protocol_order(msg: &'static str) -> Self {
        Self::ProtocolOrder(msg)
    }

    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }
}
