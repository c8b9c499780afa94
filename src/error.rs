//! Error types
//!
//! Only construction and persistence can fail. The tick path never returns
//! errors.

use thiserror::Error;

/// Invalid geometry passed to a constructor
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("rectangle has invalid size {width}x{height}")]
    InvalidSize { width: f32, height: f32 },

    #[error("rectangle position ({x}, {y}) is not finite")]
    NonFinitePosition { x: f32, y: f32 },

    #[error("moving platform speed must be positive, got {0}")]
    InvalidSpeed(f32),
}

/// Failure loading or navigating levels
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to parse level table `{name}`: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("level `{name}`: {source}")]
    Geometry {
        name: String,
        #[source]
        source: GeometryError,
    },

    #[error("level `{name}` requires {required} stars but only has {available}")]
    UnreachableDoor {
        name: String,
        required: usize,
        available: usize,
    },

    #[error("level `{name}` has a spawn point outside the world")]
    SpawnOutOfBounds { name: String },

    #[error("failed to read level file {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no levels to play")]
    Empty,

    #[error("no level {index} (levels are numbered 1..={count})")]
    NoSuchLevel { index: usize, count: usize },
}

/// Failure reading or writing settings/progress files
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure starting or joining the simulation thread
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("failed to start simulation thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("simulation thread panicked")]
    Panicked,
}
