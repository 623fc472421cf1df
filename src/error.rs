use std::path::PathBuf;

use crate::board::Move;

/// Reasons a search call returns without a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The time oracle dropped below the configured threshold mid-search.
    #[error("search timed out")]
    Timeout,

    /// The engine was entered with a depth of zero.
    #[error("search depth must be strictly greater than zero")]
    InvalidDepth,
}

/// Errors raised when applying moves to a [`crate::board::Board`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("illegal move {0}")]
    IllegalMove(Move),

    #[error("cell {cell} is outside a {width}x{height} board")]
    OutOfBounds {
        cell: Move,
        width: usize,
        height: usize,
    },
}

/// Errors that can occur when loading agent configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
