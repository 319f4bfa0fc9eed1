use thiserror::Error;

use crate::maze::Direction;

/// Errors raised while configuring a generator, before any step runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid grid dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions { width: usize, height: usize },
    #[error("unknown generator '{0}'")]
    UnknownGenerator(String),
}

/// Internal consistency violations detected while stepping a generator.
///
/// Any of these moves the generator into [`GenerationStatus::Error`](crate::GenerationStatus::Error);
/// the run has to be discarded with a fresh `initialize()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("path {direction:?} of cell ({row}, {column}) leads outside the grid")]
    InvalidDirection {
        row: usize,
        column: usize,
        direction: Direction,
    },
    #[error("cell ({row}, {column}) has no {direction:?} path")]
    MissingPath {
        row: usize,
        column: usize,
        direction: Direction,
    },
    #[error("walk tail ({row}, {column}) is not adjacent to the previous cell of the walk")]
    DisconnectedWalk { row: usize, column: usize },
}
