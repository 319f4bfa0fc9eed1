pub mod app;
pub mod error;
pub mod generators;
pub mod maze;

pub use error::{ConfigError, GenerationError};
pub use generators::{GenerationStatus, Generator, MazeGenerator, create_generator};
pub use maze::{Cell, Direction, Grid, GridEvent, Observer, Path, Status};
