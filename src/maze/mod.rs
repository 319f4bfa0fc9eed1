//! Grid model shared by every generator: cells, the paths between them, and
//! the observer through which mutations are reported.

pub mod cell;
pub mod grid;
pub mod observer;

pub use cell::{Cell, Coord, Direction, Path, Status};
pub use grid::{Grid, Neighbor, Side, Slot};
pub use observer::{Callbacks, GridEvent, NoopObserver, Observer};
