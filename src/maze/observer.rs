use std::sync::mpsc::Sender;

use super::cell::{Cell, Path, Status};

/// A single change to a generator's grid, as seen by an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    /// The grid was rebuilt with every cell and path set to the given statuses.
    Initial {
        width: usize,
        height: usize,
        cell_status: Status,
        path_status: Status,
    },
    Cell(Cell),
    Path {
        path: Path,
        update_dead_walls: bool,
    },
}

/// Receives grid mutations synchronously, as they happen.
///
/// This is the only channel through which a renderer learns about progress
/// incrementally. The grid can also be read in bulk at any time.
pub trait Observer {
    fn on_update_cell(&mut self, cell: &Cell);

    /// `update_dead_walls` asks the renderer to also recompute the wall posts
    /// at both ends of the path.
    fn on_update_path(&mut self, path: &Path, update_dead_walls: bool);

    /// Called by `initialize()` before the grid is rebuilt with every cell set
    /// to `cell_status` and every path to `path_status`.
    ///
    /// Return `true` when the observer takes care of the whole rebuild itself,
    /// e.g. by redrawing from the grid. The default returns `false`, and the
    /// generator then reports each cell and path whose status changed through
    /// the two update methods.
    fn on_reset(
        &mut self,
        _width: usize,
        _height: usize,
        _cell_status: Status,
        _path_status: Status,
    ) -> bool {
        false
    }
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn on_update_cell(&mut self, _cell: &Cell) {}

    fn on_update_path(&mut self, _path: &Path, _update_dead_walls: bool) {}
}

/// Forwards every notification as a [`GridEvent`] over a channel.
impl Observer for Sender<GridEvent> {
    fn on_update_cell(&mut self, cell: &Cell) {
        // A dropped receiver only means nobody is watching anymore
        let _ = self.send(GridEvent::Cell(*cell));
    }

    fn on_update_path(&mut self, path: &Path, update_dead_walls: bool) {
        let _ = self.send(GridEvent::Path {
            path: *path,
            update_dead_walls,
        });
    }

    fn on_reset(
        &mut self,
        width: usize,
        height: usize,
        cell_status: Status,
        path_status: Status,
    ) -> bool {
        let _ = self.send(GridEvent::Initial {
            width,
            height,
            cell_status,
            path_status,
        });
        true
    }
}

/// A pair of plain callbacks, one for cells and one for paths.
pub struct Callbacks<C, P>
where
    C: FnMut(&Cell),
    P: FnMut(&Path, bool),
{
    on_cell: C,
    on_path: P,
}

impl<C, P> Callbacks<C, P>
where
    C: FnMut(&Cell),
    P: FnMut(&Path, bool),
{
    pub fn new(on_cell: C, on_path: P) -> Self {
        Self { on_cell, on_path }
    }
}

impl<C, P> Observer for Callbacks<C, P>
where
    C: FnMut(&Cell),
    P: FnMut(&Path, bool),
{
    fn on_update_cell(&mut self, cell: &Cell) {
        (self.on_cell)(cell)
    }

    fn on_update_path(&mut self, path: &Path, update_dead_walls: bool) {
        (self.on_path)(path, update_dead_walls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Direction;
    use std::sync::mpsc;

    #[test]
    fn test_sender_forwards_events() {
        let (tx, rx) = mpsc::channel::<GridEvent>();
        let mut observer: Box<dyn Observer> = Box::new(tx);
        let cell = Cell {
            row: 0,
            column: 1,
            status: Status::Empty,
        };
        assert!(observer.on_reset(2, 2, Status::Filled, Status::Filled));
        observer.on_update_cell(&cell);
        let events = rx.try_iter().collect::<Vec<_>>();
        assert_eq!(
            events,
            vec![
                GridEvent::Initial {
                    width: 2,
                    height: 2,
                    cell_status: Status::Filled,
                    path_status: Status::Filled,
                },
                GridEvent::Cell(cell),
            ]
        );
    }

    #[test]
    fn test_sender_ignores_dropped_receiver() {
        let (tx, rx) = mpsc::channel::<GridEvent>();
        drop(rx);
        let mut observer = tx;
        observer.on_update_path(
            &Path {
                row: 0,
                column: 0,
                direction: Direction::Right,
                status: Status::Empty,
            },
            false,
        );
    }

    #[test]
    fn test_callbacks() {
        let mut cells = 0;
        let mut dead_walls = Vec::new();
        {
            let mut observer = Callbacks::new(
                |_cell: &Cell| cells += 1,
                |_path: &Path, dead: bool| dead_walls.push(dead),
            );
            let path = Path {
                row: 1,
                column: 1,
                direction: Direction::Bottom,
                status: Status::Filled,
            };
            observer.on_update_cell(&Cell {
                row: 1,
                column: 1,
                status: Status::Empty,
            });
            observer.on_update_path(&path, true);
            assert!(!observer.on_reset(3, 3, Status::Empty, Status::Empty));
        }
        assert_eq!(cells, 1);
        assert_eq!(dead_walls, vec![true]);
    }
}
