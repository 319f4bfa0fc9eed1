use rand::{Rng, rngs::StdRng};

use crate::{
    error::{ConfigError, GenerationError},
    generators::{GenerationStatus, get_rng},
    maze::{Coord, Direction, Grid, Neighbor, Observer, Path, Status},
};

/// State and helpers every generator composes: the grid it owns, the
/// observer it reports to, its random source and its lifecycle status.
pub struct GeneratorBase {
    grid: Grid,
    pub(crate) rng: StdRng,
    observer: Box<dyn Observer>,
    status: GenerationStatus,
    name: &'static str,
}

impl GeneratorBase {
    pub fn new(
        name: &'static str,
        width: usize,
        height: usize,
        observer: Box<dyn Observer>,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        Ok(Self {
            grid: Grid::new(width, height),
            rng: get_rng(seed),
            observer,
            status: GenerationStatus::Uninitialized,
            name,
        })
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    /// Rebuilds the grid with the given starting statuses and marks the run `Ongoing`.
    ///
    /// Observers that do not handle [`Observer::on_reset`] hear about every
    /// cell and path whose status changed instead.
    pub fn reset(&mut self, cell_status: Status, path_status: Status) {
        let handled = self
            .observer
            .on_reset(self.width(), self.height(), cell_status, path_status);
        if handled {
            self.grid.reset_paths(cell_status, path_status);
        } else {
            let cells = self.grid.cells().map(|cell| cell.coord()).collect::<Vec<_>>();
            for coord in cells {
                self.set_cell(coord, cell_status);
            }
            let paths = self
                .grid
                .paths()
                .map(|path| (path.owner(), path.direction))
                .collect::<Vec<_>>();
            for (owner, direction) in paths {
                self.set_path(owner, direction, path_status, true);
            }
        }
        self.status = GenerationStatus::Ongoing;
        tracing::info!(
            "[{}] initialized {}x{} grid",
            self.name,
            self.width(),
            self.height()
        );
    }

    pub fn cell_status(&self, coord: Coord) -> Option<Status> {
        self.grid.cell(coord).map(|cell| cell.status)
    }

    pub fn set_cell(&mut self, coord: Coord, status: Status) {
        if let Some(cell) = self.grid.set_cell_status(coord, status) {
            self.observer.on_update_cell(&cell);
        }
    }

    pub fn set_path(&mut self, owner: Coord, direction: Direction, status: Status, dead_walls: bool) {
        if let Some(path) = self.grid.set_path_status(owner, direction, status) {
            self.observer.on_update_path(&path, dead_walls);
        }
    }

    /// Like [`GeneratorBase::set_path`], but reports a missing path as an error.
    pub fn try_set_path(
        &mut self,
        owner: Coord,
        direction: Direction,
        status: Status,
        dead_walls: bool,
    ) -> Result<(), GenerationError> {
        if self.grid.path(owner, direction).is_none() {
            return Err(GenerationError::MissingPath {
                row: owner.0,
                column: owner.1,
                direction,
            });
        }
        self.set_path(owner, direction, status, dead_walls);
        Ok(())
    }

    /// Resolves the cell on the far side of a path.
    pub fn destination(&self, path: &Path) -> Result<Coord, GenerationError> {
        self.grid
            .destination(path)
            .ok_or(GenerationError::InvalidDirection {
                row: path.row,
                column: path.column,
                direction: path.direction,
            })
    }

    pub fn neighbors(&self, coord: Coord) -> Vec<Neighbor> {
        self.grid.neighbors(coord)
    }

    pub fn random_cell(&mut self) -> Coord {
        (
            self.rng.random_range(0..self.height()),
            self.rng.random_range(0..self.width()),
        )
    }

    /// Uniform index into a non-empty collection of length `len`.
    pub fn random_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    /// Uniform draw from `[low, high)`, which must not be empty.
    pub fn rng_range(&mut self, low: usize, high: usize) -> usize {
        self.rng.random_range(low..high)
    }

    /// Marks the run completed. Always a yield point.
    pub fn finish(&mut self) -> bool {
        self.status = GenerationStatus::Completed;
        tracing::info!(
            "[{}] completed with {} open paths",
            self.name,
            self.grid.open_path_count()
        );
        true
    }

    /// Turns the outcome of a step into the value `compute_one_step` reports.
    /// An error halts the run.
    pub fn settle(&mut self, result: Result<bool, GenerationError>) -> bool {
        match result {
            Ok(yielded) => yielded,
            Err(e) => {
                tracing::error!("[{}] generation halted: {}", self.name, e);
                self.status = GenerationStatus::Error;
                true
            }
        }
    }

    /// Whether a step should run at all. Steps outside of `Ongoing` are no-ops.
    pub fn can_step(&self) -> bool {
        match self.status {
            GenerationStatus::Ongoing => true,
            GenerationStatus::Uninitialized => {
                tracing::warn!("[{}] stepped before initialize()", self.name);
                false
            }
            GenerationStatus::Completed | GenerationStatus::Error => false,
        }
    }
}
