use crate::{
    error::{ConfigError, GenerationError},
    generators::{GenerationStatus, GeneratorBase, MazeGenerator},
    maze::{Coord, Grid, Neighbor, Observer, Path, Status},
};

/// Wilson's algorithm: loop-erased random walks, giving a uniformly random
/// spanning tree.
pub struct Wilson {
    base: GeneratorBase,
    /// Cells of the current walk, seed first. Empty when no walk is active.
    line: Vec<Coord>,
    /// `paths[i]` connects `line[i]` and `line[i + 1]`.
    paths: Vec<Path>,
}

impl Wilson {
    pub fn new(
        width: usize,
        height: usize,
        observer: Box<dyn Observer>,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base: GeneratorBase::new("wilson", width, height, observer, seed)?,
            line: Vec::new(),
            paths: Vec::new(),
        })
    }

    /// Cells of the walk in progress.
    pub fn line(&self) -> &[Coord] {
        &self.line
    }

    /// Starts a new walk from a random unvisited cell.
    fn seed_line(&mut self) -> bool {
        let unvisited = self
            .base
            .grid()
            .cells()
            .filter(|cell| cell.status == Status::Filled)
            .map(|cell| cell.coord())
            .collect::<Vec<_>>();
        if unvisited.is_empty() {
            return self.base.finish();
        }
        let seed = unvisited[self.base.random_index(unvisited.len())];
        self.base.set_cell(seed, Status::Focused);
        self.line.push(seed);
        tracing::debug!("[wilson] new walk from {:?}", seed);
        true
    }

    /// Neighbors of the tail the walk may move to next.
    fn candidates(&self, tail: Coord) -> Result<Vec<Neighbor>, GenerationError> {
        let neighbors = self.base.neighbors(tail);
        let Some(&previous) = self.line.len().checked_sub(2).and_then(|i| self.line.get(i)) else {
            return Ok(neighbors);
        };
        if !neighbors.iter().any(|n| n.cell.coord() == previous) {
            return Err(GenerationError::DisconnectedWalk {
                row: tail.0,
                column: tail.1,
            });
        }
        let forward = neighbors
            .iter()
            .copied()
            .filter(|n| n.cell.coord() != previous)
            .collect::<Vec<_>>();
        // At a dead end the only way on is back, which erases the tail
        Ok(if forward.is_empty() { neighbors } else { forward })
    }

    /// Truncates the walk back to `coord`, which becomes the new tail.
    fn erase_loop(&mut self, coord: Coord) -> Result<(), GenerationError> {
        let idx = self
            .line
            .iter()
            .position(|&c| c == coord)
            .ok_or(GenerationError::DisconnectedWalk {
                row: coord.0,
                column: coord.1,
            })?;
        for cell in self.line.split_off(idx + 1) {
            self.base.set_cell(cell, Status::Filled);
        }
        for path in self.paths.split_off(idx) {
            self.base
                .set_path(path.owner(), path.direction, Status::Filled, false);
        }
        tracing::trace!("[wilson] erased loop back to {:?}", coord);
        Ok(())
    }

    /// Commits the whole walk, plus the path joining it to the maze.
    fn connect(&mut self, joint: Path) {
        self.paths.push(joint);
        for cell in std::mem::take(&mut self.line) {
            self.base.set_cell(cell, Status::Empty);
        }
        for path in std::mem::take(&mut self.paths) {
            self.base
                .set_path(path.owner(), path.direction, Status::Empty, false);
        }
    }

    fn step(&mut self) -> Result<bool, GenerationError> {
        let Some(&tail) = self.line.last() else {
            return Ok(self.seed_line());
        };

        let candidates = self.candidates(tail)?;
        let next = candidates[self.base.random_index(candidates.len())];
        let coord = next.cell.coord();
        match next.cell.status {
            Status::Filled => {
                self.base.set_path(
                    next.path.owner(),
                    next.path.direction,
                    Status::Focused,
                    false,
                );
                self.base.set_cell(coord, Status::Focused);
                self.paths.push(next.path);
                self.line.push(coord);
            }
            Status::Focused => self.erase_loop(coord)?,
            Status::Empty => {
                tracing::debug!(
                    "[wilson] walk of {} cells joined the maze at {:?}",
                    self.line.len(),
                    coord
                );
                self.connect(next.path);
            }
        }
        Ok(true)
    }
}

impl MazeGenerator for Wilson {
    fn initialize(&mut self) {
        self.base.reset(Status::Filled, Status::Filled);
        self.line.clear();
        self.paths.clear();
        // Walks need a committed cell to end on
        let root = self.base.random_cell();
        self.base.set_cell(root, Status::Empty);
    }

    fn compute_one_step(&mut self) -> bool {
        if !self.base.can_step() {
            return true;
        }
        let result = self.step();
        self.base.settle(result)
    }

    fn generation_status(&self) -> GenerationStatus {
        self.base.status()
    }

    fn paths(&self) -> &Grid {
        self.base.grid()
    }
}
