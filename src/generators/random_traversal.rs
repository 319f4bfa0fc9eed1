use crate::{
    error::{ConfigError, GenerationError},
    generators::{GenerationStatus, GeneratorBase, MazeGenerator},
    maze::{Coord, Grid, Observer, Path, Status},
};

/// Grows the maze from a random cell by opening uniformly random frontier paths.
pub struct RandomTraversal {
    base: GeneratorBase,
    /// Unresolved paths between the visited region and the rest of the grid.
    frontiers: Vec<Path>,
}

impl RandomTraversal {
    pub fn new(
        width: usize,
        height: usize,
        observer: Box<dyn Observer>,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base: GeneratorBase::new("random-traversal", width, height, observer, seed)?,
            frontiers: Vec::new(),
        })
    }

    pub fn frontier_len(&self) -> usize {
        self.frontiers.len()
    }

    /// Marks `coord` visited and enqueues its paths to unvisited neighbors.
    fn visit(&mut self, coord: Coord) {
        self.base.set_cell(coord, Status::Empty);
        for neighbor in self.base.neighbors(coord) {
            if neighbor.cell.status != Status::Empty {
                self.base.set_path(
                    neighbor.path.owner(),
                    neighbor.path.direction,
                    Status::Focused,
                    false,
                );
                self.frontiers.push(neighbor.path);
            }
        }
    }

    fn step(&mut self) -> Result<bool, GenerationError> {
        if self.frontiers.is_empty() {
            return Ok(self.base.finish());
        }

        let idx = self.base.random_index(self.frontiers.len());
        let path = self.frontiers.swap_remove(idx);
        let (from, to) = (path.owner(), self.base.destination(&path)?);
        let unvisited = [from, to]
            .into_iter()
            .find(|&coord| self.base.cell_status(coord) != Some(Status::Empty));

        match unvisited {
            None => {
                self.base
                    .set_path(from, path.direction, Status::Filled, true);
                tracing::trace!("[random-traversal] sealed {:?} {:?}", from, path.direction);
                Ok(false)
            }
            Some(coord) => {
                self.base
                    .set_path(from, path.direction, Status::Empty, false);
                self.visit(coord);
                tracing::debug!("[random-traversal] visited {:?}", coord);
                Ok(true)
            }
        }
    }
}

impl MazeGenerator for RandomTraversal {
    fn initialize(&mut self) {
        self.base.reset(Status::Filled, Status::Filled);
        self.frontiers.clear();
        let start = self.base.random_cell();
        self.visit(start);
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
