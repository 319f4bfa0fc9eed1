use crate::{
    error::{ConfigError, GenerationError},
    generators::{GenerationStatus, GeneratorBase, MazeGenerator},
    maze::{Coord, Grid, Observer, Status},
};

/// Randomized iterative depth-first search (recursive backtracker).
pub struct Dfs {
    base: GeneratorBase,
    /// Cells on the active path, the top being the cell being carved from.
    stack: Vec<Coord>,
}

impl Dfs {
    pub fn new(
        width: usize,
        height: usize,
        observer: Box<dyn Observer>,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base: GeneratorBase::new("dfs", width, height, observer, seed)?,
            stack: Vec::new(),
        })
    }

    /// Cells currently on the active path, bottom first.
    pub fn stack(&self) -> &[Coord] {
        &self.stack
    }

    fn step(&mut self) -> Result<bool, GenerationError> {
        let Some(&cell) = self.stack.last() else {
            return Ok(self.base.finish());
        };

        let mut unvisited = Vec::new();
        for neighbor in self.base.neighbors(cell) {
            if neighbor.cell.status == Status::Empty {
                // That connection will never be carved from here
                if neighbor.path.status == Status::Focused {
                    self.base.set_path(
                        neighbor.path.owner(),
                        neighbor.path.direction,
                        Status::Filled,
                        true,
                    );
                }
            } else {
                unvisited.push(neighbor);
            }
        }

        if unvisited.is_empty() {
            // Backtrack
            self.stack.pop();
            tracing::trace!("[dfs] backtracked from {:?}", cell);
            if self.stack.is_empty() {
                return Ok(self.base.finish());
            }
            return Ok(false);
        }

        let chosen = unvisited.swap_remove(self.base.random_index(unvisited.len()));
        for other in &unvisited {
            self.base.set_path(
                other.path.owner(),
                other.path.direction,
                Status::Focused,
                false,
            );
        }
        self.base.try_set_path(
            chosen.path.owner(),
            chosen.path.direction,
            Status::Empty,
            false,
        )?;
        let next = chosen.cell.coord();
        self.base.set_cell(next, Status::Empty);
        self.stack.push(next);
        tracing::debug!("[dfs] carved {:?} -> {:?}", cell, next);
        Ok(true)
    }
}

impl MazeGenerator for Dfs {
    fn initialize(&mut self) {
        self.base.reset(Status::Filled, Status::Filled);
        self.stack.clear();
        let start = self.base.random_cell();
        self.base.set_cell(start, Status::Empty);
        self.stack.push(start);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::tests::{assert_perfect_maze, run_to_completion};
    use crate::maze::NoopObserver;

    #[test]
    fn test_initialize_seeds_one_cell() {
        let mut dfs = Dfs::new(5, 4, Box::new(NoopObserver), Some(7)).unwrap();
        dfs.initialize();
        assert_eq!(dfs.stack().len(), 1);
        let empty = dfs
            .paths()
            .cells()
            .filter(|c| c.status == Status::Empty)
            .collect::<Vec<_>>();
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].coord(), dfs.stack()[0]);
    }

    #[test]
    fn test_stack_is_a_carved_walk() {
        let mut dfs = Dfs::new(6, 6, Box::new(NoopObserver), Some(3)).unwrap();
        dfs.initialize();
        for _ in 0..12 {
            dfs.compute_one_generation_iteration();
            // Consecutive stack cells are adjacent and connected by an open path
            for pair in dfs.stack().windows(2) {
                let connected = dfs
                    .paths()
                    .neighbors(pair[0])
                    .into_iter()
                    .any(|n| n.cell.coord() == pair[1] && n.path.status == Status::Empty);
                assert!(connected, "{:?} and {:?} are not connected", pair[0], pair[1]);
            }
        }
    }

    #[test]
    fn test_backtracking_steps_do_not_yield() {
        let mut dfs = Dfs::new(1, 3, Box::new(NoopObserver), Some(0)).unwrap();
        dfs.initialize();
        let mut yields = Vec::new();
        while dfs.generation_status() == GenerationStatus::Ongoing {
            yields.push(dfs.compute_one_step());
        }
        // 2 carves and a final completion yield; everything else is backtracking
        assert_eq!(yields.iter().filter(|&&y| y).count(), 3);
        assert!(yields.last().copied().unwrap_or(false));
    }

    #[test]
    fn test_completes_and_empties_stack() {
        let mut dfs = Dfs::new(10, 7, Box::new(NoopObserver), Some(99)).unwrap();
        dfs.initialize();
        run_to_completion(&mut dfs);
        assert!(dfs.stack().is_empty());
        assert_perfect_maze(dfs.paths());
    }
}
