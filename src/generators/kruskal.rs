use crate::{
    error::{ConfigError, GenerationError},
    generators::{GenerationStatus, GeneratorBase, MazeGenerator},
    maze::{Coord, Direction, Grid, Observer, Status},
};

/// Randomized Kruskal's algorithm.
///
/// Components are tracked with a flat per-cell id table. Merging rewrites
/// every cell of the absorbed component, which is O(cells) per merge.
pub struct Kruskal {
    base: GeneratorBase,
    /// Component id of each cell, indexed by [`Grid::index_of`].
    components: Vec<usize>,
    /// Paths not yet considered, as `(owner, direction)`.
    remaining: Vec<(Coord, Direction)>,
}

impl Kruskal {
    pub fn new(
        width: usize,
        height: usize,
        observer: Box<dyn Observer>,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base: GeneratorBase::new("kruskal", width, height, observer, seed)?,
            components: Vec::new(),
            remaining: Vec::new(),
        })
    }

    /// Component id currently assigned to a cell. `None` before `initialize()`.
    pub fn component(&self, coord: Coord) -> Option<usize> {
        let grid = self.base.grid();
        if !grid.is_in_bounds(coord) {
            return None;
        }
        self.components.get(grid.index_of(coord)).copied()
    }

    /// Number of paths still waiting to be drawn.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    fn step(&mut self) -> Result<bool, GenerationError> {
        if self.remaining.is_empty() {
            // Only a lone cell can still be unvisited here
            let unvisited = self
                .base
                .grid()
                .cells()
                .filter(|cell| cell.status != Status::Empty)
                .map(|cell| cell.coord())
                .collect::<Vec<_>>();
            for coord in unvisited {
                self.base.set_cell(coord, Status::Empty);
            }
            return Ok(self.base.finish());
        }

        let idx = self.base.random_index(self.remaining.len());
        let (owner, direction) = self.remaining.swap_remove(idx);
        let path = *self
            .base
            .grid()
            .path(owner, direction)
            .ok_or(GenerationError::MissingPath {
                row: owner.0,
                column: owner.1,
                direction,
            })?;
        let far = self.base.destination(&path)?;

        let grid = self.base.grid();
        let (survivor, absorbed) = (
            self.components[grid.index_of(owner)],
            self.components[grid.index_of(far)],
        );
        if survivor == absorbed {
            // Already connected, this path stays a wall
            tracing::trace!("[kruskal] skipped {:?} {:?}", owner, direction);
            return Ok(false);
        }

        self.base.set_path(owner, direction, Status::Empty, false);
        self.base.set_cell(owner, Status::Empty);
        self.base.set_cell(far, Status::Empty);
        self.components
            .iter_mut()
            .filter(|id| **id == absorbed)
            .for_each(|id| *id = survivor);
        tracing::debug!(
            "[kruskal] joined {:?} and {:?}, component {} absorbed into {}",
            owner,
            far,
            absorbed,
            survivor
        );
        Ok(true)
    }
}

impl MazeGenerator for Kruskal {
    fn initialize(&mut self) {
        self.base.reset(Status::Filled, Status::Filled);
        self.components = (0..self.base.grid().len()).collect();
        self.remaining = self
            .base
            .grid()
            .paths()
            .map(|path| (path.owner(), path.direction))
            .collect();
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

    /// Cells reachable from `start` through open paths.
    fn reachable(grid: &Grid, start: Coord) -> Vec<bool> {
        let mut seen = vec![false; grid.len()];
        let mut stack = vec![start];
        seen[grid.index_of(start)] = true;
        while let Some(coord) = stack.pop() {
            for n in grid.neighbors(coord) {
                let idx = grid.index_of(n.cell.coord());
                if n.path.status == Status::Empty && !seen[idx] {
                    seen[idx] = true;
                    stack.push(n.cell.coord());
                }
            }
        }
        seen
    }

    #[test]
    fn test_component_before_initialize() {
        let kruskal = Kruskal::new(3, 3, Box::new(NoopObserver), Some(1)).unwrap();
        assert_eq!(kruskal.component((0, 0)), None);
        assert_eq!(kruskal.component((2, 2)), None);
    }

    #[test]
    fn test_initial_components_are_unique() {
        let mut kruskal = Kruskal::new(4, 3, Box::new(NoopObserver), Some(1)).unwrap();
        kruskal.initialize();
        let mut ids = (0..3)
            .flat_map(|r| (0..4).map(move |c| (r, c)))
            .filter_map(|coord| kruskal.component(coord))
            .collect::<Vec<_>>();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 12);
        assert_eq!(kruskal.remaining(), 3 * 3 + 4 * 2);
        assert_eq!(kruskal.component((3, 0)), None);
    }

    #[test]
    fn test_components_match_connectivity() {
        let mut kruskal = Kruskal::new(6, 5, Box::new(NoopObserver), Some(21)).unwrap();
        kruskal.initialize();
        while kruskal.generation_status() == GenerationStatus::Ongoing {
            kruskal.compute_one_step();
            let grid = kruskal.paths();
            let coords = grid.cells().map(|c| c.coord()).collect::<Vec<_>>();
            for &a in coords.iter().step_by(7) {
                let seen = reachable(grid, a);
                for &b in &coords {
                    assert_eq!(
                        kruskal.component(a) == kruskal.component(b),
                        seen[grid.index_of(b)],
                        "component ids disagree with connectivity for {:?} and {:?}",
                        a,
                        b
                    );
                }
            }
        }
        assert_perfect_maze(kruskal.paths());
    }

    #[test]
    fn test_all_paths_drawn_before_completion() {
        let mut kruskal = Kruskal::new(5, 5, Box::new(NoopObserver), Some(4)).unwrap();
        kruskal.initialize();
        run_to_completion(&mut kruskal);
        assert_eq!(kruskal.remaining(), 0);
        // Every cell ends up in a single component
        let first = kruskal.component((0, 0));
        assert!(kruskal.paths().cells().all(|c| kruskal.component(c.coord()) == first));
    }
}
