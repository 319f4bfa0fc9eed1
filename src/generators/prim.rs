use rand::{Rng, rngs::StdRng};

use crate::{
    error::{ConfigError, GenerationError},
    generators::{GenerationStatus, GeneratorBase, Heap, MazeGenerator},
    maze::{Coord, Grid, Observer, Path, Status},
};

/// Assigns a weight to a frontier path when it is enqueued. Lower weights are
/// opened first.
pub type EdgeWeight = Box<dyn FnMut(&Path, &mut StdRng) -> u64>;

/// Default weight: an independent uniform draw per path.
pub fn random_weight(_path: &Path, rng: &mut StdRng) -> u64 {
    rng.random()
}

#[derive(Debug, Clone, Copy)]
struct Frontier {
    path: Path,
    weight: u64,
}

fn frontier_weight(frontier: &Frontier) -> u64 {
    frontier.weight
}

/// Randomized Prim's algorithm: always opens the lowest-weight frontier path.
pub struct Prim {
    base: GeneratorBase,
    frontiers: Heap<Frontier, u64, fn(&Frontier) -> u64>,
    weight: EdgeWeight,
}

impl Prim {
    pub fn new(
        width: usize,
        height: usize,
        observer: Box<dyn Observer>,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        Self::with_weight(width, height, observer, seed, Box::new(random_weight))
    }

    /// Uses `weight` instead of random draws, e.g. to bias growth by distance.
    pub fn with_weight(
        width: usize,
        height: usize,
        observer: Box<dyn Observer>,
        seed: Option<u64>,
        weight: EdgeWeight,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base: GeneratorBase::new("prim", width, height, observer, seed)?,
            frontiers: Heap::new(frontier_weight as fn(&Frontier) -> u64),
            weight,
        })
    }

    pub fn frontier_len(&self) -> usize {
        self.frontiers.len()
    }

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
                let weight = (self.weight)(&neighbor.path, &mut self.base.rng);
                self.frontiers.push(Frontier {
                    path: neighbor.path,
                    weight,
                });
            }
        }
    }

    fn step(&mut self) -> Result<bool, GenerationError> {
        let Some(Frontier { path, weight }) = self.frontiers.pop() else {
            return Ok(self.base.finish());
        };

        let (from, to) = (path.owner(), self.base.destination(&path)?);
        let unvisited = [from, to]
            .into_iter()
            .find(|&coord| self.base.cell_status(coord) != Some(Status::Empty));

        match unvisited {
            None => {
                self.base
                    .set_path(from, path.direction, Status::Filled, true);
                tracing::trace!("[prim] sealed {:?} {:?} (weight {})", from, path.direction, weight);
                Ok(false)
            }
            Some(coord) => {
                self.base
                    .set_path(from, path.direction, Status::Empty, false);
                self.visit(coord);
                tracing::debug!("[prim] visited {:?} (weight {})", coord, weight);
                Ok(true)
            }
        }
    }
}

impl MazeGenerator for Prim {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::tests::{assert_perfect_maze, run_to_completion};
    use crate::maze::{Direction, GridEvent, NoopObserver};
    use std::sync::mpsc;

    #[test]
    fn test_random_weights() {
        let mut prim = Prim::new(9, 9, Box::new(NoopObserver), Some(17)).unwrap();
        prim.initialize();
        assert!(prim.frontier_len() >= 2);
        run_to_completion(&mut prim);
        assert_eq!(prim.frontier_len(), 0);
        assert_perfect_maze(prim.paths());
    }

    #[test]
    fn test_custom_weight_prefers_rows() {
        // Horizontal paths are always cheaper, so each row is carved fully
        // before any vertical path is opened
        let weight: EdgeWeight = Box::new(|path: &Path, _rng: &mut StdRng| match path.direction {
            Direction::Right => 0,
            Direction::Bottom => 1,
        });
        let (tx, rx) = mpsc::channel::<GridEvent>();
        let mut prim = Prim::with_weight(5, 4, Box::new(tx), Some(1), weight).unwrap();
        prim.initialize();
        run_to_completion(&mut prim);
        assert_perfect_maze(prim.paths());
        let right_open = prim
            .paths()
            .paths()
            .filter(|p| p.direction == Direction::Right && p.status == Status::Empty)
            .count();
        assert_eq!(right_open, 4 * 4);

        let opened = rx
            .try_iter()
            .filter_map(|event| match event {
                GridEvent::Path { path, .. } if path.status == Status::Empty => Some(path),
                _ => None,
            })
            .collect::<Vec<_>>();
        // The first row is finished before the first vertical path opens
        let first_vertical = opened
            .iter()
            .position(|p| p.direction == Direction::Bottom)
            .unwrap();
        assert_eq!(first_vertical, 4);
    }
}
