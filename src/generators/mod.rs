//! Step-driven maze generators.
//!
//! Every generator implements [`MazeGenerator`]: call `initialize()` once, then
//! drive it with `compute_one_step()` or `compute_one_generation_iteration()`
//! until [`GenerationStatus`] is no longer `Ongoing`.

use rand::{SeedableRng, rngs::StdRng};

pub mod base;
pub mod dfs;
pub mod heap;
pub mod kruskal;
pub mod prim;
pub mod random_traversal;
pub mod recur_div;
pub mod wilson;

use crate::{error::ConfigError, maze::Grid, maze::Observer};
pub use base::GeneratorBase;
pub use dfs::Dfs;
pub use heap::Heap;
pub use kruskal::Kruskal;
pub use prim::{EdgeWeight, Prim};
pub use random_traversal::RandomTraversal;
pub use recur_div::RecurDiv;
pub use wilson::Wilson;

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Lifecycle of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationStatus {
    #[default]
    Uninitialized,
    Ongoing,
    Completed,
    /// An internal consistency check failed. Terminal until `initialize()`.
    Error,
}

/// The execution contract shared by all generators.
pub trait MazeGenerator {
    /// Resets the grid and all private working state, and starts a new run.
    fn initialize(&mut self);

    /// Advances the run by one unit of work.
    ///
    /// Returns `true` when the step produced a visible change worth rendering,
    /// when it completed the run, or when the run is no longer ongoing.
    /// Returns `false` for pure bookkeeping; the caller should step again.
    fn compute_one_step(&mut self) -> bool;

    /// Steps until the next visible change.
    fn compute_one_generation_iteration(&mut self) {
        while !self.compute_one_step() {}
    }

    fn generation_status(&self) -> GenerationStatus;

    /// The grid, for bulk reads.
    fn paths(&self) -> &Grid;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    Dfs,
    Kruskal,
    RandomTraversal,
    Prim,
    RecurDiv,
    Wilson,
}

impl Generator {
    pub const ALL: [Generator; 6] = [
        Generator::Dfs,
        Generator::Kruskal,
        Generator::RandomTraversal,
        Generator::Prim,
        Generator::RecurDiv,
        Generator::Wilson,
    ];

    /// Short name accepted by [`str::parse`].
    pub fn key(&self) -> &'static str {
        match self {
            Generator::Dfs => "dfs",
            Generator::Kruskal => "kruskal",
            Generator::RandomTraversal => "random-traversal",
            Generator::Prim => "prim",
            Generator::RecurDiv => "recursive-division",
            Generator::Wilson => "wilson",
        }
    }
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::Dfs => write!(f, "Randomized Depth-First Search (DFS)"),
            Generator::Kruskal => write!(f, "Kruskal's Algorithm"),
            Generator::RandomTraversal => write!(f, "Random Traversal"),
            Generator::Prim => write!(f, "Prim's Algorithm"),
            Generator::RecurDiv => write!(f, "Recursive Division"),
            Generator::Wilson => write!(f, "Wilson's Algorithm"),
        }
    }
}

impl std::str::FromStr for Generator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Generator::ALL
            .into_iter()
            .find(|generator| generator.key() == wanted)
            .ok_or_else(|| ConfigError::UnknownGenerator(s.to_string()))
    }
}

/// Builds the generator selected by `generator`.
pub fn create_generator(
    generator: Generator,
    width: usize,
    height: usize,
    observer: Box<dyn Observer>,
    seed: Option<u64>,
) -> Result<Box<dyn MazeGenerator>, ConfigError> {
    tracing::debug!("Creating {} for a {}x{} grid", generator, width, height);
    Ok(match generator {
        Generator::Dfs => Box::new(Dfs::new(width, height, observer, seed)?),
        Generator::Kruskal => Box::new(Kruskal::new(width, height, observer, seed)?),
        Generator::RandomTraversal => {
            Box::new(RandomTraversal::new(width, height, observer, seed)?)
        }
        Generator::Prim => Box::new(Prim::new(width, height, observer, seed)?),
        Generator::RecurDiv => Box::new(RecurDiv::new(width, height, observer, seed)?),
        Generator::Wilson => Box::new(Wilson::new(width, height, observer, seed)?),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::maze::{Callbacks, Cell, GridEvent, NoopObserver, Path, Status};
    use std::{cell::RefCell, rc::Rc, sync::mpsc};

    /// Drives a generator to the end of its run, counting visible iterations.
    pub(crate) fn run_to_completion(generator: &mut dyn MazeGenerator) -> usize {
        let mut iterations = 0;
        while generator.generation_status() == GenerationStatus::Ongoing {
            generator.compute_one_generation_iteration();
            iterations += 1;
            assert!(iterations < 1_000_000, "generation did not terminate");
        }
        iterations
    }

    pub(crate) fn assert_perfect_maze(grid: &Grid) {
        assert_eq!(grid.open_path_count(), grid.len() - 1);
        assert!(grid.is_spanning_tree());
        assert!(grid.cells().all(|c| c.status == Status::Empty));
        assert!(grid.paths().all(|p| p.status != Status::Focused));
    }

    #[test]
    fn test_every_generator_builds_spanning_trees() {
        let sizes = [(1, 1), (1, 2), (2, 1), (2, 2), (1, 7), (6, 1), (3, 5), (8, 8), (13, 4)];
        for generator in Generator::ALL {
            for (seed, &(width, height)) in sizes.iter().enumerate() {
                let mut maze =
                    create_generator(generator, width, height, Box::new(NoopObserver), Some(seed as u64))
                        .unwrap();
                maze.initialize();
                run_to_completion(maze.as_mut());
                assert_eq!(
                    maze.generation_status(),
                    GenerationStatus::Completed,
                    "{} on {}x{}",
                    generator,
                    width,
                    height
                );
                assert_perfect_maze(maze.paths());
            }
        }
    }

    #[test]
    fn test_two_by_two_has_three_open_paths() {
        for generator in Generator::ALL {
            for seed in 0..10 {
                let mut maze =
                    create_generator(generator, 2, 2, Box::new(NoopObserver), Some(seed)).unwrap();
                maze.initialize();
                run_to_completion(maze.as_mut());
                assert_eq!(maze.paths().paths().count(), 4);
                assert_eq!(maze.paths().open_path_count(), 3);
                assert!(maze.paths().is_spanning_tree());
            }
        }
    }

    #[test]
    fn test_one_by_one_completes_on_first_step() {
        for generator in Generator::ALL {
            let mut maze = create_generator(generator, 1, 1, Box::new(NoopObserver), Some(3)).unwrap();
            maze.initialize();
            assert!(maze.compute_one_step());
            assert_eq!(maze.generation_status(), GenerationStatus::Completed);
            assert_eq!(maze.paths().open_path_count(), 0);
            assert_eq!(maze.paths().cell((0, 0)).map(|c| c.status), Some(Status::Empty));
        }
    }

    #[test]
    fn test_reinitialize_discards_previous_run() {
        for generator in Generator::ALL {
            let mut maze = create_generator(generator, 9, 7, Box::new(NoopObserver), Some(11)).unwrap();
            maze.initialize();
            for _ in 0..15 {
                maze.compute_one_generation_iteration();
            }
            maze.initialize();
            maze.initialize();
            run_to_completion(maze.as_mut());
            assert_eq!(maze.generation_status(), GenerationStatus::Completed);
            assert_perfect_maze(maze.paths());

            // And once more after a completed run
            maze.initialize();
            assert_eq!(maze.generation_status(), GenerationStatus::Ongoing);
            run_to_completion(maze.as_mut());
            assert_perfect_maze(maze.paths());
        }
    }

    #[test]
    fn test_same_seed_same_events() {
        let record = |generator: Generator| {
            let (tx, rx) = mpsc::channel::<GridEvent>();
            let mut maze = create_generator(generator, 10, 6, Box::new(tx), Some(42)).unwrap();
            maze.initialize();
            run_to_completion(maze.as_mut());
            rx.try_iter().collect::<Vec<_>>()
        };
        for generator in Generator::ALL {
            let first = record(generator);
            let second = record(generator);
            assert!(!first.is_empty());
            assert_eq!(first, second, "{} is not deterministic", generator);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let grid_for = |seed| {
            let mut maze = create_generator(Generator::Dfs, 12, 12, Box::new(NoopObserver), Some(seed))
                .unwrap();
            maze.initialize();
            run_to_completion(maze.as_mut());
            maze.paths().clone()
        };
        assert_ne!(grid_for(1), grid_for(2));
    }

    #[test]
    fn test_events_replay_to_final_grid() {
        for generator in Generator::ALL {
            let (tx, rx) = mpsc::channel::<GridEvent>();
            let mut maze = create_generator(generator, 7, 5, Box::new(tx), Some(5)).unwrap();
            maze.initialize();
            run_to_completion(maze.as_mut());

            let mut replay = Grid::new(7, 5);
            for event in rx.try_iter() {
                match event {
                    GridEvent::Initial {
                        cell_status,
                        path_status,
                        ..
                    } => replay.reset_paths(cell_status, path_status),
                    GridEvent::Cell(cell) => {
                        replay.set_cell_status(cell.coord(), cell.status);
                    }
                    GridEvent::Path { path, .. } => {
                        replay.set_path_status(path.owner(), path.direction, path.status);
                    }
                }
            }
            assert_eq!(&replay, maze.paths(), "{} events do not replay", generator);
        }
    }

    /// A generator whose plain callbacks are copied into a separate grid.
    fn mirrored(
        generator: Generator,
        width: usize,
        height: usize,
        seed: u64,
    ) -> (Box<dyn MazeGenerator>, Rc<RefCell<Grid>>) {
        let mirror = Rc::new(RefCell::new(Grid::new(width, height)));
        let (cells, paths) = (Rc::clone(&mirror), Rc::clone(&mirror));
        let observer = Callbacks::new(
            move |cell: &Cell| {
                cells.borrow_mut().set_cell_status(cell.coord(), cell.status);
            },
            move |path: &Path, _dead_walls: bool| {
                paths
                    .borrow_mut()
                    .set_path_status(path.owner(), path.direction, path.status);
            },
        );
        let maze = create_generator(generator, width, height, Box::new(observer), Some(seed)).unwrap();
        (maze, mirror)
    }

    #[test]
    fn test_callbacks_follow_reinitialize() {
        for generator in Generator::ALL {
            let (mut maze, mirror) = mirrored(generator, 4, 3, 12);
            maze.initialize();
            assert_eq!(*mirror.borrow(), *maze.paths(), "{} after initialize", generator);
            run_to_completion(maze.as_mut());
            assert_eq!(*mirror.borrow(), *maze.paths(), "{} after completion", generator);
            maze.initialize();
            assert_eq!(*mirror.borrow(), *maze.paths(), "{} after restart", generator);
            run_to_completion(maze.as_mut());
            assert_eq!(*mirror.borrow(), *maze.paths(), "{} after second run", generator);
        }
    }

    #[test]
    fn test_callbacks_see_recursive_division_open_grid() {
        let (mut maze, mirror) = mirrored(Generator::RecurDiv, 5, 4, 3);
        maze.initialize();
        let mirror = mirror.borrow();
        assert!(mirror.cells().all(|c| c.status == Status::Empty));
        assert_eq!(mirror.open_path_count(), mirror.paths().count());
    }

    #[test]
    fn test_steps_before_initialize_are_noops() {
        for generator in Generator::ALL {
            let mut maze = create_generator(generator, 3, 3, Box::new(NoopObserver), Some(0)).unwrap();
            assert_eq!(maze.generation_status(), GenerationStatus::Uninitialized);
            assert!(maze.compute_one_step());
            maze.compute_one_generation_iteration();
            assert_eq!(maze.generation_status(), GenerationStatus::Uninitialized);
        }
    }

    #[test]
    fn test_steps_after_completion_are_noops() {
        let (tx, rx) = mpsc::channel::<GridEvent>();
        let mut maze = create_generator(Generator::Kruskal, 4, 4, Box::new(tx), Some(8)).unwrap();
        maze.initialize();
        run_to_completion(maze.as_mut());
        let before = rx.try_iter().count();
        assert!(before > 0);
        assert!(maze.compute_one_step());
        assert_eq!(rx.try_iter().count(), 0);
        assert_eq!(maze.generation_status(), GenerationStatus::Completed);
    }

    #[test]
    fn test_factory_rejects_bad_dimensions() {
        for generator in Generator::ALL {
            let err = create_generator(generator, 0, 4, Box::new(NoopObserver), None)
                .err()
                .unwrap();
            assert_eq!(err, ConfigError::InvalidDimensions { width: 0, height: 4 });
        }
    }

    #[test]
    fn test_parse_generator() {
        for generator in Generator::ALL {
            assert_eq!(generator.key().parse::<Generator>(), Ok(generator));
        }
        assert_eq!(" Wilson ".parse::<Generator>(), Ok(Generator::Wilson));
        assert_eq!(
            "eller".parse::<Generator>(),
            Err(ConfigError::UnknownGenerator("eller".to_string()))
        );
    }
}
