use crate::{
    error::{ConfigError, GenerationError},
    generators::{GenerationStatus, GeneratorBase, MazeGenerator},
    maze::{Direction, Grid, Observer, Status},
};

/// Half-open rectangle of cells `[row_min, row_max) x [col_min, col_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub row_min: usize,
    pub row_max: usize,
    pub col_min: usize,
    pub col_max: usize,
}

impl Region {
    pub fn rows(&self) -> usize {
        self.row_max - self.row_min
    }

    pub fn columns(&self) -> usize {
        self.col_max - self.col_min
    }
}

/// A straight run of paths between two quadrants, all sharing one direction.
#[derive(Debug, Clone, Copy)]
struct Segment {
    direction: Direction,
    /// Row (for `Bottom`) or column (for `Right`) of the owning cells.
    fixed: usize,
    /// Range of columns (for `Bottom`) or rows (for `Right`) along the wall.
    start: usize,
    end: usize,
}

impl Segment {
    fn owner(&self, offset: usize) -> (usize, usize) {
        match self.direction {
            Direction::Bottom => (self.fixed, offset),
            Direction::Right => (offset, self.fixed),
        }
    }
}

/// Randomized recursive subdivision.
///
/// Starts from a fully open grid and walls regions off. Each region is split
/// into four quadrants by one cut row and one cut column. Three of the four
/// separating wall segments get a single opening, which keeps the quadrants
/// joined as a tree.
pub struct RecurDiv {
    base: GeneratorBase,
    regions: Vec<Region>,
}

impl RecurDiv {
    pub fn new(
        width: usize,
        height: usize,
        observer: Box<dyn Observer>,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base: GeneratorBase::new("recursive-division", width, height, observer, seed)?,
            regions: Vec::new(),
        })
    }

    /// Regions still waiting to be divided.
    pub fn pending(&self) -> &[Region] {
        &self.regions
    }

    fn seal(&mut self, segment: &Segment) -> Result<(), GenerationError> {
        for offset in segment.start..segment.end {
            self.base
                .try_set_path(segment.owner(offset), segment.direction, Status::Filled, true)?;
        }
        Ok(())
    }

    fn step(&mut self) -> Result<bool, GenerationError> {
        let Some(region) = self.regions.pop() else {
            return Ok(self.base.finish());
        };
        if region.rows() < 2 || region.columns() < 2 {
            // A single row or column is already a tree
            return Ok(false);
        }

        // Walls go below `cut_row - 1` and right of `cut_col - 1`
        let cut_row = self
            .base
            .rng_range(region.row_min + 1, region.row_max);
        let cut_col = self
            .base
            .rng_range(region.col_min + 1, region.col_max);

        self.regions.extend([
            Region {
                row_max: cut_row,
                col_max: cut_col,
                ..region
            },
            Region {
                row_max: cut_row,
                col_min: cut_col,
                ..region
            },
            Region {
                row_min: cut_row,
                col_max: cut_col,
                ..region
            },
            Region {
                row_min: cut_row,
                col_min: cut_col,
                ..region
            },
        ]);

        let segments = [
            // Top-left | top-right
            Segment {
                direction: Direction::Right,
                fixed: cut_col - 1,
                start: region.row_min,
                end: cut_row,
            },
            // Top-right / bottom-right
            Segment {
                direction: Direction::Bottom,
                fixed: cut_row - 1,
                start: cut_col,
                end: region.col_max,
            },
            // Bottom-left | bottom-right
            Segment {
                direction: Direction::Right,
                fixed: cut_col - 1,
                start: cut_row,
                end: region.row_max,
            },
            // Top-left / bottom-left
            Segment {
                direction: Direction::Bottom,
                fixed: cut_row - 1,
                start: region.col_min,
                end: cut_col,
            },
        ];
        for segment in &segments {
            self.seal(segment)?;
        }

        let closed = self.base.random_index(segments.len());
        for (i, segment) in segments.iter().enumerate() {
            if i == closed {
                continue;
            }
            let opening = self.base.rng_range(segment.start, segment.end);
            self.base
                .try_set_path(segment.owner(opening), segment.direction, Status::Empty, true)?;
        }
        tracing::debug!(
            "[recursive-division] split {:?} at row {} column {}, segment {} closed",
            region,
            cut_row,
            cut_col,
            closed
        );
        Ok(true)
    }
}

impl MazeGenerator for RecurDiv {
    fn initialize(&mut self) {
        self.base.reset(Status::Empty, Status::Empty);
        self.regions.clear();
        let whole = Region {
            row_min: 0,
            row_max: self.base.height(),
            col_min: 0,
            col_max: self.base.width(),
        };
        // A grid one cell wide is open from the start and nothing is left to divide
        if whole.rows() > 1 && whole.columns() > 1 {
            self.regions.push(whole);
        }
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
