use super::cell::{Cell, Coord, Direction, Path, Status};

/// One grid position: the cell plus the two paths it owns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub cell: Cell,
    pub right: Option<Path>,
    pub bottom: Option<Path>,
}

/// An in-bounds neighbor of a cell and the path connecting the two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub cell: Cell,
    pub path: Path,
}

/// Compass side used by [`Grid::ordered_neighbors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    /// North first, then clockwise.
    pub const CLOCKWISE: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];
}

/// `width x height` arena of cells, each owning its right and bottom path.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    slots: Box<[Slot]>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Creates a grid with every cell and path set to `Filled`.
    pub fn new(width: usize, height: usize) -> Self {
        let mut grid = Grid {
            slots: Box::new([]),
            width,
            height,
        };
        grid.reset_paths(Status::Filled, Status::Filled);
        grid
    }

    /// Rebuilds every slot. Cells in the last column get no right path and
    /// cells in the last row get no bottom path.
    pub fn reset_paths(&mut self, cell_status: Status, path_status: Status) {
        let (width, height) = (self.width, self.height);
        self.slots = (0..height)
            .flat_map(|row| (0..width).map(move |column| (row, column)))
            .map(|(row, column)| Slot {
                cell: Cell {
                    row,
                    column,
                    status: cell_status,
                },
                right: (column + 1 < width).then_some(Path {
                    row,
                    column,
                    direction: Direction::Right,
                    status: path_status,
                }),
                bottom: (row + 1 < height).then_some(Path {
                    row,
                    column,
                    direction: Direction::Bottom,
                    status: path_status,
                }),
            })
            .collect();
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.height && coord.1 < self.width
    }

    fn ravel_index(&self, coord: Coord) -> usize {
        coord.0 * self.width + coord.1
    }

    /// Flat index of a cell, usable for per-cell side tables.
    pub fn index_of(&self, coord: Coord) -> usize {
        self.ravel_index(coord)
    }

    pub fn slot(&self, coord: Coord) -> Option<&Slot> {
        self.is_in_bounds(coord)
            .then(|| &self.slots[self.ravel_index(coord)])
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.slot(coord).map(|slot| &slot.cell)
    }

    pub fn path(&self, owner: Coord, direction: Direction) -> Option<&Path> {
        self.slot(owner).and_then(|slot| match direction {
            Direction::Right => slot.right.as_ref(),
            Direction::Bottom => slot.bottom.as_ref(),
        })
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.slots.iter().map(|slot| &slot.cell)
    }

    /// Every path of the grid, right path before bottom path, in row-major order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.slots
            .iter()
            .flat_map(|slot| slot.right.iter().chain(slot.bottom.iter()))
    }

    /// Sets the status of a cell. Returns the updated cell only if the status changed.
    pub fn set_cell_status(&mut self, coord: Coord, status: Status) -> Option<Cell> {
        if !self.is_in_bounds(coord) {
            return None;
        }
        let idx = self.ravel_index(coord);
        let cell = &mut self.slots[idx].cell;
        if cell.status == status {
            return None;
        }
        cell.status = status;
        Some(*cell)
    }

    /// Sets the status of a path. Returns the updated path only if it exists
    /// and its status changed.
    pub fn set_path_status(
        &mut self,
        owner: Coord,
        direction: Direction,
        status: Status,
    ) -> Option<Path> {
        if !self.is_in_bounds(owner) {
            return None;
        }
        let idx = self.ravel_index(owner);
        let slot = &mut self.slots[idx];
        let path = match direction {
            Direction::Right => slot.right.as_mut(),
            Direction::Bottom => slot.bottom.as_mut(),
        }?;
        if path.status == status {
            return None;
        }
        path.status = status;
        Some(*path)
    }

    /// Cell on the far side of `path`, or `None` if the path would leave the grid.
    pub fn destination(&self, path: &Path) -> Option<Coord> {
        if !self.is_in_bounds(path.owner()) {
            return None;
        }
        let far = path.far_end();
        self.is_in_bounds(far).then_some(far)
    }

    /// Neighbor in the given compass direction, with the connecting path
    /// fetched from whichever of the two cells owns it.
    pub fn neighbor(&self, coord: Coord, side: Side) -> Option<Neighbor> {
        if !self.is_in_bounds(coord) {
            return None;
        }
        let (row, column) = coord;
        let (other, owner, direction) = match side {
            Side::North => {
                let up = (row.checked_sub(1)?, column);
                (up, up, Direction::Bottom)
            }
            Side::West => {
                let left = (row, column.checked_sub(1)?);
                (left, left, Direction::Right)
            }
            Side::South => ((row + 1, column), coord, Direction::Bottom),
            Side::East => ((row, column + 1), coord, Direction::Right),
        };
        let cell = *self.cell(other)?;
        let path = *self.path(owner, direction)?;
        Some(Neighbor { cell, path })
    }

    /// In-bounds neighbors of a cell in the order up, left, down, right.
    pub fn neighbors(&self, coord: Coord) -> Vec<Neighbor> {
        [Side::North, Side::West, Side::South, Side::East]
            .into_iter()
            .filter_map(|side| self.neighbor(coord, side))
            .collect()
    }

    /// Neighbors starting North and going clockwise; out-of-bounds sides are `None`.
    pub fn ordered_neighbors(&self, coord: Coord) -> [Option<Neighbor>; 4] {
        Side::CLOCKWISE.map(|side| self.neighbor(coord, side))
    }

    /// Number of paths currently open.
    pub fn open_path_count(&self) -> usize {
        self.paths().filter(|path| path.status == Status::Empty).count()
    }

    /// Whether the open paths form a spanning tree over all cells.
    pub fn is_spanning_tree(&self) -> bool {
        if self.is_empty() || self.open_path_count() != self.len() - 1 {
            return false;
        }
        // With exactly n - 1 edges, connectivity implies acyclicity
        let mut seen = vec![false; self.len()];
        let mut stack = vec![(0, 0)];
        seen[0] = true;
        let mut reached = 1;
        while let Some(coord) = stack.pop() {
            for neighbor in self.neighbors(coord) {
                let idx = self.ravel_index(neighbor.cell.coord());
                if neighbor.path.status == Status::Empty && !seen[idx] {
                    seen[idx] = true;
                    reached += 1;
                    stack.push(neighbor.cell.coord());
                }
            }
        }
        reached == self.len()
    }

    /// Whether any wall post around `post` is still attached to a wall.
    ///
    /// Posts sit at the corners between four cells, `post = (r, c)` being the
    /// corner above-left of cell `(r, c)`. Border posts are always live.
    pub fn is_live_post(&self, post: Coord) -> bool {
        let (r, c) = post;
        if r == 0 || c == 0 || r >= self.height || c >= self.width {
            return true;
        }
        let is_wall = |owner: Coord, direction| {
            self.path(owner, direction)
                .is_none_or(|path| path.status.is_wall())
        };
        is_wall((r - 1, c - 1), Direction::Right)
            || is_wall((r, c - 1), Direction::Right)
            || is_wall((r - 1, c - 1), Direction::Bottom)
            || is_wall((r - 1, c), Direction::Bottom)
    }

    /// Rasterizes the grid into a `(2 * height + 1) x (2 * width + 1)` wall
    /// matrix, `true` meaning wall.
    ///
    /// Cells land on odd/odd positions, paths between their two cells, and
    /// posts plus the outer border on even positions. A post is open only
    /// when all four paths touching it are open.
    pub fn to_wall_matrix(&self) -> Vec<Vec<bool>> {
        let mut matrix = vec![vec![true; 2 * self.width + 1]; 2 * self.height + 1];
        for slot in self.slots.iter() {
            let (row, column) = slot.cell.coord();
            matrix[2 * row + 1][2 * column + 1] = slot.cell.status.is_wall();
            if let Some(right) = slot.right {
                matrix[2 * row + 1][2 * column + 2] = right.status.is_wall();
            }
            if let Some(bottom) = slot.bottom {
                matrix[2 * row + 2][2 * column + 1] = bottom.status.is_wall();
            }
        }
        for r in 1..self.height {
            for c in 1..self.width {
                matrix[2 * r][2 * c] = self.is_live_post((r, c));
            }
        }
        matrix
    }
}
