use crossterm::style::{Color, Stylize};

use std::fmt;

/// Grid coordinate as `(row, column)`.
pub type Coord = (usize, usize);

/// Tri-state shared by cells and paths.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Wall, or a cell not yet part of the maze.
    #[default]
    Filled,
    /// Transient marker for cells and paths under consideration.
    Focused,
    /// Open passage, or a cell committed to the maze.
    Empty,
}

impl Status {
    /// The width of each status glyph when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;

    /// Whether a renderer should draw this as a wall.
    pub fn is_wall(self) -> bool {
        self != Status::Empty
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Status::Filled => "⬜".with(Color::White),
            Status::Focused => "🟪".with(Color::Magenta),
            Status::Empty => "  ".with(Color::Reset),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Status::CELL_WIDTH as usize,
                "Each status glyph must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Which neighbor a path leads to, relative to the cell owning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards `(row, column + 1)`.
    Right,
    /// Towards `(row + 1, column)`.
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
    pub status: Status,
}

impl Cell {
    pub fn coord(&self) -> Coord {
        (self.row, self.column)
    }
}

/// A potential connection between a cell and its right or bottom neighbor.
///
/// Paths are plain data: `(row, column)` names the owning cell and `direction`
/// says which of its two owned neighbors the path leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Path {
    pub row: usize,
    pub column: usize,
    pub direction: Direction,
    pub status: Status,
}

impl Path {
    /// Coordinate of the cell owning this path.
    pub fn owner(&self) -> Coord {
        (self.row, self.column)
    }

    /// Coordinate of the cell on the far side, without bounds checking.
    pub fn far_end(&self) -> Coord {
        match self.direction {
            Direction::Right => (self.row, self.column + 1),
            Direction::Bottom => (self.row + 1, self.column),
        }
    }
}
