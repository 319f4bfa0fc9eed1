use std::io::{Stdout, Write};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::maze::{Coord, Direction, Grid, GridEvent, Path, Status};

/// Draws a generator's grid on the terminal from the events it emits.
///
/// The screen uses the classic `(2 * height + 1) x (2 * width + 1)` layout:
/// cells on odd/odd positions, paths between them, wall posts on even/even
/// positions, each position [`Status::CELL_WIDTH`] characters wide.
pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    /// Current maze dimensions in cells (width, height)
    dims: Option<(usize, usize)>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Rows reserved below the maze for the status line
    pub const NUM_STATUS_ROWS: u16 = 2;

    pub fn new() -> Self {
        Self {
            stdout: std::io::stdout(),
            dims: None,
        }
    }

    /// Terminal columns and rows needed to display a maze of the given size.
    pub fn screen_size(width: usize, height: usize) -> (usize, usize) {
        (
            (2 * width + 1) * Status::CELL_WIDTH as usize,
            2 * height + 1 + Self::NUM_STATUS_ROWS as usize,
        )
    }

    /// Whether the terminal is large enough to display a maze of the given size.
    pub fn fits(width: usize, height: usize) -> std::io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        let (needed_width, needed_height) = Renderer::screen_size(width, height);
        Ok(term_width as usize >= needed_width && term_height as usize >= needed_height)
    }

    fn draw_at(&mut self, x: usize, y: usize, status: Status) -> std::io::Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(x as u16 * Status::CELL_WIDTH, y as u16),
            style::Print(status)
        )
    }

    fn draw_post(&mut self, post: Coord, grid: &Grid) -> std::io::Result<()> {
        let status = if grid.is_live_post(post) {
            Status::Filled
        } else {
            Status::Empty
        };
        self.draw_at(2 * post.1, 2 * post.0, status)
    }

    /// Screen position of a path, in grid units.
    fn path_position(path: &Path) -> (usize, usize) {
        match path.direction {
            Direction::Right => (2 * path.column + 2, 2 * path.row + 1),
            Direction::Bottom => (2 * path.column + 1, 2 * path.row + 2),
        }
    }

    /// Posts at both ends of a path.
    fn path_posts(path: &Path) -> [Coord; 2] {
        match path.direction {
            Direction::Right => [(path.row, path.column + 1), (path.row + 1, path.column + 1)],
            Direction::Bottom => [(path.row + 1, path.column), (path.row + 1, path.column + 1)],
        }
    }

    /// Redraws the whole maze from the grid's current state.
    pub fn draw_grid(&mut self, grid: &Grid) -> std::io::Result<()> {
        self.dims = Some((grid.width(), grid.height()));
        self.stdout.queue(terminal::Clear(ClearType::All))?;
        for row in 0..=grid.height() {
            for column in 0..=grid.width() {
                self.draw_post((row, column), grid)?;
            }
        }
        for slot in grid.slots() {
            let (row, column) = slot.cell.coord();
            self.draw_at(2 * column + 1, 2 * row + 1, slot.cell.status)?;
            // Border walls have no path behind them
            if slot.right.is_none() {
                self.draw_at(2 * column + 2, 2 * row + 1, Status::Filled)?;
            }
            if slot.bottom.is_none() {
                self.draw_at(2 * column + 1, 2 * row + 2, Status::Filled)?;
            }
            if row == 0 {
                self.draw_at(2 * column + 1, 0, Status::Filled)?;
            }
            if column == 0 {
                self.draw_at(0, 2 * row + 1, Status::Filled)?;
            }
            for path in slot.right.iter().chain(slot.bottom.iter()) {
                let (x, y) = Renderer::path_position(path);
                self.draw_at(x, y, path.status)?;
            }
        }
        self.stdout.flush()
    }

    /// Applies a single grid event to the screen. `grid` is the generator's
    /// current grid, used to resolve wall posts.
    pub fn render_event(&mut self, event: &GridEvent, grid: &Grid) -> std::io::Result<()> {
        match event {
            GridEvent::Initial { .. } => self.draw_grid(grid)?,
            GridEvent::Cell(cell) => {
                self.draw_at(2 * cell.column + 1, 2 * cell.row + 1, cell.status)?;
            }
            GridEvent::Path {
                path,
                update_dead_walls,
            } => {
                let (x, y) = Renderer::path_position(path);
                self.draw_at(x, y, path.status)?;
                if *update_dead_walls {
                    for post in Renderer::path_posts(path) {
                        self.draw_post(post, grid)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Prints the status line below the maze, truncated to the terminal width.
    pub fn render_status(&mut self, text: &str) -> std::io::Result<()> {
        let Some((_, height)) = self.dims else {
            return Ok(());
        };
        let (term_width, _) = terminal::size()?;
        let (line, _) = text.unicode_truncate(term_width as usize);
        queue!(
            self.stdout,
            cursor::MoveTo(0, (2 * height + 1) as u16),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(line.with(Color::Yellow).attribute(Attribute::Bold)),
        )?;
        self.stdout.flush()
    }

    /// Moves the cursor below the maze, e.g. before leaving.
    pub fn finish(&mut self) -> std::io::Result<()> {
        if let Some((_, height)) = self.dims {
            queue!(
                self.stdout,
                cursor::MoveTo(0, (2 * height + 1) as u16 + Self::NUM_STATUS_ROWS),
                cursor::Show
            )?;
        }
        self.stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_layout() {
        let right = Path {
            row: 1,
            column: 2,
            direction: Direction::Right,
            status: Status::Empty,
        };
        assert_eq!(Renderer::path_position(&right), (6, 3));
        assert_eq!(Renderer::path_posts(&right), [(1, 3), (2, 3)]);
        let bottom = Path {
            direction: Direction::Bottom,
            ..right
        };
        assert_eq!(Renderer::path_position(&bottom), (5, 4));
        assert_eq!(Renderer::path_posts(&bottom), [(2, 2), (2, 3)]);
    }

    #[test]
    fn test_screen_size() {
        assert_eq!(Renderer::screen_size(3, 2), (14, 5 + Renderer::NUM_STATUS_ROWS as usize));
    }
}
