//! Terminal driver: picks a generator and animates it step by step.

pub mod logging;
mod renderer;

use std::{
    io::{Stdout, Write},
    sync::mpsc,
    time::Duration,
};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{self, KeyCode},
    execute, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

pub use renderer::Renderer;

use crate::{
    generators::{GenerationStatus, Generator, MazeGenerator, create_generator},
    maze::{GridEvent, Status},
};

/// What a key press asks the animation loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    /// Toggle between paused and running
    TogglePause,
    /// Advance to the next visible change
    Iterate,
    /// Advance by a single step, visible or not
    Step,
    /// Run to the end of generation
    FastForward,
    /// Start a new run on the same generator
    Restart,
    /// Leave the animation
    Quit,
}

impl UserAction {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char(' ') => Some(UserAction::TogglePause),
            KeyCode::Char('n') | KeyCode::Right => Some(UserAction::Iterate),
            KeyCode::Char('s') => Some(UserAction::Step),
            KeyCode::Char('f') => Some(UserAction::FastForward),
            KeyCode::Char('r') => Some(UserAction::Restart),
            KeyCode::Esc | KeyCode::Char('q') => Some(UserAction::Quit),
            _ => None,
        }
    }
}

const KEY_HELP: &str = "[space] pause  [n] next  [s] step  [f] finish  [r] restart  [esc] quit";

pub struct App {
    /// Time between two visible generation steps while running
    pub refresh_time: Duration,
    /// Seed for the generators, drawn from the OS when `None`
    pub seed: Option<u64>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            refresh_time: Duration::from_millis(20),
            seed: None,
        }
    }
}

impl App {
    /// Set a panic hook to restore terminal state on panic
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout());
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        Ok(())
    }

    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        execute!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Main application loop. Anything not given up front is asked for interactively.
    pub fn run(
        &self,
        stdout: &mut Stdout,
        generator: Option<Generator>,
        dims: Option<(usize, usize)>,
    ) -> std::io::Result<()> {
        let generator = match generator {
            Some(generator) => generator,
            None => match App::select_from_menu(
                stdout,
                "Select maze generation algorithm (use arrow keys and Enter, or Esc to exit):",
                &Generator::ALL,
            )? {
                Some(generator) => generator,
                None => return Ok(()),
            },
        };
        stdout.execute(style::PrintStyledContent(
            format!("Selected generator: {}\r\n", generator)
                .with(Color::Green)
                .attribute(Attribute::Bold),
        ))?;

        let (width, height) = match dims {
            Some(dims) => dims,
            None => match App::ask_maze_dimensions(stdout)? {
                Some(dims) => dims,
                None => return Ok(()),
            },
        };

        if !Renderer::fits(width, height)? {
            let (needed_width, needed_height) = Renderer::screen_size(width, height);
            execute!(
                stdout,
                style::PrintStyledContent(
                    format!(
                        "Terminal is too small for a {}x{} maze (needs {}x{}). Please resize the terminal.\r\n",
                        width, height, needed_width, needed_height
                    )
                    .with(Color::Yellow)
                    .attribute(Attribute::Bold)
                ),
                style::PrintStyledContent("Press Esc to exit...\r\n".with(Color::Blue).attribute(Attribute::Bold))
            )?;
            App::wait_for_esc()?;
            return Ok(());
        }

        self.animate(generator, width, height)
    }

    /// Drives one generator, rendering every event it emits
    fn animate(&self, generator: Generator, width: usize, height: usize) -> std::io::Result<()> {
        let (grid_event_tx, grid_event_rx) = mpsc::channel::<GridEvent>();
        let mut maze = create_generator(generator, width, height, Box::new(grid_event_tx), self.seed)
            .map_err(std::io::Error::other)?;
        let mut renderer = Renderer::new();
        let mut paused = false;
        let mut iterations = 0usize;

        std::io::stdout().execute(cursor::Hide)?;
        maze.initialize();
        tracing::info!("Started animating {} on a {}x{} grid", generator, width, height);

        loop {
            let mut action = None;
            if event::poll(self.refresh_time)? {
                match event::read()? {
                    event::Event::Key(event::KeyEvent { code, kind, .. })
                        if kind == event::KeyEventKind::Press =>
                    {
                        action = UserAction::from_key(code);
                    }
                    event::Event::Resize(..) => {
                        if Renderer::fits(width, height)? {
                            renderer.draw_grid(maze.paths())?;
                        }
                    }
                    _ => {}
                }
            }

            if let Some(action) = action {
                tracing::debug!("[app loop] user action {:?}", action);
            }
            match action {
                Some(UserAction::Quit) => break,
                Some(UserAction::TogglePause) => paused = !paused,
                Some(UserAction::Iterate) => {
                    maze.compute_one_generation_iteration();
                    iterations += 1;
                }
                Some(UserAction::Step) => {
                    maze.compute_one_step();
                }
                Some(UserAction::FastForward) => {
                    while maze.generation_status() == GenerationStatus::Ongoing {
                        maze.compute_one_generation_iteration();
                        iterations += 1;
                    }
                }
                Some(UserAction::Restart) => {
                    maze.initialize();
                    iterations = 0;
                }
                None if !paused && maze.generation_status() == GenerationStatus::Ongoing => {
                    maze.compute_one_generation_iteration();
                    iterations += 1;
                }
                None => {}
            }

            for event in grid_event_rx.try_iter() {
                renderer.render_event(&event, maze.paths())?;
            }
            renderer.render_status(&App::status_line(
                generator,
                maze.as_ref(),
                iterations,
                paused,
            ))?;
        }

        renderer.finish()?;
        tracing::info!("Stopped animating {} after {} iterations", generator, iterations);
        Ok(())
    }

    fn status_line(
        generator: Generator,
        maze: &dyn MazeGenerator,
        iterations: usize,
        paused: bool,
    ) -> String {
        let grid = maze.paths();
        let state = match maze.generation_status() {
            GenerationStatus::Ongoing if paused => "paused".to_string(),
            GenerationStatus::Ongoing => "generating".to_string(),
            GenerationStatus::Completed => format!(
                "completed, {} of {} cells connected",
                grid.cells().filter(|c| c.status == Status::Empty).count(),
                grid.len()
            ),
            GenerationStatus::Error => "halted on an internal error".to_string(),
            GenerationStatus::Uninitialized => "not started".to_string(),
        };
        format!(
            "{} {}x{} | {} | {} iterations | {}",
            generator,
            grid.width(),
            grid.height(),
            state,
            iterations,
            KEY_HELP
        )
    }

    fn wait_for_esc() -> std::io::Result<()> {
        loop {
            if let event::Event::Key(event::KeyEvent {
                code: KeyCode::Esc, ..
            }) = event::read()?
            {
                return Ok(());
            }
        }
    }

    /// Prompt user for input with validation
    /// Returns None if user cancels input with Esc
    /// Returns Some(T) if user inputs a valid value and presses Enter
    fn prompt_with_validation<F, T>(
        stdout: &mut Stdout,
        prompt: &str,
        validate: F,
    ) -> std::io::Result<Option<T>>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        let mut input = String::new();
        queue!(stdout, cursor::SavePosition)?;

        let value = loop {
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;
            stdout.queue(style::PrintStyledContent(
                prompt.with(Color::Cyan).attribute(Attribute::Bold),
            ))?;

            let validation_result = validate(input.trim());
            let input_color = if validation_result.is_ok() {
                Color::Green
            } else {
                Color::Red
            };
            queue!(
                stdout,
                style::PrintStyledContent(input.as_str().with(input_color)),
                style::Print(" \r\n")
            )?;

            if let Err(msg) = validation_result {
                stdout.queue(style::PrintStyledContent(
                    msg.with(Color::DarkGrey).attribute(Attribute::Dim),
                ))?;
            }
            stdout.flush()?;

            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                match code {
                    KeyCode::Enter => match validate(input.trim()) {
                        Ok(v) => break Some(v),
                        Err(_) => continue,
                    },
                    KeyCode::Char(c) if kind == event::KeyEventKind::Press => {
                        if !c.is_whitespace() && !c.is_control() {
                            input.push(c);
                        }
                    }
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Esc => break None,
                    _ => {}
                }
            }
        };
        execute!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown)
        )?;

        Ok(value)
    }

    /// Largest maze dimension, in cells, that fits in `term_size` terminal units
    fn get_max_maze_size(term_size: u16, cell_size: u16) -> usize {
        let grid_size = (term_size / cell_size) as usize;
        (grid_size.saturating_sub(1) / 2).max(1)
    }

    /// Ask user for maze dimensions
    /// Returns None if user cancels input with Esc
    fn ask_maze_dimensions(stdout: &mut Stdout) -> std::io::Result<Option<(usize, usize)>> {
        stdout.execute(style::PrintStyledContent(
            "Enter maze dimensions, or press Esc to exit. \
Leave empty to fill the terminal.\r\n"
                .with(Color::Blue),
        ))?;

        let validate = |s: &str, is_width: bool| {
            let max_size = match terminal::size() {
                Ok((term_width, _)) if is_width => {
                    App::get_max_maze_size(term_width, Status::CELL_WIDTH)
                }
                Ok((_, term_height)) => {
                    App::get_max_maze_size(term_height.saturating_sub(Renderer::NUM_STATUS_ROWS), 1)
                }
                // Fallback when the terminal size cannot be determined
                Err(_) => u8::MAX as usize,
            };
            if s.is_empty() {
                return Ok(max_size);
            }
            let error_msg = format!("Please enter a number between 1 and {}.", max_size);
            s.parse::<usize>()
                .map_err(|_| error_msg.clone())
                .and_then(|n| match n {
                    1.. if n <= max_size => Ok(n),
                    _ => Err(error_msg),
                })
        };

        let width = match App::prompt_with_validation(stdout, "Width: ", |s| validate(s, true))? {
            Some(w) => w,
            None => return Ok(None),
        };
        stdout.execute(style::PrintStyledContent(
            format!("Width set to {}\r\n", width)
                .with(Color::Green)
                .attribute(Attribute::Bold),
        ))?;

        let height = match App::prompt_with_validation(stdout, "Height: ", |s| validate(s, false))? {
            Some(h) => h,
            None => return Ok(None),
        };
        stdout.execute(style::PrintStyledContent(
            format!("Height set to {}\r\n", height)
                .with(Color::Green)
                .attribute(Attribute::Bold),
        ))?;

        Ok(Some((width, height)))
    }

    /// Present a menu of options to the user and let them select one using arrow keys
    /// Returns None if user cancels input with Esc
    fn select_from_menu<T: std::fmt::Display + Copy>(
        stdout: &mut Stdout,
        prompt: &str,
        options: &[T],
    ) -> std::io::Result<Option<T>> {
        if options.is_empty() {
            return Ok(None);
        }

        queue!(stdout, cursor::Hide, cursor::SavePosition)?;

        let mut selected = 0;

        let selected_option = loop {
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;
            stdout.queue(style::PrintStyledContent(prompt.with(Color::Yellow)))?;

            for (i, option) in options.iter().enumerate() {
                if i == selected {
                    stdout.queue(style::SetAttribute(Attribute::Reverse))?;
                }
                stdout.queue(style::Print(format!("\r\n{}", option)))?;
                if i == selected {
                    stdout.queue(style::SetAttribute(Attribute::NoReverse))?;
                }
            }
            stdout.queue(style::Print("\r\n"))?;
            stdout.flush()?;

            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if kind != event::KeyEventKind::Press {
                    continue;
                }
                match code {
                    KeyCode::Up => {
                        selected = match selected {
                            0 => options.len() - 1,
                            _ => selected - 1,
                        };
                    }
                    KeyCode::Down => {
                        selected = if selected >= options.len() - 1 {
                            0
                        } else {
                            selected + 1
                        };
                    }
                    KeyCode::Enter => break Some(options[selected]),
                    KeyCode::Esc => break None,
                    _ => {}
                }
            }
        };
        execute!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
            cursor::Show
        )?;

        Ok(selected_option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::NoopObserver;

    #[test]
    fn test_key_bindings() {
        assert_eq!(UserAction::from_key(KeyCode::Char(' ')), Some(UserAction::TogglePause));
        assert_eq!(UserAction::from_key(KeyCode::Right), Some(UserAction::Iterate));
        assert_eq!(UserAction::from_key(KeyCode::Esc), Some(UserAction::Quit));
        assert_eq!(UserAction::from_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_max_maze_size() {
        // 81 columns of 2 characters hold 40 grid units, 19 cells
        assert_eq!(App::get_max_maze_size(81, 2), 19);
        assert_eq!(App::get_max_maze_size(25, 1), 12);
        assert_eq!(App::get_max_maze_size(0, 1), 1);
    }

    #[test]
    fn test_status_line() {
        let mut maze = create_generator(Generator::Wilson, 3, 2, Box::new(NoopObserver), Some(1)).unwrap();
        maze.initialize();
        let line = App::status_line(Generator::Wilson, maze.as_ref(), 0, true);
        assert!(line.starts_with("Wilson's Algorithm 3x2 | paused"));
        while maze.generation_status() == GenerationStatus::Ongoing {
            maze.compute_one_generation_iteration();
        }
        let line = App::status_line(Generator::Wilson, maze.as_ref(), 9, false);
        assert!(line.contains("completed, 6 of 6 cells connected | 9 iterations"));
    }
}
