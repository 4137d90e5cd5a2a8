pub mod keys;
pub mod view;

pub use keys::{is_quit_key, spawn_key_watcher};
pub use view::Screen;

use crate::table::Table;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;

/// Where the loop driver sends each refreshed table
pub trait RenderSink {
    /// Show a message while no snapshot has been merged yet
    fn present_placeholder(&mut self, message: &str) -> io::Result<()>;

    /// Replace the displayed table
    fn present(&mut self, table: &Table) -> io::Result<()>;
}

/// Live dashboard drawn with ratatui
pub struct TuiSink<B: Backend> {
    terminal: Terminal<B>,
    show_banner: bool,
    tick: usize,
}

impl<B: Backend> TuiSink<B> {
    pub fn new(terminal: Terminal<B>, show_banner: bool) -> Self {
        log::debug!("[tui] new: show_banner={}", show_banner);
        Self {
            terminal,
            show_banner,
            tick: 0,
        }
    }

    /// Hand the terminal back for teardown
    pub fn into_terminal(self) -> Terminal<B> {
        self.terminal
    }

    fn draw(&mut self, screen: &Screen) -> io::Result<()> {
        let show_banner = self.show_banner;
        let tick = self.tick;
        self.tick = self.tick.wrapping_add(1);

        self.terminal.draw(|f| view::draw(f, screen, show_banner, tick))?;
        Ok(())
    }
}

impl<B: Backend> RenderSink for TuiSink<B> {
    fn present_placeholder(&mut self, message: &str) -> io::Result<()> {
        self.draw(&Screen::Placeholder(message.to_string()))
    }

    fn present(&mut self, table: &Table) -> io::Result<()> {
        log::trace!("[tui] present: rows={}", table.rows.len());
        self.draw(&Screen::Networks(table.clone()))
    }
}

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal after TUI mode
pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
