use crate::ui;
use chrono::{DateTime, Utc};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use rvdash_core::Dashboard;
use std::io::{self, Stdout};

/// The full-screen drawing target.
pub struct Surface<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> Surface<B> {
    pub fn new(backend: B) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
        })
    }

    /// Clears and hides the cursor, then draws twice so the first frame is
    /// laid out against the settled terminal size.
    pub fn prepare(&mut self, dashboard: &Dashboard, now: DateTime<Utc>) -> io::Result<()> {
        self.terminal.clear()?;
        self.terminal.hide_cursor()?;
        self.redraw(dashboard, now)?;
        self.redraw(dashboard, now)
    }

    pub fn redraw(&mut self, dashboard: &Dashboard, now: DateTime<Utc>) -> io::Result<()> {
        self.terminal.draw(|f| ui::render(f, dashboard, now))?;
        Ok(())
    }

    /// Full repaint after a size change; the clear drops cells left over from
    /// the previous geometry.
    pub fn resize(&mut self, dashboard: &Dashboard, now: DateTime<Utc>) -> io::Result<()> {
        self.terminal.clear()?;
        self.redraw(dashboard, now)
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    fn restore(&mut self) -> io::Result<()> {
        self.terminal.show_cursor()
    }
}

/// Raw mode plus the alternate screen. A failure part way through undoes
/// whatever was already switched on.
pub fn enter_terminal() -> io::Result<Surface<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err);
    }
    Surface::new(CrosstermBackend::new(stdout)).map_err(|err| {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
        err
    })
}

/// Attempts every restore step and reports the first failure.
pub fn restore_terminal(surface: &mut Surface<CrosstermBackend<Stdout>>) -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(surface.terminal.backend_mut(), LeaveAlternateScreen);
    let cursor = surface.restore();
    raw.and(screen).and(cursor)
}
