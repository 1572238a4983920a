//! Raw-mode terminal setup and teardown.

use crossterm::cursor::{Hide, Show};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use std::io;

/// Holds the terminal in raw mode on the alternate screen.
///
/// Dropping the guard restores the terminal, so a failure anywhere after
/// [`TerminalGuard::enter`] still hands the shell back intact.
#[derive(Debug)]
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self { active: true };
        let mut out = io::stdout();
        out.execute(EnterAlternateScreen)?;
        out.execute(Hide)?;
        Ok(guard)
    }

    /// Restore the terminal now and report the first step that failed.
    pub fn restore(mut self) -> io::Result<()> {
        self.active = false;
        restore_terminal()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = restore_terminal();
        }
    }
}

/// Every step runs even if an earlier one fails.
fn restore_terminal() -> io::Result<()> {
    let mut out = io::stdout();
    first_error([
        disable_raw_mode(),
        out.execute(Show).map(|_| ()),
        out.execute(LeaveAlternateScreen).map(|_| ()),
    ])
}

fn first_error<const N: usize>(results: [io::Result<()>; N]) -> io::Result<()> {
    results.into_iter().collect()
}
