mod app;
mod event;
mod form;
mod keymap;
pub mod theme;
mod ui;

use std::io::{self, stdout};

use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use tracing::info;

use crate::app::AppState;
use crate::config::Config;

pub use app::TuiApp;

pub fn run(state: AppState, config: &Config) -> Result<()> {
    let mut terminal = ratatui::init();
    restore_on_err(execute!(stdout(), EnableMouseCapture), ratatui::restore)?;
    info!("tui started");
    let mut app = TuiApp::new(state, config);
    let result = app.run(&mut terminal);
    let _ = execute!(stdout(), DisableMouseCapture);
    ratatui::restore();
    info!("tui stopped");
    result
}

/// Leave raw mode before a setup failure propagates.
fn restore_on_err<T>(result: io::Result<T>, restore: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_failure_restores_terminal() {
        let mut restored = false;
        let result: io::Result<()> =
            restore_on_err(Err(io::Error::other("no mouse")), || restored = true);
        assert!(result.is_err());
        assert!(restored);
    }

    #[test]
    fn setup_success_leaves_terminal_alone() {
        let mut restored = false;
        let result = restore_on_err(Ok(7), || restored = true);
        assert_eq!(result.unwrap(), 7);
        assert!(!restored);
    }
}
