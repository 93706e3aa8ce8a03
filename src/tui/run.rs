//! Terminal session and event loop.
//!
//! Raw mode and the alternate screen are set up on entry
//! and undone on every exit path; a panic hook restores the terminal before
//! the panic message is printed. The loop draws at most once per frame and
//! stops when the app reaches [`AppMode::Quitting`](super::AppMode) or the
//! shutdown flag is raised.

use std::io::{self, Stdout};
use std::panic;
use std::time::{Duration, Instant};

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use thiserror::Error;

use super::app::App;
use super::events::{EventHandler, InputEvent};
use super::ui::render;
use crate::signal::ShutdownHandler;

/// ~60 frames per second.
const FRAME_DURATION: Duration = Duration::from_millis(16);

const POLL_TIMEOUT: Duration = Duration::from_millis(16);

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("event error: {0}")]
    Event(#[from] super::events::EventError),

    /// Ctrl+C was pressed. Everything up to that point is already saved.
    #[error("interrupted by shutdown signal")]
    Interrupted,
}

pub type TuiResult<T> = Result<T, TuiError>;

type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Run the checklist screen until the user quits.
///
/// # Errors
///
/// Returns `TuiError::Io` for terminal I/O errors, `TuiError::Event` for
/// event handling errors, and `TuiError::Interrupted` if `shutdown` was
/// triggered.
pub fn run_tui(
    app: &mut App,
    events: &EventHandler,
    shutdown: Option<&ShutdownHandler>,
) -> TuiResult<()> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = run_tui_inner(app, events, shutdown);

    let _ = panic::take_hook();

    result
}

fn run_tui_inner(
    app: &mut App,
    events: &EventHandler,
    shutdown: Option<&ShutdownHandler>,
) -> TuiResult<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, app, events, shutdown);
    restore_terminal()?;

    if result.is_ok() {
        log::info!("TUI exited normally");
    }
    result
}

fn event_loop(
    terminal: &mut Terminal,
    app: &mut App,
    events: &EventHandler,
    shutdown: Option<&ShutdownHandler>,
) -> TuiResult<()> {
    let mut last_render = Instant::now();

    loop {
        if shutdown.is_some_and(ShutdownHandler::is_shutdown_requested) {
            log::info!("Shutdown signal received, exiting TUI");
            interrupt(app);
            return Err(TuiError::Interrupted);
        }

        if app.should_quit() {
            log::debug!("App requested quit");
            return Ok(());
        }

        terminal.draw(|frame| render(frame, app))?;

        if let Some(input) = events.poll(POLL_TIMEOUT, app.mode().is_text_input())? {
            apply_input(app, input);
        }

        let elapsed = last_render.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
        last_render = Instant::now();
    }
}

/// Save any note being typed before leaving on a shutdown signal.
fn interrupt(app: &mut App) {
    if app.mode().is_text_input() {
        app.finish_note_edit();
    }
}

/// Apply one translated input event to the app.
pub fn apply_input(app: &mut App, input: InputEvent) {
    // an open error dialog swallows the first key of any kind
    if app.error_message().is_some() && input != InputEvent::Resize {
        app.clear_error();
        return;
    }

    match input {
        InputEvent::Action(action) => {
            if !app.handle_action(action) {
                log::trace!("Action not handled: {:?}", action);
            }
        }
        InputEvent::Char(c) => app.insert_char(c),
        InputEvent::Newline => app.insert_newline(),
        InputEvent::Backspace => app.delete_char(),
        InputEvent::FinishEditing => app.finish_note_edit(),
        InputEvent::Resize => {}
    }
}

fn setup_terminal() -> TuiResult<Terminal> {
    log::debug!("Setting up terminal for TUI");

    terminal::enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    log::debug!("Terminal setup complete");
    Ok(terminal)
}

fn restore_terminal() -> TuiResult<()> {
    log::debug!("Restoring terminal");

    let _ = terminal::disable_raw_mode();

    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);

    Ok(())
}
