//! TUI event handling with crossterm.
//!
//! # Overview
//! Keyboard input is translated in one of two ways depending on the mode:
//! - Normally keys are resolved through [`KeyBindings`] into [`Action`]s.
//! - While the note editor has focus, printable keys become text edits and
//!   only Esc/Tab (finish) and Ctrl+C (quit) keep their meaning.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use thiserror::Error;

use super::app::Action;
use super::keybindings::KeyBindings;

/// Error type for event handling.
#[derive(Debug, Error)]
pub enum EventError {
    /// Polling the terminal for events failed.
    #[error("failed to poll for events: {0}")]
    Poll(#[source] io::Error),

    /// Reading an available event failed.
    #[error("failed to read event: {0}")]
    Read(#[source] io::Error),
}

/// Input after translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A bound action.
    Action(Action),
    /// A character typed into the note.
    Char(char),
    /// Enter in the note.
    Newline,
    /// Backspace in the note.
    Backspace,
    /// Leave the note editor.
    FinishEditing,
    /// The terminal was resized.
    Resize,
}

/// Translates crossterm events into [`InputEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct EventHandler {
    bindings: KeyBindings,
}

impl EventHandler {
    /// Handler using the default bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler using `bindings`.
    #[must_use]
    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    /// The active bindings.
    #[must_use]
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Wait up to `timeout` for input.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be polled or read.
    pub fn poll(
        &self,
        timeout: Duration,
        text_input: bool,
    ) -> Result<Option<InputEvent>, EventError> {
        if !event::poll(timeout).map_err(EventError::Poll)? {
            return Ok(None);
        }

        let translated = match event::read().map_err(EventError::Read)? {
            Event::Key(key) => self.translate_key(&key, text_input),
            Event::Resize(_, _) => Some(InputEvent::Resize),
            _ => None,
        };
        Ok(translated)
    }

    /// Translate a single key event.
    #[must_use]
    pub fn translate_key(&self, key: &KeyEvent, text_input: bool) -> Option<InputEvent> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if !text_input {
            return self.bindings.resolve(key).map(InputEvent::Action);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => Some(InputEvent::Action(Action::Quit)),
            KeyCode::Char(_) if ctrl => None,
            KeyCode::Char(c) => Some(InputEvent::Char(c)),
            KeyCode::Enter => Some(InputEvent::Newline),
            KeyCode::Backspace => Some(InputEvent::Backspace),
            KeyCode::Esc | KeyCode::Tab => Some(InputEvent::FinishEditing),
            _ => None,
        }
    }
}
