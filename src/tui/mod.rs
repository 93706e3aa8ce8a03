//! Terminal User Interface module.
//!
//! This module provides the interactive checklist using ratatui with the
//! crossterm backend.
//!
//! # Overview
//!
//! - [`app`]: Application state (modes, cursor, the checklist controller)
//! - [`events`]: Keyboard input translation
//! - [`keybindings`]: Keybinding profiles and custom overrides
//! - [`ui`]: Frame layout, footer, and dialogs around the section widget
//! - [`run`]: Terminal setup and the main loop
//!
//! # Architecture
//!
//! The TUI follows a unidirectional data flow:
//! 1. Events are captured from the terminal (crossterm)
//! 2. Events are translated to Actions or note edits
//! 3. Actions modify the App state
//! 4. The UI renders based on the current App state

pub mod app;
pub mod events;
pub mod keybindings;
pub mod run;
pub mod ui;

pub use app::{Action, AdvanceOutcome, App, AppMode, Notice};
pub use events::{EventError, EventHandler, InputEvent};
pub use keybindings::{KeyBindings, KeybindingProfile};
pub use run::{run_tui, TuiError};
pub use crate::render::Theme;
pub use ui::render;
