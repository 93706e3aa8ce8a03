//! TUI application state management.
//!
//! # Overview
//!
//! This module manages the application state for the interactive TUI, including:
//! - Current mode (Checking, EditingNote, EditingShiftNotes, ConfirmingReset,
//!   ShowingHelp, Quitting)
//! - The checklist model, the section navigator, and session persistence
//! - The item cursor within the active section
//! - Notices and error messages
//!
//! # Architecture
//!
//! The `App` struct is the single owner of the checklist state. Every rule
//! (pair exclusivity, justification gate, persistence) receives the state it
//! needs as an explicit argument. It is designed to be accessed only from the
//! main thread. State transitions are explicit through method calls.
//!
//! # Example
//!
//! ```
//! use closecheck::checklist::{Checklist, ChecklistDefinition};
//! use closecheck::export::SnapshotExporter;
//! use closecheck::store::MemoryStore;
//! use closecheck::tui::app::{Action, App, AppMode};
//!
//! let definition = ChecklistDefinition::builtin().unwrap();
//! let checklist = Checklist::from_definition(&definition);
//! let exporter = SnapshotExporter::new(std::env::temp_dir());
//! let mut app = App::new(checklist, Box::new(MemoryStore::new()), exporter).unwrap();
//!
//! app.handle_action(Action::ToggleItem);
//! app.handle_action(Action::NextSection);
//!
//! // Unchecked items remain, so the advance is refused and the note editor opens
//! assert_eq!(app.navigator().current_index(), 0);
//! assert_eq!(app.mode(), AppMode::EditingNote);
//! ```

use std::str::FromStr;

use chrono::Local;

use super::keybindings::KeyBindings;
use crate::checklist::{gate, pairs, Checklist, ItemRef, Section};
use crate::export::SnapshotExporter;
use crate::navigator::{NavigatorError, SectionNavigator};
use crate::render::Theme;
use crate::session::{self, SessionStore};
use crate::store::KeyValueStore;

/// Application mode/state.
///
/// Modes control what is displayed and which actions are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Main mode: moving between items and toggling them
    #[default]
    Checking,
    /// Typing the justification note for the active section
    EditingNote,
    /// Typing the notes for the whole shift
    EditingShiftNotes,
    /// Waiting for confirmation of a full reset
    ConfirmingReset,
    /// Showing the keybinding reference
    ShowingHelp,
    /// Application is quitting
    Quitting,
}

impl AppMode {
    /// Check if the application is done (quitting).
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Quitting)
    }

    /// Whether keyboard input is routed to a note editor.
    #[must_use]
    pub fn is_text_input(&self) -> bool {
        matches!(self, Self::EditingNote | Self::EditingShiftNotes)
    }
}

/// User action triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move the cursor to the previous item
    NavigateUp,
    /// Move the cursor to the next item
    NavigateDown,
    /// Check or uncheck the item under the cursor
    ToggleItem,
    /// Try to move to the next section
    NextSection,
    /// Move to the previous section
    PreviousSection,
    /// Focus the justification note
    EditNote,
    /// Focus the shift notes
    EditShiftNotes,
    /// Save the current section as an image
    Export,
    /// Ask to clear the whole checklist
    Reset,
    /// Confirm the current dialog
    Confirm,
    /// Close the current dialog or editor
    Cancel,
    /// Show the keybinding reference
    ShowHelp,
    /// Quit the application
    Quit,
}

const ACTIONS: [(Action, &str); 13] = [
    (Action::NavigateUp, "navigate_up"),
    (Action::NavigateDown, "navigate_down"),
    (Action::ToggleItem, "toggle_item"),
    (Action::NextSection, "next_section"),
    (Action::PreviousSection, "previous_section"),
    (Action::EditNote, "edit_note"),
    (Action::EditShiftNotes, "edit_shift_notes"),
    (Action::Export, "export"),
    (Action::Reset, "reset"),
    (Action::Confirm, "confirm"),
    (Action::Cancel, "cancel"),
    (Action::ShowHelp, "show_help"),
    (Action::Quit, "quit"),
];

const ACTION_NAMES: [&str; ACTIONS.len()] = {
    let mut names = [""; ACTIONS.len()];
    let mut i = 0;
    while i < ACTIONS.len() {
        names[i] = ACTIONS[i].1;
        i += 1;
    }
    names
};

impl Action {
    /// Configuration name of the action, e.g. `next_section`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        ACTIONS
            .iter()
            .find(|(action, _)| *action == *self)
            .map_or("", |(_, name)| *name)
    }

    /// Every configuration name, in declaration order.
    #[must_use]
    pub fn all_names() -> &'static [&'static str] {
        &ACTION_NAMES
    }

    /// Short description for help and footer text.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::NavigateUp => "Previous item",
            Self::NavigateDown => "Next item",
            Self::ToggleItem => "Check / uncheck",
            Self::NextSection => "Next section",
            Self::PreviousSection => "Previous section",
            Self::EditNote => "Write reason",
            Self::EditShiftNotes => "Shift notes",
            Self::Export => "Save image",
            Self::Reset => "Clear all",
            Self::Confirm => "Confirm",
            Self::Cancel => "Close",
            Self::ShowHelp => "Help",
            Self::Quit => "Quit",
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ACTIONS
            .iter()
            .find(|(_, name)| *name == normalized)
            .map(|(action, _)| *action)
            .ok_or_else(|| s.to_string())
    }
}

/// Result of an attempt to leave the active section forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved to the next section.
    Advanced,
    /// The gate passed but this is the last section.
    AtLastSection,
    /// Unchecked items need a reason first.
    Refused,
}

/// Short message shown below the checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
}

impl Notice {
    /// The message text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Info(text) | Self::Warning(text) => text,
        }
    }
}

/// TUI application state.
///
/// # Thread Safety
///
/// This struct is NOT thread-safe and should only be accessed from the main thread.
pub struct App {
    mode: AppMode,
    checklist: Checklist,
    navigator: SectionNavigator,
    session: SessionStore<Box<dyn KeyValueStore>>,
    exporter: SnapshotExporter,
    /// Item position within the active section
    cursor: usize,
    notice: Option<Notice>,
    error_message: Option<String>,
    theme: Theme,
    accessible: bool,
    keybindings: Option<KeyBindings>,
    /// Date shown in the header, fixed at startup
    today: String,
}

impl App {
    /// Create the app, restoring any saved state from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`NavigatorError::Empty`] if the checklist has no sections.
    pub fn new(
        mut checklist: Checklist,
        store: Box<dyn KeyValueStore>,
        exporter: SnapshotExporter,
    ) -> Result<Self, NavigatorError> {
        let session = SessionStore::new(store);
        let snapshot = session.load();
        session::restore(&mut checklist, &snapshot);
        let navigator = SectionNavigator::for_checklist(&mut checklist)?;

        log::info!(
            "Loaded checklist: {} sections, {} items, {} checked",
            checklist.section_count(),
            checklist.item_count(),
            checklist.items().filter(|i| i.checked).count()
        );

        Ok(Self {
            mode: AppMode::Checking,
            checklist,
            navigator,
            session,
            exporter,
            cursor: 0,
            notice: None,
            error_message: None,
            theme: Theme::default(),
            accessible: false,
            keybindings: None,
            today: Local::now().format("%Y-%m-%d").to_string(),
        })
    }

    /// Set the color theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Use ASCII borders for screen readers and limited terminals.
    #[must_use]
    pub fn with_accessible(mut self, accessible: bool) -> Self {
        self.accessible = accessible;
        self
    }

    /// Keybindings used for hints in the footer and help dialog.
    #[must_use]
    pub fn with_keybindings(mut self, keybindings: KeyBindings) -> Self {
        self.keybindings = Some(keybindings);
        self
    }

    // ==================== Mode Management ====================

    /// Get the current application mode.
    #[must_use]
    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Set the application mode.
    ///
    /// This is the only way to change modes - state transitions are explicit.
    pub fn set_mode(&mut self, mode: AppMode) {
        log::debug!("Mode transition: {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    /// Check if the application should quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.mode.is_done()
    }

    // ==================== Accessors ====================

    #[must_use]
    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    #[must_use]
    pub fn navigator(&self) -> &SectionNavigator {
        &self.navigator
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore<Box<dyn KeyValueStore>> {
        &self.session
    }

    #[must_use]
    pub fn exporter(&self) -> &SnapshotExporter {
        &self.exporter
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[must_use]
    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    #[must_use]
    pub fn keybindings(&self) -> Option<&KeyBindings> {
        self.keybindings.as_ref()
    }

    #[must_use]
    pub fn today(&self) -> &str {
        &self.today
    }

    /// The active section.
    #[must_use]
    pub fn current_section(&self) -> &Section {
        &self.checklist.sections()[self.navigator.current_index()]
    }

    // ==================== Item Cursor ====================

    /// Cursor position within the active section.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The item under the cursor, if the section has any items.
    #[must_use]
    pub fn current_item_ref(&self) -> Option<ItemRef> {
        let section = self.current_section();
        (self.cursor < section.items.len())
            .then(|| ItemRef::new(section.index, self.cursor))
    }

    /// Move the cursor down. Stays on the last item.
    pub fn next(&mut self) {
        if self.cursor + 1 < self.current_section().items.len() {
            self.cursor += 1;
            log::trace!("Navigate next: cursor = {}", self.cursor);
        }
    }

    /// Move the cursor up. Stays on the first item.
    pub fn previous(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            log::trace!("Navigate previous: cursor = {}", self.cursor);
        }
    }

    // ==================== Checking ====================

    /// Toggle the item under the cursor.
    ///
    /// Returns false if there is no item or it is disabled by its pair.
    pub fn toggle_current(&mut self) -> bool {
        match self.current_item_ref() {
            Some(item) => self.toggle(item),
            None => false,
        }
    }

    /// Toggle `item`, apply the pair rule, refresh panels, and save.
    pub fn toggle(&mut self, item: ItemRef) -> bool {
        let Some(checked) = self.checklist.item(item).map(|i| i.checked) else {
            return false;
        };

        if !self.checklist.set_checked(item, !checked) {
            self.notice = Some(Notice::Warning(
                "That item is unavailable while its paired item is checked.".into(),
            ));
            return false;
        }

        let partner = pairs::apply_after_change(&mut self.checklist, item);
        for index in std::iter::once(item.section).chain(partner.map(|p| p.section)) {
            if let Some(section) = self.checklist.section_mut(index) {
                gate::refresh_panel(section);
            }
        }

        self.notice = None;
        self.persist();
        true
    }

    // ==================== Section Navigation ====================

    /// Attempt to move to the next section through the justification gate.
    pub fn try_advance(&mut self) -> AdvanceOutcome {
        let index = self.navigator.current_index();
        let Some(section) = self.checklist.section_mut(index) else {
            return AdvanceOutcome::Refused;
        };
        let outcome = gate::refresh_panel(section);

        if !outcome.is_satisfied {
            log::info!(
                "Advance from section {} refused: {} item(s) unchecked without a reason",
                index,
                outcome.unchecked_labels.len()
            );
            self.notice = Some(Notice::Warning(gate::JUSTIFICATION_REQUIRED.into()));
            self.set_mode(AppMode::EditingNote);
            return AdvanceOutcome::Refused;
        }

        self.persist();
        if self.navigator.advance(&mut self.checklist) {
            self.cursor = 0;
            self.notice = None;
            AdvanceOutcome::Advanced
        } else {
            AdvanceOutcome::AtLastSection
        }
    }

    /// Move to the previous section. Never gated.
    pub fn retreat(&mut self) -> bool {
        let moved = self.navigator.retreat(&mut self.checklist);
        if moved {
            self.cursor = 0;
            self.notice = None;
        }
        moved
    }

    // ==================== Notes ====================

    /// Note text of the active section.
    #[must_use]
    pub fn note_text(&self) -> &str {
        &self.current_section().justification_text
    }

    /// Focus the note editor.
    pub fn begin_note_edit(&mut self) {
        self.set_mode(AppMode::EditingNote);
    }

    /// Focus the shift notes editor.
    pub fn begin_shift_notes_edit(&mut self) {
        self.set_mode(AppMode::EditingShiftNotes);
    }

    /// The text the open editor writes to.
    fn edited_text(&mut self) -> Option<&mut String> {
        match self.mode {
            AppMode::EditingShiftNotes => Some(self.checklist.shift_notes_mut()),
            _ => self
                .checklist
                .section_mut(self.navigator.current_index())
                .map(|section| &mut section.justification_text),
        }
    }

    /// Append a character to the open note.
    pub fn insert_char(&mut self, c: char) {
        if let Some(text) = self.edited_text() {
            text.push(c);
        }
    }

    /// Append a line break to the open note.
    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    /// Remove the last character of the open note.
    pub fn delete_char(&mut self) {
        if let Some(text) = self.edited_text() {
            text.pop();
        }
    }

    /// Leave the open editor and save.
    pub fn finish_note_edit(&mut self) {
        if let Some(section) = self.checklist.section_mut(self.navigator.current_index()) {
            gate::refresh_panel(section);
        }
        self.persist();
        if self.mode.is_text_input() {
            self.set_mode(AppMode::Checking);
        }
    }

    // ==================== Export and Reset ====================

    /// Export the active section as an image.
    ///
    /// On success the section is cleared and the app moves on; on failure an
    /// error is shown and nothing changes.
    pub fn export_current(&mut self) -> bool {
        match self.exporter.export_current_section(
            &mut self.checklist,
            &mut self.navigator,
            &mut self.session,
        ) {
            Ok(outcome) => {
                self.cursor = 0;
                self.notice = Some(Notice::Info(format!(
                    "Saved image to {}",
                    outcome.path.display()
                )));
                true
            }
            Err(e) => {
                self.set_error(&format!("Could not create the image: {e}"));
                false
            }
        }
    }

    /// Ask for confirmation before clearing everything.
    pub fn request_reset(&mut self) {
        self.set_mode(AppMode::ConfirmingReset);
    }

    /// Clear every item and note, delete the saved record, and go back to the start.
    pub fn confirm_reset(&mut self) {
        if let Err(e) = self
            .session
            .reset_all(&mut self.checklist, &mut self.navigator)
        {
            log::warn!("{:#}", e);
        }
        self.cursor = 0;
        self.notice = Some(Notice::Info("All checks cleared".into()));
        self.set_mode(AppMode::Checking);
    }

    fn persist(&mut self) {
        if let Err(e) = self.session.save(&self.checklist) {
            log::warn!("{:#}", e);
        }
    }

    // ==================== Notices and Errors ====================

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Get the current error message (if any).
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Set an error message to display.
    pub fn set_error(&mut self, message: &str) {
        self.error_message = Some(message.to_string());
        log::error!("App error: {}", message);
    }

    /// Clear the error message.
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    fn quit(&mut self) {
        if self.mode.is_text_input() {
            self.finish_note_edit();
        }
        self.set_mode(AppMode::Quitting);
    }

    // ==================== Action Handling ====================

    /// Handle a user action and update state accordingly.
    ///
    /// While an error is shown, any action only dismisses it.
    /// Returns true if the action was handled.
    pub fn handle_action(&mut self, action: Action) -> bool {
        log::trace!("Handling action: {:?} in mode {:?}", action, self.mode);

        if self.error_message.is_some() {
            self.clear_error();
            return true;
        }

        match (self.mode, action) {
            (AppMode::Quitting, _) => false,
            (_, Action::Quit) => {
                self.quit();
                true
            }
            (AppMode::ConfirmingReset, Action::Confirm) => {
                self.confirm_reset();
                true
            }
            (AppMode::ConfirmingReset, Action::Cancel) => {
                self.set_mode(AppMode::Checking);
                true
            }
            (AppMode::ConfirmingReset, _) => false,
            (AppMode::ShowingHelp, _) => {
                self.set_mode(AppMode::Checking);
                true
            }
            (
                AppMode::EditingNote | AppMode::EditingShiftNotes,
                Action::Cancel | Action::Confirm,
            ) => {
                self.finish_note_edit();
                true
            }
            (AppMode::EditingNote | AppMode::EditingShiftNotes, _) => false,
            (AppMode::Checking, action) => self.handle_checking_action(action),
        }
    }

    fn handle_checking_action(&mut self, action: Action) -> bool {
        match action {
            Action::NavigateUp => self.previous(),
            Action::NavigateDown => self.next(),
            Action::ToggleItem => return self.toggle_current(),
            // only dialogs take a confirmation
            Action::Confirm => return false,
            Action::NextSection => {
                self.try_advance();
            }
            Action::PreviousSection => {
                self.retreat();
            }
            Action::EditNote => self.begin_note_edit(),
            Action::EditShiftNotes => self.begin_shift_notes_edit(),
            Action::Export => return self.export_current(),
            Action::Reset => self.request_reset(),
            Action::Cancel => self.notice = None,
            Action::ShowHelp => self.set_mode(AppMode::ShowingHelp),
            Action::Quit => self.quit(),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::ChecklistDefinition;
    use crate::session::STORAGE_KEY;
    use crate::store::MemoryStore;
    use tempfile::TempDir;

    const DEFINITION: &str = r#"
pairs = [["mop", "wipe"]]

[[sections]]
title = "Floor"
[[sections.items]]
id = "sweep"
label = "Sweep"
[[sections.items]]
id = "mop"
label = "Mop"
category = "Wet"
[[sections.items]]
id = "wipe"
label = "Wet wipe"
category = "Wet"

[[sections]]
title = "Door"
[[sections.items]]
id = "lock"
label = "Lock"
"#;

    fn app_with_store(store: MemoryStore) -> (App, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let definition = ChecklistDefinition::from_toml_str(DEFINITION).unwrap();
        let checklist = Checklist::from_definition(&definition);
        let exporter = SnapshotExporter::new(dir.path());
        let app = App::new(checklist, Box::new(store), exporter).unwrap();
        (app, dir)
    }

    fn app() -> (App, TempDir) {
        app_with_store(MemoryStore::new())
    }

    #[test]
    fn test_action_names_roundtrip() {
        for name in Action::all_names() {
            let action: Action = name.parse().unwrap();
            assert_eq!(action.name(), *name);
        }
        assert_eq!("Next-Section".parse::<Action>(), Ok(Action::NextSection));
        assert!("nope".parse::<Action>().is_err());
    }

    #[test]
    fn test_action_names_follow_action_table() {
        assert_eq!(Action::all_names().len(), ACTIONS.len());
        for ((action, name), listed) in ACTIONS.iter().zip(Action::all_names()) {
            assert_eq!(name, listed);
            assert_eq!(action.name(), *listed);
        }
    }

    #[test]
    fn test_confirm_does_not_toggle_items() {
        let (mut app, _dir) = app();
        assert!(!app.handle_action(Action::Confirm));
        assert!(app.checklist().items().all(|i| !i.checked));
        assert!(app.session().store().get(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_new_app_starts_checking_at_first_section() {
        let (app, _dir) = app();
        assert_eq!(app.mode(), AppMode::Checking);
        assert_eq!(app.navigator().current_index(), 0);
        assert_eq!(app.cursor(), 0);
        assert!(app.checklist().items().all(|i| !i.checked && i.enabled));
    }

    #[test]
    fn test_cursor_bounds() {
        let (mut app, _dir) = app();
        app.handle_action(Action::NavigateUp);
        assert_eq!(app.cursor(), 0);
        for _ in 0..5 {
            app.handle_action(Action::NavigateDown);
        }
        assert_eq!(app.cursor(), 2);
    }

    #[test]
    fn test_toggle_saves_and_applies_pair_rule() {
        let (mut app, _dir) = app();
        app.handle_action(Action::NavigateDown);
        assert!(app.handle_action(Action::ToggleItem));

        let mop = app.checklist().find("mop").unwrap();
        let wipe = app.checklist().find("wipe").unwrap();
        assert!(app.checklist().item(mop).unwrap().checked);
        assert!(!app.checklist().item(wipe).unwrap().enabled);
        assert!(app.session().store().get(STORAGE_KEY).unwrap().is_some());

        // The disabled partner refuses to toggle
        app.handle_action(Action::NavigateDown);
        assert!(!app.handle_action(Action::ToggleItem));
        assert!(!app.checklist().item(wipe).unwrap().checked);
        assert!(matches!(app.notice(), Some(Notice::Warning(_))));
    }

    #[test]
    fn test_advance_refused_then_allowed_with_reason() {
        let (mut app, _dir) = app();
        app.toggle_current();

        assert_eq!(app.try_advance(), AdvanceOutcome::Refused);
        assert_eq!(app.mode(), AppMode::EditingNote);
        assert_eq!(
            app.notice().map(Notice::text),
            Some(gate::JUSTIFICATION_REQUIRED)
        );
        assert!(app.current_section().panel.visible);

        for c in "late".chars() {
            app.insert_char(c);
        }
        app.handle_action(Action::Cancel);
        assert_eq!(app.mode(), AppMode::Checking);

        assert_eq!(app.try_advance(), AdvanceOutcome::Advanced);
        assert_eq!(app.navigator().current_index(), 1);
    }

    #[test]
    fn test_whitespace_reason_is_not_enough() {
        let (mut app, _dir) = app();
        app.begin_note_edit();
        app.insert_char(' ');
        app.insert_newline();
        app.finish_note_edit();
        assert_eq!(app.try_advance(), AdvanceOutcome::Refused);
        assert_eq!(app.navigator().current_index(), 0);
    }

    #[test]
    fn test_note_backspace() {
        let (mut app, _dir) = app();
        app.begin_note_edit();
        app.insert_char('a');
        app.insert_char('b');
        app.delete_char();
        assert_eq!(app.note_text(), "a");
    }

    #[test]
    fn test_shift_notes_editor() {
        let (mut app, _dir) = app();
        app.handle_action(Action::EditShiftNotes);
        assert_eq!(app.mode(), AppMode::EditingShiftNotes);
        assert!(app.mode().is_text_input());

        for c in "till 2 short".chars() {
            app.insert_char(c);
        }
        app.delete_char();
        app.insert_char('!');
        app.handle_action(Action::Cancel);

        assert_eq!(app.mode(), AppMode::Checking);
        assert_eq!(app.checklist().shift_notes(), "till 2 shor!");
        assert!(app.note_text().is_empty(), "section reason untouched");

        let record = app.session().store().get(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(session::decode(&record).unwrap().shift_notes, "till 2 shor!");
    }

    #[test]
    fn test_shift_notes_do_not_satisfy_gate() {
        let (mut app, _dir) = app();
        app.begin_shift_notes_edit();
        app.insert_char('x');
        app.finish_note_edit();
        assert_eq!(app.try_advance(), AdvanceOutcome::Refused);
    }

    #[test]
    fn test_retreat_is_never_gated() {
        let (mut app, _dir) = app();
        app.begin_note_edit();
        app.insert_char('x');
        app.finish_note_edit();
        app.try_advance();
        assert_eq!(app.navigator().current_index(), 1);

        assert!(app.retreat());
        assert_eq!(app.navigator().current_index(), 0);
        assert!(!app.retreat());
    }

    #[test]
    fn test_last_section_advance() {
        let (mut app, _dir) = app();
        app.begin_note_edit();
        app.insert_char('x');
        app.finish_note_edit();
        app.try_advance();
        app.toggle_current();
        assert_eq!(app.try_advance(), AdvanceOutcome::AtLastSection);
        assert!(!app.current_section().panel.visible);
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let (mut app, _dir) = app();
        app.toggle_current();

        app.handle_action(Action::Reset);
        assert_eq!(app.mode(), AppMode::ConfirmingReset);
        app.handle_action(Action::Cancel);
        assert_eq!(app.mode(), AppMode::Checking);
        assert!(app.checklist().items().any(|i| i.checked));

        app.handle_action(Action::Reset);
        app.handle_action(Action::Confirm);
        assert_eq!(app.mode(), AppMode::Checking);
        assert!(app.checklist().items().all(|i| !i.checked));
        assert!(app.session().store().get(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_state_restored_from_store() {
        let (mut app, _dir) = app();
        app.toggle_current();
        let record = app.session().store().get(STORAGE_KEY).unwrap().unwrap();

        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, &record).unwrap();
        let (restored, _dir2) = app_with_store(store);
        assert!(restored.checklist().items().next().unwrap().checked);
    }

    #[test]
    fn test_error_dismissed_by_any_action() {
        let (mut app, _dir) = app();
        app.set_error("boom");
        assert!(app.handle_action(Action::Quit));
        assert!(app.error_message().is_none());
        assert!(!app.should_quit());
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let (mut app, _dir) = app();
        app.handle_action(Action::ShowHelp);
        assert_eq!(app.mode(), AppMode::ShowingHelp);
        app.handle_action(Action::NavigateDown);
        assert_eq!(app.mode(), AppMode::Checking);
        assert_eq!(app.cursor(), 0);
    }

    #[test]
    fn test_quit_from_editor_saves_note() {
        let (mut app, _dir) = app();
        app.begin_note_edit();
        app.insert_char('z');
        app.handle_action(Action::Quit);
        assert!(app.should_quit());

        let record = app.session().store().get(STORAGE_KEY).unwrap().unwrap();
        let snapshot = session::decode(&record).unwrap();
        assert_eq!(snapshot.justification_texts[0], "z");
    }
}
