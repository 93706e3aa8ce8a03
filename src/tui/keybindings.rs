//! Keybinding configuration for the TUI.
//!
//! This module provides flexible keybinding support with multiple profiles
//! and customizable key mappings. The default profile (Universal) supports
//! both vim-style (hjkl) AND arrow key navigation simultaneously.
//!
//! # Profiles
//!
//! - [`KeybindingProfile::Universal`]: Both vim-style AND arrow keys (default)
//! - [`KeybindingProfile::Vim`]: Vim-style keys only (hjkl)
//! - [`KeybindingProfile::Standard`]: Arrow keys and Ctrl shortcuts only
//!
//! # Example
//!
//! ```
//! use closecheck::tui::keybindings::{KeyBindings, KeybindingProfile};
//! use closecheck::tui::Action;
//! use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
//!
//! let bindings = KeyBindings::from_profile(KeybindingProfile::Universal);
//!
//! // Both 'l' and the Right arrow move to the next section
//! let l_key = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE);
//! let right_key = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);
//!
//! assert_eq!(bindings.resolve(&l_key), Some(Action::NextSection));
//! assert_eq!(bindings.resolve(&right_key), Some(Action::NextSection));
//! ```

use std::collections::HashMap;

use clap::ValueEnum;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::Action;

/// Keybinding profile presets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Hash,
    ValueEnum,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum KeybindingProfile {
    /// Supports BOTH vim-style AND arrow key navigation.
    #[default]
    Universal,

    /// Vim-style navigation using hjkl keys. No arrow keys.
    Vim,

    /// Arrow keys and Ctrl shortcuts only.
    Standard,
}

impl KeybindingProfile {
    /// Get the display name for the profile.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Universal => "Universal (Vim + Arrow keys)",
            Self::Vim => "Vim (hjkl)",
            Self::Standard => "Standard (Arrow keys)",
        }
    }

    /// Get all available profiles.
    #[must_use]
    pub fn all() -> &'static [KeybindingProfile] {
        &[Self::Universal, Self::Vim, Self::Standard]
    }
}

impl std::fmt::Display for KeybindingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Universal => "universal",
            Self::Vim => "vim",
            Self::Standard => "standard",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for KeybindingProfile {
    type Err = KeybindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "universal" => Ok(Self::Universal),
            "vim" => Ok(Self::Vim),
            "standard" | "arrows" | "arrow" => Ok(Self::Standard),
            _ => Err(KeybindingError::InvalidProfile(s.to_string())),
        }
    }
}

/// Error type for keybinding operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeybindingError {
    /// Invalid profile name.
    #[error("Unknown keybinding profile: '{0}'. Valid profiles: universal, vim, standard")]
    InvalidProfile(String),

    /// Invalid key specification.
    #[error("Invalid key specification: '{0}'. Examples: 'j', 'Ctrl+s', 'Down', 'Space', 'F1'")]
    InvalidKeySpec(String),

    /// Invalid action name.
    #[error(
        "Unknown action: '{name}'.{hint} Valid actions: {valid}",
        hint = did_you_mean(.suggestion),
        valid = Action::all_names().join(", ")
    )]
    InvalidAction {
        name: String,
        suggestion: Option<String>,
    },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" Did you mean '{s}'?"))
        .unwrap_or_default()
}

/// Closest known action name to `name`, if any is plausibly a typo of it.
#[must_use]
pub fn suggest_action(name: &str) -> Option<String> {
    let needle = name.to_lowercase().replace('-', "_");
    Action::all_names()
        .iter()
        .map(|candidate| (strsim::levenshtein(&needle, candidate), *candidate))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.to_string())
}

/// Keybinding configuration mapping actions to key events.
///
/// Multiple keys can trigger the same action. A key is bound to at most one
/// action within a profile.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    profile: KeybindingProfile,
    action_keys: HashMap<Action, Vec<KeyEvent>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_profile(KeybindingProfile::Universal)
    }
}

impl KeyBindings {
    /// Create keybindings from a specific profile.
    #[must_use]
    pub fn from_profile(profile: KeybindingProfile) -> Self {
        let action_keys = match profile {
            KeybindingProfile::Universal => Self::universal_bindings(),
            KeybindingProfile::Vim => Self::vim_bindings(),
            KeybindingProfile::Standard => Self::standard_bindings(),
        };

        Self {
            profile,
            action_keys,
        }
    }

    /// Get the keybinding profile.
    #[must_use]
    pub fn profile(&self) -> KeybindingProfile {
        self.profile
    }

    /// Resolve a key event to an action.
    ///
    /// Key release events are ignored (some terminals send these).
    #[must_use]
    pub fn resolve(&self, key: &KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        self.action_keys
            .iter()
            .find(|(_, keys)| keys.iter().any(|k| Self::key_matches(k, key)))
            .map(|(action, _)| *action)
    }

    /// Matches code and modifiers, ignoring kind and state.
    fn key_matches(target: &KeyEvent, actual: &KeyEvent) -> bool {
        target.code == actual.code && target.modifiers == actual.modifiers
    }

    /// Get the keys bound to a specific action.
    #[must_use]
    pub fn keys_for_action(&self, action: &Action) -> &[KeyEvent] {
        self.action_keys
            .get(action)
            .map_or(&[], |keys| keys.as_slice())
    }

    /// Human-readable string for the first key bound to an action.
    #[must_use]
    pub fn key_hint(&self, action: &Action) -> String {
        self.keys_for_action(action)
            .first()
            .map_or_else(String::new, Self::format_key)
    }

    /// Format a key event as a human-readable string.
    #[must_use]
    pub fn format_key(key: &KeyEvent) -> String {
        let mut parts = Vec::new();

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        if key.modifiers.contains(KeyModifiers::SHIFT) && !matches!(key.code, KeyCode::Char(_)) {
            parts.push("Shift".to_string());
        }

        let key_name = match key.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::PageUp => "PgUp".to_string(),
            KeyCode::PageDown => "PgDn".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::F(n) => format!("F{n}"),
            _ => "?".to_string(),
        };

        parts.push(key_name);
        parts.join("+")
    }

    /// Parse a key specification string into a KeyEvent.
    ///
    /// Supports simple keys ("j", "Space", "Enter"), arrows, function keys,
    /// and modifiers ("Ctrl+s", "Alt+j", "Ctrl+Shift+a").
    ///
    /// # Errors
    ///
    /// Returns `KeybindingError::InvalidKeySpec` if the specification cannot
    /// be parsed.
    ///
    /// # Example
    ///
    /// ```
    /// use closecheck::tui::keybindings::KeyBindings;
    /// use crossterm::event::{KeyCode, KeyModifiers};
    ///
    /// let key = KeyBindings::parse_key("Ctrl+s").unwrap();
    /// assert_eq!(key.code, KeyCode::Char('s'));
    /// assert_eq!(key.modifiers, KeyModifiers::CONTROL);
    /// ```
    pub fn parse_key(spec: &str) -> Result<KeyEvent, KeybindingError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(KeybindingError::InvalidKeySpec(spec.to_string()));
        }

        let parts: Vec<&str> = if spec == "+" {
            vec!["+"]
        } else {
            spec.split('+').map(str::trim).collect()
        };

        let mut modifiers = KeyModifiers::NONE;
        let mut key_part = None;

        for (i, part) in parts.iter().enumerate() {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" | "meta" | "option" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => {
                    if i != parts.len() - 1 {
                        return Err(KeybindingError::InvalidKeySpec(format!(
                            "'{spec}' - unexpected modifier position for '{part}'"
                        )));
                    }
                    key_part = Some(*part);
                }
            }
        }

        let key_str = key_part.ok_or_else(|| {
            KeybindingError::InvalidKeySpec(format!("'{spec}' - missing key after modifiers"))
        })?;

        let code = Self::parse_key_code(key_str)
            .ok_or_else(|| KeybindingError::InvalidKeySpec(spec.to_string()))?;

        Ok(KeyEvent::new(code, modifiers))
    }

    fn parse_key_code(s: &str) -> Option<KeyCode> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(KeyCode::Char(c));
        }

        let lower = s.to_lowercase();
        if let Some(n) = lower.strip_prefix('f').and_then(|rest| rest.parse::<u8>().ok()) {
            return (1..=12).contains(&n).then_some(KeyCode::F(n));
        }

        match lower.as_str() {
            "space" | "spc" => Some(KeyCode::Char(' ')),
            "enter" | "return" | "ret" | "cr" => Some(KeyCode::Enter),
            "esc" | "escape" => Some(KeyCode::Esc),
            "tab" => Some(KeyCode::Tab),
            "backspace" | "bs" => Some(KeyCode::Backspace),
            "delete" | "del" => Some(KeyCode::Delete),
            "up" | "uparrow" => Some(KeyCode::Up),
            "down" | "downarrow" => Some(KeyCode::Down),
            "left" | "leftarrow" => Some(KeyCode::Left),
            "right" | "rightarrow" => Some(KeyCode::Right),
            "pageup" | "pgup" | "page_up" => Some(KeyCode::PageUp),
            "pagedown" | "pgdn" | "pgdown" | "page_down" => Some(KeyCode::PageDown),
            "home" => Some(KeyCode::Home),
            "end" => Some(KeyCode::End),
            _ => None,
        }
    }

    /// Parse an action name from a string.
    ///
    /// # Errors
    ///
    /// Returns `KeybindingError::InvalidAction`, with a suggestion when the
    /// name looks like a typo of a known action.
    ///
    /// # Example
    ///
    /// ```
    /// use closecheck::tui::keybindings::KeyBindings;
    /// use closecheck::tui::Action;
    ///
    /// assert_eq!(KeyBindings::parse_action("next_section").unwrap(), Action::NextSection);
    /// ```
    pub fn parse_action(name: &str) -> Result<Action, KeybindingError> {
        name.parse::<Action>()
            .map_err(|_| KeybindingError::InvalidAction {
                name: name.to_string(),
                suggestion: suggest_action(name),
            })
    }

    /// Merge custom keybindings with profile defaults.
    ///
    /// Custom keys are added to the action's existing keys and removed from
    /// every other action so the override wins.
    ///
    /// # Errors
    ///
    /// Returns an error if any action name or key specification is invalid.
    pub fn with_custom_overrides(
        mut self,
        custom: &HashMap<String, Vec<String>>,
    ) -> Result<Self, KeybindingError> {
        for (action_name, key_specs) in custom {
            let action = Self::parse_action(action_name)?;

            for key_spec in key_specs {
                let key_event = Self::parse_key(key_spec)?;

                for (other_action, other_keys) in &mut self.action_keys {
                    if *other_action != action {
                        other_keys.retain(|k| !Self::key_matches(k, &key_event));
                    }
                }

                self.action_keys.entry(action).or_default().push(key_event);
            }
        }

        Ok(self)
    }

    /// Create keybindings from a profile with custom overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if any custom binding is invalid.
    pub fn from_profile_with_custom(
        profile: KeybindingProfile,
        custom: &HashMap<String, Vec<String>>,
    ) -> Result<Self, KeybindingError> {
        Self::from_profile(profile).with_custom_overrides(custom)
    }

    // =========================================================================
    // Profile Binding Definitions
    // =========================================================================

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn plain(c: char) -> KeyEvent {
        Self::key(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        Self::key(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Uppercase letters arrive with SHIFT on most terminals and without on some.
    fn shifted(c: char) -> [KeyEvent; 2] {
        [
            Self::key(KeyCode::Char(c), KeyModifiers::SHIFT),
            Self::key(KeyCode::Char(c), KeyModifiers::NONE),
        ]
    }

    fn code(code: KeyCode) -> KeyEvent {
        Self::key(code, KeyModifiers::NONE)
    }

    /// Bindings shared by every profile.
    fn common_bindings() -> HashMap<Action, Vec<KeyEvent>> {
        let mut bindings = HashMap::new();
        bindings.insert(Action::Confirm, vec![Self::code(KeyCode::Enter)]);
        bindings.insert(Action::Cancel, vec![Self::code(KeyCode::Esc)]);
        bindings.insert(Action::Quit, vec![Self::plain('q'), Self::ctrl('c')]);
        bindings
    }

    /// Universal bindings: Both vim-style AND arrow keys.
    fn universal_bindings() -> HashMap<Action, Vec<KeyEvent>> {
        let mut bindings = Self::common_bindings();

        bindings.insert(
            Action::NavigateDown,
            vec![Self::plain('j'), Self::code(KeyCode::Down)],
        );
        bindings.insert(
            Action::NavigateUp,
            vec![Self::plain('k'), Self::code(KeyCode::Up)],
        );
        bindings.insert(Action::ToggleItem, vec![Self::plain(' '), Self::plain('x')]);
        bindings.insert(
            Action::NextSection,
            vec![
                Self::plain('l'),
                Self::code(KeyCode::Right),
                Self::plain('n'),
                Self::code(KeyCode::PageDown),
            ],
        );
        bindings.insert(
            Action::PreviousSection,
            vec![
                Self::plain('h'),
                Self::code(KeyCode::Left),
                Self::plain('p'),
                Self::code(KeyCode::PageUp),
            ],
        );
        bindings.insert(
            Action::EditNote,
            vec![Self::plain('e'), Self::code(KeyCode::Tab)],
        );
        bindings.insert(Action::EditShiftNotes, Self::shifted('N').to_vec());
        bindings.insert(Action::Export, vec![Self::plain('s'), Self::ctrl('s')]);
        bindings.insert(Action::Reset, Self::shifted('R').to_vec());
        bindings
            .entry(Action::Confirm)
            .or_default()
            .push(Self::plain('y'));
        let mut help = Self::shifted('?').to_vec();
        help.push(Self::code(KeyCode::F(1)));
        bindings.insert(Action::ShowHelp, help);

        bindings
    }

    /// Vim bindings: hjkl only.
    fn vim_bindings() -> HashMap<Action, Vec<KeyEvent>> {
        let mut bindings = Self::common_bindings();

        bindings.insert(Action::NavigateDown, vec![Self::plain('j')]);
        bindings.insert(Action::NavigateUp, vec![Self::plain('k')]);
        bindings.insert(Action::ToggleItem, vec![Self::plain(' '), Self::plain('x')]);
        bindings.insert(Action::NextSection, vec![Self::plain('l')]);
        bindings.insert(Action::PreviousSection, vec![Self::plain('h')]);
        bindings.insert(Action::EditNote, vec![Self::plain('i'), Self::plain('a')]);
        bindings.insert(Action::EditShiftNotes, Self::shifted('N').to_vec());
        bindings.insert(Action::Export, vec![Self::plain('s')]);
        bindings.insert(Action::Reset, Self::shifted('R').to_vec());
        bindings
            .entry(Action::Confirm)
            .or_default()
            .push(Self::plain('y'));
        bindings.insert(Action::ShowHelp, Self::shifted('?').to_vec());

        bindings
    }

    /// Standard bindings: arrow keys and Ctrl shortcuts.
    fn standard_bindings() -> HashMap<Action, Vec<KeyEvent>> {
        let mut bindings = Self::common_bindings();

        bindings.insert(Action::NavigateDown, vec![Self::code(KeyCode::Down)]);
        bindings.insert(Action::NavigateUp, vec![Self::code(KeyCode::Up)]);
        bindings.insert(Action::ToggleItem, vec![Self::plain(' ')]);
        bindings.insert(
            Action::NextSection,
            vec![Self::code(KeyCode::Right), Self::code(KeyCode::PageDown)],
        );
        bindings.insert(
            Action::PreviousSection,
            vec![Self::code(KeyCode::Left), Self::code(KeyCode::PageUp)],
        );
        bindings.insert(Action::EditNote, vec![Self::code(KeyCode::Tab)]);
        bindings.insert(Action::EditShiftNotes, vec![Self::ctrl('n')]);
        bindings.insert(Action::Export, vec![Self::ctrl('s')]);
        bindings.insert(Action::Reset, vec![Self::ctrl('r')]);
        bindings.insert(Action::ShowHelp, vec![Self::code(KeyCode::F(1))]);
        if let Some(keys) = bindings.get_mut(&Action::Quit) {
            keys.push(Self::ctrl('q'));
        }

        bindings
    }
}
