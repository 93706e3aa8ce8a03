//! Colour palettes.
//!
//! Exported snapshots always use [`Theme::light`] so they read well on white.

use ratatui::style::Color;

/// Colours used by the checklist screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Borders and headings.
    pub frame: Color,
    /// Cursor row and partially complete groups.
    pub highlight: Color,
    /// Unchecked items, refusals, and errors.
    pub alert: Color,
    /// Checked items and complete groups.
    pub done: Color,
    /// Disabled items and key hints.
    pub muted: Color,
    pub text: Color,
    /// Text drawn on a `highlight` background.
    pub on_highlight: Color,
}

impl Theme {
    #[must_use]
    pub fn dark() -> Self {
        Self {
            frame: Color::Cyan,
            highlight: Color::Yellow,
            alert: Color::LightRed,
            done: Color::LightGreen,
            muted: Color::DarkGray,
            text: Color::White,
            on_highlight: Color::Black,
        }
    }

    #[must_use]
    pub fn light() -> Self {
        Self {
            frame: Color::Blue,
            highlight: Color::Magenta,
            alert: Color::Red,
            done: Color::Green,
            muted: Color::Gray,
            text: Color::Black,
            on_highlight: Color::White,
        }
    }

    /// Light palette on terminals that report a light background, dark otherwise.
    #[must_use]
    pub fn auto() -> Self {
        if background_is_light(std::env::var("COLORFGBG").ok().as_deref()) {
            Self::light()
        } else {
            Self::dark()
        }
    }

    #[must_use]
    pub fn is_light(&self) -> bool {
        self.text == Color::Black
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Reads the background index from a `COLORFGBG` value such as `"0;15"`.
fn background_is_light(colorfgbg: Option<&str>) -> bool {
    colorfgbg
        .and_then(|value| value.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .is_some_and(|bg| matches!(bg, 7 | 9..=15))
}
