//! The section widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::{titled_block, Theme};
use crate::checklist::{highlight, GroupEmphasis, Item, Section};

/// Which free-text field has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    /// The active section's reason for unchecked items.
    Reason,
    /// The notes for the whole shift.
    ShiftNotes,
}

/// How the free-text fields are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesPresentation {
    /// Interactive editors; the focused one shows a caret.
    Editor { focused: Option<NoteField> },
    /// Plain wrapped paragraphs, used for exported images.
    Static,
}

impl NotesPresentation {
    fn is_focused(self, field: NoteField) -> bool {
        self == Self::Editor {
            focused: Some(field),
        }
    }
}

/// Draws one section: item rows grouped by category, the reason panel, and
/// the shift notes.
#[derive(Debug, Clone)]
pub struct SectionView<'a> {
    pub section: &'a Section,
    pub shift_notes: &'a str,
    pub title: String,
    pub cursor: Option<usize>,
    pub notes: NotesPresentation,
    pub theme: Theme,
    pub accessible: bool,
}

impl<'a> SectionView<'a> {
    /// View of `section` with no cursor and static notes.
    #[must_use]
    pub fn snapshot(
        section: &'a Section,
        shift_notes: &'a str,
        title: String,
        accessible: bool,
    ) -> Self {
        Self {
            section,
            shift_notes,
            title,
            cursor: None,
            notes: NotesPresentation::Static,
            theme: Theme::light(),
            accessible,
        }
    }

    /// Whether the justification panel is drawn.
    #[must_use]
    pub fn shows_panel(&self) -> bool {
        self.section.panel.visible
            || !self.section.justification_text.trim().is_empty()
            || self.notes.is_focused(NoteField::Reason)
    }

    /// Whether the shift notes panel is drawn. Images leave it out when empty.
    #[must_use]
    pub fn shows_shift_notes(&self) -> bool {
        match self.notes {
            NotesPresentation::Editor { .. } => true,
            NotesPresentation::Static => !self.shift_notes.trim().is_empty(),
        }
    }

    /// Rows needed to draw everything at `width` without scrolling.
    #[must_use]
    pub fn required_height(&self, width: u16) -> usize {
        let inner = width.saturating_sub(2);
        let rows = self.section.items.len().max(1);
        let panel = if self.shows_panel() {
            wrapped_height(&self.panel_lines(), inner)
        } else {
            0
        };
        let shift = if self.shows_shift_notes() {
            wrapped_height(&self.shift_note_lines(), inner)
        } else {
            0
        };
        rows + panel + shift + 2
    }

    fn category_width(&self) -> usize {
        self.section
            .items
            .iter()
            .filter_map(|i| i.category.as_deref())
            .map(|c| c.chars().count())
            .max()
            .unwrap_or(0)
    }

    fn emphasis_style(&self, emphasis: GroupEmphasis) -> Style {
        match emphasis {
            GroupEmphasis::Complete => Style::default()
                .fg(self.theme.done)
                .add_modifier(Modifier::BOLD),
            GroupEmphasis::Partial => Style::default().fg(self.theme.highlight),
            GroupEmphasis::None => Style::default().fg(self.theme.muted),
        }
    }

    fn checkbox(&self, item: &Item) -> (&'static str, Style) {
        if !item.enabled {
            (
                "[-]",
                Style::default()
                    .fg(self.theme.muted)
                    .add_modifier(Modifier::CROSSED_OUT),
            )
        } else if item.checked {
            ("[x]", Style::default().fg(self.theme.done))
        } else {
            ("[ ]", Style::default().fg(self.theme.text))
        }
    }

    fn item_lines(&self) -> Vec<Line<'static>> {
        if self.section.items.is_empty() {
            return vec![Line::from(Span::styled(
                "  (no items)",
                Style::default().fg(self.theme.muted),
            ))];
        }

        let category_width = self.category_width();
        let mut lines = Vec::with_capacity(self.section.items.len());

        for group in highlight::row_groups(self.section) {
            for (n, &position) in group.positions.iter().enumerate() {
                let item = &self.section.items[position];
                let selected = self.cursor == Some(position);
                let mut spans = Vec::with_capacity(5);

                spans.push(Span::styled(
                    if selected { "> " } else { "  " },
                    Style::default().fg(self.theme.highlight),
                ));

                if category_width > 0 {
                    let category = match (&group.category, n) {
                        (Some(category), 0) => category.as_str(),
                        _ => "",
                    };
                    spans.push(Span::styled(
                        format!("{category:<category_width$}  "),
                        self.emphasis_style(group.emphasis),
                    ));
                }

                let (checkbox, style) = self.checkbox(item);
                spans.push(Span::styled(checkbox, style));
                spans.push(Span::raw(" "));

                let style = if selected {
                    style.add_modifier(Modifier::REVERSED)
                } else {
                    style
                };
                spans.push(Span::styled(item.label.clone(), style));

                lines.push(Line::from(spans));
            }
        }

        lines
    }

    /// Lines of a free-text field, with a placeholder or caret in the editor.
    fn text_lines(&self, text: &str, field: NoteField, placeholder: &str) -> Vec<Line<'static>> {
        let theme = &self.theme;
        let text_style = Style::default().fg(theme.text);
        let focused = self.notes.is_focused(field);

        if text.is_empty() && !focused {
            return match self.notes {
                NotesPresentation::Editor { .. } => vec![Line::from(Span::styled(
                    placeholder.to_string(),
                    Style::default()
                        .fg(theme.muted)
                        .add_modifier(Modifier::ITALIC),
                ))],
                NotesPresentation::Static => vec![Line::default()],
            };
        }

        let mut lines: Vec<Line<'static>> = text
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), text_style)))
            .collect();
        if focused {
            if let Some(last) = lines.last_mut() {
                last.spans.push(Span::styled(
                    "_",
                    Style::default()
                        .fg(theme.highlight)
                        .add_modifier(Modifier::SLOW_BLINK),
                ));
            }
        }
        lines
    }

    fn panel_lines(&self) -> Vec<Line<'static>> {
        let mut lines = self.text_lines(
            &self.section.justification_text,
            NoteField::Reason,
            "Write a reason for the unchecked items",
        );

        let unchecked = &self.section.panel.unchecked_labels;
        if !unchecked.is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "Unchecked:",
                Style::default().fg(self.theme.muted),
            )));
            lines.extend(unchecked.iter().map(|label| {
                Line::from(Span::styled(
                    format!("- {label}"),
                    Style::default().fg(self.theme.alert),
                ))
            }));
        }

        lines
    }

    fn shift_note_lines(&self) -> Vec<Line<'static>> {
        self.text_lines(
            self.shift_notes,
            NoteField::ShiftNotes,
            "Anything the next shift should know",
        )
    }

    fn panel_style(&self) -> (Color, &'static str) {
        if self.notes.is_focused(NoteField::Reason) {
            (self.theme.highlight, " Reason (Esc when done) ")
        } else if !self.section.panel.unchecked_labels.is_empty()
            && self.section.justification_text.trim().is_empty()
        {
            (self.theme.alert, " Reason for unchecked items ")
        } else {
            (self.theme.muted, " Reason for unchecked items ")
        }
    }

    fn shift_notes_style(&self) -> (Color, &'static str) {
        if self.notes.is_focused(NoteField::ShiftNotes) {
            (self.theme.highlight, " Shift notes (Esc when done) ")
        } else {
            (self.theme.muted, " Shift notes ")
        }
    }
}

/// Rows a bordered paragraph of `lines` needs at `width`, borders included.
fn wrapped_height(lines: &[Line<'_>], width: u16) -> usize {
    let text_width = usize::from(width.saturating_sub(2)).max(1);
    let wrapped: usize = lines
        .iter()
        .map(|line| match line.width() {
            w if w <= text_width => 1,
            // word wrapping can need a row more than a hard split
            w => w.div_ceil(text_width) + 1,
        })
        .sum();
    wrapped + 2
}

fn clamp_rows(rows: usize) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX)
}

impl Widget for SectionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = titled_block(self.accessible, format!(" {} ", self.title))
            .border_style(Style::default().fg(self.theme.frame));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = clamp_rows(self.section.items.len().max(1));
        let wanted_panel = if self.shows_panel() {
            clamp_rows(wrapped_height(&self.panel_lines(), inner.width))
        } else {
            0
        };
        let wanted_shift = if self.shows_shift_notes() {
            clamp_rows(wrapped_height(&self.shift_note_lines(), inner.width))
        } else {
            0
        };
        let (panel_height, shift_height) =
            if inner.height >= rows.saturating_add(wanted_panel).saturating_add(wanted_shift) {
                (wanted_panel, wanted_shift)
            } else {
                (
                    wanted_panel.min(inner.height / 3),
                    wanted_shift.min(inner.height / 4),
                )
            };

        let items_area = Rect {
            height: inner.height - panel_height - shift_height,
            ..inner
        };
        let panel_area = Rect {
            y: inner.y + items_area.height,
            height: panel_height,
            ..inner
        };
        let shift_area = Rect {
            y: panel_area.y + panel_height,
            height: shift_height,
            ..inner
        };

        let scroll = self
            .cursor
            .map_or(0, |c| (c + 1).saturating_sub(usize::from(items_area.height)));
        Paragraph::new(self.item_lines())
            .scroll((clamp_rows(scroll), 0))
            .render(items_area, buf);

        if panel_height > 0 {
            let (border_color, title) = self.panel_style();
            Paragraph::new(self.panel_lines())
                .wrap(Wrap { trim: false })
                .block(
                    titled_block(self.accessible, title)
                        .border_style(Style::default().fg(border_color)),
                )
                .render(panel_area, buf);
        }

        if shift_height > 0 {
            let (border_color, title) = self.shift_notes_style();
            Paragraph::new(self.shift_note_lines())
                .wrap(Wrap { trim: false })
                .block(
                    titled_block(self.accessible, title)
                        .border_style(Style::default().fg(border_color)),
                )
                .render(shift_area, buf);
        }
    }
}
