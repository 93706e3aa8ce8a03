//! TUI layout and rendering with ratatui.
//!
//! # Overview
//!
//! This module handles rendering the user interface including:
//! - Header with the date, section position, and progress
//! - The active section: grouped item rows and the justification panel
//! - A notice line and a footer with available commands
//! - Modal dialogs for reset confirmation, errors, and help
//!
//! The section itself is drawn by [`SectionView`] from [`crate::render`].
//!
//! # Example
//!
//! ```no_run
//! use closecheck::tui::app::App;
//! use closecheck::tui::ui::render;
//! use ratatui::Frame;
//!
//! fn draw(frame: &mut Frame, app: &App) {
//!     render(frame, app);
//! }
//! ```

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use super::app::{Action, App, AppMode, Notice};
use super::keybindings::KeyBindings;
use crate::render::{
    bordered_block, titled_block, NoteField, NotesPresentation, SectionView, Theme,
};

// ==================== Frame Rendering ====================

/// Render the TUI based on current application state.
///
/// # Arguments
///
/// * `frame` - The ratatui frame to render to
/// * `app` - The application state to render
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(0),    // Section
            Constraint::Length(1), // Notice
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_section(frame, app, chunks[1]);
    render_notice(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);

    match app.mode() {
        AppMode::ConfirmingReset => render_confirm_dialog(frame, app, area),
        AppMode::ShowingHelp => render_help_dialog(frame, app, area),
        _ => {}
    }

    if app.error_message().is_some() {
        render_error_dialog(frame, app, area);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let section = app.current_section();
    let navigator = app.navigator();

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "Closing checklist",
                Style::default()
                    .fg(theme.frame)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", app.today()), Style::default().fg(theme.muted)),
        ]),
        Line::from(vec![
            Span::styled(
                format!(
                    "Section {}/{}: {}",
                    navigator.current_index() + 1,
                    navigator.section_count(),
                    section.title
                ),
                Style::default().fg(theme.text),
            ),
            Span::styled(
                format!(
                    "  [{}/{} checked]",
                    section.checked_count(),
                    section.items.len()
                ),
                Style::default().fg(theme.highlight),
            ),
        ]),
    ];

    let header = Paragraph::new(lines).alignment(Alignment::Center).block(
        bordered_block(app.is_accessible()).border_style(Style::default().fg(theme.frame)),
    );
    frame.render_widget(header, area);
}

fn render_section(frame: &mut Frame, app: &App, area: Rect) {
    let section = app.current_section();
    let focused = match app.mode() {
        AppMode::EditingNote => Some(NoteField::Reason),
        AppMode::EditingShiftNotes => Some(NoteField::ShiftNotes),
        _ => None,
    };
    let view = SectionView {
        section,
        shift_notes: app.checklist().shift_notes(),
        title: section.title.clone(),
        cursor: Some(app.cursor()),
        notes: NotesPresentation::Editor { focused },
        theme: *app.theme(),
        accessible: app.is_accessible(),
    };
    frame.render_widget(view, area);
}

fn render_notice(frame: &mut Frame, app: &App, area: Rect) {
    let Some(notice) = app.notice() else {
        return;
    };
    let style = match notice {
        Notice::Warning(_) => Style::default()
            .fg(app.theme().alert)
            .add_modifier(Modifier::BOLD),
        Notice::Info(_) => Style::default().fg(app.theme().done),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(notice.text().to_string(), style))
            .alignment(Alignment::Center),
        area,
    );
}

/// Render the footer with available commands.
///
/// Hints follow the active keybinding profile, and the previous/next hints
/// appear only when that navigation is possible.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let commands = get_footer_commands(app);
    let theme = app.theme();

    let spans: Vec<Span> = commands
        .into_iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(
                    format!("[{key}]"),
                    Style::default()
                        .fg(theme.highlight)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{desc} "), Style::default().fg(theme.text)),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(bordered_block(app.is_accessible()).border_style(Style::default().fg(theme.muted)));

    frame.render_widget(footer, area);
}

fn get_footer_commands(app: &App) -> Vec<(String, &'static str)> {
    let default_bindings;
    let bindings = match app.keybindings() {
        Some(bindings) => bindings,
        None => {
            default_bindings = KeyBindings::default();
            &default_bindings
        }
    };
    let hint = |action: Action| (bindings.key_hint(&action), action.description());

    match app.mode() {
        AppMode::Checking => {
            let controls = app.navigator().controls();
            let mut commands = vec![hint(Action::ToggleItem)];
            if controls.retreat_visible {
                commands.push(hint(Action::PreviousSection));
            }
            if controls.advance_visible {
                commands.push(hint(Action::NextSection));
            }
            commands.extend([
                hint(Action::EditNote),
                hint(Action::EditShiftNotes),
                hint(Action::Export),
                hint(Action::Reset),
                hint(Action::ShowHelp),
                hint(Action::Quit),
            ]);
            commands
        }
        AppMode::EditingNote | AppMode::EditingShiftNotes => vec![
            ("Esc".to_string(), "Done"),
            ("Enter".to_string(), "New line"),
            ("Backspace".to_string(), "Delete"),
        ],
        AppMode::ConfirmingReset => vec![hint(Action::Confirm), hint(Action::Cancel)],
        AppMode::ShowingHelp => vec![("any key".to_string(), "Close")],
        AppMode::Quitting => vec![],
    }
}

// ==================== Dialogs ====================

fn render_confirm_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let dialog_area = centered_rect(60, 40, area);
    frame.render_widget(Clear, dialog_area);
    let theme = app.theme();

    let lines = vec![
        Line::from(Span::styled(
            "Clear the whole checklist?",
            Style::default()
                .fg(theme.alert)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Every check and every reason in every section will be removed."),
        Line::from(Span::styled(
            "This cannot be undone.",
            Style::default().fg(theme.highlight),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] Confirm    [Esc] Cancel",
            Style::default().fg(theme.frame),
        )),
    ];

    let confirm = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            titled_block(app.is_accessible(), "Confirm")
                .border_style(Style::default().fg(theme.alert)),
        );

    frame.render_widget(confirm, dialog_area);
}

fn render_error_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let dialog_area = centered_rect(60, 30, area);
    frame.render_widget(Clear, dialog_area);

    let message = app.error_message().unwrap_or("Unknown error");

    let error = Paragraph::new(vec![
        Line::from(Span::styled(
            "Error",
            Style::default()
                .fg(app.theme().alert)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to dismiss",
            Style::default().fg(app.theme().muted),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(bordered_block(app.is_accessible()).border_style(Style::default().fg(app.theme().alert)));

    frame.render_widget(error, dialog_area);
}

fn render_help_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let dialog_area = centered_rect(70, 80, area);
    frame.render_widget(Clear, dialog_area);
    let theme = app.theme();

    let default_bindings;
    let bindings = match app.keybindings() {
        Some(bindings) => bindings,
        None => {
            default_bindings = KeyBindings::default();
            &default_bindings
        }
    };

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Keybinding Reference",
            Style::default()
                .fg(theme.frame)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Profile: ", Style::default().fg(theme.muted)),
            Span::styled(
                bindings.profile().display_name(),
                Style::default()
                    .fg(theme.highlight)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    for name in Action::all_names() {
        let Ok(action) = name.parse::<Action>() else {
            continue;
        };
        let keys: Vec<String> = bindings
            .keys_for_action(&action)
            .iter()
            .map(KeyBindings::format_key)
            .collect();
        if keys.is_empty() {
            continue;
        }
        lines.push(format_help_line(theme, &keys.join(", "), action.description()));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "In a note editor: type freely, Enter for a new line, Esc or Tab when done",
        Style::default().fg(theme.muted),
    )));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    let help = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(
            titled_block(app.is_accessible(), "Help")
                .border_style(Style::default().fg(theme.frame)),
        );

    frame.render_widget(help, dialog_area);
}

fn format_help_line(theme: &Theme, keys: &str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {keys:>18}"),
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {desc}"), Style::default().fg(theme.text)),
    ])
}

/// Create a centered rectangle with given percentage of parent.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
