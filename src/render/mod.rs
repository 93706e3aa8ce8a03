//! Drawing a checklist section with ratatui.
//!
//! Shared by the interactive screen and the image exporter: the screen draws
//! [`SectionView`] into the terminal frame, the exporter into an off-screen
//! buffer through [`section_snapshot`].
//!
//! * [`section`]: The section widget (item rows, reason panel, shift notes).
//! * [`theme`]: Colour palettes.

pub mod section;
pub mod theme;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::border,
    text::Line,
    widgets::{Block, Borders, Widget},
};
use thiserror::Error;

pub use section::{NoteField, NotesPresentation, SectionView};
pub use theme::Theme;

/// Width of exported section images, in cells.
pub const SNAPSHOT_WIDTH: u16 = 72;

/// Largest buffer ratatui can hold without clipping the area.
pub const MAX_SNAPSHOT_CELLS: usize = u16::MAX as usize;

/// The section does not fit into a single off-screen buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "section needs {width}x{height} cells, more than the {max} one image can hold",
    max = MAX_SNAPSHOT_CELLS
)]
pub struct SnapshotTooLarge {
    pub width: u16,
    pub height: usize,
}

/// Plain ASCII borders for screen readers and limited terminals.
const ASCII_BORDER_SET: border::Set = border::Set {
    top_left: "+",
    top_right: "+",
    bottom_left: "+",
    bottom_right: "+",
    vertical_left: "|",
    vertical_right: "|",
    horizontal_top: "-",
    horizontal_bottom: "-",
};

fn border_set(accessible: bool) -> border::Set {
    if accessible {
        ASCII_BORDER_SET
    } else {
        border::ROUNDED
    }
}

/// Bordered block with rounded or ASCII corners.
#[must_use]
pub fn bordered_block(accessible: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(border_set(accessible))
}

#[must_use]
pub fn titled_block<'a>(accessible: bool, title: impl Into<Line<'a>>) -> Block<'a> {
    bordered_block(accessible).title(title)
}

/// Draw `view` into a new off-screen buffer sized to fit all of it.
///
/// # Errors
///
/// Returns [`SnapshotTooLarge`] when the whole section would need more cells
/// than a buffer can hold. Nothing is drawn in that case, so no partial image
/// can be produced.
pub fn section_snapshot(view: SectionView<'_>) -> Result<Buffer, SnapshotTooLarge> {
    let height = view.required_height(SNAPSHOT_WIDTH);
    let too_large = SnapshotTooLarge {
        width: SNAPSHOT_WIDTH,
        height,
    };
    if usize::from(SNAPSHOT_WIDTH).saturating_mul(height) > MAX_SNAPSHOT_CELLS {
        return Err(too_large);
    }
    let rows = u16::try_from(height).map_err(|_| too_large)?;

    let area = Rect::new(0, 0, SNAPSHOT_WIDTH, rows);
    let mut buf = Buffer::empty(area);
    view.render(area, &mut buf);
    Ok(buf)
}
