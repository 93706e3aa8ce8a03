//! Snapshot export of the current section as a PNG image.
//!
//! # Overview
//!
//! Export happens in three steps:
//!
//! 1. The active section is drawn into an off-screen ratatui [`Buffer`], with
//!    the note editor replaced by a plain paragraph (no caret).
//! 2. The buffer is handed to a [`Rasterizer`] through a one-shot
//!    [`RenderRequest`].
//! 3. On success the image is written to disk and the section is cleared; on
//!    failure nothing changes.
//!
//! # Architecture
//!
//! * [`raster`]: The default cell-block rasterizer.
//! * [`snapshot`]: The exporter that ties rendering, writing, and resetting together.

pub mod raster;
pub mod snapshot;

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use image::{Rgb, RgbImage};
use ratatui::buffer::Buffer;
use thiserror::Error;

pub use raster::BlockRasterizer;
pub use snapshot::{ExportOutcome, SnapshotExporter};

/// Default file name prefix for exported images.
pub const DEFAULT_PREFIX: &str = "closing-checklist";

/// Error type for export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The rasterizer could not produce an image.
    #[error("rendering failed: {0}")]
    Render(String),

    /// Render options are out of range.
    #[error("invalid render options: {0}")]
    InvalidOptions(String),

    /// The requested section does not exist.
    #[error("section {0} does not exist")]
    NoSuchSection(usize),

    /// The output directory could not be created.
    #[error("failed to create export directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The image could not be encoded or written.
    #[error("failed to write image {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Options passed to the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Pixel multiplier applied to every cell.
    pub scale: u32,
    /// Colour used for cells without an explicit background.
    pub background: Rgb<u8>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 2,
            background: Rgb([255, 255, 255]),
        }
    }
}

impl RenderOptions {
    /// Set the scale factor.
    #[must_use]
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    /// Check that the options can be rendered.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidOptions`] for a zero or oversized scale.
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.scale == 0 {
            return Err(ExportError::InvalidOptions("scale must be at least 1".into()));
        }
        if self.scale > 16 {
            return Err(ExportError::InvalidOptions(format!(
                "scale {} is larger than the maximum of 16",
                self.scale
            )));
        }
        Ok(())
    }
}

/// Turns a rendered buffer into a bitmap.
pub trait Rasterizer {
    /// Rasterize `region`.
    ///
    /// # Errors
    ///
    /// Returns an error if the region cannot be rendered.
    fn rasterize(&self, region: &Buffer, options: &RenderOptions) -> Result<RgbImage, ExportError>;
}

/// A rendering request that can be executed exactly once.
#[derive(Debug)]
pub struct RenderRequest {
    region: Buffer,
    options: RenderOptions,
}

impl RenderRequest {
    /// Prepare a request for `region`.
    #[must_use]
    pub fn new(region: Buffer, options: RenderOptions) -> Self {
        Self { region, options }
    }

    /// Run the request, consuming it.
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid or the rasterizer fails.
    pub fn execute(self, rasterizer: &dyn Rasterizer) -> Result<RgbImage, ExportError> {
        self.options.validate()?;
        if self.region.area.is_empty() {
            return Err(ExportError::Render("nothing to render".into()));
        }
        rasterizer.rasterize(&self.region, &self.options)
    }
}

/// File name for an export taken at `timestamp`.
///
/// The timestamp is written as ISO-8601 with `:` and `T` replaced by `-`,
/// e.g. `closing-checklist_2025-09-12-21-05-33.png`.
#[must_use]
pub fn snapshot_file_name(prefix: &str, timestamp: NaiveDateTime) -> String {
    let stamp = timestamp
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
        .replace([':', 'T'], "-");
    format!("{prefix}_{stamp}.png")
}

/// First path in `dir` for `file_name` that does not exist yet.
///
/// Appends `-1`, `-2`, ... before the extension when needed.
#[must_use]
pub fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{ext}")),
        None => (file_name, String::new()),
    };

    (1..)
        .map(|n| dir.join(format!("{stem}-{n}{ext}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}
