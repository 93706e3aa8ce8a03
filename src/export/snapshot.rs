//! Exporting the active section and resetting it afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use super::{
    snapshot_file_name, unique_path, BlockRasterizer, ExportError, Rasterizer, RenderOptions,
    RenderRequest, DEFAULT_PREFIX,
};
use crate::checklist::{gate, pairs, Checklist};
use crate::navigator::SectionNavigator;
use crate::render::{section_snapshot, SectionView};
use crate::session::SessionStore;
use crate::store::KeyValueStore;

/// What a successful export did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// Where the image was written.
    pub path: PathBuf,
    /// The section that was exported and cleared.
    pub section_index: usize,
    /// Whether the navigator moved on afterwards.
    pub advanced: bool,
}

/// Renders sections to PNG files.
pub struct SnapshotExporter {
    rasterizer: Box<dyn Rasterizer>,
    output_dir: PathBuf,
    prefix: String,
    options: RenderOptions,
    ascii_borders: bool,
}

impl std::fmt::Debug for SnapshotExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotExporter")
            .field("output_dir", &self.output_dir)
            .field("prefix", &self.prefix)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl SnapshotExporter {
    /// Exporter writing to `output_dir` with the block rasterizer and default options.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            rasterizer: Box::new(BlockRasterizer::default()),
            output_dir: output_dir.into(),
            prefix: DEFAULT_PREFIX.to_string(),
            options: RenderOptions::default(),
            ascii_borders: false,
        }
    }

    #[must_use]
    pub fn with_rasterizer(mut self, rasterizer: Box<dyn Rasterizer>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_ascii_borders(mut self, ascii_borders: bool) -> Self {
        self.ascii_borders = ascii_borders;
        self
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Build the render request for section `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NoSuchSection`] for an out-of-range index and
    /// [`ExportError::Render`] if the section is too long for one image.
    pub fn request(&self, checklist: &Checklist, index: usize) -> Result<RenderRequest, ExportError> {
        let section = checklist
            .section(index)
            .ok_or(ExportError::NoSuchSection(index))?;
        let title = format!(
            "{} | {}",
            section.title,
            Local::now().format("%Y-%m-%d %H:%M")
        );
        let view =
            SectionView::snapshot(section, checklist.shift_notes(), title, self.ascii_borders);
        let region = section_snapshot(view).map_err(|e| ExportError::Render(e.to_string()))?;
        Ok(RenderRequest::new(region, self.options))
    }

    /// Export the navigator's current section.
    ///
    /// On success the image is written, the section's items and note are
    /// cleared, the state is saved, and the navigator advances unless it is
    /// on the last section. The shift notes are kept for the next section. On failure the error is logged and nothing in
    /// `checklist`, `navigator`, or `session` changes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing the image fails.
    pub fn export_current_section<S: KeyValueStore>(
        &self,
        checklist: &mut Checklist,
        navigator: &mut SectionNavigator,
        session: &mut SessionStore<S>,
    ) -> Result<ExportOutcome, ExportError> {
        let index = navigator.current_index();
        let path = self.render_to_file(checklist, index).map_err(|e| {
            log::error!("Export of section {} failed: {}", index, e);
            e
        })?;

        if let Some(section) = checklist.section_mut(index) {
            section.clear();
        }
        // partners in other sections may have been disabled by a cleared item
        pairs::enforce_all(checklist);
        gate::refresh_all(checklist);

        if let Err(e) = session.save(checklist) {
            log::warn!("{:#}", e);
        }
        let advanced = navigator.advance(checklist);

        log::info!("Exported section {} to {}", index, path.display());
        Ok(ExportOutcome {
            path,
            section_index: index,
            advanced,
        })
    }

    fn render_to_file(&self, checklist: &Checklist, index: usize) -> Result<PathBuf, ExportError> {
        let image = self.request(checklist, index)?.execute(self.rasterizer.as_ref())?;

        fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let file_name = snapshot_file_name(&self.prefix, Local::now().naive_local());
        let path = unique_path(&self.output_dir, &file_name);
        image
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}
