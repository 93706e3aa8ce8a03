//! JSON-file backed key-value store.
//!
//! All keys live in one JSON object on disk. Every write rewrites the whole
//! file through a temporary sibling and a rename so a crash mid-write never
//! leaves a truncated store behind.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use directories::ProjectDirs;

use super::{KeyValueStore, StoreError, StoreResult};

/// File name used inside the platform data directory.
const STORE_FILE_NAME: &str = "store.json";

/// Key-value store persisted as a JSON object file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open a store at an explicit path. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default platform-specific store path.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "closecheck", "closecheck")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.data_dir().join(STORE_FILE_NAME))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> StoreResult<BTreeMap<String, String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Corrupted {
            path: self.path.clone(),
            source,
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        let write_err = |source: io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| write_err(io::Error::from(e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content).map_err(write_err)?;
        fs::rename(&tmp_path, &self.path).map_err(write_err)?;

        log::trace!("Wrote {} key(s) to {}", entries.len(), self.path.display());
        Ok(())
    }

    /// Read entries for a mutation, starting over if the file is corrupted.
    fn entries_for_update(&self) -> StoreResult<BTreeMap<String, String>> {
        match self.read_entries() {
            Err(StoreError::Corrupted { path, source }) => {
                log::warn!(
                    "Store file {} is corrupted ({}), starting fresh",
                    path.display(),
                    source
                );
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries_for_update()?;
        if entries.remove(key).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}
