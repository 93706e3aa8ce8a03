//! Reading and writing the persisted checklist record.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::checklist::{gate, pairs, Checklist};
use crate::navigator::SectionNavigator;
use crate::session::data::{
    LegacyRecord, PersistedSnapshot, SessionEnvelope, SnapshotV1, SESSION_VERSION, STORAGE_KEY,
};
use crate::store::KeyValueStore;

/// Session persistence on top of a key-value store.
#[derive(Debug)]
pub struct SessionStore<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Persist under [`STORAGE_KEY`].
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Key the record is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write the current state of `checklist`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or written.
    pub fn save(&mut self, checklist: &Checklist) -> Result<()> {
        let snapshot = PersistedSnapshot::capture(checklist);
        let record = encode(&snapshot)?;
        self.store
            .set(&self.key, &record)
            .with_context(|| format!("Failed to save checklist state under '{}'", self.key))?;
        log::trace!(
            "Saved {} flags and {} notes",
            snapshot.checked_flags.len(),
            snapshot.justification_texts.len()
        );
        Ok(())
    }

    /// Read the persisted snapshot.
    ///
    /// Missing, unreadable, malformed, tampered, or unsupported records all
    /// yield an empty snapshot; the cause is logged.
    #[must_use]
    pub fn load(&self) -> PersistedSnapshot {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("No saved checklist state under '{}'", self.key);
                return PersistedSnapshot::empty();
            }
            Err(e) => {
                log::warn!("Could not read saved checklist state: {}", e);
                return PersistedSnapshot::empty();
            }
        };

        match decode(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Ignoring saved checklist state: {:#}", e);
                PersistedSnapshot::empty()
            }
        }
    }

    /// Clear everything, delete the record, and return to the first section.
    ///
    /// Callers are responsible for obtaining confirmation first.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be deleted. The in-memory state
    /// is cleared regardless.
    pub fn reset_all(
        &mut self,
        checklist: &mut Checklist,
        navigator: &mut SectionNavigator,
    ) -> Result<()> {
        checklist.clear_all();
        navigator.jump_to_start(checklist);
        log::info!("Checklist reset");

        self.store
            .remove(&self.key)
            .with_context(|| format!("Failed to delete saved state under '{}'", self.key))
    }
}

/// Apply `snapshot` to `checklist` and re-run the derived rules.
///
/// Flags are applied by flattened index; missing entries count as unchecked
/// and extra entries are ignored. Texts are applied by section index. The
/// shift notes are replaced.
pub fn restore(checklist: &mut Checklist, snapshot: &PersistedSnapshot) {
    let item_count = checklist.item_count();
    if snapshot.checked_flags.len() != item_count {
        log::debug!(
            "Saved state has {} flags for {} items",
            snapshot.checked_flags.len(),
            item_count
        );
    }

    for (index, item) in checklist.items_mut().enumerate() {
        item.checked = snapshot.checked_flags.get(index).copied().unwrap_or(false);
        item.enabled = true;
    }

    for (index, section) in checklist.sections_mut().iter_mut().enumerate() {
        section.justification_text = snapshot
            .justification_texts
            .get(index)
            .cloned()
            .unwrap_or_default();
    }
    checklist.set_shift_notes(snapshot.shift_notes.clone());

    pairs::enforce_all(checklist);
    gate::refresh_all(checklist);
}

/// Serialize a snapshot into the versioned, checksummed record.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(snapshot: &PersistedSnapshot) -> Result<String> {
    let envelope = SessionEnvelope {
        version: SESSION_VERSION,
        saved_at: Utc::now(),
        checksum: checksum(snapshot)?,
        snapshot: snapshot.clone(),
    };
    serde_json::to_string(&envelope).context("Failed to serialize checklist state")
}

/// Parse a stored record, migrating legacy shapes.
///
/// # Errors
///
/// Returns an error if the record is malformed, fails its integrity check, or
/// carries an unsupported version.
pub fn decode(raw: &str) -> Result<PersistedSnapshot> {
    let value: Value = serde_json::from_str(raw).context("Saved state is not valid JSON")?;

    let Some(object) = value.as_object() else {
        anyhow::bail!("Saved state is not a JSON object");
    };

    if let Some(version) = object.get("version").cloned() {
        return match version.as_u64() {
            Some(v) if v == u64::from(SESSION_VERSION) => verified::<PersistedSnapshot>(value),
            Some(1) => {
                log::info!("Migrating version 1 saved state to version {}", SESSION_VERSION);
                verified::<SnapshotV1>(value).map(PersistedSnapshot::from)
            }
            _ => anyhow::bail!(
                "Unsupported saved state version: {}. Current version is {}.",
                version,
                SESSION_VERSION
            ),
        };
    }

    if object.contains_key("state") {
        let legacy: LegacyRecord =
            serde_json::from_value(value).context("Failed to parse legacy saved state")?;
        log::info!("Migrating unversioned saved state to version {}", SESSION_VERSION);
        return Ok(legacy.into());
    }

    anyhow::bail!("Saved state has an unrecognized shape")
}

/// Parse an envelope holding a `T` snapshot and check its checksum.
fn verified<T: Serialize + DeserializeOwned>(value: Value) -> Result<T> {
    let envelope: SessionEnvelope<T> =
        serde_json::from_value(value).context("Failed to parse saved state envelope")?;
    if checksum(&envelope.snapshot)? != envelope.checksum {
        anyhow::bail!("Saved state integrity check failed: checksum mismatch");
    }
    Ok(envelope.snapshot)
}

fn checksum<T: Serialize>(snapshot: &T) -> Result<String> {
    let json =
        serde_json::to_string(snapshot).context("Failed to serialize state for checksum")?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
