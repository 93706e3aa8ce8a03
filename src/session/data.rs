//! Data structures for the persisted checklist record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checklist::Checklist;

/// Current version of the persisted record format.
///
/// Version 2 added the shift notes; version 1 records are still read.
pub const SESSION_VERSION: u32 = 2;

/// Fixed key under which the record is stored.
pub const STORAGE_KEY: &str = "checklist_state";

/// Checked flags, justification texts, and shift notes captured from a
/// checklist.
///
/// `checked_flags` is index-aligned with the flattened item enumeration
/// (sections in order, items in order within each section) and
/// `justification_texts` with the sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    /// Checked flag per item, flattened.
    #[serde(default)]
    pub checked_flags: Vec<bool>,
    /// Justification note per section.
    #[serde(default)]
    pub justification_texts: Vec<String>,
    /// Notes for the whole shift.
    #[serde(default)]
    pub shift_notes: String,
}

impl PersistedSnapshot {
    /// A snapshot with nothing checked and no notes.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture the persistable state of `checklist`.
    #[must_use]
    pub fn capture(checklist: &Checklist) -> Self {
        Self {
            checked_flags: checklist.checked_flags(),
            justification_texts: checklist.justification_texts(),
            shift_notes: checklist.shift_notes().to_string(),
        }
    }

    /// Whether the snapshot carries no state at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.checked_flags.iter().any(|&c| c)
            && self.justification_texts.iter().all(String::is_empty)
            && self.shift_notes.is_empty()
    }
}

/// Versioned envelope written to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEnvelope<T = PersistedSnapshot> {
    /// Format version.
    pub version: u32,
    /// When the record was written.
    pub saved_at: DateTime<Utc>,
    /// SHA256 checksum of the compact snapshot JSON.
    pub checksum: String,
    /// The persisted state.
    pub snapshot: T,
}

/// Snapshot shape of version 1 envelopes, which had no shift notes.
///
/// Its checksum covers exactly these two fields, so it is verified in this
/// shape before conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotV1 {
    #[serde(default)]
    pub checked_flags: Vec<bool>,
    #[serde(default)]
    pub justification_texts: Vec<String>,
}

impl From<SnapshotV1> for PersistedSnapshot {
    fn from(v1: SnapshotV1) -> Self {
        Self {
            checked_flags: v1.checked_flags,
            justification_texts: v1.justification_texts,
            shift_notes: String::new(),
        }
    }
}

/// Unversioned record shape written by earlier releases.
///
/// The oldest shape has only `state`; a later one added `reasons`.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyRecord {
    /// Checked flag per item, flattened.
    pub state: Vec<bool>,
    /// Justification note per section.
    #[serde(default)]
    pub reasons: Option<Vec<String>>,
}

impl From<LegacyRecord> for PersistedSnapshot {
    fn from(legacy: LegacyRecord) -> Self {
        Self {
            checked_flags: legacy.state,
            justification_texts: legacy.reasons.unwrap_or_default(),
            shift_notes: String::new(),
        }
    }
}
