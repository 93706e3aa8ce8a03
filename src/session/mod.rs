//! Session module for persisting checklist state across restarts.
//!
//! # Features
//!
//! * **Persistence**: Checked flags and justification notes are written to the
//!   key-value store after every change.
//! * **Integrity**: Each record is wrapped in an envelope with a SHA256 checksum.
//! * **Versioning**: Records carry an explicit version; unversioned records from
//!   earlier releases are migrated, unknown versions are discarded.
//! * **Tolerance**: Loading never fails; anything unusable reads as empty state.
//!
//! # Architecture
//!
//! * [`data`]: Serializable snapshot and envelope models.
//! * [`io`]: Saving, loading, restoring, and resetting.

pub mod data;
pub mod io;

pub use data::{PersistedSnapshot, SESSION_VERSION, STORAGE_KEY};
pub use io::{decode, encode, restore, SessionStore};
