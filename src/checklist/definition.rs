//! Checklist definition files.
//!
//! A definition describes the static structure of a checklist: ordered
//! sections, ordered items with labels and optional row-group categories, and
//! the exclusivity pairs between items. It is read once at startup and turned
//! into a [`Checklist`](super::Checklist) by the registry.
//!
//! # Format
//!
//! ```toml
//! pairs = [["mop", "wetwipe"]]
//!
//! [[sections]]
//! title = "Hall"
//!
//! [[sections.items]]
//! id = "mop"
//! label = "Mop the hard floor"
//! category = "Floor"
//!
//! [[sections.items]]
//! id = "wetwipe"
//! label = "Wet-wipe the hard floor"
//! category = "Floor"
//! ```

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The checklist compiled into the binary.
pub const BUILTIN_CHECKLIST: &str = include_str!("../../assets/default_checklist.toml");

/// Error type for loading and validating definitions.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The definition file could not be read.
    #[error("failed to read checklist definition {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The definition is not valid TOML or has the wrong shape.
    #[error("invalid checklist definition: {0}")]
    Parse(#[from] toml::de::Error),

    /// A checklist needs at least one section to navigate.
    #[error("checklist definition has no sections")]
    NoSections,

    /// An item has an empty id.
    #[error("item {position} in section '{section}' has an empty id")]
    EmptyId { section: String, position: usize },

    /// Two items share an id.
    #[error("duplicate item id: '{0}'")]
    DuplicateId(String),

    /// A pair names an id that no item has.
    #[error("exclusivity pair references unknown item '{0}'")]
    UnknownPairMember(String),

    /// A pair names the same item twice.
    #[error("item '{0}' cannot be paired with itself")]
    SelfPair(String),

    /// An item appears in more than one pair.
    #[error("item '{0}' appears in more than one exclusivity pair")]
    MultiplePairs(String),
}

/// Static description of a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistDefinition {
    /// Item id pairs of which at most one may be checked.
    #[serde(default)]
    pub pairs: Vec<[String; 2]>,
    /// Ordered sections.
    #[serde(default)]
    pub sections: Vec<SectionDefinition>,
}

/// Static description of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDefinition {
    /// Heading shown above the section.
    pub title: String,
    /// Ordered items.
    #[serde(default)]
    pub items: Vec<ItemDefinition>,
}

/// Static description of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Stable identifier, unique across the checklist.
    pub id: String,
    /// Text shown next to the checkbox.
    #[serde(default)]
    pub label: String,
    /// Row group this item belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ChecklistDefinition {
    /// The built-in closing checklist.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded definition is broken, which the test suite
    /// guards against.
    pub fn builtin() -> Result<Self, DefinitionError> {
        Self::from_toml_str(BUILTIN_CHECKLIST)
    }

    /// Parse and validate a definition from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid definition.
    pub fn from_toml_str(content: &str) -> Result<Self, DefinitionError> {
        let definition: Self = toml::from_str(content)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Read, parse, and validate a definition file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid definition.
    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        let content = fs::read_to_string(path).map_err(|source| DefinitionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loading checklist definition from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Load from `path` if given, otherwise use the built-in checklist.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected definition is invalid.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, DefinitionError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.sections.is_empty() {
            return Err(DefinitionError::NoSections);
        }

        let mut ids = HashSet::new();
        for section in &self.sections {
            for (position, item) in section.items.iter().enumerate() {
                if item.id.trim().is_empty() {
                    return Err(DefinitionError::EmptyId {
                        section: section.title.clone(),
                        position,
                    });
                }
                if !ids.insert(item.id.as_str()) {
                    return Err(DefinitionError::DuplicateId(item.id.clone()));
                }
            }
        }

        let mut paired = HashSet::new();
        for [first, second] in &self.pairs {
            if first == second {
                return Err(DefinitionError::SelfPair(first.clone()));
            }
            for id in [first, second] {
                if !ids.contains(id.as_str()) {
                    return Err(DefinitionError::UnknownPairMember(id.clone()));
                }
                if !paired.insert(id.as_str()) {
                    return Err(DefinitionError::MultiplePairs(id.clone()));
                }
            }
        }

        Ok(())
    }

    /// Total number of items across all sections.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}
