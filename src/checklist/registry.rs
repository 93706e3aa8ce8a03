//! Item registry: the in-memory model of the checklist.
//!
//! The registry is the single source of truth for checked and enabled flags,
//! labels, justification notes, and the shift notes. The terminal front-end and the snapshot
//! exporter only read from it.

use std::collections::HashMap;

use serde::Serialize;

use super::definition::ChecklistDefinition;

/// Label shown for items whose definition has no label text.
pub const UNLABELED_ITEM: &str = "(unlabeled item)";

/// Position of an item: section index plus position within the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ItemRef {
    /// Index of the owning section.
    pub section: usize,
    /// Position within the section's item list.
    pub position: usize,
}

impl ItemRef {
    /// Create a new item reference.
    #[must_use]
    pub fn new(section: usize, position: usize) -> Self {
        Self { section, position }
    }
}

/// A single checkable task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Stable identifier from the definition.
    pub id: String,
    /// Display label, resolved once at construction.
    pub label: String,
    /// Row group this item belongs to.
    pub category: Option<String>,
    /// Whether the item is ticked.
    pub checked: bool,
    /// Whether the item can currently be ticked.
    pub enabled: bool,
    /// Index of the owning section.
    pub section_index: usize,
}

impl Item {
    /// Whether this item counts as outstanding for the justification gate.
    #[must_use]
    pub fn is_outstanding(&self) -> bool {
        self.enabled && !self.checked
    }

    /// Clear the item back to its initial state.
    pub fn clear(&mut self) {
        self.checked = false;
        self.enabled = true;
    }
}

/// Display state of a section's justification panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JustificationPanel {
    /// Whether the panel is shown.
    pub visible: bool,
    /// Labels of unchecked items, as last evaluated.
    pub unchecked_labels: Vec<String>,
}

impl JustificationPanel {
    /// Hide the panel and drop the displayed list.
    pub fn clear(&mut self) {
        self.visible = false;
        self.unchecked_labels.clear();
    }
}

/// One page of the checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Position in the checklist.
    pub index: usize,
    /// Heading.
    pub title: String,
    /// Ordered items.
    pub items: Vec<Item>,
    /// Free-text reason for leaving items unchecked.
    pub justification_text: String,
    /// Whether this is the section currently shown.
    pub is_active: bool,
    /// Unchecked-items panel state.
    pub panel: JustificationPanel,
}

impl Section {
    /// Number of checked items.
    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.items.iter().filter(|i| i.checked).count()
    }

    /// Clear every item, the note, and the panel.
    pub fn clear(&mut self) {
        for item in &mut self.items {
            item.clear();
        }
        self.justification_text.clear();
        self.panel.clear();
    }
}

/// A resolved exclusivity relation between two items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExclusivityPair {
    /// First-listed member; wins when both are found checked.
    pub first: ItemRef,
    /// Second-listed member.
    pub second: ItemRef,
}

impl ExclusivityPair {
    /// The other member of the pair, if `item` is a member.
    #[must_use]
    pub fn partner_of(&self, item: ItemRef) -> Option<ItemRef> {
        if item == self.first {
            Some(self.second)
        } else if item == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

/// The full checklist model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checklist {
    sections: Vec<Section>,
    pairs: Vec<ExclusivityPair>,
    /// Free-form notes for the whole shift, shown under every section.
    shift_notes: String,
    #[serde(skip)]
    ids: HashMap<String, ItemRef>,
}

impl Checklist {
    /// Build the registry from a validated definition.
    ///
    /// All items start unchecked and enabled; the first section is active.
    #[must_use]
    pub fn from_definition(definition: &ChecklistDefinition) -> Self {
        let mut ids = HashMap::new();

        let sections: Vec<Section> = definition
            .sections
            .iter()
            .enumerate()
            .map(|(index, section_def)| {
                let items = section_def
                    .items
                    .iter()
                    .enumerate()
                    .map(|(position, item_def)| {
                        ids.insert(item_def.id.clone(), ItemRef::new(index, position));
                        let label = item_def.label.trim();
                        Item {
                            id: item_def.id.clone(),
                            label: if label.is_empty() {
                                UNLABELED_ITEM.to_string()
                            } else {
                                label.to_string()
                            },
                            category: item_def.category.clone(),
                            checked: false,
                            enabled: true,
                            section_index: index,
                        }
                    })
                    .collect();

                Section {
                    index,
                    title: section_def.title.clone(),
                    items,
                    justification_text: String::new(),
                    is_active: index == 0,
                    panel: JustificationPanel::default(),
                }
            })
            .collect();

        let pairs = definition
            .pairs
            .iter()
            .filter_map(|[first, second]| {
                Some(ExclusivityPair {
                    first: *ids.get(first)?,
                    second: *ids.get(second)?,
                })
            })
            .collect();

        let checklist = Self {
            sections,
            pairs,
            shift_notes: String::new(),
            ids,
        };

        log::debug!(
            "Registry built: {} sections, {} items, {} pairs",
            checklist.section_count(),
            checklist.item_count(),
            checklist.pairs.len()
        );

        checklist
    }

    // ==================== Sections ====================

    /// All sections in order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of sections.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Section at `index`.
    #[must_use]
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Mutable section at `index`.
    pub fn section_mut(&mut self, index: usize) -> Option<&mut Section> {
        self.sections.get_mut(index)
    }

    /// Mutable access to all sections.
    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    /// Mark exactly one section active.
    pub fn activate(&mut self, index: usize) {
        for section in &mut self.sections {
            section.is_active = section.index == index;
        }
    }

    /// Index of the active section.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.sections.iter().position(|s| s.is_active)
    }

    // ==================== Items ====================

    /// Total number of items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    /// Item at `item`.
    #[must_use]
    pub fn item(&self, item: ItemRef) -> Option<&Item> {
        self.sections.get(item.section)?.items.get(item.position)
    }

    /// Mutable item at `item`.
    pub fn item_mut(&mut self, item: ItemRef) -> Option<&mut Item> {
        self.sections
            .get_mut(item.section)?
            .items
            .get_mut(item.position)
    }

    /// Look up an item by its definition id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<ItemRef> {
        self.ids.get(id).copied()
    }

    /// All items in flattened document order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    /// All items in flattened document order, mutably.
    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.sections.iter_mut().flat_map(|s| s.items.iter_mut())
    }

    /// References to all items in flattened document order.
    #[must_use]
    pub fn item_refs(&self) -> Vec<ItemRef> {
        self.sections
            .iter()
            .flat_map(|s| (0..s.items.len()).map(move |p| ItemRef::new(s.index, p)))
            .collect()
    }

    /// Checked flags in flattened document order.
    #[must_use]
    pub fn checked_flags(&self) -> Vec<bool> {
        self.items().map(|i| i.checked).collect()
    }

    /// Justification texts in section order.
    #[must_use]
    pub fn justification_texts(&self) -> Vec<String> {
        self.sections
            .iter()
            .map(|s| s.justification_text.clone())
            .collect()
    }

    /// Set an item's checked flag as a user action.
    ///
    /// Returns `false` without changing anything if the item does not exist
    /// or is disabled.
    pub fn set_checked(&mut self, item: ItemRef, checked: bool) -> bool {
        match self.item_mut(item) {
            Some(entry) if entry.enabled => {
                entry.checked = checked;
                true
            }
            Some(entry) => {
                log::debug!("Refusing to change disabled item '{}'", entry.id);
                false
            }
            None => false,
        }
    }

    // ==================== Shift Notes ====================

    #[must_use]
    pub fn shift_notes(&self) -> &str {
        &self.shift_notes
    }

    pub fn shift_notes_mut(&mut self) -> &mut String {
        &mut self.shift_notes
    }

    pub fn set_shift_notes(&mut self, notes: impl Into<String>) {
        self.shift_notes = notes.into();
    }

    // ==================== Pairs ====================

    /// Declared exclusivity pairs.
    #[must_use]
    pub fn pairs(&self) -> &[ExclusivityPair] {
        &self.pairs
    }

    /// The pair that `item` belongs to, if any.
    #[must_use]
    pub fn pair_of(&self, item: ItemRef) -> Option<&ExclusivityPair> {
        self.pairs.iter().find(|p| p.partner_of(item).is_some())
    }

    // ==================== Bulk ====================

    /// Clear every item, every section's note and panel, and the shift notes.
    pub fn clear_all(&mut self) {
        for section in &mut self.sections {
            section.clear();
        }
        self.shift_notes.clear();
    }
}
