//! Justification gate.
//!
//! Leaving a section with unchecked items requires a written reason. The gate
//! is evaluated on every advance attempt, and again (without blocking) after
//! any change to keep the displayed list of unchecked items current.

use serde::Serialize;

use super::registry::{Checklist, Section};

/// Message shown when an advance is refused.
pub const JUSTIFICATION_REQUIRED: &str =
    "A reason is required before moving on when items are left unchecked.";

/// Result of evaluating the gate for one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateOutcome {
    /// Labels of enabled, unchecked items in document order.
    pub unchecked_labels: Vec<String>,
    /// Whether the section may be left.
    pub is_satisfied: bool,
}

impl GateOutcome {
    /// Whether any enabled item is unchecked.
    #[must_use]
    pub fn has_unchecked(&self) -> bool {
        !self.unchecked_labels.is_empty()
    }
}

/// Evaluate the gate for `section`.
#[must_use]
pub fn evaluate(section: &Section) -> GateOutcome {
    let unchecked_labels: Vec<String> = section
        .items
        .iter()
        .filter(|i| i.is_outstanding())
        .map(|i| i.label.clone())
        .collect();

    let is_satisfied =
        unchecked_labels.is_empty() || !section.justification_text.trim().is_empty();

    GateOutcome {
        unchecked_labels,
        is_satisfied,
    }
}

/// Re-evaluate `section` and update its panel without blocking anything.
pub fn refresh_panel(section: &mut Section) -> GateOutcome {
    let outcome = evaluate(section);
    section.panel.visible = outcome.has_unchecked();
    section.panel.unchecked_labels = outcome.unchecked_labels.clone();
    outcome
}

/// Refresh every section's panel.
pub fn refresh_all(checklist: &mut Checklist) {
    for section in checklist.sections_mut() {
        refresh_panel(section);
    }
}
