//! Group highlight rule.
//!
//! Items sharing a category form a row group. A group's emphasis is derived
//! from its members' checked flags every time it is asked for; nothing is
//! stored. Each item is toggled independently: checking one member never
//! checks the rest of its group.

use super::registry::Section;

/// Visual emphasis of a row group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupEmphasis {
    /// No enabled member is checked.
    #[default]
    None,
    /// Some but not all enabled members are checked.
    Partial,
    /// Every enabled member is checked.
    Complete,
}

/// Emphasis of the group named `category` within `section`.
#[must_use]
pub fn group_emphasis(section: &Section, category: &str) -> GroupEmphasis {
    let mut enabled = 0usize;
    let mut checked = 0usize;

    for item in section
        .items
        .iter()
        .filter(|i| i.category.as_deref() == Some(category) && i.enabled)
    {
        enabled += 1;
        if item.checked {
            checked += 1;
        }
    }

    match (enabled, checked) {
        (0, _) | (_, 0) => GroupEmphasis::None,
        (e, c) if c >= e => GroupEmphasis::Complete,
        _ => GroupEmphasis::Partial,
    }
}

/// One row group as laid out in a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowGroup {
    /// Shared category, or `None` for an ungrouped item.
    pub category: Option<String>,
    /// Positions of the member items, in order.
    pub positions: Vec<usize>,
    /// Current emphasis.
    pub emphasis: GroupEmphasis,
}

/// Split a section into consecutive row groups.
///
/// Adjacent items with the same category share a group; an item without a
/// category forms its own single-row group.
#[must_use]
pub fn row_groups(section: &Section) -> Vec<RowGroup> {
    let mut groups: Vec<RowGroup> = Vec::new();

    for (position, item) in section.items.iter().enumerate() {
        let continues_last = item.category.is_some()
            && groups
                .last()
                .is_some_and(|last| last.category == item.category);

        if continues_last {
            if let Some(last) = groups.last_mut() {
                last.positions.push(position);
                continue;
            }
        }

        groups.push(RowGroup {
            category: item.category.clone(),
            positions: vec![position],
            emphasis: GroupEmphasis::None,
        });
    }

    for group in &mut groups {
        group.emphasis = match &group.category {
            Some(category) => group_emphasis(section, category),
            None => GroupEmphasis::None,
        };
    }

    groups
}
