//! Pair exclusivity rule.
//!
//! For each declared pair at most one member may be checked. Checking one
//! member unchecks and disables its partner; unchecking it re-enables the
//! partner without touching the partner's checked flag.

use super::registry::{Checklist, ItemRef};

/// Apply the rule after `item`'s checked flag changed.
///
/// Returns the partner whose state was adjusted, if `item` is paired.
pub fn apply_after_change(checklist: &mut Checklist, item: ItemRef) -> Option<ItemRef> {
    let partner = checklist.pair_of(item)?.partner_of(item)?;
    let checked = checklist.item(item)?.checked;

    let other = checklist.item_mut(partner)?;
    if checked {
        other.checked = false;
        other.enabled = false;
    } else {
        other.enabled = true;
    }

    log::trace!(
        "Pair rule: {:?} checked={} -> partner {:?} enabled={}",
        item,
        checked,
        partner,
        other.enabled
    );
    Some(partner)
}

/// Re-establish the rule for every pair from the current checked flags.
///
/// Used after restoring persisted state. If both members are checked the
/// first-listed one wins and the second is forced unchecked.
pub fn enforce_all(checklist: &mut Checklist) {
    let pairs = checklist.pairs().to_vec();

    for pair in pairs {
        let first_checked = checklist.item(pair.first).is_some_and(|i| i.checked);
        let second_checked = checklist.item(pair.second).is_some_and(|i| i.checked);

        if first_checked && second_checked {
            log::warn!(
                "Both members of pair {:?}/{:?} were checked; keeping the first",
                pair.first,
                pair.second
            );
        }

        let (winner, loser) = if first_checked {
            (pair.first, pair.second)
        } else if second_checked {
            (pair.second, pair.first)
        } else {
            for member in [pair.first, pair.second] {
                if let Some(item) = checklist.item_mut(member) {
                    item.enabled = true;
                }
            }
            continue;
        };

        if let Some(item) = checklist.item_mut(winner) {
            item.enabled = true;
        }
        if let Some(item) = checklist.item_mut(loser) {
            item.checked = false;
            item.enabled = false;
        }
    }
}

/// Whether every pair currently has at most one checked member.
#[must_use]
pub fn holds(checklist: &Checklist) -> bool {
    checklist.pairs().iter().all(|pair| {
        let first = checklist.item(pair.first).is_some_and(|i| i.checked);
        let second = checklist.item(pair.second).is_some_and(|i| i.checked);
        !(first && second)
    })
}
