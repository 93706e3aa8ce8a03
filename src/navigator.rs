//! Section navigation.
//!
//! A bounded pointer over the ordered sections. Every transition re-marks
//! exactly one section active and recomputes which navigation controls are
//! shown.

use thiserror::Error;

use crate::checklist::Checklist;

/// Error type for navigator construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigatorError {
    /// There is nothing to navigate.
    #[error("cannot navigate a checklist with no sections")]
    Empty,
}

/// Which navigation controls are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavControls {
    /// "Previous" is shown everywhere except the first section.
    pub retreat_visible: bool,
    /// "Next" is shown everywhere except the last section.
    pub advance_visible: bool,
}

/// Pointer to the current section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionNavigator {
    current_index: usize,
    section_count: usize,
    controls: NavControls,
}

impl SectionNavigator {
    /// Create a navigator at the first of `section_count` sections.
    ///
    /// # Errors
    ///
    /// Returns [`NavigatorError::Empty`] if `section_count` is zero.
    pub fn new(section_count: usize) -> Result<Self, NavigatorError> {
        if section_count == 0 {
            return Err(NavigatorError::Empty);
        }
        let mut navigator = Self {
            current_index: 0,
            section_count,
            controls: NavControls {
                retreat_visible: false,
                advance_visible: false,
            },
        };
        navigator.update_controls();
        Ok(navigator)
    }

    /// Create a navigator sized for `checklist` and mark its first section active.
    ///
    /// # Errors
    ///
    /// Returns [`NavigatorError::Empty`] if the checklist has no sections.
    pub fn for_checklist(checklist: &mut Checklist) -> Result<Self, NavigatorError> {
        let navigator = Self::new(checklist.section_count())?;
        checklist.activate(navigator.current_index);
        Ok(navigator)
    }

    /// Index of the current section.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Number of sections.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.section_count
    }

    /// Whether the current section is the first one.
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    /// Whether the current section is the last one.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.section_count
    }

    /// Navigation control visibility for the current index.
    #[must_use]
    pub fn controls(&self) -> NavControls {
        self.controls
    }

    /// Move to the next section. No-op at the last section.
    ///
    /// Returns whether the index changed.
    pub fn advance(&mut self, checklist: &mut Checklist) -> bool {
        if self.is_last() {
            return false;
        }
        self.move_to(self.current_index + 1, checklist);
        true
    }

    /// Move to the previous section. No-op at the first section.
    ///
    /// Returns whether the index changed.
    pub fn retreat(&mut self, checklist: &mut Checklist) -> bool {
        if self.is_first() {
            return false;
        }
        self.move_to(self.current_index - 1, checklist);
        true
    }

    /// Return to the first section.
    pub fn jump_to_start(&mut self, checklist: &mut Checklist) {
        self.move_to(0, checklist);
    }

    /// Move to `index`, clamped to the last section.
    pub fn jump_to(&mut self, index: usize, checklist: &mut Checklist) {
        self.move_to(index.min(self.section_count - 1), checklist);
    }

    fn move_to(&mut self, index: usize, checklist: &mut Checklist) {
        log::debug!("Section transition: {} -> {}", self.current_index, index);
        self.current_index = index;
        checklist.activate(index);
        self.update_controls();
    }

    fn update_controls(&mut self) {
        self.controls = NavControls {
            retreat_visible: !self.is_first(),
            advance_visible: !self.is_last(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::ChecklistDefinition;

    fn checklist(sections: usize) -> Checklist {
        let mut toml = String::new();
        for i in 0..sections {
            toml.push_str(&format!("[[sections]]\ntitle = \"S{i}\"\n"));
        }
        Checklist::from_definition(&ChecklistDefinition::from_toml_str(&toml).unwrap())
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(SectionNavigator::new(0).unwrap_err(), NavigatorError::Empty);
    }

    #[test]
    fn test_initial_state() {
        let mut list = checklist(3);
        let nav = SectionNavigator::for_checklist(&mut list).unwrap();
        assert_eq!(nav.current_index(), 0);
        assert!(!nav.controls().retreat_visible);
        assert!(nav.controls().advance_visible);
        assert_eq!(list.active_index(), Some(0));
    }

    #[test]
    fn test_advance_and_retreat_bounds() {
        let mut list = checklist(3);
        let mut nav = SectionNavigator::for_checklist(&mut list).unwrap();

        assert!(!nav.retreat(&mut list));
        assert_eq!(nav.current_index(), 0);

        assert!(nav.advance(&mut list));
        assert!(nav.advance(&mut list));
        assert_eq!(nav.current_index(), 2);
        assert!(nav.controls().retreat_visible);
        assert!(!nav.controls().advance_visible);

        // At end, stays at last
        assert!(!nav.advance(&mut list));
        assert_eq!(nav.current_index(), 2);
        assert_eq!(list.active_index(), Some(2));

        assert!(nav.retreat(&mut list));
        assert_eq!(nav.current_index(), 1);
        assert_eq!(list.sections().iter().filter(|s| s.is_active).count(), 1);
    }

    #[test]
    fn test_jump_to_start() {
        let mut list = checklist(4);
        let mut nav = SectionNavigator::for_checklist(&mut list).unwrap();
        nav.jump_to(10, &mut list);
        assert_eq!(nav.current_index(), 3);

        nav.jump_to_start(&mut list);
        assert_eq!(nav.current_index(), 0);
        assert_eq!(list.active_index(), Some(0));
        assert!(!nav.controls().retreat_visible);
    }

    #[test]
    fn test_single_section_hides_both_controls() {
        let mut list = checklist(1);
        let nav = SectionNavigator::for_checklist(&mut list).unwrap();
        assert!(nav.is_first() && nav.is_last());
        assert!(!nav.controls().retreat_visible);
        assert!(!nav.controls().advance_visible);
    }
}
