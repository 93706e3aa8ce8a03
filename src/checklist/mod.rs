//! Checklist model and the rules that act on it.
//!
//! # Architecture
//!
//! * [`definition`]: TOML description of sections, items, and pairs.
//! * [`registry`]: The in-memory model built from a definition.
//! * [`pairs`]: At most one member of an exclusivity pair checked.
//! * [`highlight`]: Row-group emphasis derived from checked flags.
//! * [`gate`]: The justification requirement for leaving a section.
//!
//! # Example
//!
//! ```
//! use closecheck::checklist::{gate, pairs, Checklist, ChecklistDefinition};
//!
//! let definition = ChecklistDefinition::builtin().unwrap();
//! let mut checklist = Checklist::from_definition(&definition);
//!
//! let mop = checklist.find("mop").unwrap();
//! checklist.set_checked(mop, true);
//! pairs::apply_after_change(&mut checklist, mop);
//!
//! let wetwipe = checklist.find("wetwipe").unwrap();
//! assert!(!checklist.item(wetwipe).unwrap().enabled);
//!
//! let outcome = gate::evaluate(checklist.section(0).unwrap());
//! assert!(!outcome.is_satisfied);
//! ```

pub mod definition;
pub mod gate;
pub mod highlight;
pub mod pairs;
pub mod registry;

pub use definition::{ChecklistDefinition, DefinitionError, ItemDefinition, SectionDefinition};
pub use gate::GateOutcome;
pub use highlight::GroupEmphasis;
pub use registry::{Checklist, ExclusivityPair, Item, ItemRef, JustificationPanel, Section};
