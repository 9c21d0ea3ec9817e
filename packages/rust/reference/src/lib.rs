//! Reference data for age-of-acquisition lookups.
//!
//! - [`ReferenceDictionary`]: ordered skill description -> age table, built in
//!   or loaded once from TOML at startup
//! - [`ReferenceMatcher`]: exact / case-insensitive / substring / word-overlap
//!   matching cascade
//! - [`AgeOrder`]: presentation order over age labels
//!
//! The dictionary is immutable after construction and can be shared between
//! concurrent extraction runs.

mod age_order;
mod dictionary;
mod matcher;

pub use age_order::AgeOrder;
pub use dictionary::{BUILTIN_VERSION, ReferenceDictionary, ReferenceEntry};
pub use matcher::{ReferenceMatcher, SkillMatch};
