//! Typed option schemas
//!
//! A schema is an [`OptionSet`]: named, typed option declarations with
//! optional defaults. Types are [`TypeSpec`]s, closed under lists, attribute
//! maps, nullability, alternatives, and nested option sets, which is how
//! structured sub-resources (subnets) get recursive schemas.

mod options;
mod types;

pub use options::{DuplicateOption, OptionDecl, OptionSet};
pub use types::{TypeError, TypeSpec};
