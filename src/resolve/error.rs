//! Errors surfaced by override resolution
//!
//! All of these abort the resolution run on first occurrence; no partial
//! configuration is ever returned. Each carries the full dotted option path.

use thiserror::Error;

use crate::path::OptionPath;
use crate::schema::TypeError;

use super::overrides::Priority;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// A resolved value failed its declared type
    #[error(transparent)]
    Type(#[from] TypeError),

    /// Option has no default and nothing supplied a value
    #[error("missing required option `{path}`")]
    MissingRequiredOption { path: OptionPath },

    /// Two unequal overrides at the same, highest priority
    #[error("conflicting overrides for `{path}` at {priority} priority")]
    ConflictingOverrides { path: OptionPath, priority: Priority },

    /// A guard or computed value depends on paths that cannot be resolved,
    /// either because they form a cycle or name no declared option
    #[error("unresolvable guard dependency for `{path}`")]
    UnresolvableGuard { path: OptionPath },

    /// An override addresses an option the schema does not declare
    #[error("unknown option `{path}`")]
    UnknownOption { path: OptionPath },
}
