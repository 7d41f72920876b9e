//! Resource registry and reference resolution
//!
//! Reference fields resolve lazily: configuration resolution leaves them in
//! string-or-handle form, and only the deployment backend dereferences them
//! when it needs a concrete identifier. Forward references to resources
//! declared later in a plan are therefore legal.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::value::Value;

/// A reference field's resolved form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    /// Opaque external identifier; not looked up in the registry at all
    Literal(String),
    /// Handle to a resource declared in the same plan
    Handle { kind: String, name: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// Handle names a resource the plan never declares
    #[error("unknown resource: {kind} `{name}`")]
    UnknownResource { kind: String, name: String },

    /// The value is neither an identifier string nor a resource handle
    #[error("not a resource reference: got {got}")]
    NotAReference { got: String },
}

/// Set of resources declared in one plan, keyed by (kind, name)
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    entries: BTreeSet<(String, String)>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declared resource
    pub fn register(&mut self, kind: impl Into<String>, name: impl Into<String>) {
        self.entries.insert((kind.into(), name.into()));
    }

    pub fn contains(&self, kind: &str, name: &str) -> bool {
        self.entries.contains(&(kind.to_string(), name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dereference a string-or-handle value.
    ///
    /// Bare strings pass through untouched as external identifiers, without a
    /// registry lookup. Handles must name a registered resource.
    pub fn resolve_reference(&self, value: &Value) -> Result<ResourceRef, ReferenceError> {
        match value {
            Value::String(s) => Ok(ResourceRef::Literal(s.clone())),
            Value::Resource { kind, name } => {
                if self.contains(kind, name) {
                    Ok(ResourceRef::Handle {
                        kind: kind.clone(),
                        name: name.clone(),
                    })
                } else {
                    Err(ReferenceError::UnknownResource {
                        kind: kind.clone(),
                        name: name.clone(),
                    })
                }
            }
            other => Err(ReferenceError::NotAReference {
                got: other.kind_name().to_string(),
            }),
        }
    }
}
