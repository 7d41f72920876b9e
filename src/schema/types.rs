//! Type specifications and value validation
//!
//! A `TypeSpec` describes what values one option accepts. Validation is a pure
//! check: it either accepts the value unchanged or reports a `TypeError` with
//! the full dotted path, and it never mutates anything on the way.

use std::fmt;

use thiserror::Error;

use crate::path::OptionPath;
use crate::value::Value;

use super::options::OptionSet;

/// A value failed to match its declared type
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("type mismatch at `{path}`: expected {expected}, got {got}")]
pub struct TypeError {
    pub path: OptionPath,
    pub expected: String,
    pub got: String,
}

/// Describes the values acceptable for one option
#[derive(Debug, Clone)]
pub enum TypeSpec {
    String,
    Int,
    Bool,
    /// Ordered sequence whose elements all match the inner spec
    ListOf(Box<TypeSpec>),
    /// Key -> value map whose values all match the inner spec
    AttrsOf(Box<TypeSpec>),
    /// Null, or a value matching the inner spec
    NullableOf(Box<TypeSpec>),
    /// Value matching the left or the right spec; the left is tried first
    /// and its error is the one reported when both fail
    EitherOf(Box<TypeSpec>, Box<TypeSpec>),
    /// Nested option set; keys must be declared options of the set
    OptionSetOf(OptionSet),
    /// Handle to a declared resource of the given kind
    Resource(&'static str),
}

impl TypeSpec {
    pub fn list_of(inner: TypeSpec) -> Self {
        TypeSpec::ListOf(Box::new(inner))
    }

    pub fn attrs_of(inner: TypeSpec) -> Self {
        TypeSpec::AttrsOf(Box::new(inner))
    }

    pub fn nullable_of(inner: TypeSpec) -> Self {
        TypeSpec::NullableOf(Box::new(inner))
    }

    pub fn either_of(left: TypeSpec, right: TypeSpec) -> Self {
        TypeSpec::EitherOf(Box::new(left), Box::new(right))
    }

    /// `EitherOf(String, Resource(kind))` — the usual shape of a field that
    /// takes either an opaque external identifier or a declared resource
    pub fn string_or_resource(kind: &'static str) -> Self {
        TypeSpec::either_of(TypeSpec::String, TypeSpec::Resource(kind))
    }

    /// Check `value` against this spec.
    ///
    /// Returns the error from the left arm when both sides of an `EitherOf`
    /// reject, so diagnostics are deterministic. Absent options of a nested
    /// option set are not an error here; filling them in is the resolver's job.
    pub fn validate(&self, value: &Value, path: &OptionPath) -> Result<(), TypeError> {
        match (self, value) {
            (TypeSpec::String, Value::String(_)) => Ok(()),
            (TypeSpec::Int, Value::Int(_)) => Ok(()),
            (TypeSpec::Bool, Value::Bool(_)) => Ok(()),
            (TypeSpec::ListOf(inner), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    inner.validate(item, &path.child(i.to_string()))?;
                }
                Ok(())
            }
            (TypeSpec::AttrsOf(inner), Value::Attrs(map)) => {
                for (key, item) in map {
                    inner.validate(item, &path.child(key))?;
                }
                Ok(())
            }
            (TypeSpec::NullableOf(_), Value::Null) => Ok(()),
            (TypeSpec::NullableOf(inner), v) => inner.validate(v, path),
            (TypeSpec::EitherOf(left, right), v) => match left.validate(v, path) {
                Ok(()) => Ok(()),
                Err(left_err) => right.validate(v, path).map_err(|_| left_err),
            },
            (TypeSpec::OptionSetOf(set), Value::Attrs(map)) => {
                for (key, item) in map {
                    let decl = set.get(key).ok_or_else(|| TypeError {
                        path: path.child(key),
                        expected: format!("one of the declared options ({})", set.names().join(", ")),
                        got: format!("unknown option `{}`", key),
                    })?;
                    decl.spec().validate(item, &path.child(key))?;
                }
                Ok(())
            }
            (TypeSpec::Resource(kind), Value::Resource { kind: got_kind, .. }) => {
                if got_kind == kind {
                    Ok(())
                } else {
                    Err(TypeError {
                        path: path.clone(),
                        expected: self.to_string(),
                        got: format!("reference to {}", got_kind),
                    })
                }
            }
            (spec, v) => Err(TypeError {
                path: path.clone(),
                expected: spec.to_string(),
                got: v.kind_name().to_string(),
            }),
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::String => write!(f, "string"),
            TypeSpec::Int => write!(f, "int"),
            TypeSpec::Bool => write!(f, "bool"),
            TypeSpec::ListOf(inner) => write!(f, "list of {}", inner),
            TypeSpec::AttrsOf(inner) => write!(f, "attrs of {}", inner),
            TypeSpec::NullableOf(inner) => write!(f, "nullable {}", inner),
            TypeSpec::EitherOf(left, right) => write!(f, "{} or {}", left, right),
            TypeSpec::OptionSetOf(_) => write!(f, "option set"),
            TypeSpec::Resource(kind) => write!(f, "reference to {}", kind),
        }
    }
}
