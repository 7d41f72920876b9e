//! The value model held by resolved options
//!
//! Every option ultimately resolves to a `Value`: a scalar, an ordered list,
//! an attribute map, a handle to another declared resource, or null. Attribute
//! maps use `BTreeMap` so resolution output is deterministic across runs.

use std::collections::BTreeMap;
use std::fmt;

/// A typed configuration datum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    String(String),
    Int(i64),
    Bool(bool),
    /// Ordered sequence of values
    List(Vec<Value>),
    /// Key -> value map with unique keys, iterated in key order
    Attrs(BTreeMap<String, Value>),
    /// Handle to another declared resource, resolved lazily by the backend
    Resource { kind: String, name: String },
}

impl Value {
    /// Short kind tag used in type-mismatch diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::Attrs(_) => "attrs",
            Value::Resource { .. } => "resource",
        }
    }

    /// Convenience constructor for a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Convenience constructor for a resource handle
    pub fn resource(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Value::Resource {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Build a list of string values
    pub fn string_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(items.into_iter().map(|s| Value::String(s.into())).collect())
    }

    /// An empty attribute map
    pub fn empty_attrs() -> Self {
        Value::Attrs(BTreeMap::new())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_attrs(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Attrs(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Export for the deployment backend.
    ///
    /// Resource handles stay in unresolved form as a `{"kind", "name"}` object;
    /// the backend runs reference resolution itself.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Attrs(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Resource { kind, name } => serde_json::json!({
                "kind": kind,
                "name": name,
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Bool(b) => write!(f, "{}", b),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Attrs(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} = {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Resource { kind, name } => write!(f, "<{}:{}>", kind, name),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Null.kind_name(), "null");
        assert_eq!(Value::string("x").kind_name(), "string");
        assert_eq!(Value::Int(3).kind_name(), "int");
        assert_eq!(Value::resource("k", "n").kind_name(), "resource");
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(
            Value::string_list(["10.1.0.0/16", "10.3.0.0/16"]).to_string(),
            r#"["10.1.0.0/16", "10.3.0.0/16"]"#
        );
        assert_eq!(
            Value::resource("azure-resource-group", "def-group").to_string(),
            "<azure-resource-group:def-group>"
        );
        assert_eq!(Value::empty_attrs().to_string(), "{}");
    }

    #[test]
    fn test_to_json_keeps_handles_unresolved() {
        let json = Value::resource("azure-resource-group", "def-group").to_json();
        assert_eq!(
            json,
            serde_json::json!({"kind": "azure-resource-group", "name": "def-group"})
        );
    }

    #[test]
    fn test_to_json_nested() {
        let mut subnet = BTreeMap::new();
        subnet.insert("addressPrefix".to_string(), Value::string("10.1.0.0/16"));
        subnet.insert("securityGroup".to_string(), Value::Null);
        let mut subnets = BTreeMap::new();
        subnets.insert("default".to_string(), Value::Attrs(subnet));

        let json = Value::Attrs(subnets).to_json();
        assert_eq!(
            json,
            serde_json::json!({
                "default": {"addressPrefix": "10.1.0.0/16", "securityGroup": null}
            })
        );
    }
}
