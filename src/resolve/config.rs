//! The resolved configuration handed to the deployment backend

use std::collections::BTreeMap;

use crate::path::OptionPath;
use crate::value::Value;

/// Walk a dotted path through nested attribute maps
pub(crate) fn lookup<'a>(values: &'a BTreeMap<String, Value>, path: &OptionPath) -> Option<&'a Value> {
    let mut segments = path.segments().iter();
    let mut current = values.get(segments.next()?)?;
    for segment in segments {
        current = current.as_attrs()?.get(segment)?;
    }
    Some(current)
}

/// Fully-typed, fully-defaulted values for one resource instance.
///
/// Immutable once produced: the deployment backend only reads it. Reference
/// fields are still in string-or-handle form; the backend resolves them
/// against the registry when it actually needs concrete identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    kind: String,
    values: BTreeMap<String, Value>,
}

impl ResolvedConfig {
    pub(crate) fn new(kind: impl Into<String>, values: BTreeMap<String, Value>) -> Self {
        Self {
            kind: kind.into(),
            values,
        }
    }

    /// Resource kind tag (`azure-virtual-network`)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Look up a value by dotted path
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(&self.values, &OptionPath::from(path))
    }

    /// Top-level option values in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// JSON export for the deployment backend, resource handles included
    /// in unresolved form
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}
