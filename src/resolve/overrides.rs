//! Overrides: candidate values for option paths
//!
//! An override carries a value (or a thunk computing one from already-resolved
//! siblings), a priority, and an optional guard predicate. Guards and thunks
//! declare the paths they read so the engine can order evaluation; both are
//! `Send + Sync` closures, keeping whole resolutions free to run on any thread.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::path::OptionPath;
use crate::value::Value;

use super::config::lookup;

/// Ranking deciding which of several competing overrides wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    /// Schema- or module-supplied default
    Default,
    /// Ordinary user-supplied value
    Normal,
    /// Explicit override that must win over user values
    Force,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Default => write!(f, "default"),
            Priority::Normal => write!(f, "normal"),
            Priority::Force => write!(f, "force"),
        }
    }
}

/// Read-only view of the values resolved so far, handed to guards and thunks
pub struct ResolvedView<'a> {
    values: &'a BTreeMap<String, Value>,
}

impl<'a> ResolvedView<'a> {
    pub(crate) fn new(values: &'a BTreeMap<String, Value>) -> Self {
        Self { values }
    }

    /// Look up a dotted path among the resolved values
    pub fn get(&self, path: &str) -> Option<&'a Value> {
        lookup(self.values, &OptionPath::from(path))
    }
}

type ComputeFn = Arc<dyn Fn(&ResolvedView) -> Value + Send + Sync>;
type PredicateFn = Arc<dyn Fn(&ResolvedView) -> bool + Send + Sync>;

/// The value an override contributes: given directly, or computed from
/// already-resolved sibling options
#[derive(Clone)]
pub enum OverrideValue {
    Literal(Value),
    Computed {
        /// Paths the thunk reads; resolved before this override's path
        depends_on: Vec<OptionPath>,
        compute: ComputeFn,
    },
}

impl fmt::Debug for OverrideValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideValue::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            OverrideValue::Computed { depends_on, .. } => f
                .debug_struct("Computed")
                .field("depends_on", depends_on)
                .finish_non_exhaustive(),
        }
    }
}

/// Activation condition over already-resolved sibling options.
///
/// A guard that evaluates false makes its override contribute nothing to the
/// merge. Guards run after every path they depend on has resolved.
#[derive(Clone)]
pub struct Guard {
    pub(crate) depends_on: Vec<OptionPath>,
    pub(crate) predicate: PredicateFn,
}

impl Guard {
    pub fn new<F>(depends_on: impl IntoIterator<Item = OptionPath>, predicate: F) -> Self
    where
        F: Fn(&ResolvedView) -> bool + Send + Sync + 'static,
    {
        Self {
            depends_on: depends_on.into_iter().collect(),
            predicate: Arc::new(predicate),
        }
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

/// A candidate value for one option path
#[derive(Debug, Clone)]
pub struct Override {
    pub(crate) path: OptionPath,
    pub(crate) value: OverrideValue,
    pub(crate) priority: Priority,
    pub(crate) guard: Option<Guard>,
}

impl Override {
    /// Override with a plain value
    pub fn literal(path: impl Into<OptionPath>, value: impl Into<Value>, priority: Priority) -> Self {
        Self {
            path: path.into(),
            value: OverrideValue::Literal(value.into()),
            priority,
            guard: None,
        }
    }

    /// Override whose value is derived from already-resolved sibling options
    pub fn computed<F>(
        path: impl Into<OptionPath>,
        priority: Priority,
        depends_on: impl IntoIterator<Item = OptionPath>,
        compute: F,
    ) -> Self
    where
        F: Fn(&ResolvedView) -> Value + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            value: OverrideValue::Computed {
                depends_on: depends_on.into_iter().collect(),
                compute: Arc::new(compute),
            },
            priority,
            guard: None,
        }
    }

    /// Attach an activation guard
    pub fn guarded(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn path(&self) -> &OptionPath {
        &self.path
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Default < Priority::Normal);
        assert!(Priority::Normal < Priority::Force);
    }

    #[test]
    fn test_view_lookup_is_dotted() {
        let mut subnet = BTreeMap::new();
        subnet.insert("addressPrefix".to_string(), Value::string("10.1.0.0/16"));
        let mut subnets = BTreeMap::new();
        subnets.insert("default".to_string(), Value::Attrs(subnet));
        let mut values = BTreeMap::new();
        values.insert("subnets".to_string(), Value::Attrs(subnets));

        let view = ResolvedView::new(&values);
        assert_eq!(
            view.get("subnets.default.addressPrefix"),
            Some(&Value::string("10.1.0.0/16"))
        );
        assert_eq!(view.get("subnets.other"), None);
    }

    #[test]
    fn test_computed_debug_omits_closure() {
        let ovr = Override::computed("subnets", Priority::Default, [OptionPath::from("addressSpace")], |_| {
            Value::empty_attrs()
        });
        let repr = format!("{:?}", ovr.value);
        assert!(repr.contains("depends_on"));
    }
}
