//! Option declarations and option sets
//!
//! An `OptionSet` is the full schema of one resource kind: a name-ordered map
//! of typed option declarations. Declarations without a default are mandatory;
//! resolution fails if nothing supplies a value for them.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use thiserror::Error;

use crate::resolve::Priority;
use crate::value::Value;

use super::types::TypeSpec;

/// Two option sets being merged both declare the same name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("duplicate option `{name}`")]
pub struct DuplicateOption {
    pub name: String,
}

/// One named, typed configuration field
#[derive(Debug, Clone)]
pub struct OptionDecl {
    name: String,
    spec: TypeSpec,
    default: Option<Value>,
    default_priority: Priority,
    description: String,
    example: Option<Value>,
}

impl OptionDecl {
    /// A mandatory option of the given type
    pub fn new(name: impl Into<String>, spec: TypeSpec) -> Self {
        Self {
            name: name.into(),
            spec,
            default: None,
            default_priority: Priority::Default,
            description: String::new(),
            example: None,
        }
    }

    /// Attach a schema default, supplied at `Default` priority unless
    /// overridden with [`with_default_priority`](Self::with_default_priority)
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Priority at which the schema default joins the merge
    pub fn with_default_priority(mut self, priority: Priority) -> Self {
        self.default_priority = priority;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_example(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &TypeSpec {
        &self.spec
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn default_priority(&self) -> Priority {
        self.default_priority
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn example(&self) -> Option<&Value> {
        self.example.as_ref()
    }

    /// Mandatory means: no default, so some override must supply a value
    pub fn is_mandatory(&self) -> bool {
        self.default.is_none()
    }
}

/// Schema of one resource kind: option name -> declaration
#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    options: BTreeMap<String, OptionDecl>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration, replacing any previous one of the same name
    pub fn with(mut self, decl: OptionDecl) -> Self {
        self.options.insert(decl.name.clone(), decl);
        self
    }

    pub fn get(&self, name: &str) -> Option<&OptionDecl> {
        self.options.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Declarations in name order
    pub fn iter(&self) -> impl Iterator<Item = &OptionDecl> {
        self.options.values()
    }

    /// Declared option names in name order
    pub fn names(&self) -> Vec<&str> {
        self.options.keys().map(String::as_str).collect()
    }

    /// Merge another set's declarations into this one.
    ///
    /// Used when a collaborator module contributes options (the credential
    /// fields merged into every resource schema). Duplicate names are an error
    /// rather than a silent replacement.
    pub fn merge(mut self, other: OptionSet) -> Result<OptionSet, DuplicateOption> {
        for (name, decl) in other.options {
            if self.options.contains_key(&name) {
                return Err(DuplicateOption { name });
            }
            self.options.insert(name, decl);
        }
        Ok(self)
    }

    /// Plain-text option listing for docs and tooling: one line per option
    /// with its type, default, and description.
    pub fn reference(&self) -> String {
        let mut out = String::new();
        for decl in self.iter() {
            let _ = write!(out, "{}: {}", decl.name(), decl.spec());
            match decl.default() {
                Some(default) => {
                    let _ = write!(out, " (default: {})", default);
                }
                None => {
                    let _ = write!(out, " (required)");
                }
            }
            if !decl.description().is_empty() {
                let _ = write!(out, " - {}", decl.description());
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> OptionSet {
        OptionSet::new()
            .with(
                OptionDecl::new("location", TypeSpec::String)
                    .describe("Azure location of the network")
                    .with_example("westus"),
            )
            .with(
                OptionDecl::new("tags", TypeSpec::attrs_of(TypeSpec::String))
                    .with_default(Value::empty_attrs())
                    .describe("Tag name/value pairs"),
            )
    }

    #[test]
    fn test_mandatory_without_default() {
        let set = sample();
        assert!(set.get("location").unwrap().is_mandatory());
        assert!(!set.get("tags").unwrap().is_mandatory());
    }

    #[test]
    fn test_iterates_in_name_order() {
        let set = sample();
        let names = set.names();
        assert_eq!(names, vec!["location", "tags"]);
    }

    #[test]
    fn test_merge_rejects_duplicates() {
        let a = sample();
        let b = OptionSet::new().with(OptionDecl::new("location", TypeSpec::String));
        let err = a.merge(b).unwrap_err();
        assert_eq!(err.name, "location");
    }

    #[test]
    fn test_merge_combines_disjoint_sets() {
        let a = sample();
        let b = OptionSet::new().with(OptionDecl::new("subscriptionId", TypeSpec::String));
        let merged = a.merge(b).unwrap();
        assert_eq!(merged.names(), vec!["location", "subscriptionId", "tags"]);
    }

    #[test]
    fn test_reference_listing() {
        let listing = sample().reference();
        assert_eq!(
            listing,
            "location: string (required) - Azure location of the network\n\
             tags: attrs of string (default: {}) - Tag name/value pairs\n"
        );
    }
}
