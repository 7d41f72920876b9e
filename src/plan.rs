//! Deployment plan loading
//!
//! A plan is a TOML document declaring a deployment id and a list of
//! resources. Each resource's option table becomes Normal-priority overrides
//! against its module schema; kinds without a schema here (resource groups,
//! security groups) still register so reference fields can resolve.
//!
//! ```toml
//! [deployment]
//! id = "prod-eu"
//!
//! [[resource]]
//! kind = "azure-resource-group"
//! name = "def-group"
//!
//! [[resource]]
//! kind = "azure-virtual-network"
//! name = "backbone"
//! [resource.options]
//! location = "westus"
//! addressSpace = ["10.1.0.0/16"]
//! ```
//!
//! Reference values are spelled as `{ ref = "kind/name" }` inline tables.

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::modules::{virtual_network, ModuleContext};
use crate::path::OptionPath;
use crate::registry::ResourceRegistry;
use crate::resolve::{Override, Priority, ResolutionError, ResolvedConfig};
use crate::value::Value;

/// Errors that can occur when loading a plan
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to read plan file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse plan TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate resource: {kind} `{name}`")]
    DuplicateResource { kind: String, name: String },

    #[error("unsupported value for `{path}`: {reason}")]
    UnsupportedValue { path: String, reason: String },

    #[error("malformed reference `{value}`: expected `kind/name`")]
    BadReference { value: String },
}

/// TOML structure of a plan document
#[derive(Deserialize)]
struct TomlPlan {
    deployment: TomlDeployment,
    #[serde(default, rename = "resource")]
    resources: Vec<TomlResource>,
}

#[derive(Deserialize)]
struct TomlDeployment {
    id: String,
}

#[derive(Deserialize)]
struct TomlResource {
    kind: String,
    name: String,
    #[serde(default)]
    options: toml::Table,
}

/// One declared resource: kind, plan name, and its user-supplied options
#[derive(Debug, Clone)]
pub struct ResourceDecl {
    kind: String,
    name: String,
    options: BTreeMap<String, Value>,
}

impl ResourceDecl {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// User-supplied option values, converted from TOML
    pub fn options(&self) -> &BTreeMap<String, Value> {
        &self.options
    }
}

/// A parsed deployment plan
#[derive(Debug, Clone)]
pub struct Plan {
    deployment_id: String,
    resources: Vec<ResourceDecl>,
}

impl Plan {
    /// Load a plan from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, PlanError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a plan from a TOML string
    pub fn from_str(content: &str) -> Result<Self, PlanError> {
        let parsed: TomlPlan = toml::from_str(content)?;

        let mut resources = Vec::with_capacity(parsed.resources.len());
        let mut seen = std::collections::BTreeSet::new();
        for res in parsed.resources {
            if !seen.insert((res.kind.clone(), res.name.clone())) {
                return Err(PlanError::DuplicateResource {
                    kind: res.kind,
                    name: res.name,
                });
            }
            let base = OptionPath::root().child(&res.name);
            let mut options = BTreeMap::new();
            for (key, value) in res.options {
                let converted = convert(value, &base.child(&key))?;
                options.insert(key, converted);
            }
            resources.push(ResourceDecl {
                kind: res.kind,
                name: res.name,
                options,
            });
        }

        debug!(
            "loaded plan `{}` with {} resource(s)",
            parsed.deployment.id,
            resources.len()
        );
        Ok(Plan {
            deployment_id: parsed.deployment.id,
            resources,
        })
    }

    pub fn deployment_id(&self) -> &str {
        &self.deployment_id
    }

    pub fn resources(&self) -> &[ResourceDecl] {
        &self.resources
    }

    /// Registry of every declaration in the plan, for reference resolution
    pub fn registry(&self) -> ResourceRegistry {
        let mut registry = ResourceRegistry::new();
        for res in &self.resources {
            registry.register(&res.kind, &res.name);
        }
        registry
    }

    /// A resource's option table as Normal-priority overrides
    pub fn overrides_for(&self, decl: &ResourceDecl) -> Vec<Override> {
        decl.options
            .iter()
            .map(|(key, value)| {
                Override::literal(OptionPath::root().child(key), value.clone(), Priority::Normal)
            })
            .collect()
    }

    /// Resolve every resource whose kind has a schema in this crate.
    ///
    /// Collaborator kinds stay as registry entries only; their configuration
    /// belongs to their own modules.
    pub fn resolve(&self) -> Result<Vec<ResolvedConfig>, ResolutionError> {
        let mut configs = Vec::new();
        for decl in &self.resources {
            if decl.kind == virtual_network::KIND {
                let ctx = ModuleContext::new(&self.deployment_id, &decl.name);
                configs.push(virtual_network::resolve(&ctx, &self.overrides_for(decl))?);
            }
        }
        Ok(configs)
    }
}

/// Convert a TOML value into an option value.
///
/// Inline tables of the form `{ ref = "kind/name" }` become resource handles;
/// floats and datetimes have no place in the option model and are rejected.
fn convert(value: toml::Value, path: &OptionPath) -> Result<Value, PlanError> {
    match value {
        toml::Value::String(s) => Ok(Value::String(s)),
        toml::Value::Integer(i) => Ok(Value::Int(i)),
        toml::Value::Boolean(b) => Ok(Value::Bool(b)),
        toml::Value::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                list.push(convert(item, &path.child(i.to_string()))?);
            }
            Ok(Value::List(list))
        }
        toml::Value::Table(table) => {
            if table.len() == 1 {
                if let Some(toml::Value::String(spec)) = table.get("ref") {
                    let (kind, name) = spec.split_once('/').ok_or_else(|| {
                        PlanError::BadReference {
                            value: spec.clone(),
                        }
                    })?;
                    if kind.is_empty() || name.is_empty() {
                        return Err(PlanError::BadReference {
                            value: spec.clone(),
                        });
                    }
                    return Ok(Value::resource(kind, name));
                }
            }
            let mut map = BTreeMap::new();
            for (key, item) in table {
                let converted = convert(item, &path.child(&key))?;
                map.insert(key, converted);
            }
            Ok(Value::Attrs(map))
        }
        toml::Value::Float(_) => Err(PlanError::UnsupportedValue {
            path: path.to_string(),
            reason: "floats are not valid option values".to_string(),
        }),
        toml::Value::Datetime(_) => Err(PlanError::UnsupportedValue {
            path: path.to_string(),
            reason: "datetimes are not valid option values".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_minimal_plan() {
        let plan = Plan::from_str(
            r#"
            [deployment]
            id = "prod-eu"

            [[resource]]
            kind = "azure-resource-group"
            name = "def-group"
            "#,
        )
        .expect("should parse");
        assert_eq!(plan.deployment_id(), "prod-eu");
        assert_eq!(plan.resources().len(), 1);
        assert!(plan.registry().contains("azure-resource-group", "def-group"));
    }

    #[test]
    fn test_reference_table_becomes_handle() {
        let plan = Plan::from_str(
            r#"
            [deployment]
            id = "prod"

            [[resource]]
            kind = "azure-virtual-network"
            name = "net"
            [resource.options]
            resourceGroup = { ref = "azure-resource-group/my-group" }
            "#,
        )
        .expect("should parse");
        let decl = &plan.resources()[0];
        assert_eq!(
            decl.options().get("resourceGroup"),
            Some(&Value::resource("azure-resource-group", "my-group"))
        );
    }

    #[test]
    fn test_malformed_reference() {
        let result = Plan::from_str(
            r#"
            [deployment]
            id = "prod"

            [[resource]]
            kind = "azure-virtual-network"
            name = "net"
            [resource.options]
            resourceGroup = { ref = "no-slash" }
            "#,
        );
        assert!(matches!(result, Err(PlanError::BadReference { .. })));
    }

    #[test]
    fn test_duplicate_resource() {
        let result = Plan::from_str(
            r#"
            [deployment]
            id = "prod"

            [[resource]]
            kind = "azure-resource-group"
            name = "def-group"

            [[resource]]
            kind = "azure-resource-group"
            name = "def-group"
            "#,
        );
        assert!(matches!(result, Err(PlanError::DuplicateResource { .. })));
    }

    #[test]
    fn test_float_rejected() {
        let result = Plan::from_str(
            r#"
            [deployment]
            id = "prod"

            [[resource]]
            kind = "azure-virtual-network"
            name = "net"
            [resource.options]
            weight = 1.5
            "#,
        );
        match result {
            Err(PlanError::UnsupportedValue { path, .. }) => {
                assert_eq!(path, "net.weight");
            }
            other => panic!("expected unsupported value error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_invalid_toml() {
        let result = Plan::from_str("this is not a plan {{{{");
        assert!(matches!(result, Err(PlanError::Parse(_))));
    }
}
