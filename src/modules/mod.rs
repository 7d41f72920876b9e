//! Resource module instances
//!
//! Each module ties an option set to a resource kind tag and contributes its
//! own default-providing rules. The deployment backend owns the collaborator
//! kinds (resource groups, security groups); this crate only carries their
//! kind tags for reference fields.

pub mod credentials;
pub mod virtual_network;

use crate::resolve::{resolve, Override, ResolutionError, ResolvedConfig};
use crate::schema::OptionSet;

/// Kind tag of the resource-group collaborator module
pub const RESOURCE_GROUP_KIND: &str = "azure-resource-group";

/// Kind tag of the network-security-group collaborator module
pub const SECURITY_GROUP_KIND: &str = "azure-network-security-group";

/// Conventional name of the default resource group a deployment declares
pub const DEFAULT_RESOURCE_GROUP: &str = "def-group";

/// Per-instance context the module default rules draw on
#[derive(Debug, Clone)]
pub struct ModuleContext {
    /// Deployment-unique identifier, the prefix of derived resource names
    pub deployment_id: String,
    /// Name of the resource instance inside the plan
    pub resource_name: String,
}

impl ModuleContext {
    pub fn new(deployment_id: impl Into<String>, resource_name: impl Into<String>) -> Self {
        Self {
            deployment_id: deployment_id.into(),
            resource_name: resource_name.into(),
        }
    }
}

/// An option set tagged with its resource kind
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    kind: String,
    options: OptionSet,
}

impl ResourceSchema {
    pub fn new(kind: impl Into<String>, options: OptionSet) -> Self {
        Self {
            kind: kind.into(),
            options,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Run the override engine against this schema, stamping the kind tag
    /// onto the resolved configuration
    pub fn resolve(&self, overrides: &[Override]) -> Result<ResolvedConfig, ResolutionError> {
        resolve(&self.options, overrides, &self.kind)
    }
}

/// Schema for a kind this crate declares, if any.
///
/// Collaborator kinds deliberately come back `None`: their schemas live in
/// their own modules, and a plan only registers them for reference lookups.
pub fn schema_for(kind: &str) -> Option<ResourceSchema> {
    match kind {
        virtual_network::KIND => Some(virtual_network::schema()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_for_known_kind() {
        let schema = schema_for("azure-virtual-network").unwrap();
        assert_eq!(schema.kind(), "azure-virtual-network");
        assert!(schema.options().contains("addressSpace"));
    }

    #[test]
    fn test_collaborator_kinds_have_no_schema_here() {
        assert!(schema_for(RESOURCE_GROUP_KIND).is_none());
        assert!(schema_for(SECURITY_GROUP_KIND).is_none());
    }
}
