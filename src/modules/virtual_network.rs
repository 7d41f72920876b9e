//! The Azure virtual network schema
//!
//! One concrete instantiation of the option machinery: the network's typed
//! options, the nested subnet schema, and the two module default rules
//! (conventional resource group, address-space-derived default subnet).

use std::collections::BTreeMap;

use crate::path::OptionPath;
use crate::resolve::{Guard, Override, Priority, ResolutionError, ResolvedConfig, ResolvedView};
use crate::schema::{OptionDecl, OptionSet, TypeSpec};
use crate::value::Value;

use super::{
    credentials, ModuleContext, ResourceSchema, DEFAULT_RESOURCE_GROUP, RESOURCE_GROUP_KIND,
    SECURITY_GROUP_KIND,
};

/// Kind tag stamped onto every resolved virtual-network configuration
pub const KIND: &str = "azure-virtual-network";

/// Schema of one subnet entry
pub fn subnet_options() -> OptionSet {
    OptionSet::new()
        .with(
            OptionDecl::new("addressPrefix", TypeSpec::String)
                .describe("Address prefix of the subnet, in CIDR notation")
                .with_example("10.1.0.0/24"),
        )
        .with(
            OptionDecl::new(
                "securityGroup",
                TypeSpec::nullable_of(TypeSpec::string_or_resource(SECURITY_GROUP_KIND)),
            )
            .with_default(Value::Null)
            .describe("Network security group protecting the subnet, if any"),
        )
}

/// The virtual network's own options
pub fn options() -> OptionSet {
    OptionSet::new()
        .with(
            OptionDecl::new("name", TypeSpec::String)
                .describe("Name of the virtual network; defaults to a deployment-derived name"),
        )
        .with(
            OptionDecl::new("resourceGroup", TypeSpec::string_or_resource(RESOURCE_GROUP_KIND))
                .describe("Resource group the network belongs to"),
        )
        .with(
            OptionDecl::new("location", TypeSpec::String)
                .describe("Azure location of the network")
                .with_example("westus"),
        )
        .with(
            OptionDecl::new("addressSpace", TypeSpec::list_of(TypeSpec::String))
                .describe("Address prefixes of the network, in CIDR notation")
                .with_example(Value::string_list(["10.1.0.0/16", "10.3.0.0/16"])),
        )
        .with(
            OptionDecl::new("tags", TypeSpec::attrs_of(TypeSpec::String))
                .with_default(Value::empty_attrs())
                .describe("Tag name/value pairs associated with the network"),
        )
        .with(
            OptionDecl::new(
                "dnsServers",
                TypeSpec::nullable_of(TypeSpec::list_of(TypeSpec::String)),
            )
            .with_default(Value::List(Vec::new()))
            .describe("DNS servers for the network; empty means provider defaults"),
        )
        .with(
            OptionDecl::new(
                "subnets",
                TypeSpec::attrs_of(TypeSpec::OptionSetOf(subnet_options())),
            )
            .with_default(Value::empty_attrs())
            .describe("Subnets of the network, keyed by subnet name"),
        )
}

/// Options including the credential fields a collaborator module contributes
pub fn options_with_credentials() -> OptionSet {
    options()
        .merge(credentials::options())
        .expect("credential option names do not collide with network options")
}

pub fn schema() -> ResourceSchema {
    ResourceSchema::new(KIND, options())
}

/// The module's two default rules, both at `Default` priority:
///
/// - `name` derives from the deployment id and the resource's plan name.
/// - `resourceGroup` falls back to the conventionally named default group.
/// - `subnets`: when `addressSpace` is non-empty and the user declares no
///   subnets, a single subnet named `default` covers the first address space
///   entry.
pub fn default_rules(ctx: &ModuleContext) -> Vec<Override> {
    vec![
        Override::literal(
            "name",
            format!("{}-{}", ctx.deployment_id, ctx.resource_name),
            Priority::Default,
        ),
        Override::literal(
            "resourceGroup",
            Value::resource(RESOURCE_GROUP_KIND, DEFAULT_RESOURCE_GROUP),
            Priority::Default,
        ),
        Override::computed(
            "subnets",
            Priority::Default,
            [OptionPath::from("addressSpace")],
            default_subnet,
        )
        .guarded(Guard::new([OptionPath::from("addressSpace")], |view| {
            view.get("addressSpace")
                .and_then(Value::as_list)
                .map(|prefixes| !prefixes.is_empty())
                .unwrap_or(false)
        })),
    ]
}

fn default_subnet(view: &ResolvedView) -> Value {
    let first = view
        .get("addressSpace")
        .and_then(Value::as_list)
        .and_then(|prefixes| prefixes.first())
        .cloned()
        .unwrap_or(Value::Null);
    let mut subnet = BTreeMap::new();
    subnet.insert("addressPrefix".to_string(), first);
    let mut subnets = BTreeMap::new();
    subnets.insert("default".to_string(), Value::Attrs(subnet));
    Value::Attrs(subnets)
}

/// Resolve one virtual network: module default rules plus the caller's
/// overrides, in one run
pub fn resolve(
    ctx: &ModuleContext,
    user_overrides: &[Override],
) -> Result<ResolvedConfig, ResolutionError> {
    let mut overrides = default_rules(ctx);
    overrides.extend_from_slice(user_overrides);
    schema().resolve(&overrides)
}
