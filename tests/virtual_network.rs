//! Integration tests for the virtual network schema and its default rules

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use resconfig::modules::{virtual_network, ModuleContext, DEFAULT_RESOURCE_GROUP, RESOURCE_GROUP_KIND};
use resconfig::{Override, Priority, ResolutionError, Value};

fn ctx() -> ModuleContext {
    ModuleContext::new("prod", "backbone")
}

fn minimal_overrides() -> Vec<Override> {
    vec![
        Override::literal(
            "addressSpace",
            Value::string_list(["10.1.0.0/16"]),
            Priority::Normal,
        ),
        Override::literal("location", "westus", Priority::Normal),
    ]
}

#[test]
fn test_end_to_end_minimal_network() {
    let config = virtual_network::resolve(&ctx(), &minimal_overrides()).expect("should resolve");

    assert_eq!(config.kind(), "azure-virtual-network");
    assert_eq!(
        config.get("resourceGroup"),
        Some(&Value::resource(RESOURCE_GROUP_KIND, DEFAULT_RESOURCE_GROUP))
    );
    assert_eq!(
        config.get("subnets.default.addressPrefix"),
        Some(&Value::string("10.1.0.0/16"))
    );
    assert_eq!(config.get("subnets.default.securityGroup"), Some(&Value::Null));
    assert_eq!(config.get("dnsServers"), Some(&Value::List(Vec::new())));
    assert_eq!(config.get("tags"), Some(&Value::empty_attrs()));
}

#[test]
fn test_repeated_resolution_is_identical() {
    let first = virtual_network::resolve(&ctx(), &minimal_overrides()).unwrap();
    let second = virtual_network::resolve(&ctx(), &minimal_overrides()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_json(), second.to_json());
}

#[test]
fn test_idempotence_of_resolved_values() {
    // Feeding a resolved configuration's own values back as Default-priority
    // overrides reproduces the configuration exactly.
    let config = virtual_network::resolve(&ctx(), &minimal_overrides()).unwrap();
    let refed: Vec<Override> = config
        .iter()
        .map(|(name, value)| Override::literal(name, value.clone(), Priority::Default))
        .collect();
    let again = virtual_network::schema().resolve(&refed).unwrap();
    assert_eq!(config, again);
}

#[test]
fn test_priority_law_force_wins() {
    let mut overrides = minimal_overrides();
    overrides.push(Override::literal("location", "eastus", Priority::Force));
    let config = virtual_network::resolve(&ctx(), &overrides).unwrap();
    assert_eq!(config.get("location"), Some(&Value::string("eastus")));

    // Same overrides in the opposite sequence order
    let mut reversed = minimal_overrides();
    reversed.insert(0, Override::literal("location", "eastus", Priority::Force));
    let config = virtual_network::resolve(&ctx(), &reversed).unwrap();
    assert_eq!(config.get("location"), Some(&Value::string("eastus")));
}

#[test]
fn test_conflict_law_equal_priority() {
    let mut overrides = minimal_overrides();
    overrides.push(Override::literal("location", "eastus", Priority::Normal));
    let err = virtual_network::resolve(&ctx(), &overrides).unwrap_err();
    match &err {
        ResolutionError::ConflictingOverrides { path, priority } => {
            assert_eq!(path.to_string(), "location");
            assert_eq!(*priority, Priority::Normal);
        }
        other => panic!("expected conflict, got {:?}", other),
    }
    insta::assert_snapshot!(
        err.to_string(),
        @"conflicting overrides for `location` at normal priority"
    );
}

#[test]
fn test_guard_law_empty_address_space() {
    let overrides = vec![
        Override::literal("addressSpace", Value::List(Vec::new()), Priority::Normal),
        Override::literal("location", "westus", Priority::Normal),
    ];
    let config = virtual_network::resolve(&ctx(), &overrides).unwrap();
    assert_eq!(config.get("subnets"), Some(&Value::empty_attrs()));
}

#[test]
fn test_guard_law_first_entry_wins() {
    let overrides = vec![
        Override::literal(
            "addressSpace",
            Value::string_list(["10.1.0.0/16", "10.3.0.0/16"]),
            Priority::Normal,
        ),
        Override::literal("location", "westus", Priority::Normal),
    ];
    let config = virtual_network::resolve(&ctx(), &overrides).unwrap();
    assert_eq!(
        config.get("subnets.default.addressPrefix"),
        Some(&Value::string("10.1.0.0/16"))
    );
}

#[test]
fn test_user_subnets_take_precedence_without_conflict() {
    // User supplies both a non-empty addressSpace (activating the guarded
    // default) and an explicit conflicting "default" subnet; the Normal
    // override wins outright.
    let mut subnet = BTreeMap::new();
    subnet.insert("addressPrefix".to_string(), Value::string("10.9.0.0/24"));
    let mut subnets = BTreeMap::new();
    subnets.insert("default".to_string(), Value::Attrs(subnet));

    let mut overrides = minimal_overrides();
    overrides.push(Override::literal("subnets", Value::Attrs(subnets), Priority::Normal));

    let config = virtual_network::resolve(&ctx(), &overrides).unwrap();
    assert_eq!(
        config.get("subnets.default.addressPrefix"),
        Some(&Value::string("10.9.0.0/24"))
    );
    // The subnet-level default still fills in
    assert_eq!(config.get("subnets.default.securityGroup"), Some(&Value::Null));
}

#[test]
fn test_missing_address_space_is_reported_by_path() {
    let overrides = vec![Override::literal("location", "westus", Priority::Normal)];
    let err = virtual_network::resolve(&ctx(), &overrides).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"missing required option `addressSpace`");
}

#[test]
fn test_wrong_address_space_type() {
    let overrides = vec![
        Override::literal("addressSpace", "10.1.0.0/16", Priority::Normal),
        Override::literal("location", "westus", Priority::Normal),
    ];
    let err = virtual_network::resolve(&ctx(), &overrides).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"type mismatch at `addressSpace`: expected list of string, got string"
    );
}

#[test]
fn test_json_export_keeps_reference_unresolved() {
    let config = virtual_network::resolve(&ctx(), &minimal_overrides()).unwrap();
    let json = config.to_json();
    assert_eq!(
        json["resourceGroup"],
        serde_json::json!({"kind": "azure-resource-group", "name": "def-group"})
    );
    assert_eq!(json["subnets"]["default"]["addressPrefix"], "10.1.0.0/16");
}

#[test]
fn test_name_derives_from_deployment_and_resource() {
    let config = virtual_network::resolve(&ctx(), &minimal_overrides()).unwrap();
    assert_eq!(config.get("name"), Some(&Value::string("prod-backbone")));

    let mut named = minimal_overrides();
    named.push(Override::literal("name", "custom-net", Priority::Normal));
    let config = virtual_network::resolve(&ctx(), &named).unwrap();
    assert_eq!(config.get("name"), Some(&Value::string("custom-net")));
}
