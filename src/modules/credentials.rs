//! Management credential options contributed to every Azure resource schema
//!
//! An opaque sub-set merged into a resource module's own options. Null
//! values fall back to ambient credentials at deploy time; only the
//! subscription is always required.

use crate::schema::{OptionDecl, OptionSet, TypeSpec};
use crate::value::Value;

pub fn options() -> OptionSet {
    OptionSet::new()
        .with(
            OptionDecl::new("subscriptionId", TypeSpec::String)
                .describe("Azure subscription id that owns the resource"),
        )
        .with(
            OptionDecl::new("tenantId", TypeSpec::nullable_of(TypeSpec::String))
                .with_default(Value::Null)
                .describe("Azure Active Directory tenant; null uses the ambient tenant"),
        )
        .with(
            OptionDecl::new("clientId", TypeSpec::nullable_of(TypeSpec::String))
                .with_default(Value::Null)
                .describe("Service principal client id; null uses ambient credentials"),
        )
        .with(
            OptionDecl::new("clientSecret", TypeSpec::nullable_of(TypeSpec::String))
                .with_default(Value::Null)
                .describe("Service principal secret; null uses ambient credentials"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_subscription_is_mandatory() {
        let set = options();
        assert!(set.get("subscriptionId").unwrap().is_mandatory());
        assert!(!set.get("tenantId").unwrap().is_mandatory());
        assert!(!set.get("clientId").unwrap().is_mandatory());
        assert!(!set.get("clientSecret").unwrap().is_mandatory());
    }
}
