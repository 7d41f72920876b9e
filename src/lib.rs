//! resconfig - typed option schemas and override resolution for declarative
//! cloud resources
//!
//! Resources are described as data: each resource kind declares an
//! [`OptionSet`] of typed options with defaults, users and modules contribute
//! prioritized [`Override`]s, and the override engine merges them into one
//! immutable [`ResolvedConfig`] per resource. Reference fields stay in
//! string-or-handle form until the deployment backend dereferences them
//! against the [`ResourceRegistry`].
//!
//! # Example
//!
//! ```rust
//! use resconfig::{Plan, Value};
//!
//! let plan = Plan::from_str(r#"
//!     [deployment]
//!     id = "prod"
//!
//!     [[resource]]
//!     kind = "azure-resource-group"
//!     name = "def-group"
//!
//!     [[resource]]
//!     kind = "azure-virtual-network"
//!     name = "backbone"
//!     [resource.options]
//!     location = "westus"
//!     addressSpace = ["10.1.0.0/16"]
//! "#).unwrap();
//!
//! let configs = plan.resolve().unwrap();
//! assert_eq!(configs[0].get("subnets.default.addressPrefix"),
//!            Some(&Value::string("10.1.0.0/16")));
//! ```

pub mod modules;
pub mod path;
pub mod plan;
pub mod registry;
pub mod resolve;
pub mod schema;
pub mod value;

pub use path::OptionPath;
pub use plan::{Plan, PlanError, ResourceDecl};
pub use registry::{ReferenceError, ResourceRef, ResourceRegistry};
pub use resolve::{Guard, Override, Priority, ResolutionError, ResolvedConfig, ResolvedView};
pub use schema::{OptionDecl, OptionSet, TypeError, TypeSpec};
pub use value::Value;

use thiserror::Error;

/// Errors that can occur when evaluating a whole plan
#[derive(Debug, Error)]
pub enum EvalError {
    /// Error loading or converting the plan document
    #[error("plan error: {0}")]
    Plan(#[from] PlanError),

    /// Error resolving a resource's configuration
    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionError),
}

/// Load a plan from TOML and resolve every resource this crate has a schema
/// for, in one step
pub fn eval_plan(source: &str) -> Result<Vec<ResolvedConfig>, EvalError> {
    let plan = Plan::from_str(source)?;
    Ok(plan.resolve()?)
}
