//! Override resolution
//!
//! Merges a sequence of [`Override`]s with a schema's own defaults into one
//! immutable [`ResolvedConfig`], applying priority and guard rules. See
//! [`resolve`] for the entry point.

mod config;
mod engine;
mod error;
mod overrides;

pub use config::ResolvedConfig;
pub use engine::resolve;
pub use error::ResolutionError;
pub use overrides::{Guard, Override, OverrideValue, Priority, ResolvedView};
