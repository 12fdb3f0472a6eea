//! Tool implementations for the ComplianceGuard agents.
//!
//! Tools are small, schema-described operations the agents (and the CLI)
//! can invoke through the registry: gap scoring, risk calculation, policy
//! inspection, regulatory reference lookups, and report rendering.

pub mod analysis;
pub mod reference;
pub mod registry;
pub mod reporting;
pub mod setup;

pub use registry::{Tool, ToolDefinition, ToolOutput, ToolRegistry};
pub use setup::{default_registry, registry_for_agent};
