//! Tool infrastructure: contract, error taxonomy, parameter helpers, registry.
//!
//! A tool is anything implementing [`Tool`]. Tools are registered once at
//! startup under a slash-separated path; the sealed [`Registry`] is then
//! shared read-only by every dispatch.

pub mod builtin;
mod contract;
mod error;
mod params;
mod registry;

pub use contract::{to_payload, tool_fn, FnTool, Params, Tool, ToolMetadata};
pub use error::{BoxError, ToolError, ToolResult};
pub use params::{ParamDef, ParamSpec, ParamType};
pub use registry::{
    validate_path, NavLeaf, NavNode, Registry, RegistryBuilder, RegistryEntry, ToolListing,
};
