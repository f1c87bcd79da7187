//! The tool contract: metadata plus a single `run` operation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ToolResult;
use super::params::ParamSpec;
use crate::dispatch::ExecutionContext;

/// Input parameters for one invocation. Schema is the tool's business.
pub type Params = serde_json::Map<String, Value>;

/// Static tool metadata. Used for navigation only, never for control flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub category: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "ParamSpec::is_empty")]
    pub params: ParamSpec,
}

impl ToolMetadata {
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            description: description.into(),
            params: ParamSpec::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: impl Into<ParamSpec>) -> Self {
        self.params = params.into();
        self
    }
}

/// An invokable unit of business logic.
///
/// Implementations are shared across concurrent invocations, hence
/// `Send + Sync`. Any shared resource a tool needs (connection handle,
/// cache) is guarded by the tool itself.
///
/// `run` returns [`ToolError::Validation`](super::ToolError::Validation)
/// before touching anything external when parameters are bad,
/// [`ToolError::DataAccess`](super::ToolError::DataAccess) when a data
/// source fails, and [`ToolError::Unexpected`](super::ToolError::Unexpected)
/// for everything else. Panics are caught by the dispatcher and treated as
/// unexpected.
pub trait Tool: Send + Sync {
    fn metadata(&self) -> ToolMetadata;

    fn run(&self, ctx: &ExecutionContext, params: &Params) -> ToolResult<Value>;
}

/// Tool backed by a closure.
pub struct FnTool<F> {
    metadata: ToolMetadata,
    handler: F,
}

impl<F> FnTool<F>
where
    F: Fn(&ExecutionContext, &Params) -> ToolResult<Value> + Send + Sync,
{
    pub fn new(metadata: ToolMetadata, handler: F) -> Self {
        Self { metadata, handler }
    }
}

impl<F> std::fmt::Debug for FnTool<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool")
            .field("category", &self.metadata.category)
            .field("name", &self.metadata.name)
            .finish_non_exhaustive()
    }
}

impl<F> Tool for FnTool<F>
where
    F: Fn(&ExecutionContext, &Params) -> ToolResult<Value> + Send + Sync,
{
    fn metadata(&self) -> ToolMetadata {
        self.metadata.clone()
    }

    fn run(&self, ctx: &ExecutionContext, params: &Params) -> ToolResult<Value> {
        (self.handler)(ctx, params)
    }
}

/// Shorthand for [`FnTool::new`] with inline metadata.
pub fn tool_fn<F>(category: &str, name: &str, description: &str, handler: F) -> FnTool<F>
where
    F: Fn(&ExecutionContext, &Params) -> ToolResult<Value> + Send + Sync,
{
    FnTool::new(ToolMetadata::new(category, name, description), handler)
}

/// Serialize any payload type into the JSON value a tool returns.
pub fn to_payload<T: Serialize>(value: &T) -> ToolResult<Value> {
    Ok(serde_json::to_value(value)?)
}
