//! Dispatcher: the single entry point for tool execution.
//!
//! `execute` builds a context, resolves the tool, runs it behind the failure
//! boundary and folds every outcome into one [`ExecutionResult`]. Nothing
//! raised by a tool, panics included, escapes this function.

use std::sync::Arc;
use std::time::Duration;

use super::context::ExecutionContext;
use super::envelope::{ErrorKind, ExecutionResult, Failure};
use super::recovery::with_recovery;
use super::state::InvocationState;
use crate::context_event;
use crate::tools::{Params, Registry, ToolError};
use crate::types::{CallerId, DispatchConfig};

/// Inbound surface for presentation layers.
pub trait Executor: Send + Sync {
    fn execute(&self, caller: &str, tool_path: &str, params: Params) -> ExecutionResult;
}

/// Synchronous request dispatcher over a sealed [`Registry`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, DispatchConfig::default())
    }

    pub fn with_config(registry: Arc<Registry>, config: DispatchConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Paths for menu construction, in registration order.
    pub fn list_paths(&self) -> Vec<&str> {
        self.registry.list_paths()
    }

    /// Run the tool at `tool_path` for `caller` and wrap the outcome.
    ///
    /// A blank caller is recorded as `"unknown"`.
    pub fn execute(&self, caller: &str, tool_path: &str, params: Params) -> ExecutionResult {
        let ctx = ExecutionContext::new(CallerId::or_unknown(caller), tool_path, params);
        let mut invocation = Invocation::new(&ctx);

        context_event!(
            info,
            ctx.logger(),
            params = %params_for_log(ctx.params()),
            started_at = %ctx.started_at().to_rfc3339(),
            "tool execution started"
        );

        invocation.advance(InvocationState::Resolving);
        let tool = match self.registry.lookup(tool_path) {
            Ok(tool) => Arc::clone(tool),
            Err(err) => {
                context_event!(warn, ctx.logger(), error = %err, "tool not found");
                invocation.advance(InvocationState::Failed(ErrorKind::NotFound));
                return ExecutionResult::Failure(Failure::new(
                    ErrorKind::NotFound,
                    ctx.correlation_id().clone(),
                    err.to_string(),
                    Some(format!("Tool '{}' does not exist", tool_path)),
                    None,
                ));
            }
        };

        invocation.advance(InvocationState::Running);
        let outcome = with_recovery(|| tool.run(&ctx, ctx.params()));
        let elapsed = ctx.elapsed();

        match outcome {
            Ok(payload) => {
                self.log_completed(&ctx, elapsed);
                invocation.advance(InvocationState::Succeeded);
                ExecutionResult::success(payload, ctx.correlation_id().clone())
            }
            Err(err) => {
                let failure = self.failure_from(&ctx, &err, elapsed);
                invocation.advance(InvocationState::Failed(failure.kind()));
                ExecutionResult::Failure(failure)
            }
        }
    }

    fn log_completed(&self, ctx: &ExecutionContext, elapsed: Duration) {
        let duration_ms = millis(elapsed);
        if elapsed > self.config.slow_execution_threshold {
            context_event!(
                warn,
                ctx.logger(),
                duration_ms,
                threshold_ms = millis(self.config.slow_execution_threshold),
                "tool execution completed slowly"
            );
        } else {
            context_event!(info, ctx.logger(), duration_ms, "tool execution completed");
        }
    }

    fn failure_from(&self, ctx: &ExecutionContext, err: &ToolError, elapsed: Duration) -> Failure {
        let duration_ms = millis(elapsed);
        let message = err.message();

        let (kind, user_message, trace, summary) = match err {
            // Validation messages are written for the caller.
            ToolError::Validation { user_message, .. } => (
                ErrorKind::ValidationError,
                user_message.clone().or_else(|| Some(message.clone())),
                None,
                "tool rejected parameters",
            ),
            ToolError::DataAccess { user_message, .. } => (
                ErrorKind::DataAccessError,
                user_message.clone(),
                None,
                "tool data access failed",
            ),
            ToolError::Unexpected(_) => (
                ErrorKind::Unexpected,
                None,
                Some(err.cause_chain().unwrap_or_else(|| err.to_string())),
                "unexpected error during tool execution",
            ),
        };

        if kind.is_expected() {
            context_event!(warn, ctx.logger(), duration_ms, kind = %kind, error = %message, "{}", summary);
        } else {
            context_event!(
                error,
                ctx.logger(),
                duration_ms,
                kind = %kind,
                error = %message,
                trace = trace.as_deref().unwrap_or_default(),
                "{}",
                summary
            );
        }

        Failure::new(
            kind,
            ctx.correlation_id().clone(),
            message,
            user_message,
            trace.filter(|_| self.config.capture_traces),
        )
    }
}

impl Executor for Dispatcher {
    fn execute(&self, caller: &str, tool_path: &str, params: Params) -> ExecutionResult {
        Dispatcher::execute(self, caller, tool_path, params)
    }
}

/// Tracks one dispatch through its states.
struct Invocation<'a> {
    ctx: &'a ExecutionContext,
    state: InvocationState,
}

impl<'a> Invocation<'a> {
    fn new(ctx: &'a ExecutionContext) -> Self {
        Self {
            ctx,
            state: InvocationState::Created,
        }
    }

    fn advance(&mut self, next: InvocationState) {
        debug_assert!(!self.state.is_terminal(), "invocation already finished");
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid invocation transition {} -> {}",
            self.state,
            next
        );
        context_event!(
            debug,
            self.ctx.logger(),
            from = %self.state,
            to = %next,
            "invocation state changed"
        );
        self.state = next;
    }
}

fn params_for_log(params: &Params) -> String {
    serde_json::to_string(params).unwrap_or_else(|_| "<unserializable>".to_string())
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
