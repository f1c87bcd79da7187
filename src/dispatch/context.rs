//! Per-invocation execution context and its bound logger.

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

use crate::tools::Params;
use crate::types::{CallerId, CorrelationId};

/// Emit a `tracing` event carrying the context fields of a [`ContextLogger`].
///
/// Accepts the same trailing field/message syntax as the `tracing` macros:
///
/// ```ignore
/// context_event!(info, ctx.logger(), rows = 10, "fetched {} rows", 10);
/// ```
#[macro_export]
macro_rules! context_event {
    ($level:ident, $logger:expr, $($rest:tt)+) => {{
        let __logger: &$crate::dispatch::ContextLogger = &$logger;
        $crate::__tracing::$level!(
            correlation_id = __logger.correlation_id(),
            caller = __logger.caller(),
            tool_path = __logger.tool_path(),
            $($rest)+
        )
    }};
}

/// Logger bound to one invocation.
///
/// Every record emitted through it carries `correlation_id`, `caller` and
/// `tool_path` as structured fields.
#[derive(Debug, Clone)]
pub struct ContextLogger {
    correlation_id: CorrelationId,
    caller: CallerId,
    tool_path: String,
}

impl ContextLogger {
    fn new(correlation_id: CorrelationId, caller: CallerId, tool_path: String) -> Self {
        Self {
            correlation_id,
            caller,
            tool_path,
        }
    }

    pub fn correlation_id(&self) -> &str {
        self.correlation_id.as_str()
    }

    pub fn caller(&self) -> &str {
        self.caller.as_str()
    }

    pub fn tool_path(&self) -> &str {
        &self.tool_path
    }

    pub fn debug(&self, message: &str) {
        context_event!(debug, self, "{}", message);
    }

    pub fn info(&self, message: &str) {
        context_event!(info, self, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        context_event!(warn, self, "{}", message);
    }

    pub fn error(&self, message: &str) {
        context_event!(error, self, "{}", message);
    }
}

/// Everything a tool may know about the invocation it is serving.
///
/// Created fresh for each call and dropped when the call returns. Not
/// `Clone`: a context belongs to exactly one invocation.
#[derive(Debug)]
pub struct ExecutionContext {
    correlation_id: CorrelationId,
    caller: CallerId,
    started_at: DateTime<Utc>,
    started: Instant,
    tool_path: String,
    params: Params,
    logger: ContextLogger,
}

impl ExecutionContext {
    /// Build a context with a fresh correlation id and the current time.
    pub fn new(caller: CallerId, tool_path: &str, params: Params) -> Self {
        let correlation_id = CorrelationId::new();
        let logger = ContextLogger::new(
            correlation_id.clone(),
            caller.clone(),
            tool_path.to_string(),
        );
        Self {
            correlation_id,
            caller,
            started_at: Utc::now(),
            started: Instant::now(),
            tool_path: tool_path.to_string(),
            params,
            logger,
        }
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    pub fn caller(&self) -> &CallerId {
        &self.caller
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn tool_path(&self) -> &str {
        &self.tool_path
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn logger(&self) -> &ContextLogger {
        &self.logger
    }

    /// Wall time since the context was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_fields() {
        let mut params = Params::new();
        params.insert("desk".into(), json!("FXG"));

        let ctx = ExecutionContext::new(CallerId::or_unknown("u1"), "T/a", params);
        assert_eq!(ctx.caller().as_str(), "u1");
        assert_eq!(ctx.tool_path(), "T/a");
        assert_eq!(ctx.params()["desk"], "FXG");
        assert!(ctx.started_at() <= Utc::now());
    }

    #[test]
    fn test_logger_bound_to_context() {
        let ctx = ExecutionContext::new(CallerId::or_unknown("u1"), "T/a", Params::new());
        let logger = ctx.logger();
        assert_eq!(logger.correlation_id(), ctx.correlation_id().as_str());
        assert_eq!(logger.caller(), "u1");
        assert_eq!(logger.tool_path(), "T/a");
    }

    #[test]
    fn test_each_context_gets_new_correlation_id() {
        let a = ExecutionContext::new(CallerId::unknown(), "T/a", Params::new());
        let b = ExecutionContext::new(CallerId::unknown(), "T/a", Params::new());
        assert_ne!(a.correlation_id(), b.correlation_id());
    }
}
