//! Panic recovery for tool invocations.
//!
//! A panicking tool must not take down the caller, so the dispatcher runs
//! every tool through [`with_recovery`]. A caught panic becomes a
//! [`ToolError::Unexpected`] wrapping [`ToolPanic`].

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::tools::{ToolError, ToolResult};

/// A panic caught at the failure boundary.
#[derive(Debug, Clone, thiserror::Error)]
#[error("tool panicked: {message}")]
pub struct ToolPanic {
    pub message: String,
}

/// Execute a function with panic recovery.
///
/// Errors returned by `operation` pass through untouched.
pub fn with_recovery<F, T>(operation: F) -> ToolResult<T>
where
    F: FnOnce() -> ToolResult<T>,
{
    match catch_unwind(AssertUnwindSafe(operation)) {
        Ok(result) => result,
        Err(panic_payload) => Err(ToolError::Unexpected(Box::new(ToolPanic {
            message: extract_panic_message(panic_payload.as_ref()),
        }))),
    }
}

/// Extract panic message from panic payload.
fn extract_panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic (no message)".to_string()
    }
}
