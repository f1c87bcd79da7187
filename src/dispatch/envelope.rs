//! Result envelope returned by every dispatch.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::types::CorrelationId;

/// Closed set of failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Path did not resolve; no tool code ran.
    NotFound,
    /// Tool rejected the caller's parameters.
    ValidationError,
    /// Tool could not reach or query a data source.
    DataAccessError,
    /// Anything else, including panics.
    Unexpected,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::DataAccessError => "data_access_error",
            ErrorKind::Unexpected => "unexpected",
        }
    }

    /// Message shown to callers when nothing more specific is available.
    pub fn default_user_message(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "The requested tool does not exist.",
            ErrorKind::ValidationError => "The supplied parameters are invalid.",
            ErrorKind::DataAccessError => {
                "The data source could not be reached. Please try again later."
            }
            ErrorKind::Unexpected => "An unexpected error occurred. Please contact support.",
        }
    }

    /// Expected failures are logged at warn, the rest at error.
    pub fn is_expected(self) -> bool {
        !matches!(self, ErrorKind::Unexpected)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Technical detail of a failure, for support tooling and logs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostics<'a> {
    pub technical_message: &'a str,
    pub trace: Option<&'a str>,
}

/// A failed invocation.
///
/// Serializes to `{kind, user_message, correlation_id}` only; the technical
/// message and trace are reachable through [`Failure::diagnostics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    kind: ErrorKind,
    user_message: String,
    correlation_id: CorrelationId,
    #[serde(skip)]
    technical_message: String,
    #[serde(skip)]
    trace: Option<String>,
}

impl Failure {
    pub(crate) fn new(
        kind: ErrorKind,
        correlation_id: CorrelationId,
        technical_message: impl Into<String>,
        user_message: Option<String>,
        trace: Option<String>,
    ) -> Self {
        Self {
            kind,
            user_message: user_message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| kind.default_user_message().to_string()),
            correlation_id,
            technical_message: technical_message.into(),
            trace,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    pub fn diagnostics(&self) -> Diagnostics<'_> {
        Diagnostics {
            technical_message: &self.technical_message,
            trace: self.trace.as_deref(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (correlation id {})",
            self.kind, self.user_message, self.correlation_id
        )
    }
}

/// Outcome of one dispatch: exactly one of success or failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionResult {
    Success {
        payload: Value,
        correlation_id: CorrelationId,
    },
    Failure(Failure),
}

impl ExecutionResult {
    pub(crate) fn success(payload: Value, correlation_id: CorrelationId) -> Self {
        ExecutionResult::Success {
            payload,
            correlation_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        match self {
            ExecutionResult::Success { correlation_id, .. } => correlation_id,
            ExecutionResult::Failure(failure) => failure.correlation_id(),
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            ExecutionResult::Success { payload, .. } => Some(payload),
            ExecutionResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            ExecutionResult::Success { .. } => None,
            ExecutionResult::Failure(failure) => Some(failure),
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.failure().map(Failure::kind)
    }

    pub fn into_payload(self) -> std::result::Result<Value, Failure> {
        match self {
            ExecutionResult::Success { payload, .. } => Ok(payload),
            ExecutionResult::Failure(failure) => Err(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_user_message_used_when_missing() {
        let failure = Failure::new(
            ErrorKind::DataAccessError,
            CorrelationId::new(),
            "connection refused",
            None,
            None,
        );
        assert_eq!(
            failure.user_message(),
            ErrorKind::DataAccessError.default_user_message()
        );
        assert_eq!(failure.diagnostics().technical_message, "connection refused");
    }

    #[test]
    fn test_blank_user_message_falls_back() {
        let failure = Failure::new(
            ErrorKind::ValidationError,
            CorrelationId::new(),
            "x",
            Some("  ".into()),
            None,
        );
        assert_eq!(
            failure.user_message(),
            ErrorKind::ValidationError.default_user_message()
        );
    }

    #[test]
    fn test_failure_serialization_hides_internals() {
        let id = CorrelationId::new();
        let result = ExecutionResult::Failure(Failure::new(
            ErrorKind::Unexpected,
            id.clone(),
            "index out of bounds",
            None,
            Some("at src/tool.rs:10".into()),
        ));

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "status": "failure",
                "kind": "unexpected",
                "user_message": "An unexpected error occurred. Please contact support.",
                "correlation_id": id.as_str(),
            })
        );
    }

    #[test]
    fn test_success_serialization() {
        let id = CorrelationId::new();
        let result = ExecutionResult::success(json!({"n": 10}), id.clone());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({"status": "success", "payload": {"n": 10}, "correlation_id": id.as_str()})
        );
    }

    #[test]
    fn test_accessors() {
        let id = CorrelationId::new();
        let ok = ExecutionResult::success(json!(1), id.clone());
        assert!(ok.is_success());
        assert_eq!(ok.payload(), Some(&json!(1)));
        assert_eq!(ok.kind(), None);
        assert_eq!(ok.correlation_id(), &id);

        let failed = ExecutionResult::Failure(Failure::new(
            ErrorKind::NotFound,
            id.clone(),
            "no tool",
            None,
            None,
        ));
        assert!(failed.is_failure());
        assert_eq!(failed.kind(), Some(ErrorKind::NotFound));
        assert_eq!(failed.correlation_id(), &id);
        assert!(failed.into_payload().is_err());
    }
}
