//! Tool error types.
//!
//! The only error type a [`Tool`](super::Tool) may return. `Validation` and
//! `DataAccess` are expected failures; `Unexpected` wraps anything else.

use std::error::Error as StdError;

/// Boxed error carried by [`ToolError::Unexpected`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type returned by [`Tool::run`](super::Tool::run).
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Error returned by tool execution.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Caller-supplied parameters rejected before any side effect.
    #[error("validation error: {message}")]
    Validation {
        message: String,
        user_message: Option<String>,
    },

    /// An external data source could not be reached or queried.
    #[error("data access error: {message}")]
    DataAccess {
        message: String,
        user_message: Option<String>,
    },

    /// Anything else. Surfaces to callers only as a generic message.
    #[error("unexpected error: {0}")]
    Unexpected(BoxError),
}

impl ToolError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            user_message: None,
        }
    }

    pub fn data_access(msg: impl Into<String>) -> Self {
        Self::DataAccess {
            message: msg.into(),
            user_message: None,
        }
    }

    pub fn unexpected(err: impl Into<BoxError>) -> Self {
        Self::Unexpected(err.into())
    }

    /// Attach a caller-facing message. No effect on `Unexpected`.
    #[must_use]
    pub fn with_user_message(mut self, msg: impl Into<String>) -> Self {
        match &mut self {
            ToolError::Validation { user_message, .. }
            | ToolError::DataAccess { user_message, .. } => {
                *user_message = Some(msg.into());
            }
            ToolError::Unexpected(_) => {}
        }
        self
    }

    /// True for `Validation` and `DataAccess`.
    pub fn is_expected(&self) -> bool {
        !matches!(self, ToolError::Unexpected(_))
    }

    /// Technical message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            ToolError::Validation { message, .. } | ToolError::DataAccess { message, .. } => {
                message.clone()
            }
            ToolError::Unexpected(err) => err.to_string(),
        }
    }

    pub fn user_message(&self) -> Option<&str> {
        match self {
            ToolError::Validation { user_message, .. }
            | ToolError::DataAccess { user_message, .. } => user_message.as_deref(),
            ToolError::Unexpected(_) => None,
        }
    }

    /// Render the source chain of an `Unexpected` error, one cause per line.
    pub fn cause_chain(&self) -> Option<String> {
        let ToolError::Unexpected(err) = self else {
            return None;
        };

        let mut out = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            out.push_str("\ncaused by: ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        Some(out)
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::Unexpected(Box::new(err))
    }
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::Unexpected(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("outer failure")]
    struct Outer {
        #[source]
        inner: std::io::Error,
    }

    #[test]
    fn test_user_message_override() {
        let err = ToolError::validation("end < start").with_user_message("Pick a later end date");
        assert_eq!(err.message(), "end < start");
        assert_eq!(err.user_message(), Some("Pick a later end date"));
        assert!(err.is_expected());
    }

    #[test]
    fn test_unexpected_ignores_user_message() {
        let err = ToolError::unexpected("boom").with_user_message("ignored");
        assert_eq!(err.user_message(), None);
        assert!(!err.is_expected());
    }

    #[test]
    fn test_cause_chain() {
        let err = ToolError::unexpected(Outer {
            inner: std::io::Error::other("disk gone"),
        });
        let chain = err.cause_chain().unwrap();
        assert_eq!(chain, "outer failure\ncaused by: disk gone");

        assert!(ToolError::validation("x").cause_chain().is_none());
    }

    #[test]
    fn test_from_serde_json_is_unexpected() {
        let json_err = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err: ToolError = json_err.into();
        assert!(matches!(err, ToolError::Unexpected(_)));
    }
}
