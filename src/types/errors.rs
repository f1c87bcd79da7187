//! Application error types.
//!
//! These are startup and configuration failures: bad tool paths, duplicate
//! registrations, unreadable config. Failures raised *by tools* live in
//! [`crate::tools::ToolError`] and never surface as this type; the dispatcher
//! folds them into an [`crate::dispatch::ExecutionResult`].

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for toolhost.
#[derive(Error, Debug)]
pub enum Error {
    /// Tool path is malformed (empty, empty segment, leading/trailing slash).
    #[error("invalid tool path: {0}")]
    InvalidPath(String),

    /// Two tools registered under the same path.
    #[error("duplicate tool path: {0}")]
    DuplicatePath(String),

    /// Tool path does not resolve in the registry.
    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration value could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience constructors
impl Error {
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    pub fn duplicate_path(msg: impl Into<String>) -> Self {
        Self::DuplicatePath(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors that mean the registry was assembled wrongly.
    pub fn is_registration_error(&self) -> bool {
        matches!(self, Error::InvalidPath(_) | Error::DuplicatePath(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_detail() {
        let err = Error::duplicate_path("T/a");
        assert_eq!(err.to_string(), "duplicate tool path: T/a");

        let err = Error::not_found("T/missing");
        assert_eq!(err.to_string(), "not found: T/missing");
    }

    #[test]
    fn test_registration_errors() {
        assert!(Error::invalid_path("/x").is_registration_error());
        assert!(Error::duplicate_path("x").is_registration_error());
        assert!(!Error::not_found("x").is_registration_error());
        assert!(!Error::config("x").is_registration_error());
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
