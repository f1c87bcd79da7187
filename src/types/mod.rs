//! Core types for toolhost.
//!
//! This module provides foundational types used throughout the system:
//! - **IDs**: Strongly-typed identifiers (CorrelationId, CallerId)
//! - **Errors**: Startup/configuration error types with thiserror derives
//! - **Config**: Configuration structures for observability and dispatch

mod config;
mod errors;
mod ids;

pub use config::{
    Config, DispatchConfig, ObservabilityConfig, ENV_CAPTURE_TRACES, ENV_LOG_FORMAT,
    ENV_LOG_LEVEL, ENV_SLOW_EXECUTION,
};
pub use errors::{Error, Result};
pub use ids::{CallerId, CorrelationId};
