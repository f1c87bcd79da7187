//! # Toolhost - Tool Registry and Dispatcher
//!
//! Runs named units of business logic ("tools") behind one execution
//! surface:
//! - Startup-time registration under hierarchical paths (`RAD/ingestor/timeline`)
//! - Per-invocation context with correlation id, caller and bound logger
//! - Failure boundary that turns every error and panic into a typed envelope
//! - Structured start/completion/failure events tagged with the context
//!
//! ## Architecture
//!
//! ```text
//!   caller ──execute(caller, path, params)──▶ ┌──────────────────────────┐
//!                                             │        Dispatcher        │
//!                                             │  context → lookup → run  │
//!                                             │      (failure boundary)  │
//!                                             └────────────┬─────────────┘
//!                                                          │ &Arc<dyn Tool>
//!                                             ┌────────────▼─────────────┐
//!                                             │   Registry (sealed)      │
//!                                             └──────────────────────────┘
//! ```
//!
//! The registry is built once and never mutated afterwards, so concurrent
//! dispatches share it without locking.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod dispatch;
pub mod identity;
pub mod observability;
pub mod tools;
pub mod types;

#[doc(hidden)]
pub use tracing as __tracing;

pub use dispatch::{Dispatcher, ErrorKind, ExecutionContext, ExecutionResult, Executor, Failure};
pub use tools::{Params, Registry, RegistryBuilder, Tool, ToolError, ToolMetadata, ToolResult};
pub use types::{Config, Error, Result};
