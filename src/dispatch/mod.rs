//! Request dispatch: context construction, failure boundary, result envelope.
//!
//! [`Dispatcher::execute`] is the one place where tool failures are
//! recovered. Everything a tool returns or raises comes back as an
//! [`ExecutionResult`].

mod context;
mod envelope;
mod executor;
pub mod recovery;
mod state;

pub use context::{ContextLogger, ExecutionContext};
pub use envelope::{Diagnostics, ErrorKind, ExecutionResult, Failure};
pub use executor::{Dispatcher, Executor};
pub use state::InvocationState;
