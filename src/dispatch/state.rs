//! Invocation lifecycle.
//!
//! State transitions:
//! ```text
//! CREATED → RESOLVING → RUNNING → {SUCCEEDED | FAILED(kind)}
//!               ↓
//!         FAILED(not_found)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::envelope::ErrorKind;

/// State of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationState {
    Created,
    Resolving,
    Running,
    Succeeded,
    Failed(ErrorKind),
}

impl InvocationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, InvocationState::Succeeded | InvocationState::Failed(_))
    }

    /// Check if transition is valid.
    pub fn can_transition_to(self, to: InvocationState) -> bool {
        match (self, to) {
            (InvocationState::Created, InvocationState::Resolving) => true,
            // Lookup miss is the only failure decided before running.
            (InvocationState::Resolving, InvocationState::Running) => true,
            (InvocationState::Resolving, InvocationState::Failed(ErrorKind::NotFound)) => true,
            (InvocationState::Running, InvocationState::Succeeded) => true,
            (InvocationState::Running, InvocationState::Failed(kind)) => {
                kind != ErrorKind::NotFound
            }
            _ => false,
        }
    }
}

impl fmt::Display for InvocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationState::Created => f.write_str("created"),
            InvocationState::Resolving => f.write_str("resolving"),
            InvocationState::Running => f.write_str("running"),
            InvocationState::Succeeded => f.write_str("succeeded"),
            InvocationState::Failed(kind) => write!(f, "failed({})", kind),
        }
    }
}
