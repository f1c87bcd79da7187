//! Built-in RAD ingestor tools.

pub mod force_load;
pub mod timeline;

pub use force_load::{
    find_table, ConfigRow, DryRunTarget, ForceLoadAction, ForceLoadTable, ForceLoadTarget,
    ForceLoadTool, FORCE_LOAD_TABLES,
};
pub use timeline::{MockTimelineSource, TimelineReport, TimelineSource, TimelineTool, TIMELINE_DESKS};

use super::registry::{Registry, RegistryBuilder};
use crate::types::Result;

pub const TIMELINE_PATH: &str = "RAD/ingestor/timeline";
pub const FORCE_LOAD_PATH: &str = "RAD/ingestor/force_load";

/// Register every built-in tool on `builder`.
pub fn register_builtin(builder: &mut RegistryBuilder) -> Result<()> {
    builder
        .register(TIMELINE_PATH, TimelineTool::new(MockTimelineSource))?
        .register(FORCE_LOAD_PATH, ForceLoadTool::new(DryRunTarget))?;
    Ok(())
}

/// Sealed registry holding only the built-in tools.
pub fn builtin_registry() -> Result<Registry> {
    let mut builder = Registry::builder();
    register_builtin(&mut builder)?;
    Ok(builder.build())
}
