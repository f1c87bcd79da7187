//! `RAD/ingestor/force_load`: push configuration rows into a predefined table.

use serde::Serialize;
use serde_json::Value;

use crate::context_event;
use crate::dispatch::ExecutionContext;
use crate::tools::{
    to_payload, ParamDef, ParamType, Params, Tool, ToolError, ToolMetadata, ToolResult,
};

/// One default configuration row of a predefined table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigRow {
    #[serde(rename = "configName")]
    pub config_name: &'static str,
    pub key: &'static str,
    pub group: &'static str,
}

/// A table that accepts force loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForceLoadTable {
    pub name: &'static str,
    pub description: &'static str,
    pub data: &'static [ConfigRow],
}

const fn row(config_name: &'static str, key: &'static str, group: &'static str) -> ConfigRow {
    ConfigRow {
        config_name,
        key,
        group,
    }
}

pub static FORCE_LOAD_TABLES: [ForceLoadTable; 2] = [
    ForceLoadTable {
        name: "Inflation Env",
        description: "Inflation environment configuration",
        data: &[
            row("Config1", "inflation.rate", "ENV"),
            row("Config2", "inflation.curve", "ENV"),
            row("Config3", "inflation.spread", "ENV"),
        ],
    },
    ForceLoadTable {
        name: "Options ScenarioGamma",
        description: "Options scenario gamma configuration",
        data: &[
            row("Gamma1", "gamma.scenario.base", "OPTS"),
            row("Gamma2", "gamma.scenario.stress", "OPTS"),
        ],
    },
];

/// Look up a predefined table by name.
pub fn find_table(name: &str) -> Option<&'static ForceLoadTable> {
    FORCE_LOAD_TABLES.iter().find(|t| t.name == name)
}

/// Keys every configuration row must carry.
pub const REQUIRED_KEYS: [&str; 3] = ["configName", "key", "group"];

/// What a force-load invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceLoadAction {
    /// Validate `config_data` and write it to the target.
    Load,
    /// Return the table's default rows without writing anything.
    GetDefault,
}

impl ForceLoadAction {
    /// Accepted `action` values. `force_load` is an alias of `load`.
    pub const NAMES: [&'static str; 3] = ["load", "force_load", "get_default"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "load" | "force_load" => Some(ForceLoadAction::Load),
            "get_default" => Some(ForceLoadAction::GetDefault),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForceLoadOutcome {
    pub success: bool,
    pub message: String,
    pub rows_processed: usize,
    pub table_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultConfig {
    pub table_name: &'static str,
    pub description: &'static str,
    pub config: &'static [ConfigRow],
}

/// Where validated rows are written.
pub trait ForceLoadTarget: Send + Sync {
    /// Load `rows` into `table`, returning how many were written.
    fn load(&self, table: &str, rows: &[&Params]) -> ToolResult<usize>;
}

/// Accepts every row without writing anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunTarget;

impl ForceLoadTarget for DryRunTarget {
    fn load(&self, _table: &str, rows: &[&Params]) -> ToolResult<usize> {
        Ok(rows.len())
    }
}

/// Force load configuration data.
#[derive(Debug, Default)]
pub struct ForceLoadTool<T = DryRunTarget> {
    target: T,
}

impl<T: ForceLoadTarget> ForceLoadTool<T> {
    pub fn new(target: T) -> Self {
        Self { target }
    }

    fn default_config(&self, ctx: &ExecutionContext, table: &'static ForceLoadTable) -> ToolResult<Value> {
        context_event!(
            info,
            ctx.logger(),
            table = table.name,
            rows = table.data.len(),
            "returning default configuration"
        );
        to_payload(&DefaultConfig {
            table_name: table.name,
            description: table.description,
            config: table.data,
        })
    }

    fn force_load(&self, ctx: &ExecutionContext, table: &ForceLoadTable, params: &Params) -> ToolResult<Value> {
        let rows = params
            .get("config_data")
            .filter(|v| !v.is_null())
            .ok_or_else(|| {
                ToolError::validation("Missing required parameter: config_data")
                    .with_user_message("Please provide configuration rows to load")
            })?
            .as_array()
            .ok_or_else(|| ToolError::validation("config_data must be an array"))?;

        context_event!(info, ctx.logger(), rows = rows.len(), "validating configuration rows");
        let filled = validate_rows(rows)?;
        context_event!(
            info,
            ctx.logger(),
            table = table.name,
            rows = filled.len(),
            "configuration validated, executing force load"
        );

        let rows_processed = self.target.load(table.name, &filled)?;
        context_event!(info, ctx.logger(), rows_processed, "force load complete");

        to_payload(&ForceLoadOutcome {
            success: true,
            message: format!(
                "Successfully loaded {} configurations to {}",
                rows_processed, table.name
            ),
            rows_processed,
            table_name: table.name.to_string(),
        })
    }
}

/// Absent, null, `false`, zero, and empty strings or collections are blank.
/// Whitespace-only strings are not.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
    }
}

/// Check every row and return the non-blank ones.
///
/// A row must carry all [`REQUIRED_KEYS`] and be either fully filled or
/// fully blank; blank rows are skipped.
fn validate_rows(rows: &[Value]) -> ToolResult<Vec<&Params>> {
    if rows.is_empty() {
        return Err(ToolError::validation("Configuration data cannot be empty")
            .with_user_message("Please provide at least one configuration row"));
    }

    let mut filled = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let row = row.as_object().ok_or_else(|| {
            ToolError::validation(format!("Row {} is not an object", i))
                .with_user_message(format!("Row {} is malformed", i + 1))
        })?;

        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|k| !row.contains_key(*k))
            .collect();
        if !missing.is_empty() {
            return Err(ToolError::validation(format!(
                "Row {} missing required keys: {}",
                i,
                missing.join(", ")
            ))
            .with_user_message(format!("Row {} is missing required fields", i + 1)));
        }

        let blanks = REQUIRED_KEYS
            .iter()
            .filter(|k| is_blank(row.get(**k)))
            .count();
        if blanks == REQUIRED_KEYS.len() {
            continue;
        }
        if blanks > 0 {
            return Err(ToolError::validation(format!("Row {} has incomplete data", i))
                .with_user_message(format!(
                    "Row {} must have all fields filled or be empty",
                    i + 1
                )));
        }
        filled.push(row);
    }
    Ok(filled)
}

impl<T: ForceLoadTarget> Tool for ForceLoadTool<T> {
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata::new(
            "RAD/ingestor",
            "force_load",
            "Force load configuration data to predefined tables",
        )
        .with_params(vec![
            ParamDef::new(
                "table_name",
                ParamType::Enum(FORCE_LOAD_TABLES.iter().map(|t| t.name.to_string()).collect()),
                "Predefined table to load",
            ),
            ParamDef::new(
                "config_data",
                ParamType::Optional(Box::new(ParamType::Rows)),
                "Rows of {configName, key, group}; required when loading",
            ),
            ParamDef::new(
                "action",
                ParamType::Enum(ForceLoadAction::NAMES.iter().map(|a| a.to_string()).collect()),
                "load (default) or get_default",
            )
            .with_default(Value::from("load")),
        ])
    }

    fn run(&self, ctx: &ExecutionContext, params: &Params) -> ToolResult<Value> {
        self.metadata().params.validate(params)?;

        let table_name = params
            .get("table_name")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::validation("table_name must be a string"))?;
        let table = find_table(table_name).ok_or_else(|| {
            ToolError::validation(format!("Table '{}' not found in configuration", table_name))
                .with_user_message(format!("Unknown table: {}", table_name))
        })?;

        let action = match params.get("action").and_then(Value::as_str) {
            None => ForceLoadAction::Load,
            Some(raw) => ForceLoadAction::parse(raw).ok_or_else(|| {
                ToolError::validation(format!("Unknown action '{}'", raw))
            })?,
        };

        match action {
            ForceLoadAction::GetDefault => self.default_config(ctx, table),
            ForceLoadAction::Load => self.force_load(ctx, table, params),
        }
    }
}
