//! Parameter definitions and tool-side validation helpers.
//!
//! The dispatcher never validates parameters. Tools that declare a
//! [`ParamSpec`] call [`ParamSpec::validate`] at the top of `run`, before any
//! side effect, and get a [`ToolError::Validation`] with a caller-facing hint.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::contract::Params;
use super::error::{ToolError, ToolResult};

// =============================================================================
// Parameter types
// =============================================================================

/// Parameter type for tool inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Int,
    Float,
    Bool,
    /// ISO-8601 calendar date (`YYYY-MM-DD`).
    Date,
    StringList,
    /// Array of JSON objects (table rows).
    Rows,
    Enum(Vec<String>),
    Optional(Box<ParamType>),
}

impl ParamType {
    /// Validate a JSON value against this parameter type.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match self {
            ParamType::String => expect(value.is_string(), "string", value),
            ParamType::Int => expect(value.is_i64() || value.is_u64(), "integer", value),
            ParamType::Float => expect(value.is_number(), "number", value),
            ParamType::Bool => expect(value.is_boolean(), "boolean", value),
            ParamType::Date => {
                let s = value
                    .as_str()
                    .ok_or_else(|| format!("expected date string, got {}", value_type_name(value)))?;
                chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map(|_| ())
                    .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", s))
            }
            ParamType::StringList => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| format!("expected array, got {}", value_type_name(value)))?;
                for (i, item) in arr.iter().enumerate() {
                    if !item.is_string() {
                        return Err(format!(
                            "expected string at index {}, got {}",
                            i,
                            value_type_name(item)
                        ));
                    }
                }
                Ok(())
            }
            ParamType::Rows => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| format!("expected array, got {}", value_type_name(value)))?;
                for (i, item) in arr.iter().enumerate() {
                    if !item.is_object() {
                        return Err(format!(
                            "expected object at index {}, got {}",
                            i,
                            value_type_name(item)
                        ));
                    }
                }
                Ok(())
            }
            ParamType::Enum(variants) => {
                let s = value.as_str().ok_or_else(|| {
                    format!("expected string for enum, got {}", value_type_name(value))
                })?;
                if variants.iter().any(|v| v == s) {
                    Ok(())
                } else {
                    Err(format!(
                        "invalid value '{}', expected one of: {}",
                        s,
                        variants.join(", ")
                    ))
                }
            }
            ParamType::Optional(inner) => {
                if value.is_null() {
                    Ok(())
                } else {
                    inner.validate(value)
                }
            }
        }
    }

    /// Human-readable type name for listings.
    pub fn display_name(&self) -> String {
        match self {
            ParamType::String => "string".to_string(),
            ParamType::Int => "integer".to_string(),
            ParamType::Float => "number".to_string(),
            ParamType::Bool => "boolean".to_string(),
            ParamType::Date => "date".to_string(),
            ParamType::StringList => "string[]".to_string(),
            ParamType::Rows => "object[]".to_string(),
            ParamType::Enum(variants) => format!("enum({})", variants.join("|")),
            ParamType::Optional(inner) => format!("{}?", inner.display_name()),
        }
    }
}

fn expect(ok: bool, wanted: &str, value: &Value) -> Result<(), String> {
    if ok {
        Ok(())
    } else {
        Err(format!("expected {}, got {}", wanted, value_type_name(value)))
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Parameter definition
// =============================================================================

/// A single parameter definition for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParamDef {
    pub fn new(name: impl Into<String>, param_type: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none() && !matches!(self.param_type, ParamType::Optional(_))
    }

    /// `name: type` or `name?: type` for listings.
    pub fn signature(&self) -> String {
        let optional = if self.is_required() { "" } else { "?" };
        format!("{}{}: {}", self.name, optional, self.param_type.display_name())
    }
}

// =============================================================================
// Parameter spec
// =============================================================================

/// Ordered parameter definitions for one tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSpec {
    params: Vec<ParamDef>,
}

impl ParamSpec {
    pub fn new(params: Vec<ParamDef>) -> Self {
        Self { params }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamDef> {
        self.params.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Collect every problem with `params` (empty = valid).
    pub fn problems(&self, params: &Params) -> Vec<String> {
        let mut errors = Vec::new();

        for def in &self.params {
            if def.is_required() && !params.contains_key(&def.name) {
                errors.push(format!("Missing required parameter: {}", def.name));
            }
        }

        let known: HashMap<&str, &ParamDef> =
            self.params.iter().map(|p| (p.name.as_str(), p)).collect();

        for (key, value) in params {
            match known.get(key.as_str()) {
                Some(def) => {
                    if let Err(e) = def.param_type.validate(value) {
                        errors.push(format!("Parameter '{}': {}", key, e));
                    }
                }
                None => errors.push(format!("Unknown parameter: {}", key)),
            }
        }

        errors
    }

    /// Validate `params`, failing with a `Validation` error listing every problem.
    pub fn validate(&self, params: &Params) -> ToolResult<()> {
        let errors = self.problems(params);
        if errors.is_empty() {
            return Ok(());
        }
        let joined = errors.join("; ");
        Err(ToolError::validation(joined.clone()).with_user_message(joined))
    }

    /// Copy of `params` with defaults filled in for missing entries.
    pub fn with_defaults(&self, params: &Params) -> Params {
        let mut filled = params.clone();
        for def in &self.params {
            if !filled.contains_key(&def.name) {
                if let Some(default) = &def.default {
                    filled.insert(def.name.clone(), default.clone());
                }
            }
        }
        filled
    }
}

impl From<Vec<ParamDef>> for ParamSpec {
    fn from(params: Vec<ParamDef>) -> Self {
        Self::new(params)
    }
}
