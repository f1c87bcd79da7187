//! Configuration structures.
//!
//! Configuration is loaded from an optional JSON file and then overridden by
//! `TOOLHOST_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::errors::{Error, Result};

/// Environment variable overriding [`ObservabilityConfig::log_level`].
pub const ENV_LOG_LEVEL: &str = "TOOLHOST_LOG_LEVEL";
/// Environment variable selecting `json` or `text` log output.
pub const ENV_LOG_FORMAT: &str = "TOOLHOST_LOG_FORMAT";
/// Environment variable overriding [`DispatchConfig::slow_execution_threshold`].
pub const ENV_SLOW_EXECUTION: &str = "TOOLHOST_SLOW_EXECUTION";
/// Environment variable overriding [`DispatchConfig::capture_traces`].
pub const ENV_CAPTURE_TRACES: &str = "TOOLHOST_CAPTURE_TRACES";

/// Global toolhost configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Dispatcher configuration.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Completed executions slower than this are logged at warn instead of info.
    #[serde(with = "humantime_serde")]
    pub slow_execution_threshold: Duration,

    /// Attach a diagnostic trace to `Unexpected` failures.
    pub capture_traces: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            slow_execution_threshold: Duration::from_secs(5),
            capture_traces: true,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file. Missing sections take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `TOOLHOST_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Split out from [`Config::apply_env`] so overrides can be exercised
    /// without mutating the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.observability.log_level = level;
        }

        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.observability.json_logs = match format.to_ascii_lowercase().as_str() {
                "json" => true,
                "text" | "compact" => false,
                other => {
                    return Err(Error::config(format!(
                        "{}: expected json or text, got '{}'",
                        ENV_LOG_FORMAT, other
                    )))
                }
            };
        }

        if let Some(raw) = lookup(ENV_SLOW_EXECUTION) {
            self.dispatch.slow_execution_threshold =
                humantime_serde::re::humantime::parse_duration(&raw).map_err(|e| {
                    Error::config(format!("{}: invalid duration '{}': {}", ENV_SLOW_EXECUTION, raw, e))
                })?;
        }

        if let Some(raw) = lookup(ENV_CAPTURE_TRACES) {
            self.dispatch.capture_traces = parse_bool(&raw).ok_or_else(|| {
                Error::config(format!("{}: expected a boolean, got '{}'", ENV_CAPTURE_TRACES, raw))
            })?;
        }

        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.observability.log_level, "info");
        assert!(!config.observability.json_logs);
        assert_eq!(config.dispatch.slow_execution_threshold, Duration::from_secs(5));
        assert!(config.dispatch.capture_traces);
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup_from(&[
                (ENV_LOG_LEVEL, "debug"),
                (ENV_LOG_FORMAT, "JSON"),
                (ENV_SLOW_EXECUTION, "250ms"),
                (ENV_CAPTURE_TRACES, "off"),
            ]))
            .unwrap();

        assert_eq!(config.observability.log_level, "debug");
        assert!(config.observability.json_logs);
        assert_eq!(config.dispatch.slow_execution_threshold, Duration::from_millis(250));
        assert!(!config.dispatch.capture_traces);
    }

    #[test]
    fn test_bad_duration_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(lookup_from(&[(ENV_SLOW_EXECUTION, "soon")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_bad_format_rejected() {
        let mut config = Config::default();
        assert!(config
            .apply_overrides(lookup_from(&[(ENV_LOG_FORMAT, "xml")]))
            .is_err());
    }

    #[test]
    fn test_from_json_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"dispatch": {{"slow_execution_threshold": "2s"}}}}"#
        )
        .unwrap();

        let config = Config::from_json_file(file.path()).unwrap();
        assert_eq!(config.dispatch.slow_execution_threshold, Duration::from_secs(2));
        assert!(config.dispatch.capture_traces);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = Config::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
