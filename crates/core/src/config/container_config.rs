use crate::config::{ConfigError, ConfigSource, ConfigValidator, OneOfValidator, RangeValidator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::str::FromStr;

pub const MAX_DEPTH_VAR: &str = "WIREBOX_MAX_DEPTH";
pub const LOG_LEVEL_VAR: &str = "WIREBOX_LOG_LEVEL";
pub const LOG_FORMAT_VAR: &str = "WIREBOX_LOG_FORMAT";

const DEFAULT_MAX_DEPTH: usize = 64;
const MAX_DEPTH_LIMIT: usize = 4096;
const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OneOfValidator {
            field: "log_format",
            allowed: &["compact", "json"],
        }
        .validate(s)?;

        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            _ => Ok(LogFormat::Compact),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Runtime settings for the container and the demo binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Deepest producer nesting a single resolution may reach
    pub max_depth: usize,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl ContainerConfig {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            log_level: "info".to_string(),
            log_format: LogFormat::Compact,
        }
    }

    /// Configuration used by tests: quiet logging, default depth
    pub fn testing() -> Self {
        Self {
            log_level: "warn".to_string(),
            ..Self::new()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new();

        if let Some(depth_str) = read_var(MAX_DEPTH_VAR, "max_depth")? {
            config.max_depth = depth_str.parse().map_err(|_| {
                ConfigError::invalid_value("max_depth", depth_str.clone(), "positive integer")
            })?;
        }

        if let Some(log_level) = read_var(LOG_LEVEL_VAR, "log_level")? {
            config.log_level = log_level.to_lowercase();
        }

        if let Some(format_str) = read_var(LOG_FORMAT_VAR, "log_format")? {
            config.log_format = format_str.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        RangeValidator {
            field: "max_depth",
            min: 1,
            max: MAX_DEPTH_LIMIT,
        }
        .validate(&self.max_depth)?;

        OneOfValidator {
            field: "log_level",
            allowed: LOG_LEVELS,
        }
        .validate(&self.log_level)?;

        Ok(())
    }

    /// Report where each value came from
    pub fn config_sources(&self) -> BTreeMap<String, ConfigSource> {
        let source_for = |var: &str, default: String| {
            if env::var(var).is_ok() {
                ConfigSource::EnvVar(var.to_string())
            } else {
                ConfigSource::Default(default)
            }
        };

        let mut sources = BTreeMap::new();
        sources.insert(
            "max_depth".to_string(),
            source_for(MAX_DEPTH_VAR, DEFAULT_MAX_DEPTH.to_string()),
        );
        sources.insert(
            "log_level".to_string(),
            source_for(LOG_LEVEL_VAR, "info".to_string()),
        );
        sources.insert(
            "log_format".to_string(),
            source_for(LOG_FORMAT_VAR, LogFormat::Compact.to_string()),
        );
        sources
    }
}

/// Trimmed value of `var`; set but blank counts as missing
fn read_var(var: &str, field: &str) -> Result<Option<String>, ConfigError> {
    match env::var(var) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::missing_required(
            field,
            format!("{} is set but empty; unset it to use the default", var),
        )),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(_) => Ok(None),
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self::new()
    }
}
