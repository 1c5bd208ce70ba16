//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use super::error::ConfigResult;
use super::validation::validate_settings;

/// Root settings structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Which prediction model to build, and how.
    pub ml_model: ModelSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppSettings {
    /// Parses and validates settings from an in-memory JSON value.
    ///
    /// ```rust,ignore
    /// let settings = AppSettings::from_value(json!({
    ///     "ml_model": { "model_type": "mocked", "ret_val": 0.6 }
    /// }))?;
    /// ```
    pub fn from_value(value: serde_json::Value) -> ConfigResult<Self> {
        let settings: Self = serde_json::from_value(value)?;
        validate_settings(&settings)?;
        Ok(settings)
    }
}

// =============================================================================
// Model Settings
// =============================================================================

/// Prediction model selection, discriminated by `model_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "lowercase")]
pub enum ModelSettings {
    /// A model that always returns a fixed value.
    Mocked(MockedModelSettings),

    /// A model served over HTTP.
    Rest(RestModelSettings),
}

impl ModelSettings {
    /// Returns the `model_type` discriminator.
    pub fn model_type(&self) -> &'static str {
        match self {
            Self::Mocked(_) => "mocked",
            Self::Rest(_) => "rest",
        }
    }
}

/// Settings for the mocked model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockedModelSettings {
    /// Value returned by every prediction, within `0.0..=1.0`.
    pub ret_val: f64,
}

/// Settings for the REST model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestModelSettings {
    /// Endpoint URL (`http://` or `https://`).
    pub http_endpoint: String,

    /// Request timeout in seconds; must not be negative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
}

// =============================================================================
// Logging Settings
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to the matching `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Self::Trace,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            _ => Self::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Newline-delimited JSON (requires the `json-log` feature).
    #[cfg(feature = "json-log")]
    Json,
}

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    /// Append to `LoggingConfig::file_path`.
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanEventConfig {
    pub new: bool,
    pub enter: bool,
    pub exit: bool,
    pub close: bool,
}

impl SpanEventConfig {
    pub const NONE: Self = Self::with(false, false, false, false);
    /// Creation and close, one pair per routed message. The close line
    /// carries the time spent in the handlers.
    pub const LIFECYCLE: Self = Self::with(true, false, false, true);
    pub const ACTIVE: Self = Self::with(false, true, true, false);
    pub const FULL: Self = Self::with(true, true, true, true);

    const fn with(new: bool, enter: bool, exit: bool, close: bool) -> Self {
        Self {
            new,
            enter,
            exit,
            close,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base log level; `RUST_LOG` takes precedence when set.
    pub level: LogLevel,

    pub format: LogFormat,

    pub output: LogOutput,

    pub span_events: SpanEventConfig,

    /// Include thread IDs in log lines.
    pub thread_ids: bool,

    /// Include source file and line in log lines.
    pub file_location: bool,

    /// Log file, used when `output = "file"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// Per-module level overrides, e.g. `courier_core = "debug"`.
    pub filters: HashMap<String, LogLevel>,
}
