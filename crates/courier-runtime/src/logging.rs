//! Logging setup for Courier applications.
//!
//! One [`LoggingBuilder`] over `tracing-subscriber`, filled in by hand or
//! from the `[logging]` table of the settings. The routers open a `route`
//! span per dispatched message; [`SpanEvents::LIFECYCLE`] makes those spans
//! visible.
//!
//! ```rust,ignore
//! use courier_runtime::{config::load_settings, logging};
//!
//! let settings = load_settings()?;
//! logging::init_from_config(&settings.logging);
//! ```
//!
//! ```rust,ignore
//! use courier_runtime::logging::{LoggingBuilder, SpanEvents};
//!
//! LoggingBuilder::new()
//!     .directive("courier_core=debug")
//!     .span_events(SpanEvents::LIFECYCLE)
//!     .init();
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::warn;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LogOutput, LoggingConfig};

/// Span lifecycle events to log; see the presets on [`SpanEventConfig`].
///
/// [`SpanEventConfig`]: crate::config::SpanEventConfig
pub use crate::config::SpanEventConfig as SpanEvents;

const DEFAULT_LOG_FILE: &str = "courier.log";

fn fmt_span(events: SpanEvents) -> FmtSpan {
    [
        (events.new, FmtSpan::NEW),
        (events.enter, FmtSpan::ENTER),
        (events.exit, FmtSpan::EXIT),
        (events.close, FmtSpan::CLOSE),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .fold(FmtSpan::NONE, |acc, (_, flag)| acc | flag)
}

/// Installs the global subscriber described by `config`.
///
/// Does nothing if one is already installed.
pub fn init_from_config(config: &LoggingConfig) {
    LoggingBuilder::from_config(config).init();
}

/// Builds and installs the global `tracing` subscriber.
///
/// ```rust,ignore
/// use courier_runtime::logging::{LoggingBuilder, SpanEvents};
/// use tracing::Level;
///
/// LoggingBuilder::new()
///     .with_level(Level::DEBUG)
///     .span_events(SpanEvents::LIFECYCLE)
///     .with_thread_ids(true)
///     .init();
/// ```
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    config: LoggingConfig,
    /// Raw directives, applied after the per-module filters.
    directives: Vec<String>,
    with_target: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingBuilder {
    /// Compact lines on stdout at INFO, with targets.
    pub fn new() -> Self {
        Self {
            config: LoggingConfig::default(),
            directives: Vec::new(),
            with_target: true,
        }
    }

    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            config: config.clone(),
            ..Self::new()
        }
    }

    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.config.level = level.into();
        self
    }

    /// Adds a filter directive such as `courier_core=trace`. Malformed
    /// directives are ignored.
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    pub fn span_events(mut self, events: SpanEvents) -> Self {
        self.config.span_events = events;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.config.output = output;
        self
    }

    /// Writes to `path`, switching the output to [`LogOutput::File`].
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = LogOutput::File;
        self.config.file_path = Some(path.into());
        self
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.config.thread_ids = enabled;
        self
    }

    /// Include source file and line number.
    pub fn with_file_location(mut self, enabled: bool) -> Self {
        self.config.file_location = enabled;
        self
    }

    /// Per-module filters in module order, then the raw directives.
    fn directives(&self) -> Vec<String> {
        let mut filters: Vec<_> = self.config.filters.iter().collect();
        filters.sort_by(|a, b| a.0.cmp(b.0));

        filters
            .into_iter()
            .map(|(module, level)| format!("{module}={level}"))
            .chain(self.directives.iter().cloned())
            .collect()
    }

    /// `RUST_LOG` when set, otherwise the configured level, plus directives.
    fn env_filter(&self) -> EnvFilter {
        let base = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.config.level.as_str()));

        self.directives()
            .iter()
            .filter_map(|directive| directive.parse::<Directive>().ok())
            .fold(base, EnvFilter::add_directive)
    }

    /// Installs the subscriber, ignoring an already installed one.
    pub fn init(self) {
        let _ = self.try_init();
    }

    pub fn try_init(self) -> Result<(), TryInitError> {
        match self.config.output {
            LogOutput::Stdout => self.install(std::io::stdout),
            LogOutput::Stderr => self.install(std::io::stderr),
            LogOutput::File => match self.config.file_path.as_deref() {
                Some(path) => {
                    let dir = path.parent().unwrap_or_else(|| Path::new("."));
                    let name = path
                        .file_name()
                        .unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE));
                    self.install(tracing_appender::rolling::never(dir, name))
                }
                None => {
                    let result = self.install(std::io::stdout);
                    warn!("Log output set to file without a path, writing to stdout");
                    result
                }
            },
        }
    }

    fn install<W>(&self, writer: W) -> Result<(), TryInitError>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let spans = fmt_span(self.config.span_events);
        let location = self.config.file_location;
        let registry = tracing_subscriber::registry().with(self.env_filter());

        macro_rules! decorated {
            ($layer:expr) => {
                $layer
                    .with_span_events(spans)
                    .with_target(self.with_target)
                    .with_thread_ids(self.config.thread_ids)
                    .with_file(location)
                    .with_line_number(location)
                    .with_writer(writer)
            };
        }

        match self.config.format {
            #[cfg(feature = "json-log")]
            LogFormat::Json => registry
                .with(fmt::layer().json().with_span_events(spans).with_writer(writer))
                .try_init(),
            LogFormat::Compact => registry.with(decorated!(fmt::layer().compact())).try_init(),
            LogFormat::Full => registry.with(decorated!(fmt::layer())).try_init(),
            LogFormat::Pretty => registry.with(decorated!(fmt::layer().pretty())).try_init(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_fmt_span_presets() {
        assert_eq!(fmt_span(SpanEvents::NONE), FmtSpan::NONE);
        assert_eq!(fmt_span(SpanEvents::FULL), FmtSpan::FULL);
        assert_eq!(fmt_span(SpanEvents::ACTIVE), FmtSpan::ACTIVE);
        assert_eq!(
            fmt_span(SpanEvents::LIFECYCLE),
            FmtSpan::NEW | FmtSpan::CLOSE
        );
    }

    #[test]
    fn test_builder_from_config() {
        let mut config = LoggingConfig {
            level: LogLevel::Debug,
            thread_ids: true,
            ..Default::default()
        };
        config.filters.insert("courier_runtime".into(), LogLevel::Warn);
        config.filters.insert("courier_core".into(), LogLevel::Trace);

        let builder = LoggingBuilder::from_config(&config).directive("demo=info");
        assert_eq!(builder.config.level, LogLevel::Debug);
        assert!(builder.config.thread_ids);
        assert!(builder.with_target);
        assert_eq!(
            builder.directives(),
            ["courier_core=trace", "courier_runtime=warn", "demo=info"]
        );
    }

    #[test]
    fn test_file_switches_output() {
        let builder = LoggingBuilder::new()
            .with_level(tracing::Level::WARN)
            .file("logs/courier.log");
        assert_eq!(builder.config.level, LogLevel::Warn);
        assert_eq!(builder.config.output, LogOutput::File);
        assert_eq!(
            builder.config.file_path.as_deref(),
            Some(Path::new("logs/courier.log"))
        );
    }
}
