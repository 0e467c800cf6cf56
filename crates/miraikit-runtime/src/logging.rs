//! `tracing` subscriber setup.
//!
//! The `logging` config section maps onto a [`LoggingBuilder`]:
//!
//! ```toml
//! [logging]
//! level = "info"            # base level, replaced by RUST_LOG when set
//! format = "compact"        # compact | full | pretty | json (json-log feature)
//! output = "file"           # stdout | stderr | file
//! file_path = "logs/dump.log"
//!
//! [logging.filters]
//! miraikit_mirai = "trace"  # added on top of the base level, RUST_LOG or not
//! ```
//!
//! ```rust,ignore
//! miraikit_runtime::logging::init_from_config(&config.logging);
//!
//! // or by hand
//! LoggingBuilder::new().directive("miraikit_mirai=trace").init();
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::warn;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::{LogFormat, LogOutput, LoggingConfig};

/// File name used when `file_path` names a directory only.
const DEFAULT_LOG_FILE: &str = "miraikit.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global subscriber described by `config`.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_from_config(config: &LoggingConfig) {
    let _ = LoggingBuilder::from_config(config).try_init();
}

/// Builder for the global `tracing` subscriber.
///
/// ```rust,ignore
/// LoggingBuilder::new()
///     .with_level(tracing::Level::DEBUG)
///     .output(LogOutput::Stdout)
///     .init();
/// ```
#[derive(Debug, Default)]
pub struct LoggingBuilder {
    directives: Vec<String>,
    level: Option<tracing::Level>,
    format: LogFormat,
    output: LogOutput,
    with_target: bool,
    with_thread_ids: bool,
    with_file: bool,
    with_line_number: bool,
    file_path: Option<PathBuf>,
}

impl LoggingBuilder {
    /// Compact output on stderr at `INFO`, with targets.
    pub fn new() -> Self {
        Self {
            with_target: true,
            ..Default::default()
        }
    }

    /// Mirrors a `logging` config section. Filters become `module=level`
    /// directives.
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            directives: config
                .filters
                .iter()
                .map(|(module, level)| format!("{module}={}", level.to_lowercase()))
                .collect(),
            level: Some(config.level.to_tracing_level()),
            format: config.format,
            output: config.output,
            with_thread_ids: config.thread_ids,
            with_file: config.file_location,
            with_line_number: config.file_location,
            file_path: config.file_path.clone(),
            ..Self::new()
        }
    }

    /// Sets the base level.
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Adds a filter directive such as `miraikit_runtime=debug`.
    pub fn directive(mut self, directive: &str) -> Self {
        self.directives.push(directive.to_string());
        self
    }

    /// Sets the line format.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets where lines are written.
    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Toggles the module path on each line.
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Toggles thread ids on each line.
    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.with_thread_ids = enabled;
        self
    }

    /// Toggles source file names on each line.
    pub fn with_file(mut self, enabled: bool) -> Self {
        self.with_file = enabled;
        self
    }

    /// Toggles source line numbers on each line.
    pub fn with_line_number(mut self, enabled: bool) -> Self {
        self.with_line_number = enabled;
        self
    }

    /// Sets the log file for [`LogOutput::File`].
    pub fn file_path(mut self, path: PathBuf) -> Self {
        self.file_path = Some(path);
        self
    }

    /// `RUST_LOG` if set and valid, else the base level; directives on top.
    /// Invalid directives are skipped.
    fn build_filter(&self) -> EnvFilter {
        let base = self.level.unwrap_or(tracing::Level::INFO);
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(base.as_str().to_lowercase()));

        self.directives
            .iter()
            .filter_map(|directive| directive.parse().ok())
            .fold(filter, EnvFilter::add_directive)
    }

    /// The format actually used, and whether JSON fell back to full.
    fn effective_format(&self) -> (LogFormat, bool) {
        match self.format {
            #[cfg(not(feature = "json-log"))]
            LogFormat::Json => (LogFormat::Full, true),
            format => (format, false),
        }
    }

    fn fmt_layer<W>(&self, format: LogFormat, writer: W) -> BoxedLayer
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let layer = fmt::layer()
            .with_writer(writer)
            .with_target(self.with_target)
            .with_thread_ids(self.with_thread_ids)
            .with_file(self.with_file)
            .with_line_number(self.with_line_number);

        match format {
            #[cfg(feature = "json-log")]
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Compact => layer.compact().boxed(),
            LogFormat::Pretty => layer.pretty().boxed(),
            _ => layer.boxed(),
        }
    }

    /// Installs the subscriber, ignoring failure.
    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Installs the subscriber.
    ///
    /// Fails if a global subscriber is already installed.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let (format, json_fallback) = self.effective_format();

        let (layer, missing_file_path) = match (self.output, &self.file_path) {
            (LogOutput::Stdout, _) => (self.fmt_layer(format, std::io::stdout), false),
            (LogOutput::Stderr, _) => (self.fmt_layer(format, std::io::stderr), false),
            (LogOutput::File, Some(path)) => {
                let appender = tracing_appender::rolling::never(
                    path.parent().unwrap_or_else(|| Path::new(".")),
                    path.file_name()
                        .unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE)),
                );
                (self.fmt_layer(format, appender), false)
            }
            (LogOutput::File, None) => (self.fmt_layer(format, std::io::stderr), true),
        };

        tracing_subscriber::registry()
            .with(layer)
            .with(self.build_filter())
            .try_init()?;

        if missing_file_path {
            warn!("File output requested without a file path, logging to stderr");
        }
        if json_fallback {
            warn!("JSON log format needs the `json-log` feature, using the full format");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_from_config() {
        let mut config = LoggingConfig {
            level: LogLevel::Debug,
            format: LogFormat::Pretty,
            output: LogOutput::File,
            file_path: Some(PathBuf::from("logs/miraikit.log")),
            thread_ids: true,
            file_location: true,
            ..Default::default()
        };
        config
            .filters
            .insert("miraikit_mirai".into(), "TRACE".into());

        let builder = LoggingBuilder::from_config(&config);
        assert_eq!(builder.level, Some(tracing::Level::DEBUG));
        assert_eq!(builder.format, LogFormat::Pretty);
        assert_eq!(builder.output, LogOutput::File);
        assert!(builder.with_target);
        assert!(builder.with_thread_ids);
        assert!(builder.with_file && builder.with_line_number);
        assert_eq!(builder.directives, vec!["miraikit_mirai=trace".to_string()]);
        assert_eq!(builder.file_path, Some(PathBuf::from("logs/miraikit.log")));
    }

    #[test]
    fn test_new_defaults() {
        let builder = LoggingBuilder::new();
        assert_eq!(builder.format, LogFormat::Compact);
        assert_eq!(builder.output, LogOutput::Stderr);
        assert!(builder.with_target);
        assert!(builder.directives.is_empty());
    }

    #[test]
    fn test_effective_format() {
        let builder = LoggingBuilder::new().format(LogFormat::Json);
        let (format, fallback) = builder.effective_format();
        if cfg!(feature = "json-log") {
            assert_eq!(format, LogFormat::Json);
            assert!(!fallback);
        } else {
            assert_eq!(format, LogFormat::Full);
            assert!(fallback);
        }

        let builder = LoggingBuilder::new().format(LogFormat::Compact);
        assert_eq!(builder.effective_format(), (LogFormat::Compact, false));
    }
}
