//! Configuration schema definitions.
//!
//! ```toml
//! [logging]
//! level = "debug"
//! format = "compact"     # compact | full | pretty | json
//! output = "stderr"      # stdout | stderr | file
//! file_path = "logs/miraikit.log"
//! thread_ids = false
//! file_location = false
//!
//! [logging.filters]
//! miraikit_mirai = "trace"
//!
//! [decode]
//! clock = "local"        # local | utc
//! color = true
//! strict_events = false
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use miraikit_core::Clock;
use miraikit_mirai::ParseOptions;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MiraikitConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Payload decoding settings.
    #[serde(default)]
    pub decode: DecodeConfig,
}

// =============================================================================
// Logging
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Output destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Log file path, required when `output` is `file`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Include thread ids in log lines.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include file names and line numbers in log lines.
    #[serde(default)]
    pub file_location: bool,

    /// Per-module level overrides, e.g. `miraikit_mirai = "trace"`.
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace.
    Trace,
    /// Debug.
    Debug,
    /// Info.
    #[default]
    Info,
    /// Warn.
    Warn,
    /// Error.
    Error,
}

impl LogLevel {
    /// All levels, most verbose first.
    pub const ALL: [Self; 5] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
    ];

    /// Returns the level name as used in filter directives.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing` level.
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

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == lower)
            .ok_or_else(|| format!("unknown log level '{s}'"))
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line compact output.
    #[default]
    Compact,
    /// Default `tracing-subscriber` output.
    Full,
    /// Multi-line human readable output.
    Pretty,
    /// JSON lines; requires the `json-log` feature, otherwise falls back to
    /// `full`.
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output.
    Stdout,
    /// Standard error.
    #[default]
    Stderr,
    /// A file at `file_path`.
    File,
}

// =============================================================================
// Decoding
// =============================================================================

/// Payload decoding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Clock message timestamps are rendered in.
    #[serde(default)]
    pub clock: Clock,

    /// Colour bot status lines with ANSI escapes.
    #[serde(default = "default_color")]
    pub color: bool,

    /// Reject events with an unknown top-level tag instead of passing them
    /// through.
    #[serde(default)]
    pub strict_events: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            clock: Clock::default(),
            color: default_color(),
            strict_events: false,
        }
    }
}

fn default_color() -> bool {
    true
}

impl DecodeConfig {
    /// Builds the parse options for the message layer.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new(self.clock)
    }
}
