//! Configuration types for the logging subsystem.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::fmt::format::FmtSpan;

/// How events are rendered by a layer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human readable output.
    #[default]
    Compact,

    /// One JSON object per event, for log shippers.
    Json,
}

/// Where and how to keep log files.
#[derive(Debug, Clone)]
pub struct FileLoggingConfig {
    pub directory: PathBuf,

    /// File name, or its prefix when rotating (e.g. `auxpow.2026-01-01`).
    pub file_name_prefix: String,

    pub rotation: Rotation,

    pub format: LogFormat,
}

impl FileLoggingConfig {
    /// Daily-rotated compact logs under `directory`.
    pub fn new(directory: impl Into<PathBuf>, file_name_prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            file_name_prefix: file_name_prefix.into(),
            rotation: Rotation::DAILY,
            format: LogFormat::Compact,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

/// Settings for [`init`](super::init).
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Reported once logging is up.
    pub service_name: String,

    /// Applies to every target `RUST_LOG` doesn't mention.
    pub default_level: Level,

    pub stdout_format: LogFormat,

    /// Span lifecycle events written to stdout.
    pub span_events: FmtSpan,

    pub file: Option<FileLoggingConfig>,
}

impl LoggerConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            default_level: Level::INFO,
            stdout_format: LogFormat::Compact,
            span_events: FmtSpan::NONE,
            file: None,
        }
    }

    pub fn with_default_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    pub fn with_stdout_format(mut self, format: LogFormat) -> Self {
        self.stdout_format = format;
        self
    }

    pub fn with_span_events(mut self, span_events: FmtSpan) -> Self {
        self.span_events = span_events;
        self
    }

    pub fn with_file_logging(mut self, config: FileLoggingConfig) -> Self {
        self.file = Some(config);
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new("auxpow")
    }
}
