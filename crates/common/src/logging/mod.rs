//! Logging subsystem built on `tracing-subscriber`.

pub mod manager;
pub mod types;

#[cfg(test)]
mod tests;

pub use manager::{build_filter, init};
pub use types::{FileLoggingConfig, LogFormat, LoggerConfig};

// Re-export tracing-appender types for convenience
pub use tracing_appender::rolling::Rotation;
