//! Logging initialization.

use tracing::*;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::layer, layer::SubscriberExt, util::SubscriberInitExt,
};

use super::types::{FileLoggingConfig, LogFormat, LoggerConfig};

/// Builds the filter shared by every layer, defaulting to `default_level` and
/// overridable through `RUST_LOG`.
pub fn build_filter(default_level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}

pub(crate) fn file_appender(config: &FileLoggingConfig) -> RollingFileAppender {
    RollingFileAppender::new(
        config.rotation.clone(),
        &config.directory,
        &config.file_name_prefix,
    )
}

/// Installs the global subscriber: stdout always, plus a rotating file when
/// configured.
///
/// Panics if a global subscriber has already been installed.
pub fn init(config: LoggerConfig) {
    let filt = build_filter(config.default_level);

    let stdout_sub = match config.stdout_format {
        LogFormat::Compact => layer()
            .compact()
            .with_span_events(config.span_events.clone())
            .with_filter(filt.clone())
            .boxed(),
        LogFormat::Json => layer()
            .json()
            .with_span_events(config.span_events.clone())
            .with_filter(filt.clone())
            .boxed(),
    };

    let file_layer = config.file.as_ref().map(|file_config| {
        let writer = file_appender(file_config);
        match file_config.format {
            LogFormat::Compact => layer()
                .compact()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filt.clone())
                .boxed(),
            LogFormat::Json => layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filt.clone())
                .boxed(),
        }
    });

    tracing_subscriber::registry()
        .with(stdout_sub)
        .with(file_layer)
        .init();

    info!(
        service_name = %config.service_name,
        default_level = %config.default_level,
        file_logging = config.file.is_some(),
        "logging initialized"
    );
}
