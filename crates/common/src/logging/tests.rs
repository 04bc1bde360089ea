use std::{fs, io::Write};

use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use super::{Rotation, manager::file_appender, types::*};

#[test]
fn test_logger_config_defaults() {
    let config = LoggerConfig::default();
    assert_eq!(config.service_name, "auxpow");
    assert_eq!(config.default_level, Level::INFO);
    assert_eq!(config.stdout_format, LogFormat::Compact);
    assert_eq!(config.span_events, FmtSpan::NONE);
    assert!(config.file.is_none());
}

#[test]
fn test_logger_config_builder() {
    let file_config = FileLoggingConfig::new("/tmp/logs", "auxpow")
        .with_rotation(Rotation::HOURLY)
        .with_format(LogFormat::Json);
    let config = LoggerConfig::new("auxpow-tool")
        .with_default_level(Level::DEBUG)
        .with_stdout_format(LogFormat::Json)
        .with_span_events(FmtSpan::CLOSE)
        .with_file_logging(file_config);

    assert_eq!(config.service_name, "auxpow-tool");
    assert_eq!(config.default_level, Level::DEBUG);
    assert_eq!(config.stdout_format, LogFormat::Json);
    assert_eq!(config.span_events, FmtSpan::CLOSE);

    let file_config = config.file.unwrap();
    assert_eq!(file_config.file_name_prefix, "auxpow");
    assert_eq!(file_config.rotation, Rotation::HOURLY);
    assert_eq!(file_config.format, LogFormat::Json);
}

#[test]
fn test_file_logging_defaults_to_daily_compact() {
    let config = FileLoggingConfig::new("/tmp/logs", "auxpow");
    assert_eq!(config.rotation, Rotation::DAILY);
    assert_eq!(config.format, LogFormat::Compact);
}

#[test]
fn test_file_appender_writes_under_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let config = FileLoggingConfig::new(dir.path(), "auxpow").with_rotation(Rotation::NEVER);

    let mut writer = file_appender(&config);
    writer.write_all(b"hello\n").unwrap();
    writer.flush().unwrap();

    let contents = fs::read_to_string(dir.path().join("auxpow")).unwrap();
    assert_eq!(contents, "hello\n");
}
