//! Logging setup with optional file rotation and JSON output

use crate::config::LoggingConfig;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level
    pub level: Level,

    /// Log to file
    pub file_path: Option<PathBuf>,

    /// Log to stderr
    pub stderr: bool,

    /// Emit JSON lines instead of human-readable text
    pub json: bool,

    /// Include thread IDs
    pub thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            file_path: None,
            stderr: true,
            json: false,
            thread_ids: false,
        }
    }
}

impl LogConfig {
    /// Create config from the loaded settings section
    pub fn from_settings(settings: &LoggingConfig) -> Self {
        Self {
            level: parse_level(&settings.level).unwrap_or(Level::INFO),
            file_path: settings.file.as_ref().map(PathBuf::from),
            json: settings.json_format,
            ..Self::default()
        }
    }

    /// Apply environment overrides on top of this config
    pub fn apply_env(&mut self) {
        if let Some(level) = std::env::var("RUST_LOG").ok().as_deref().and_then(parse_level) {
            self.level = level;
        }

        if let Ok(log_file) = std::env::var("ALARM_MONITOR_LOG_FILE") {
            self.file_path = Some(PathBuf::from(log_file));
        }

        if let Ok(log_stderr) = std::env::var("ALARM_MONITOR_LOG_STDERR") {
            self.stderr = log_stderr.to_lowercase() != "false";
        }

        if let Ok(log_json) = std::env::var("ALARM_MONITOR_LOG_JSON") {
            self.json = log_json.to_lowercase() == "true";
        }
    }

    /// Force debug level
    pub fn with_debug(mut self, debug: bool) -> Self {
        if debug {
            self.level = Level::DEBUG;
        }
        self
    }
}

/// Extract the most verbose level mentioned in a filter string
fn parse_level(filter: &str) -> Option<Level> {
    let filter = filter.to_lowercase();
    [
        ("trace", Level::TRACE),
        ("debug", Level::DEBUG),
        ("info", Level::INFO),
        ("warn", Level::WARN),
        ("error", Level::ERROR),
    ]
    .into_iter()
    .find(|(name, _)| filter.contains(name))
    .map(|(_, level)| level)
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn output_layer<W>(writer: W, ansi: bool, config: &LogConfig) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_thread_ids(config.thread_ids);

    if config.json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

/// Initialize logging with the given configuration
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();

    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.stderr {
        layers.push(output_layer(std::io::stderr, !config.json, &config));
    }

    if let Some(file_path) = &config.file_path {
        let directory = file_path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(directory)?;

        // Daily rotation
        let file_appender = tracing_appender::rolling::daily(
            directory,
            file_path
                .file_name()
                .unwrap_or_else(|| std::ffi::OsStr::new("alarm-monitor-exporter.log")),
        );
        layers.push(output_layer(file_appender, false, &config));
    }

    let subscriber = tracing_subscriber::registry().with(layers).with(env_filter);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(Level::DEBUG));
        assert_eq!(parse_level("alarm_monitor_exporter=trace"), Some(Level::TRACE));
        assert_eq!(parse_level("WARN"), Some(Level::WARN));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    #[serial_test::serial]
    fn test_env_overrides_settings() {
        temp_env::with_vars(
            [
                ("RUST_LOG", Some("alarm_monitor_exporter=debug")),
                ("ALARM_MONITOR_LOG_FILE", Some("/tmp/alarm/exporter.log")),
                ("ALARM_MONITOR_LOG_STDERR", Some("False")),
                ("ALARM_MONITOR_LOG_JSON", Some("true")),
            ],
            || {
                let mut config = LogConfig::default();
                config.apply_env();

                assert_eq!(config.level, Level::DEBUG);
                assert_eq!(config.file_path, Some(PathBuf::from("/tmp/alarm/exporter.log")));
                assert!(!config.stderr);
                assert!(config.json);
            },
        );
    }

    #[test]
    fn test_from_settings() {
        let settings = LoggingConfig {
            level: "warn".to_string(),
            json_format: true,
            file: Some("/var/log/alarm/exporter.log".to_string()),
        };

        let config = LogConfig::from_settings(&settings);
        assert_eq!(config.level, Level::WARN);
        assert!(config.json);
        assert!(config.stderr);
        assert_eq!(
            config.file_path,
            Some(PathBuf::from("/var/log/alarm/exporter.log"))
        );
        assert_eq!(config.with_debug(true).level, Level::DEBUG);
    }
}
