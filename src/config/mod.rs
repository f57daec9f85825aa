//! Configuration management for the alarm monitoring exporter
//!
//! Settings are layered: built-in defaults, an optional config file (TOML, YAML or
//! JSON, picked by extension), `ALARM_MONITOR__SECTION__KEY` environment variables,
//! then the `ALARM_MONITOR_URL` / `ALARM_MONITOR_ACCESS_KEY` shortcuts.

use crate::error::{MonitorError, Result};
use crate::value::DEFAULT_DECIMAL_SEPARATOR;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::Path;
use std::{env, fmt, time::Duration};
use url::Url;

/// Prefix for structured environment overrides
pub const ENV_PREFIX: &str = "ALARM_MONITOR";

/// Complete exporter settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExporterSettings {
    /// Appliance REST API connection
    pub appliance: ApplianceConfig,

    /// Metrics exporter configuration
    pub exporter: ExportConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Appliance REST API configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplianceConfig {
    /// Base URL of the appliance (e.g., "https://192.168.1.50")
    pub url: Url,

    /// Access key sent verbatim in the `Authorization` header
    pub access_key: String,

    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Enable SSL/TLS certificate verification
    pub verify_ssl: bool,

    /// Maximum number of alarm input detail requests in flight
    pub max_concurrent_requests: usize,
}

/// Metrics exporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Listen address for the HTTP endpoint
    pub listen: SocketAddr,

    /// Path the metrics are served on
    pub metrics_path: String,

    /// Prefix for all exported metric names
    pub metric_prefix: String,

    /// Decimal separator used in alarm input messages
    pub decimal_separator: char,

    /// States exported as 0/1 gauges for alarm inputs
    pub input_states: Vec<String>,

    /// States exported as 0/1 gauges for cloud services
    pub cloud_states: Vec<String>,

    /// States exported as 0/1 gauges for MQTT brokers
    pub mqtt_states: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable structured JSON logging
    pub json_format: bool,

    /// Log to file (path)
    pub file: Option<String>,
}

impl Default for ApplianceConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("http://127.0.0.1").expect("static URL is valid"),
            access_key: String::new(),
            timeout: Duration::from_secs(10),
            verify_ssl: true,
            max_concurrent_requests: 4,
        }
    }
}

impl fmt::Debug for ApplianceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplianceConfig")
            .field("url", &self.url.as_str())
            .field("access_key", &"***")
            .field("timeout", &self.timeout)
            .field("verify_ssl", &self.verify_ssl)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .finish()
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 9713)),
            metrics_path: "/metrics".to_string(),
            metric_prefix: "alarm_monitor".to_string(),
            decimal_separator: DEFAULT_DECIMAL_SEPARATOR,
            input_states: vec!["ok".to_string(), "alarm".to_string(), "error".to_string()],
            cloud_states: vec!["connected".to_string(), "disconnected".to_string()],
            mqtt_states: vec!["connected".to_string(), "disconnected".to_string()],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            file: None,
        }
    }
}

impl ExporterSettings {
    /// Load settings from an optional file plus the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let mut settings: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("exporter.input_states")
                    .with_list_parse_key("exporter.cloud_states")
                    .with_list_parse_key("exporter.mqtt_states"),
            )
            .build()?
            .try_deserialize()?;

        settings.apply_env_overrides()?;
        Ok(settings)
    }

    /// Load settings from environment variables only
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Apply the short-form environment variables on top of loaded settings
    fn apply_env_overrides(&mut self) -> Result<()> {
        // Typed env parsing would turn a key like "0123" into 123
        if let Ok(access_key) = env::var(format!("{ENV_PREFIX}__APPLIANCE__ACCESS_KEY")) {
            self.appliance.access_key = access_key;
        }

        if let Ok(url) = env::var("ALARM_MONITOR_URL") {
            self.appliance.url = url
                .parse()
                .map_err(|e| MonitorError::config(format!("Invalid ALARM_MONITOR_URL: {e}")))?;
        }

        if let Ok(access_key) = env::var("ALARM_MONITOR_ACCESS_KEY") {
            self.appliance.access_key = access_key;
        }

        // Load logging configuration
        if let Ok(level) = env::var("RUST_LOG") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let appliance = &self.appliance;

        if appliance.url.scheme() != "http" && appliance.url.scheme() != "https" {
            return Err(MonitorError::config("URL must use http or https scheme"));
        }

        if appliance.access_key.is_empty() {
            return Err(MonitorError::config("Access key cannot be empty"));
        }

        if appliance.timeout.is_zero() {
            return Err(MonitorError::config("Timeout must be greater than zero"));
        }

        if appliance.max_concurrent_requests == 0 {
            return Err(MonitorError::config(
                "max_concurrent_requests must be at least 1",
            ));
        }

        let exporter = &self.exporter;

        if !is_valid_metric_prefix(&exporter.metric_prefix) {
            return Err(MonitorError::config(format!(
                "Invalid metric prefix: {}",
                exporter.metric_prefix
            )));
        }

        if !exporter.metrics_path.starts_with('/') {
            return Err(MonitorError::config("metrics_path must start with '/'"));
        }

        if exporter.decimal_separator.is_ascii_digit() {
            return Err(MonitorError::config("Decimal separator cannot be a digit"));
        }

        validate_states("input_states", &exporter.input_states)?;
        validate_states("cloud_states", &exporter.cloud_states)?;
        validate_states("mqtt_states", &exporter.mqtt_states)?;

        Ok(())
    }
}

/// Each state becomes one series label, so entries must be non-empty and unique
fn validate_states(key: &str, states: &[String]) -> Result<()> {
    let mut seen = HashSet::new();

    for state in states {
        if state.is_empty() {
            return Err(MonitorError::config(format!("{key} contains an empty state")));
        }
        if !seen.insert(state.as_str()) {
            return Err(MonitorError::config(format!(
                "{key} lists state '{state}' more than once"
            )));
        }
    }

    Ok(())
}

/// Prometheus metric names: `[a-zA-Z_:][a-zA-Z0-9_:]*`
fn is_valid_metric_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == ':' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
        }
        _ => false,
    }
}
