//! Error types for the alarm monitoring exporter
//!
//! Fetch failures (transport and deserialization) abort a whole fetcher call and are
//! handed back to the caller untouched. A missing numeric reading is its own variant
//! because it is an expected condition, not a defect.

use thiserror::Error;

/// Result type alias for monitoring operations
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Error types for polling the appliance and exporting its state
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Transport failures: connection, timeout or a non-2xx status
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected JSON shape
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A status message carried no decimal reading
    #[error("no value in message")]
    NoValue,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request URL could not be built from the configured base
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for MonitorError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl MonitorError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid URL error
    pub fn invalid_url<S: Into<String>>(msg: S) -> Self {
        Self::InvalidUrl(msg.into())
    }

    /// Stable, machine-readable label used as a structured logging field
    pub fn category(&self) -> &'static str {
        match self {
            MonitorError::Http(_) => "transport",
            MonitorError::Json(_) => "deserialization",
            MonitorError::NoValue => "no_value",
            MonitorError::Config(_) => "configuration",
            MonitorError::InvalidUrl(_) => "configuration",
            MonitorError::Io(_) => "io",
        }
    }

    /// True for the benign "message carries no reading" condition
    pub fn is_no_value(&self) -> bool {
        matches!(self, MonitorError::NoValue)
    }

    /// True when the appliance answered with a non-2xx status
    pub fn is_status_error(&self) -> bool {
        matches!(self, MonitorError::Http(e) if e.is_status())
    }
}
