//! Alarm appliance monitoring exporter
//!
//! Polls the monitoring REST API of an alarm/security appliance and normalizes its
//! three endpoint families into named entities with a state string:
//!
//! - alarm inputs, fetched as an overview listing followed by one detail call per input
//! - cloud service connectivity
//! - MQTT broker status, reshaped from a single object into one entity per broker
//!
//! Entities expose a numeric status predicate and, for alarm inputs, a decimal reading
//! parsed from the free-text message. The [`monitoring`] module turns a poll into
//! Prometheus metrics and [`server`] serves them over HTTP.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod monitoring;
#[cfg(feature = "http-server")]
pub mod server;
pub mod value;

// Re-export main types for convenience
pub use client::{MonitoringApi, MonitoringHttpClient};
pub use config::ExporterSettings;
pub use error::{MonitorError, Result};
pub use model::{AlarmInput, CloudService, EntityKind, MonitoredEntity, MqttServer};
pub use value::{extract_value, DecimalExtractor};
