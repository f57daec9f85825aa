//! Entities reported by the appliance monitoring API
//!
//! The three endpoint families return different shapes. Everything is normalized into
//! named entities with a state string so downstream code can treat them uniformly
//! through [`MonitoredEntity`].

use crate::error::Result;
use crate::value::{extract_value, DecimalExtractor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Broker name used for the appliance's default MQTT broker
pub const DEFAULT_BROKER: &str = "defaultBroker";

/// Broker name used for the Kubernetes MQTT broker
pub const KUBERNETES_BROKER: &str = "kubernetes";

/// Common read-only view over all monitored entity kinds
pub trait MonitoredEntity {
    /// Entity name as reported (or synthesized) for the endpoint
    fn name(&self) -> &str;

    /// Current state string, compared verbatim
    fn state(&self) -> &str;

    /// Appliance identifier, only present for alarm inputs
    fn identifier(&self) -> Option<&str> {
        None
    }

    /// 1.0 if the state equals `status` exactly (case-sensitive), else 0.0
    ///
    /// Returned as a number so it can be used directly as a gauge sample.
    fn has_status(&self, status: &str) -> f64 {
        if self.state() == status {
            1.0
        } else {
            0.0
        }
    }
}

/// Kind of monitored entity, one per endpoint family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Alarm inputs (`/rest/monitoring/input`)
    Input,
    /// Cloud services (`/rest/monitoring/cloud`)
    Cloud,
    /// MQTT brokers (`/rest/monitoring/mqtt`)
    Mqtt,
}

impl EntityKind {
    /// Short label used in metric names and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Input => "input",
            EntityKind::Cloud => "cloud",
            EntityKind::Mqtt => "mqtt",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry of the alarm input overview listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputRef {
    /// Identifier used for the detail call
    pub id: String,
}

/// Alarm input detail record
///
/// The detail endpoint does not echo the identifier back; it is stitched in from the
/// overview listing by the fetcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmInput {
    name: String,
    #[serde(rename = "id", skip_deserializing)]
    identifier: String,
    state: String,
    message: String,
}

impl AlarmInput {
    /// Build an input record from its parts
    pub fn new(
        name: impl Into<String>,
        identifier: impl Into<String>,
        state: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            state: state.into(),
            message: message.into(),
        }
    }

    /// Replace the identifier with the one from the overview listing
    pub(crate) fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Free-text status message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Numeric reading embedded in the message, using the comma separator
    pub fn value(&self) -> Result<f64> {
        extract_value(&self.message)
    }

    /// Numeric reading embedded in the message, using a specific extractor
    pub fn value_with(&self, extractor: &DecimalExtractor) -> Result<f64> {
        extractor.extract(&self.message)
    }
}

impl MonitoredEntity for AlarmInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> &str {
        &self.state
    }

    fn identifier(&self) -> Option<&str> {
        Some(&self.identifier)
    }
}

/// Cloud service connectivity record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudService {
    #[serde(rename = "service")]
    name: String,
    state: String,
}

impl CloudService {
    /// Build a cloud service record
    pub fn new(name: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
        }
    }
}

impl MonitoredEntity for CloudService {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> &str {
        &self.state
    }
}

/// MQTT broker status, synthesized from [`MqttStatus`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MqttServer {
    name: String,
    state: String,
}

impl MqttServer {
    /// Build a broker record
    pub fn new(name: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
        }
    }
}

impl MonitoredEntity for MqttServer {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> &str {
        &self.state
    }
}

/// Raw MQTT endpoint response: one object with a field per broker
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MqttStatus {
    #[serde(rename = "defaultBroker")]
    pub default_broker: String,
    pub kubernetes: String,
}

impl MqttStatus {
    /// Normalize into named broker entities, default broker first
    pub fn into_servers(self) -> Vec<MqttServer> {
        vec![
            MqttServer::new(DEFAULT_BROKER, self.default_broker),
            MqttServer::new(KUBERNETES_BROKER, self.kubernetes),
        ]
    }
}
