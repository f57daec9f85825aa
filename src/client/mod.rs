//! Clients for the appliance monitoring REST API

pub mod http_client;

pub use http_client::MonitoringHttpClient;

use crate::error::Result;
use crate::model::{AlarmInput, CloudService, MqttServer};
use async_trait::async_trait;

/// Overview listing of alarm inputs
pub const INPUT_PATH: &str = "rest/monitoring/input";

/// Cloud service connectivity listing
pub const CLOUD_PATH: &str = "rest/monitoring/cloud";

/// MQTT broker status object
pub const MQTT_PATH: &str = "rest/monitoring/mqtt";

/// Fetchers for the three monitoring endpoint families
///
/// Each call performs one best-effort poll and returns freshly built entities. Any
/// transport or deserialization failure aborts the call; partial results are never
/// returned.
#[async_trait]
pub trait MonitoringApi: Send + Sync {
    /// Fetch all alarm inputs (overview, then one detail call per input)
    async fn fetch_inputs(&self) -> Result<Vec<AlarmInput>>;

    /// Fetch cloud service connectivity
    async fn fetch_cloud_services(&self) -> Result<Vec<CloudService>>;

    /// Fetch MQTT broker status, normalized to one entity per broker
    async fn fetch_mqtt_servers(&self) -> Result<Vec<MqttServer>>;
}
