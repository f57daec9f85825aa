//! Turns one poll of the appliance into metric families
//!
//! Every scrape runs the three fetchers once. An endpoint family that fails is logged,
//! reported as `up 0`, and skipped for this poll while the others are still exported.

use crate::client::MonitoringApi;
use crate::config::ExportConfig;
use crate::error::{MonitorError, Result};
use crate::model::{AlarmInput, EntityKind, MonitoredEntity};
use crate::monitoring::prometheus::{self, MetricFamily};
use crate::value::DecimalExtractor;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Collector configuration derived from the exporter settings
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Prefix for all metric names
    pub metric_prefix: String,

    /// States exported per alarm input
    pub input_states: Vec<String>,

    /// States exported per cloud service
    pub cloud_states: Vec<String>,

    /// States exported per MQTT broker
    pub mqtt_states: Vec<String>,

    /// Reading extractor for alarm input messages
    pub extractor: DecimalExtractor,
}

impl From<&ExportConfig> for CollectorConfig {
    fn from(config: &ExportConfig) -> Self {
        Self {
            metric_prefix: config.metric_prefix.clone(),
            input_states: config.input_states.clone(),
            cloud_states: config.cloud_states.clone(),
            mqtt_states: config.mqtt_states.clone(),
            extractor: DecimalExtractor::new(config.decimal_separator),
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self::from(&ExportConfig::default())
    }
}

/// Polls the appliance and builds metric families
pub struct MetricsCollector {
    api: Arc<dyn MonitoringApi>,
    config: CollectorConfig,
}

impl MetricsCollector {
    /// Create a collector over a monitoring API
    pub fn new(api: Arc<dyn MonitoringApi>, config: CollectorConfig) -> Self {
        Self { api, config }
    }

    /// Run one poll and return the resulting metric families
    pub async fn collect(&self) -> Vec<MetricFamily> {
        let started = Instant::now();

        let (inputs, services, brokers) = tokio::join!(
            self.api.fetch_inputs(),
            self.api.fetch_cloud_services(),
            self.api.fetch_mqtt_servers(),
        );

        let mut input_status = self.family("input_status", "Alarm input is in the given state");
        let mut input_value =
            self.family("input_value", "Reading parsed from the alarm input message");
        let mut cloud_status = self.family("cloud_status", "Cloud service is in the given state");
        let mut mqtt_status = self.family("mqtt_status", "MQTT broker is in the given state");
        let mut up = self.family("up", "Endpoint family was fetched in this poll");

        let inputs = self.check(EntityKind::Input, inputs, &mut up);
        for input in inputs.iter().flatten() {
            let id = input.identifier().unwrap_or_default();
            push_states(&mut input_status, input, &self.config.input_states, |name| {
                vec![("id", id.to_string()), ("name", name.to_string())]
            });
            self.push_value(&mut input_value, input);
        }

        let services = self.check(EntityKind::Cloud, services, &mut up);
        for service in services.iter().flatten() {
            push_states(&mut cloud_status, service, &self.config.cloud_states, |name| {
                vec![("service", name.to_string())]
            });
        }

        let brokers = self.check(EntityKind::Mqtt, brokers, &mut up);
        for broker in brokers.iter().flatten() {
            push_states(&mut mqtt_status, broker, &self.config.mqtt_states, |name| {
                vec![("broker", name.to_string())]
            });
        }

        let elapsed = started.elapsed().as_secs_f64();
        let mut duration =
            self.family("scrape_duration_seconds", "Duration of the appliance poll");
        duration.push(Vec::<(String, String)>::new(), elapsed);
        debug!("Poll finished in {elapsed:.3}s");

        vec![input_status, input_value, cloud_status, mqtt_status, up, duration]
    }

    /// Run one poll and render it in Prometheus text format
    pub async fn render(&self) -> String {
        prometheus::render(&self.collect().await)
    }

    fn family(&self, suffix: &str, help: &str) -> MetricFamily {
        MetricFamily::gauge(format!("{}_{suffix}", self.config.metric_prefix), help)
    }

    /// Record the endpoint outcome; failures are logged and dropped for this poll
    fn check<T>(
        &self,
        kind: EntityKind,
        result: Result<Vec<T>>,
        up: &mut MetricFamily,
    ) -> Option<Vec<T>> {
        match result {
            Ok(entities) => {
                debug!(endpoint = %kind, count = entities.len(), "Endpoint fetched");
                up.push([("endpoint", kind.as_str())], 1.0);
                Some(entities)
            }
            Err(e) => {
                warn!(
                    endpoint = %kind,
                    category = e.category(),
                    error = %e,
                    "Skipping endpoint for this poll"
                );
                up.push([("endpoint", kind.as_str())], 0.0);
                None
            }
        }
    }

    fn push_value(&self, family: &mut MetricFamily, input: &AlarmInput) {
        match input.value_with(&self.config.extractor) {
            Ok(value) => family.push(
                [
                    ("id", input.identifier().unwrap_or_default()),
                    ("name", input.name()),
                ],
                value,
            ),
            Err(MonitorError::NoValue) => {
                debug!(input = input.name(), "No reading in message");
            }
            Err(e) => {
                warn!(input = input.name(), error = %e, "Failed to extract reading");
            }
        }
    }
}

/// One 0/1 sample per configured state
fn push_states<E, F>(family: &mut MetricFamily, entity: &E, states: &[String], labels: F)
where
    E: MonitoredEntity,
    F: Fn(&str) -> Vec<(&'static str, String)>,
{
    for state in states {
        let mut sample_labels = labels(entity.name());
        sample_labels.push(("state", state.clone()));
        family.push(sample_labels, entity.has_status(state));
    }
}
