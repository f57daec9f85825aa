//! Metrics collection and Prometheus export
//!
//! The collector applies the status predicate and value extractor to freshly fetched
//! entities; the renderer turns the result into the Prometheus text format.

pub mod collector;
pub mod prometheus;

pub use collector::{CollectorConfig, MetricsCollector};
pub use prometheus::{MetricFamily, Sample};
