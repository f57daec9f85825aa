//! Test fixtures for consistent client setup

use super::TEST_ACCESS_KEY;
use alarm_monitor_exporter::config::ApplianceConfig;
use alarm_monitor_exporter::MonitoringHttpClient;
use rstest::*;
use std::time::Duration;
use url::Url;

/// Appliance configuration pointing to a mock server
#[fixture]
pub fn test_appliance_config(
    #[default("http://localhost:8080")] mock_url: &str,
) -> ApplianceConfig {
    ApplianceConfig {
        url: Url::parse(mock_url).expect("Valid URL"),
        access_key: TEST_ACCESS_KEY.to_string(),
        timeout: Duration::from_secs(5),
        verify_ssl: false,
        max_concurrent_requests: 4,
    }
}

/// Client for a mock appliance URL
pub fn test_client(mock_url: &str) -> MonitoringHttpClient {
    MonitoringHttpClient::new(&test_appliance_config(mock_url)).expect("client builds")
}
