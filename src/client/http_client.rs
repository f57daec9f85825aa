//! HTTP client for the appliance monitoring REST API
//!
//! Every request carries `Accept: application/json` and the configured access key
//! verbatim in `Authorization`. Requests are never retried.

use crate::client::{MonitoringApi, CLOUD_PATH, INPUT_PATH, MQTT_PATH};
use crate::config::ApplianceConfig;
use crate::error::{MonitorError, Result};
use crate::model::{AlarmInput, CloudService, InputRef, MqttServer, MqttStatus};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

/// HTTP client for the appliance monitoring endpoints
#[derive(Debug, Clone)]
pub struct MonitoringHttpClient {
    /// HTTP client instance with authentication headers preset
    client: Client,

    /// Base URL of the appliance
    base_url: Url,

    /// Upper bound for concurrent detail requests
    max_concurrent_requests: usize,
}

impl MonitoringHttpClient {
    /// Create a new client from the appliance configuration
    pub fn new(config: &ApplianceConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(format!("alarm-monitor-exporter/{}", env!("CARGO_PKG_VERSION")));

        if !config.verify_ssl {
            warn!("SSL verification disabled - this is insecure for production use");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .default_headers(auth_headers(&config.access_key)?)
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.clone(),
            max_concurrent_requests: config.max_concurrent_requests.max(1),
        })
    }

    /// Base URL with any credentials stripped, for logging
    pub fn display_url(&self) -> String {
        let mut url = self.base_url.clone();
        // Only fails for URLs without a host, which carry no credentials
        let _ = url.set_username("");
        let _ = url.set_password(None);
        url.to_string()
    }

    /// Build URL for API endpoint, keeping any path prefix and query of the base URL
    fn build_url(&self, path: &str) -> Result<Url> {
        self.url_with_segments(path.split('/'))
    }

    /// Build the detail URL for one alarm input, encoding the id as a single segment
    fn input_detail_url(&self, id: &str) -> Result<Url> {
        self.url_with_segments(INPUT_PATH.split('/').chain([id]))
    }

    fn url_with_segments<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| MonitorError::invalid_url("Base URL cannot carry path segments"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a URL and deserialize the JSON body
    ///
    /// Non-2xx responses are transport errors; body mismatches are JSON errors.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {url}");

        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }

    async fn fetch_input_detail(&self, input: InputRef) -> Result<AlarmInput> {
        let url = self.input_detail_url(&input.id)?;
        let detail: AlarmInput = self.get_json(url).await?;
        Ok(detail.with_identifier(input.id))
    }
}

/// Default headers sent with every request
fn auth_headers(access_key: &str) -> Result<HeaderMap> {
    let mut auth_value = HeaderValue::from_str(access_key)
        .map_err(|e| MonitorError::config(format!("Invalid access key header: {e}")))?;
    auth_value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(AUTHORIZATION, auth_value);
    Ok(headers)
}

#[async_trait]
impl MonitoringApi for MonitoringHttpClient {
    async fn fetch_inputs(&self) -> Result<Vec<AlarmInput>> {
        let overview: Vec<InputRef> = self.get_json(self.build_url(INPUT_PATH)?).await?;
        debug!("Input overview lists {} inputs", overview.len());

        // Ordered fan-out; the first failing detail aborts the whole batch
        let inputs: Vec<AlarmInput> = futures::stream::iter(overview)
            .map(|input| self.fetch_input_detail(input))
            .buffered(self.max_concurrent_requests)
            .try_collect()
            .await?;

        Ok(inputs)
    }

    async fn fetch_cloud_services(&self) -> Result<Vec<CloudService>> {
        let services: Vec<CloudService> = self.get_json(self.build_url(CLOUD_PATH)?).await?;
        debug!("Fetched {} cloud services", services.len());
        Ok(services)
    }

    async fn fetch_mqtt_servers(&self) -> Result<Vec<MqttServer>> {
        let status: MqttStatus = self.get_json(self.build_url(MQTT_PATH)?).await?;
        Ok(status.into_servers())
    }
}
