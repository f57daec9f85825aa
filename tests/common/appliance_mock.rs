//! WireMock-based appliance API mocking infrastructure
//!
//! Provides a mock HTTP server that answers the monitoring endpoints only when the
//! expected `Accept` and `Authorization` headers are present.

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path, path_regex},
    Mock, MockBuilder, MockServer, ResponseTemplate,
};

/// Access key the mock appliance accepts
pub const TEST_ACCESS_KEY: &str = "test-access-key";

/// Mock alarm appliance for testing
pub struct MockAppliance {
    pub server: MockServer,
}

/// GET matcher requiring the authentication contract
fn authenticated_get(endpoint: &str) -> MockBuilder {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .and(header("Accept", "application/json"))
        .and(header("Authorization", TEST_ACCESS_KEY))
}

impl MockAppliance {
    /// Start an empty mock appliance
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Start a mock appliance with healthy defaults for all three endpoints
    pub async fn start_with_defaults() -> Self {
        let appliance = Self::start().await;
        appliance
            .mock_inputs(&[
                ("11", "Freezer", "ok", "Temperature -18,5 degrees"),
                ("12", "Front door", "alarm", "door open"),
            ])
            .await;
        appliance
            .mock_cloud(json!([
                {"service": "remote-access", "state": "connected"},
                {"service": "push-notifications", "state": "disconnected"}
            ]))
            .await;
        appliance.mock_mqtt("connected", "disconnected").await;
        appliance
    }

    /// Get the mock server's base URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Mount the overview listing plus one detail endpoint per input
    ///
    /// Each detail endpoint expects exactly one request.
    pub async fn mock_inputs(&self, inputs: &[(&str, &str, &str, &str)]) {
        let overview: Vec<Value> = inputs.iter().map(|(id, ..)| json!({ "id": id })).collect();

        authenticated_get("/rest/monitoring/input")
            .respond_with(ResponseTemplate::new(200).set_body_json(overview))
            .expect(1)
            .mount(&self.server)
            .await;

        for (id, name, state, message) in inputs {
            self.mock_input_detail(id, json!({ "name": name, "state": state, "message": message }))
                .await;
        }
    }

    /// Mount a single detail endpoint with an arbitrary body
    pub async fn mock_input_detail(&self, id: &str, body: Value) {
        authenticated_get(&format!("/rest/monitoring/input/{id}"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mount the overview listing only
    pub async fn mock_overview(&self, ids: &[&str]) {
        let overview: Vec<Value> = ids.iter().map(|id| json!({ "id": id })).collect();
        authenticated_get("/rest/monitoring/input")
            .respond_with(ResponseTemplate::new(200).set_body_json(overview))
            .mount(&self.server)
            .await;
    }

    /// Fail if any detail endpoint is requested
    pub async fn forbid_detail_requests(&self) {
        Mock::given(method("GET"))
            .and(path_regex(r"^/rest/monitoring/input/.+"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
    }

    /// Mount the cloud service listing
    pub async fn mock_cloud(&self, services: Value) {
        authenticated_get("/rest/monitoring/cloud")
            .respond_with(ResponseTemplate::new(200).set_body_json(services))
            .mount(&self.server)
            .await;
    }

    /// Mount the MQTT status object
    pub async fn mock_mqtt(&self, default_broker: &str, kubernetes: &str) {
        authenticated_get("/rest/monitoring/mqtt")
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "defaultBroker": default_broker,
                "kubernetes": kubernetes
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer `endpoint` with a raw body
    pub async fn mock_raw_body(&self, endpoint: &str, body: &str) {
        authenticated_get(endpoint)
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Answer `endpoint` with an error status
    pub async fn mock_error_response(&self, endpoint: &str, status: u16) {
        authenticated_get(endpoint)
            .respond_with(ResponseTemplate::new(status).set_body_string("internal error"))
            .mount(&self.server)
            .await;
    }
}
