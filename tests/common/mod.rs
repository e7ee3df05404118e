//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

/// Test helper functions
pub mod helpers {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use xhs_client::{Settings, XhsClient, config::settings::HostSettings};

    pub const TEST_COOKIE: &str = "a1=a1value; webId=w1; web_session=s1";

    /// Sign service answering every request with fixed values
    pub async fn start_sign_service() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sign"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"x-s": "XYW_signed", "x-t": 1700000000000_i64})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/common"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"x-s-common": "common_value"})),
            )
            .mount(&server)
            .await;
        server
    }

    /// Settings routing every host to `api` and signing through `sign`
    pub fn create_test_settings(api: &MockServer, sign: &MockServer) -> Settings {
        let mut settings = Settings::default();
        settings.hosts = HostSettings::all(api.uri());
        settings.signer.endpoint = Some(sign.uri());
        settings.client.cookie = Some(TEST_COOKIE.to_string());
        settings
    }

    /// Client wired to mock API and sign servers
    pub fn create_test_client(api: &MockServer, sign: &MockServer) -> XhsClient {
        XhsClient::from_settings(create_test_settings(api, sign)).unwrap()
    }
}
