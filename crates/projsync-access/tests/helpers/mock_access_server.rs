//! Mock access API server using wiremock for integration testing.

#![allow(dead_code)]

use serde_json::Value;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use projsync_access::{AccessClient, BearerToken};

pub const TEST_TOKEN: &str = "test-token-123";

/// Full request path for an `access/api/v1` endpoint.
pub fn api_path(suffix: &str) -> String {
    format!("/access/api/v1/{suffix}")
}

pub struct MockAccessServer {
    pub server: MockServer,
}

impl MockAccessServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Client bound to this server with the default timeout.
    pub fn client(&self) -> AccessClient {
        AccessClient::with_http_client(
            &self.uri(),
            BearerToken::new(TEST_TOKEN),
            reqwest::Client::new(),
        )
        .expect("mock server URI is valid")
    }

    /// Client bound to this server with a short timeout.
    pub fn client_with_timeout(&self, timeout: Duration) -> AccessClient {
        AccessClient::new(&self.uri(), BearerToken::new(TEST_TOKEN), timeout)
            .expect("mock server URI is valid")
    }

    /// Mount a JSON response for `verb suffix`.
    pub async fn respond_json(&self, verb: &str, suffix: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(api_path(suffix)))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mount a plain-text response for `verb suffix`.
    pub async fn respond_text(&self, verb: &str, suffix: &str, status: u16, body: &str) {
        Mock::given(method(verb))
            .and(path(api_path(suffix)))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Mount a response that only arrives after `delay`.
    pub async fn respond_slowly(&self, verb: &str, suffix: &str, delay: Duration) {
        Mock::given(method(verb))
            .and(path(api_path(suffix)))
            .respond_with(ResponseTemplate::new(200).set_delay(delay))
            .mount(&self.server)
            .await;
    }
}
