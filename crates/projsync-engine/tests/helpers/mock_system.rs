//! wiremock-backed access system for end-to-end runs.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use projsync_engine::ConnectionProfile;

pub const TEST_TOKEN: &str = "test-token-123";

pub fn api_path(suffix: &str) -> String {
    format!("/access/api/v1/{suffix}")
}

pub fn project_json(key: &str) -> Value {
    json!({
        "project_key": key,
        "display_name": key.to_uppercase(),
        "description": "",
        "admin_privileges": {
            "manage_members": true,
            "manage_resources": false,
            "index_resources": false
        },
        "storage_quota_bytes": -1
    })
}

pub struct MockSystem {
    pub server: MockServer,
}

impl MockSystem {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Token profile pointing at this server.
    pub fn profile(&self, name: &str) -> ConnectionProfile {
        ConnectionProfile::with_token(name, self.server.uri(), TEST_TOKEN)
    }

    pub async fn respond(&self, verb: &str, suffix: &str, template: ResponseTemplate) {
        Mock::given(method(verb))
            .and(path(api_path(suffix)))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }

    pub async fn respond_json(&self, verb: &str, suffix: &str, status: u16, body: Value) {
        self.respond(verb, suffix, ResponseTemplate::new(status).set_body_json(body))
            .await;
    }

    pub async fn respond_status(&self, verb: &str, suffix: &str, status: u16) {
        self.respond(verb, suffix, ResponseTemplate::new(status)).await;
    }

    pub async fn respond_slowly(&self, verb: &str, suffix: &str, delay: Duration) {
        self.respond(
            verb,
            suffix,
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(delay),
        )
        .await;
    }

    /// Serve a project with no roles, users, or groups.
    pub async fn serve_empty_project(&self, key: &str) {
        self.respond_json("GET", &format!("projects/{key}"), 200, project_json(key))
            .await;
        self.respond_json("GET", &format!("projects/{key}/roles"), 200, json!([]))
            .await;
        self.respond_json(
            "GET",
            &format!("projects/{key}/users"),
            200,
            json!({"members": []}),
        )
        .await;
        self.respond_json(
            "GET",
            &format!("projects/{key}/groups"),
            200,
            json!({"members": []}),
        )
        .await;
    }

    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}
