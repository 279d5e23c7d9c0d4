//! Shared fixtures: a temporary config directory and mock servers.

#![allow(dead_code)]

use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use projsync::config::ConfigPaths;

pub const TEST_TOKEN: &str = "test-token-123";

pub struct TestContext {
    pub dir: TempDir,
    pub paths: ConfigPaths,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let paths = ConfigPaths::from_dir(dir.path());
        Self { dir, paths }
    }

    pub fn write_profiles(&self, content: &str) {
        std::fs::write(&self.paths.profiles_file, content).expect("write profiles.json");
    }

    /// Token profiles named after the given servers.
    pub fn write_token_profiles(&self, servers: &[(&str, &str)]) {
        let entries: Vec<Value> = servers
            .iter()
            .map(|(id, url)| json!({"server_id": id, "url": url, "access_token": TEST_TOKEN}))
            .collect();
        self.write_profiles(&json!({ "servers": entries }).to_string());
    }
}

pub async fn mount(server: &MockServer, verb: &str, suffix: &str, template: ResponseTemplate) {
    Mock::given(method(verb))
        .and(path(format!("/access/api/v1/{suffix}")))
        .respond_with(template)
        .mount(server)
        .await;
}

pub fn project_json(key: &str) -> Value {
    json!({"project_key": key, "display_name": key.to_uppercase()})
}
