//! HTTP client for the `access/api/v1` project surface (reqwest-based).
//!
//! Provides an `AccessClient` bound to one system (base URL + bearer token)
//! that implements [`ResourceClient`] by translating response statuses into
//! the closed outcomes of [`crate::outcome`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::BearerToken;
use crate::error::{AccessError, AccessResult};
use crate::models::{MemberBinding, MemberKind, MemberList, ProjectSpec, RoleDefinition};
use crate::outcome::{CreateOutcome, DeleteOutcome, Lookup};
use crate::remote::ResourceClient;

/// Upper bound for any single call unless the caller configures another.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("projsync/", env!("CARGO_PKG_VERSION"));

/// Path prefix shared by every endpoint.
const API_ROOT: [&str; 3] = ["access", "api", "v1"];

/// Client for one system's access API.
#[derive(Debug, Clone)]
pub struct AccessClient {
    /// Parsed base URL, e.g. `https://dr.example.com/`.
    base_url: Url,
    token: BearerToken,
    http_client: Client,
}

impl AccessClient {
    /// Create a client with its own `reqwest::Client` bounded by `timeout`.
    pub fn new(base_url: &str, token: BearerToken, timeout: Duration) -> AccessResult<Self> {
        Self::with_user_agent(base_url, token, timeout, USER_AGENT)
    }

    /// Like [`AccessClient::new`], sending a caller-chosen `User-Agent`.
    pub fn with_user_agent(
        base_url: &str,
        token: BearerToken,
        timeout: Duration,
        user_agent: &str,
    ) -> AccessResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| AccessError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        Self::with_http_client(base_url, token, http_client)
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    pub fn with_http_client(
        base_url: &str,
        token: BearerToken,
        http_client: Client,
    ) -> AccessResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AccessError::InvalidConfig(format!("invalid base URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AccessError::InvalidConfig(format!(
                "base URL {base_url} cannot carry a path"
            )));
        }
        Ok(Self {
            base_url,
            token,
            http_client,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Health probe (`GET access/api/v1/system/ping`).
    pub async fn ping(&self) -> AccessResult<()> {
        let url = self.url(&["system", "ping"])?;
        debug!(%url, "GET");
        let response = self.token.apply(self.http_client.get(url)).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }

    /// Build an endpoint URL; each segment is percent-encoded.
    fn url(&self, segments: &[&str]) -> AccessResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AccessError::InvalidConfig(format!("base URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(API_ROOT.iter().chain(segments.iter()));
        Ok(url)
    }

    // ── Internal HTTP Methods ─────────────────────────────────────────

    /// GET a single resource; 404 is a lookup miss, not an error.
    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> AccessResult<Lookup<T>> {
        debug!(%url, "GET");
        let response = self.token.apply(self.http_client.get(url)).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Lookup::NotFound);
        }
        if !status.is_success() {
            return Err(status_error(response).await);
        }
        decode(response).await.map(Lookup::Found)
    }

    /// GET a listing; every non-success status is an error.
    async fn list<T: DeserializeOwned>(&self, url: Url) -> AccessResult<T> {
        debug!(%url, "GET");
        let response = self.token.apply(self.http_client.get(url)).send().await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        decode(response).await
    }

    async fn post<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> AccessResult<CreateOutcome> {
        debug!(%url, "POST");
        let response = self
            .token
            .apply(self.http_client.post(url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        match status {
            s if s.is_success() => Ok(CreateOutcome::Created),
            StatusCode::CONFLICT => Ok(CreateOutcome::Conflict),
            StatusCode::BAD_REQUEST => {
                let detail = body_text(response).await;
                Ok(CreateOutcome::Rejected { detail })
            }
            _ => Err(status_error(response).await),
        }
    }

    async fn put<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> AccessResult<()> {
        debug!(%url, "PUT");
        let response = self
            .token
            .apply(self.http_client.put(url))
            .json(body)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }

    async fn delete(&self, url: Url) -> AccessResult<DeleteOutcome> {
        debug!(%url, "DELETE");
        let response = self.token.apply(self.http_client.delete(url)).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(DeleteOutcome::Deleted)
        } else if status == StatusCode::NOT_FOUND {
            Ok(DeleteOutcome::AlreadyAbsent)
        } else {
            Err(status_error(response).await)
        }
    }
}

#[async_trait]
impl ResourceClient for AccessClient {
    fn system(&self) -> &str {
        self.base_url.as_str()
    }

    async fn list_projects(&self) -> AccessResult<Vec<ProjectSpec>> {
        let url = self.url(&["projects"])?;
        self.list(url).await
    }

    async fn get_project(&self, project_key: &str) -> AccessResult<Lookup<ProjectSpec>> {
        let url = self.url(&["projects", project_key])?;
        self.fetch(url).await
    }

    async fn create_project(&self, project: &ProjectSpec) -> AccessResult<CreateOutcome> {
        let url = self.url(&["projects"])?;
        self.post(url, project).await
    }

    async fn update_project(&self, project: &ProjectSpec) -> AccessResult<()> {
        let url = self.url(&["projects", project.project_key.as_str()])?;
        self.put(url, project).await
    }

    async fn delete_project(&self, project_key: &str) -> AccessResult<DeleteOutcome> {
        let url = self.url(&["projects", project_key])?;
        self.delete(url).await
    }

    async fn list_roles(&self, project_key: &str) -> AccessResult<Vec<String>> {
        let url = self.url(&["projects", project_key, "roles"])?;
        let roles: Vec<RoleDefinition> = self.list(url).await?;
        Ok(roles.into_iter().map(|r| r.name).collect())
    }

    async fn get_role(
        &self,
        project_key: &str,
        role: &str,
    ) -> AccessResult<Lookup<RoleDefinition>> {
        let url = self.url(&["projects", project_key, "roles", role])?;
        self.fetch(url).await
    }

    async fn create_role(
        &self,
        project_key: &str,
        role: &RoleDefinition,
    ) -> AccessResult<CreateOutcome> {
        let url = self.url(&["projects", project_key, "roles"])?;
        self.post(url, role).await
    }

    async fn update_role(&self, project_key: &str, role: &RoleDefinition) -> AccessResult<()> {
        let url = self.url(&["projects", project_key, "roles", role.name.as_str()])?;
        self.put(url, role).await
    }

    async fn delete_role(&self, project_key: &str, role: &str) -> AccessResult<DeleteOutcome> {
        let url = self.url(&["projects", project_key, "roles", role])?;
        self.delete(url).await
    }

    async fn list_members(
        &self,
        project_key: &str,
        kind: MemberKind,
    ) -> AccessResult<Vec<String>> {
        let url = self.url(&["projects", project_key, kind.collection()])?;
        let list: MemberList = self.list(url).await?;
        Ok(list.members.into_iter().map(|m| m.name).collect())
    }

    async fn get_member(
        &self,
        project_key: &str,
        kind: MemberKind,
        name: &str,
    ) -> AccessResult<Lookup<MemberBinding>> {
        let url = self.url(&["projects", project_key, kind.collection(), name])?;
        self.fetch(url).await
    }

    async fn upsert_member(
        &self,
        project_key: &str,
        kind: MemberKind,
        binding: &MemberBinding,
    ) -> AccessResult<()> {
        let url = self.url(&["projects", project_key, kind.collection(), binding.name.as_str()])?;
        self.put(url, binding).await
    }
}

// ── Response Handling ─────────────────────────────────────────────

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> AccessResult<T> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| AccessError::Decode(format!("{e}: {body}")))
}

async fn body_text(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "<no body>".to_string())
}

async fn status_error(response: reqwest::Response) -> AccessError {
    let status = response.status();
    let body = body_text(response).await;
    warn!(status = status.as_u16(), body = %body, "remote rejected request");
    AccessError::Status {
        status: status.as_u16(),
        body,
    }
}
