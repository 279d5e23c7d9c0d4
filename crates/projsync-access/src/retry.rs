//! Exponential backoff retry as a wrapper around any [`ResourceClient`].
//!
//! The default policy performs no retries, so a single attempt's outcome is
//! final unless the caller opts in.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AccessError, AccessResult};
use crate::models::{MemberBinding, MemberKind, ProjectSpec, RoleDefinition};
use crate::outcome::{CreateOutcome, DeleteOutcome, Lookup};
use crate::remote::ResourceClient;

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (0 = no retries).
    pub max_retries: u32,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Maximum delay cap.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given retry count and base delay.
    /// The delay cap defaults to 30 seconds.
    #[must_use]
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.max_retries == 0
    }

    /// Transport failures and 5xx answers are retried; everything else is final.
    #[must_use]
    pub fn should_retry(&self, attempt: u32, error: &AccessError) -> bool {
        if attempt >= self.max_retries {
            return false;
        }
        error.is_retryable() || error.is_server_error()
    }

    /// `min(base_delay * 2^attempt, max_delay)`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Execute an async operation with retry.
    ///
    /// When retries are exhausted the last error is returned unchanged.
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, mut f: F) -> AccessResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AccessResult<T>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(
                            operation = operation_name,
                            attempt = attempt + 1,
                            "operation succeeded after retries"
                        );
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if !self.should_retry(attempt, &error) {
                        if attempt > 0 {
                            warn!(
                                operation = operation_name,
                                attempts = attempt + 1,
                                error = %error,
                                "giving up after retries"
                            );
                        }
                        return Err(error);
                    }

                    let delay = self.delay_for(attempt);
                    debug!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "retrying after transient error"
                    );

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// A [`ResourceClient`] that retries its inner client's calls per a policy.
#[derive(Debug, Clone)]
pub struct RetryingClient<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: ResourceClient> RetryingClient<C> {
    #[must_use]
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    #[must_use]
    pub fn inner(&self) -> &C {
        &self.inner
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl<C: ResourceClient> ResourceClient for RetryingClient<C> {
    fn system(&self) -> &str {
        self.inner.system()
    }

    async fn list_projects(&self) -> AccessResult<Vec<ProjectSpec>> {
        self.policy
            .execute("list_projects", || self.inner.list_projects())
            .await
    }

    async fn get_project(&self, project_key: &str) -> AccessResult<Lookup<ProjectSpec>> {
        self.policy
            .execute("get_project", || self.inner.get_project(project_key))
            .await
    }

    async fn create_project(&self, project: &ProjectSpec) -> AccessResult<CreateOutcome> {
        self.policy
            .execute("create_project", || self.inner.create_project(project))
            .await
    }

    async fn update_project(&self, project: &ProjectSpec) -> AccessResult<()> {
        self.policy
            .execute("update_project", || self.inner.update_project(project))
            .await
    }

    async fn delete_project(&self, project_key: &str) -> AccessResult<DeleteOutcome> {
        self.policy
            .execute("delete_project", || self.inner.delete_project(project_key))
            .await
    }

    async fn list_roles(&self, project_key: &str) -> AccessResult<Vec<String>> {
        self.policy
            .execute("list_roles", || self.inner.list_roles(project_key))
            .await
    }

    async fn get_role(
        &self,
        project_key: &str,
        role: &str,
    ) -> AccessResult<Lookup<RoleDefinition>> {
        self.policy
            .execute("get_role", || self.inner.get_role(project_key, role))
            .await
    }

    async fn create_role(
        &self,
        project_key: &str,
        role: &RoleDefinition,
    ) -> AccessResult<CreateOutcome> {
        self.policy
            .execute("create_role", || self.inner.create_role(project_key, role))
            .await
    }

    async fn update_role(&self, project_key: &str, role: &RoleDefinition) -> AccessResult<()> {
        self.policy
            .execute("update_role", || self.inner.update_role(project_key, role))
            .await
    }

    async fn delete_role(&self, project_key: &str, role: &str) -> AccessResult<DeleteOutcome> {
        self.policy
            .execute("delete_role", || self.inner.delete_role(project_key, role))
            .await
    }

    async fn list_members(
        &self,
        project_key: &str,
        kind: MemberKind,
    ) -> AccessResult<Vec<String>> {
        self.policy
            .execute("list_members", || self.inner.list_members(project_key, kind))
            .await
    }

    async fn get_member(
        &self,
        project_key: &str,
        kind: MemberKind,
        name: &str,
    ) -> AccessResult<Lookup<MemberBinding>> {
        self.policy
            .execute("get_member", || self.inner.get_member(project_key, kind, name))
            .await
    }

    async fn upsert_member(
        &self,
        project_key: &str,
        kind: MemberKind,
        binding: &MemberBinding,
    ) -> AccessResult<()> {
        self.policy
            .execute("upsert_member", || {
                self.inner.upsert_member(project_key, kind, binding)
            })
            .await
    }
}
