//! The `ResourceClient` seam between the reconciler and a remote system.
//!
//! One implementation talks HTTP ([`crate::client::AccessClient`]); tests and
//! policy wrappers such as [`crate::retry::RetryingClient`] provide others.

use async_trait::async_trait;

use crate::error::AccessResult;
use crate::models::{MemberBinding, MemberKind, ProjectSpec, RoleDefinition};
use crate::outcome::{CreateOutcome, DeleteOutcome, Lookup};

/// Typed operations against one system, per resource kind.
///
/// Enumerations return identities in the order the remote serves them; an
/// empty list is a valid answer and distinct from a failure.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Label used in logs and reports (usually the base URL).
    fn system(&self) -> &str;

    // ── Projects ──────────────────────────────────────────────────────

    async fn list_projects(&self) -> AccessResult<Vec<ProjectSpec>>;

    async fn get_project(&self, project_key: &str) -> AccessResult<Lookup<ProjectSpec>>;

    async fn create_project(&self, project: &ProjectSpec) -> AccessResult<CreateOutcome>;

    async fn update_project(&self, project: &ProjectSpec) -> AccessResult<()>;

    async fn delete_project(&self, project_key: &str) -> AccessResult<DeleteOutcome>;

    // ── Roles ─────────────────────────────────────────────────────────

    async fn list_roles(&self, project_key: &str) -> AccessResult<Vec<String>>;

    async fn get_role(&self, project_key: &str, role: &str)
        -> AccessResult<Lookup<RoleDefinition>>;

    async fn create_role(
        &self,
        project_key: &str,
        role: &RoleDefinition,
    ) -> AccessResult<CreateOutcome>;

    async fn update_role(&self, project_key: &str, role: &RoleDefinition) -> AccessResult<()>;

    async fn delete_role(&self, project_key: &str, role: &str) -> AccessResult<DeleteOutcome>;

    // ── Memberships ───────────────────────────────────────────────────

    async fn list_members(&self, project_key: &str, kind: MemberKind)
        -> AccessResult<Vec<String>>;

    async fn get_member(
        &self,
        project_key: &str,
        kind: MemberKind,
        name: &str,
    ) -> AccessResult<Lookup<MemberBinding>>;

    /// PUT; the same call creates or replaces the binding.
    async fn upsert_member(
        &self,
        project_key: &str,
        kind: MemberKind,
        binding: &MemberBinding,
    ) -> AccessResult<()>;
}
