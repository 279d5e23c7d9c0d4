//! Wire models for the `access/api/v1/projects` surface.
//!
//! Every model keeps unrecognised fields in `extra` so a resource read from
//! one system is written to the other without dropping attributes this crate
//! does not model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Admin privileges granted to project administrators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminPrivileges {
    #[serde(default)]
    pub manage_members: bool,
    #[serde(default)]
    pub manage_resources: bool,
    #[serde(default)]
    pub index_resources: bool,
}

/// A project as declared on a system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSpec {
    /// Unique, immutable key.
    pub project_key: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub admin_privileges: AdminPrivileges,
    /// Quota in bytes; `-1` means unlimited.
    #[serde(default = "unlimited_quota")]
    pub storage_quota_bytes: i64,
    #[serde(default)]
    pub soft_limit: bool,
    #[serde(default)]
    pub storage_quota_email_notification: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn unlimited_quota() -> i64 {
    -1
}

impl ProjectSpec {
    #[must_use]
    pub fn new(project_key: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            display_name: display_name.into(),
            description: String::new(),
            admin_privileges: AdminPrivileges::default(),
            storage_quota_bytes: unlimited_quota(),
            soft_limit: false,
            storage_quota_email_notification: false,
            extra: Map::new(),
        }
    }
}

/// Built-in role type marker as served by the access API.
pub const PREDEFINED_ROLE_TYPE: &str = "PREDEFINED";

/// A role scoped to one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub name: String,
    #[serde(rename = "type", default)]
    pub role_type: String,
    /// Ordered; order is preserved on write.
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub environments: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RoleDefinition {
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role_type: "CUSTOM".to_string(),
            actions: Vec::new(),
            environments: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Predefined roles exist on every system and cannot be created.
    #[must_use]
    pub fn is_predefined(&self) -> bool {
        self.role_type.eq_ignore_ascii_case(PREDEFINED_ROLE_TYPE)
    }
}

/// Which membership collection a binding lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    User,
    Group,
}

impl MemberKind {
    /// Path segment under `/projects/{key}/`.
    #[must_use]
    pub fn collection(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Group => "groups",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Group => write!(f, "group"),
        }
    }
}

/// Roles granted to one user or group inside a project.
///
/// Identity is `(project_key, kind, name)`; the project key and kind are
/// carried by the request path, not the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberBinding {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MemberBinding {
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            roles: roles.into_iter().map(Into::into).collect(),
            extra: Map::new(),
        }
    }
}

/// Listing shape for `/projects/{key}/users` and `/projects/{key}/groups`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberList {
    #[serde(default)]
    pub members: Vec<MemberBinding>,
}
