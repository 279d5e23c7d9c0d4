//! Typed client for the `access/api/v1` project administration surface.
//!
//! Reads and writes projects, roles, and user/group memberships on one
//! system and reports each call as a closed outcome instead of a raw status.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod outcome;
pub mod remote;
pub mod retry;

pub use auth::BearerToken;
pub use client::{AccessClient, DEFAULT_TIMEOUT};
pub use error::{AccessError, AccessResult};
pub use models::{
    AdminPrivileges, MemberBinding, MemberKind, MemberList, ProjectSpec, RoleDefinition,
    PREDEFINED_ROLE_TYPE,
};
pub use outcome::{CreateOutcome, DeleteOutcome, Lookup};
pub use remote::ResourceClient;
pub use retry::{RetryPolicy, RetryingClient};
