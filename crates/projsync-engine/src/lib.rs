//! Reconciliation engine: converge one system's projects, roles, and
//! memberships toward another's.
//!
//! [`invoke`] is the usual entry point. [`Reconciler`] can be driven directly
//! with any pair of [`projsync_access::ResourceClient`] implementations.

pub mod classifier;
pub mod invocation;
pub mod mode;
pub mod profile;
pub mod reconciler;
pub mod report;
pub mod settings;

pub use classifier::{classify, resolve_create, Action, CreateResolution};
pub use invocation::{connect, invoke, InvocationError, InvocationRequest};
pub use mode::{SweepMode, UnknownMode};
pub use profile::{ConnectionProfile, Credentials, ProfileError, ProfileResolver, StaticProfiles};
pub use reconciler::Reconciler;
pub use report::{
    ConvergenceOutcome, ConvergenceReport, OutcomeDetail, OutcomeTag, ReportSummary, ResourceKind,
    ALL_PROJECTS,
};
pub use settings::{ConfigError, EngineSettings};
