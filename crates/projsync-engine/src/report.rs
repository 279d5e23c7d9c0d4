//! Convergence report: one outcome per resource touched during a run.
//!
//! Built fresh for every run and never persisted; serialisable so the CLI can
//! emit it as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use projsync_access::AccessError;

use crate::mode::SweepMode;

/// Identity used when a failure concerns the whole project enumeration.
pub const ALL_PROJECTS: &str = "*";

/// Resource kind, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Project,
    Role,
    UserBinding,
    GroupBinding,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Project => write!(f, "project"),
            ResourceKind::Role => write!(f, "role"),
            ResourceKind::UserBinding => write!(f, "user"),
            ResourceKind::GroupBinding => write!(f, "group"),
        }
    }
}

/// What happened to one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTag {
    Created,
    Updated,
    Deleted,
    UpToDate,
    Skipped,
    Failed,
}

impl OutcomeTag {
    /// Symbol used in table output.
    pub fn symbol(&self) -> &'static str {
        match self {
            OutcomeTag::Created => "+",
            OutcomeTag::Updated => "~",
            OutcomeTag::Deleted => "-",
            OutcomeTag::UpToDate => "=",
            OutcomeTag::Skipped => "·",
            OutcomeTag::Failed => "✗",
        }
    }
}

impl fmt::Display for OutcomeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutcomeTag::Created => "created",
            OutcomeTag::Updated => "updated",
            OutcomeTag::Deleted => "deleted",
            OutcomeTag::UpToDate => "up-to-date",
            OutcomeTag::Skipped => "skipped",
            OutcomeTag::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Diagnostic detail attached to skipped and failed outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDetail {
    /// Remote status, absent for transport and decode failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
}

impl OutcomeDetail {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

impl From<&AccessError> for OutcomeDetail {
    fn from(error: &AccessError) -> Self {
        Self {
            status: error.status(),
            message: error.to_string(),
        }
    }
}

/// Outcome for one (kind, identity) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceOutcome {
    pub kind: ResourceKind,
    /// Owning project key (the project itself for `Project`).
    pub project: String,
    /// Role, user, or group name; `None` for projects and for
    /// enumeration failures that concern a whole collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub tag: OutcomeTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<OutcomeDetail>,
}

impl ConvergenceOutcome {
    pub fn new(kind: ResourceKind, project: &str, name: Option<&str>, tag: OutcomeTag) -> Self {
        Self {
            kind,
            project: project.to_string(),
            name: name.map(str::to_string),
            tag,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: OutcomeDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// `project` or `project/name`.
    pub fn identity(&self) -> String {
        match &self.name {
            Some(name) => format!("{}/{}", self.project, name),
            None => self.project.clone(),
        }
    }
}

/// Counts per tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub up_to_date: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ReportSummary {
    pub fn from_outcomes(outcomes: &[ConvergenceOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome.tag {
                OutcomeTag::Created => summary.created += 1,
                OutcomeTag::Updated => summary.updated += 1,
                OutcomeTag::Deleted => summary.deleted += 1,
                OutcomeTag::UpToDate => summary.up_to_date += 1,
                OutcomeTag::Skipped => summary.skipped += 1,
                OutcomeTag::Failed => summary.failed += 1,
            }
        }
        summary
    }

    /// Number of writes issued successfully.
    pub fn changes(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

/// Aggregate result of one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceReport {
    pub mode: SweepMode,
    pub source: String,
    pub destination: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Set when the caller aborted the run between steps.
    pub cancelled: bool,
    pub outcomes: Vec<ConvergenceOutcome>,
}

impl ConvergenceReport {
    pub fn new(mode: SweepMode, source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            mode,
            source: source.into(),
            destination: destination.into(),
            started_at: Utc::now(),
            finished_at: None,
            cancelled: false,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: ConvergenceOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    /// Whether any resource failed to converge.
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| o.tag == OutcomeTag::Failed)
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary::from_outcomes(&self.outcomes)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ConvergenceOutcome> {
        self.with_tag(OutcomeTag::Failed)
    }

    pub fn with_tag(&self, tag: OutcomeTag) -> impl Iterator<Item = &ConvergenceOutcome> {
        self.outcomes.iter().filter(move |o| o.tag == tag)
    }

    /// Outcome recorded for a resource, if any.
    pub fn find(
        &self,
        kind: ResourceKind,
        project: &str,
        name: Option<&str>,
    ) -> Option<&ConvergenceOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.kind == kind && o.project == project && o.name.as_deref() == name)
    }

    /// Tag recorded for a project, if any.
    pub fn project_tag(&self, project: &str) -> Option<OutcomeTag> {
        self.find(ResourceKind::Project, project, None).map(|o| o.tag)
    }
}
