//! Dependency-ordered reconciliation between a source and a destination.
//!
//! The create sweep walks every source project and converges, in order, the
//! project itself, its user bindings, its roles, then its group bindings. The
//! delete sweep walks the destination and removes projects and roles the
//! source no longer declares.
//!
//! Every remote call is awaited before the next one starts. A failure is
//! recorded against the resource it concerns and the run moves on; nothing
//! short of cancellation stops a sweep early.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use projsync_access::{
    AccessError, DeleteOutcome, Lookup, MemberKind, ProjectSpec, ResourceClient,
};

use crate::classifier::{classify, resolve_create, Action, CreateResolution};
use crate::mode::SweepMode;
use crate::report::{
    ConvergenceOutcome, ConvergenceReport, OutcomeDetail, OutcomeTag, ResourceKind, ALL_PROJECTS,
};

/// Status the access API answers with when it refuses a create.
const REJECTED_STATUS: u16 = 400;

/// Raised at a checkpoint once the caller has cancelled the run.
struct Cancelled;

type Step = Result<(), Cancelled>;

/// Drives one run against a pair of systems.
pub struct Reconciler<'a> {
    source: &'a dyn ResourceClient,
    destination: &'a dyn ResourceClient,
    cancel: CancellationToken,
}

impl<'a> Reconciler<'a> {
    pub fn new(source: &'a dyn ResourceClient, destination: &'a dyn ResourceClient) -> Self {
        Self {
            source,
            destination,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop between resource steps once `cancel` fires. An in-flight call is
    /// always allowed to finish.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run one sweep and return everything that happened.
    pub async fn run(&self, mode: SweepMode) -> ConvergenceReport {
        let mut report =
            ConvergenceReport::new(mode, self.source.system(), self.destination.system());

        info!(
            %mode,
            source = self.source.system(),
            destination = self.destination.system(),
            "Starting reconciliation"
        );

        let result = match mode {
            SweepMode::Create => self.create_sweep(&mut report).await,
            SweepMode::Delete => self.delete_sweep(&mut report).await,
        };
        if result.is_err() {
            report.mark_cancelled();
            warn!(%mode, recorded = report.outcomes.len(), "Reconciliation cancelled");
        }

        report.finish();

        let summary = report.summary();
        info!(
            %mode,
            created = summary.created,
            updated = summary.updated,
            deleted = summary.deleted,
            up_to_date = summary.up_to_date,
            skipped = summary.skipped,
            failed = summary.failed,
            "Reconciliation finished"
        );

        report
    }

    fn checkpoint(&self) -> Step {
        if self.cancel.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    // ── Create / update sweep ─────────────────────────────────────────

    async fn create_sweep(&self, report: &mut ConvergenceReport) -> Step {
        let projects = match self.source.list_projects().await {
            Ok(projects) => projects,
            Err(e) => {
                record_failure(report, ResourceKind::Project, ALL_PROJECTS, None, &e);
                return Ok(());
            }
        };
        debug!(count = projects.len(), "Enumerated source projects");

        for project in &projects {
            self.checkpoint()?;
            let key = project.project_key.as_str();

            if !self.converge_project(report, project).await {
                continue;
            }

            self.converge_members(report, key, MemberKind::User).await?;
            // Group bindings reference roles, so every role settles first.
            self.converge_roles(report, key).await?;
            self.converge_members(report, key, MemberKind::Group).await?;
        }

        Ok(())
    }

    /// Returns whether the project now exists on the destination.
    async fn converge_project(&self, report: &mut ConvergenceReport, project: &ProjectSpec) -> bool {
        let key = project.project_key.as_str();

        let existing = match self.destination.get_project(key).await {
            Ok(lookup) => lookup,
            Err(e) => {
                record_failure(report, ResourceKind::Project, key, None, &e);
                return false;
            }
        };

        if classify(Lookup::Found(project), existing.as_ref()) != Action::Create {
            return self.update_project(report, project).await;
        }

        let outcome = match self.destination.create_project(project).await {
            Ok(outcome) => outcome,
            Err(e) => {
                record_failure(report, ResourceKind::Project, key, None, &e);
                return false;
            }
        };

        match resolve_create(ResourceKind::Project, &outcome) {
            CreateResolution::Created => {
                record(report, outcome_for(ResourceKind::Project, key, None, OutcomeTag::Created));
                true
            }
            CreateResolution::FallBackToUpdate => self.update_project(report, project).await,
            CreateResolution::Skip { detail } => {
                record(
                    report,
                    outcome_for(ResourceKind::Project, key, None, OutcomeTag::Skipped)
                        .with_detail(rejection(detail)),
                );
                false
            }
            CreateResolution::Fail { detail } => {
                record(
                    report,
                    outcome_for(ResourceKind::Project, key, None, OutcomeTag::Failed)
                        .with_detail(rejection(detail)),
                );
                false
            }
        }
    }

    async fn update_project(&self, report: &mut ConvergenceReport, project: &ProjectSpec) -> bool {
        let key = project.project_key.as_str();
        match self.destination.update_project(project).await {
            Ok(()) => {
                record(report, outcome_for(ResourceKind::Project, key, None, OutcomeTag::Updated));
                true
            }
            Err(e) => {
                record_failure(report, ResourceKind::Project, key, None, &e);
                false
            }
        }
    }

    async fn converge_members(
        &self,
        report: &mut ConvergenceReport,
        project_key: &str,
        member_kind: MemberKind,
    ) -> Step {
        let kind = resource_kind(member_kind);

        let names = match self.source.list_members(project_key, member_kind).await {
            Ok(names) => names,
            Err(e) => {
                record_failure(report, kind, project_key, None, &e);
                return Ok(());
            }
        };
        debug!(project = project_key, %kind, count = names.len(), "Enumerated source bindings");

        for name in &names {
            self.checkpoint()?;
            self.converge_member(report, project_key, member_kind, name).await;
        }

        Ok(())
    }

    async fn converge_member(
        &self,
        report: &mut ConvergenceReport,
        project_key: &str,
        member_kind: MemberKind,
        name: &str,
    ) {
        let kind = resource_kind(member_kind);

        let binding = match self.source.get_member(project_key, member_kind, name).await {
            Ok(Lookup::Found(binding)) => binding,
            Ok(Lookup::NotFound) => {
                record(report, vanished_from_source(kind, project_key, name));
                return;
            }
            Err(e) => {
                record_failure(report, kind, project_key, Some(name), &e);
                return;
            }
        };

        // The PUT converges either way; the lookup only labels the outcome.
        let tag = match self.destination.get_member(project_key, member_kind, name).await {
            Ok(existing) => match classify(Lookup::Found(&binding), existing.as_ref()) {
                Action::Create => OutcomeTag::Created,
                _ => OutcomeTag::Updated,
            },
            Err(e) => {
                warn!(
                    project = project_key,
                    %kind,
                    name,
                    error = %e,
                    "Destination lookup failed, upserting anyway"
                );
                OutcomeTag::Updated
            }
        };

        match self
            .destination
            .upsert_member(project_key, member_kind, &binding)
            .await
        {
            Ok(()) => record(report, outcome_for(kind, project_key, Some(name), tag)),
            Err(e) => record_failure(report, kind, project_key, Some(name), &e),
        }
    }

    async fn converge_roles(&self, report: &mut ConvergenceReport, project_key: &str) -> Step {
        let names = match self.source.list_roles(project_key).await {
            Ok(names) => names,
            Err(e) => {
                record_failure(report, ResourceKind::Role, project_key, None, &e);
                return Ok(());
            }
        };
        debug!(project = project_key, count = names.len(), "Enumerated source roles");

        for name in &names {
            self.checkpoint()?;
            self.converge_role(report, project_key, name).await;
        }

        Ok(())
    }

    async fn converge_role(&self, report: &mut ConvergenceReport, project_key: &str, name: &str) {
        let kind = ResourceKind::Role;

        let role = match self.source.get_role(project_key, name).await {
            Ok(Lookup::Found(role)) => role,
            Ok(Lookup::NotFound) => {
                record(report, vanished_from_source(kind, project_key, name));
                return;
            }
            Err(e) => {
                record_failure(report, kind, project_key, Some(name), &e);
                return;
            }
        };

        let outcome = match self.destination.create_role(project_key, &role).await {
            Ok(outcome) => outcome,
            Err(e) => {
                record_failure(report, kind, project_key, Some(name), &e);
                return;
            }
        };

        match resolve_create(kind, &outcome) {
            CreateResolution::Created => {
                record(report, outcome_for(kind, project_key, Some(name), OutcomeTag::Created));
            }
            CreateResolution::FallBackToUpdate => {
                match self.destination.update_role(project_key, &role).await {
                    Ok(()) => record(
                        report,
                        outcome_for(kind, project_key, Some(name), OutcomeTag::Updated),
                    ),
                    Err(e) => record_failure(report, kind, project_key, Some(name), &e),
                }
            }
            CreateResolution::Skip { detail } => record(
                report,
                outcome_for(kind, project_key, Some(name), OutcomeTag::Skipped)
                    .with_detail(rejection(detail)),
            ),
            CreateResolution::Fail { detail } => record(
                report,
                outcome_for(kind, project_key, Some(name), OutcomeTag::Failed)
                    .with_detail(rejection(detail)),
            ),
        }
    }

    // ── Delete sweep ──────────────────────────────────────────────────

    async fn delete_sweep(&self, report: &mut ConvergenceReport) -> Step {
        let projects = match self.destination.list_projects().await {
            Ok(projects) => projects,
            Err(e) => {
                record_failure(report, ResourceKind::Project, ALL_PROJECTS, None, &e);
                return Ok(());
            }
        };
        debug!(count = projects.len(), "Enumerated destination projects");

        for project in &projects {
            self.checkpoint()?;
            let key = project.project_key.as_str();

            let declared = match self.source.get_project(key).await {
                Ok(lookup) => lookup,
                Err(e) => {
                    record_failure(report, ResourceKind::Project, key, None, &e);
                    continue;
                }
            };

            match classify(declared.as_ref(), Lookup::Found(project)) {
                Action::Delete => {
                    let result = self.destination.delete_project(key).await;
                    record_deletion(report, ResourceKind::Project, key, None, result);
                }
                _ => {
                    record(report, outcome_for(ResourceKind::Project, key, None, OutcomeTag::UpToDate));
                    self.prune_roles(report, key).await?;
                }
            }
        }

        Ok(())
    }

    /// Delete destination roles of a shared project that the source lacks.
    async fn prune_roles(&self, report: &mut ConvergenceReport, project_key: &str) -> Step {
        let kind = ResourceKind::Role;

        let names = match self.destination.list_roles(project_key).await {
            Ok(names) => names,
            Err(e) => {
                record_failure(report, kind, project_key, None, &e);
                return Ok(());
            }
        };

        for name in &names {
            self.checkpoint()?;

            let declared = match self.source.get_role(project_key, name).await {
                Ok(lookup) => lookup,
                Err(e) => {
                    record_failure(report, kind, project_key, Some(name), &e);
                    continue;
                }
            };

            // The destination just listed the role, so it is present there.
            if declared.is_found() {
                record(report, outcome_for(kind, project_key, Some(name), OutcomeTag::UpToDate));
                continue;
            }

            let result = self.destination.delete_role(project_key, name).await;
            record_deletion(report, kind, project_key, Some(name), result);
        }

        Ok(())
    }
}

fn resource_kind(member_kind: MemberKind) -> ResourceKind {
    match member_kind {
        MemberKind::User => ResourceKind::UserBinding,
        MemberKind::Group => ResourceKind::GroupBinding,
    }
}

fn outcome_for(
    kind: ResourceKind,
    project_key: &str,
    name: Option<&str>,
    tag: OutcomeTag,
) -> ConvergenceOutcome {
    ConvergenceOutcome::new(kind, project_key, name, tag)
}

fn rejection(detail: String) -> OutcomeDetail {
    OutcomeDetail {
        status: Some(REJECTED_STATUS),
        message: detail,
    }
}

fn vanished_from_source(kind: ResourceKind, project_key: &str, name: &str) -> ConvergenceOutcome {
    outcome_for(kind, project_key, Some(name), OutcomeTag::Skipped)
        .with_detail(OutcomeDetail::message("listed on source but no longer present"))
}

fn record_deletion(
    report: &mut ConvergenceReport,
    kind: ResourceKind,
    project_key: &str,
    name: Option<&str>,
    result: Result<DeleteOutcome, AccessError>,
) {
    match result {
        Ok(DeleteOutcome::Deleted) => {
            record(report, outcome_for(kind, project_key, name, OutcomeTag::Deleted));
        }
        Ok(DeleteOutcome::AlreadyAbsent) => record(
            report,
            outcome_for(kind, project_key, name, OutcomeTag::Deleted)
                .with_detail(OutcomeDetail::message("already absent")),
        ),
        Err(e) => record_failure(report, kind, project_key, name, &e),
    }
}

fn record_failure(
    report: &mut ConvergenceReport,
    kind: ResourceKind,
    project_key: &str,
    name: Option<&str>,
    error: &AccessError,
) {
    record(
        report,
        outcome_for(kind, project_key, name, OutcomeTag::Failed).with_detail(error.into()),
    );
}

/// Log an outcome and append it to the report.
fn record(report: &mut ConvergenceReport, outcome: ConvergenceOutcome) {
    let identity = outcome.identity();
    let message = outcome.detail.as_ref().map(|d| d.message.as_str());
    match outcome.tag {
        OutcomeTag::Created | OutcomeTag::Updated | OutcomeTag::Deleted => info!(
            project = %outcome.project,
            kind = %outcome.kind,
            identity = %identity,
            outcome = %outcome.tag,
            "Converged"
        ),
        OutcomeTag::Failed => warn!(
            project = %outcome.project,
            kind = %outcome.kind,
            identity = %identity,
            status = ?outcome.detail.as_ref().and_then(|d| d.status),
            error = message.unwrap_or_default(),
            "Failed to converge"
        ),
        OutcomeTag::UpToDate | OutcomeTag::Skipped => debug!(
            project = %outcome.project,
            kind = %outcome.kind,
            identity = %identity,
            outcome = %outcome.tag,
            detail = message.unwrap_or_default(),
            "No change"
        ),
    }
    report.record(outcome);
}
