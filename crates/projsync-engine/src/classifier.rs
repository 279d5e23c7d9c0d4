//! Pure classification of one resource into the action that converges it.
//!
//! No I/O happens here: the reconciler fetches both sides, asks what to do,
//! then executes the answer through the client.

use projsync_access::{CreateOutcome, Lookup};

use crate::report::ResourceKind;

/// Action that converges one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// On source, absent on destination.
    Create,
    /// On both sides; issued unconditionally, the source is authoritative.
    Update,
    /// On destination, absent on source.
    Delete,
    /// Nothing to converge.
    Skip,
}

/// Decide the action for a resource from its presence on each side.
///
/// The snapshots are not compared: an existing resource is always updated.
pub fn classify<S, D>(source: Lookup<&S>, destination: Lookup<&D>) -> Action {
    match (source, destination) {
        (Lookup::Found(_), Lookup::NotFound) => Action::Create,
        (Lookup::Found(_), Lookup::Found(_)) => Action::Update,
        (Lookup::NotFound, Lookup::Found(_)) => Action::Delete,
        (Lookup::NotFound, Lookup::NotFound) => Action::Skip,
    }
}

/// Next step after a create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateResolution {
    Created,
    /// The resource already exists; issue an update instead.
    FallBackToUpdate,
    /// The destination refused a reserved object; benign.
    Skip { detail: String },
    /// The destination refused a resource it should have accepted.
    Fail { detail: String },
}

/// Map a create response onto the next step.
///
/// A 400 on a role is the expected answer for predefined roles. Projects have
/// no reserved keys, so the same rejection there is a failure.
pub fn resolve_create(kind: ResourceKind, outcome: &CreateOutcome) -> CreateResolution {
    match outcome {
        CreateOutcome::Created => CreateResolution::Created,
        CreateOutcome::Conflict => CreateResolution::FallBackToUpdate,
        CreateOutcome::Rejected { detail } => match kind {
            ResourceKind::Role => CreateResolution::Skip {
                detail: detail.clone(),
            },
            _ => CreateResolution::Fail {
                detail: detail.clone(),
            },
        },
    }
}
