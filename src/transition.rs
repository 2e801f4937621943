//! Inspection lifecycle state machine.
//!
//! States are {PLANNED, IN_PROGRESS, COMPLETED} with no terminal state: a
//! completed inspection can always be reopened. Which transitions are
//! offered depends only on the current status; applying anything else is
//! rejected locally before a remote call is made. The local status changes
//! only after the server confirmed the write.

use anyhow::{bail, Result};
use std::fmt;

use crate::api::InspectionApi;
use crate::schema::InspectionStatus;
use crate::store::InspectionStore;

/// One user-facing lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// PLANNED → IN_PROGRESS
    Begin,
    /// PLANNED → PLANNED, a no-op retained for symmetry
    Cancel,
    /// IN_PROGRESS → COMPLETED
    Finish,
    /// IN_PROGRESS → PLANNED
    Reset,
    /// COMPLETED → IN_PROGRESS
    Reopen,
}

impl Transition {
    pub fn name(self) -> &'static str {
        match self {
            Transition::Begin => "begin",
            Transition::Cancel => "cancel",
            Transition::Finish => "finish",
            Transition::Reset => "reset",
            Transition::Reopen => "reopen",
        }
    }

    /// Status sent to the service when this transition is applied.
    pub fn target(self) -> InspectionStatus {
        match self {
            Transition::Begin | Transition::Reopen => InspectionStatus::InProgress,
            Transition::Cancel | Transition::Reset => InspectionStatus::Planned,
            Transition::Finish => InspectionStatus::Completed,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Transitions offered from a status, in display order.
pub fn offered(status: &InspectionStatus) -> Vec<Transition> {
    match status {
        InspectionStatus::Planned => vec![Transition::Begin, Transition::Cancel],
        InspectionStatus::InProgress => vec![Transition::Finish, Transition::Reset],
        InspectionStatus::Completed => vec![Transition::Reopen],
        InspectionStatus::Other(_) => Vec::new(),
    }
}

/// Apply a transition through the remote service.
///
/// The local status is replaced with the confirmed record on success and is
/// left untouched on failure; the caller surfaces the error once, without a
/// retry.
pub fn apply(
    api: &dyn InspectionApi,
    store: &mut InspectionStore,
    transition: Transition,
) -> Result<()> {
    if !offered(&store.inspection.status).contains(&transition) {
        bail!(
            "transition '{}' is not available while the inspection is {}",
            transition,
            store.inspection.status.label()
        );
    }
    let target = transition.target();
    tracing::info!(
        inspection_id = store.inspection.id,
        transition = transition.name(),
        target = target.as_wire(),
        "applying status transition"
    );
    let confirmed = api.update_inspection_status(store.inspection.id, &target)?;
    store.apply_inspection_update(confirmed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planned_offers_begin_and_cancel_only() {
        let offered = offered(&InspectionStatus::Planned);
        assert_eq!(offered, vec![Transition::Begin, Transition::Cancel]);
        let targets: Vec<_> = offered.iter().map(|t| t.target()).collect();
        assert_eq!(
            targets,
            vec![InspectionStatus::InProgress, InspectionStatus::Planned]
        );
    }

    #[test]
    fn in_progress_offers_finish_and_reset_only() {
        let offered = offered(&InspectionStatus::InProgress);
        assert_eq!(offered, vec![Transition::Finish, Transition::Reset]);
        let targets: Vec<_> = offered.iter().map(|t| t.target()).collect();
        assert_eq!(
            targets,
            vec![InspectionStatus::Completed, InspectionStatus::Planned]
        );
    }

    #[test]
    fn completed_is_not_terminal() {
        let offered = offered(&InspectionStatus::Completed);
        assert_eq!(offered, vec![Transition::Reopen]);
        assert_eq!(offered[0].target(), InspectionStatus::InProgress);
    }

    #[test]
    fn every_target_is_an_enumerated_state() {
        for status in [
            InspectionStatus::Planned,
            InspectionStatus::InProgress,
            InspectionStatus::Completed,
        ] {
            for transition in offered(&status) {
                assert!(matches!(
                    transition.target(),
                    InspectionStatus::Planned
                        | InspectionStatus::InProgress
                        | InspectionStatus::Completed
                ));
            }
        }
    }

    #[test]
    fn unknown_status_offers_nothing() {
        assert!(offered(&InspectionStatus::Other("ARCHIVED".to_string())).is_empty());
    }
}
