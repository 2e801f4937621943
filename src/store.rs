//! In-memory store for one inspection detail session.
//!
//! The store owns exactly one inspection and its steps for the lifetime of a
//! session. Local state is only replaced with records the server confirmed;
//! there is no optimistic update and no caching across inspection ids.

use anyhow::{Context, Result};

use crate::api::InspectionApi;
use crate::schema::{Inspection, InspectionStep};

/// Draft/committed pair for one step's comment.
///
/// The draft buffers edits until an explicit save; the committed value
/// mirrors what the server last confirmed.
#[derive(Debug, Clone)]
pub struct CommentBuffer {
    pub committed: Option<String>,
    pub draft: String,
}

impl CommentBuffer {
    fn from_committed(committed: Option<String>) -> Self {
        let draft = committed.clone().unwrap_or_default();
        CommentBuffer { committed, draft }
    }

    /// True when the draft differs from the last confirmed comment.
    pub fn is_dirty(&self) -> bool {
        self.committed.as_deref().unwrap_or("") != self.draft
    }
}

/// One step record plus its comment edit buffer.
#[derive(Debug, Clone)]
pub struct StepEntry {
    pub record: InspectionStep,
    pub comment: CommentBuffer,
}

/// Session-scoped working copy of an inspection and its steps.
#[derive(Debug)]
pub struct InspectionStore {
    pub inspection: Inspection,
    steps: Vec<StepEntry>,
    /// Set when the step fetch failed and the session runs on an empty list.
    pub steps_warning: Option<String>,
}

impl InspectionStore {
    /// Load an inspection and its steps.
    ///
    /// A missing inspection record is fatal. A failed step fetch degrades to
    /// an empty step list with a warning, so the view can still render.
    pub fn load(api: &dyn InspectionApi, inspection_id: u64) -> Result<Self> {
        let inspection = api
            .fetch_inspection(inspection_id)
            .with_context(|| format!("load inspection {inspection_id}"))?;
        let (steps, steps_warning) = match api.fetch_steps(inspection_id) {
            Ok(records) => (records, None),
            Err(err) => {
                tracing::warn!(inspection_id, error = %err, "step fetch failed, continuing with empty list");
                (Vec::new(), Some(err.to_string()))
            }
        };
        Ok(InspectionStore::from_parts(inspection, steps, steps_warning))
    }

    fn from_parts(
        inspection: Inspection,
        records: Vec<InspectionStep>,
        steps_warning: Option<String>,
    ) -> Self {
        let steps = records
            .into_iter()
            .map(|record| StepEntry {
                comment: CommentBuffer::from_committed(record.comment.clone()),
                record,
            })
            .collect();
        InspectionStore {
            inspection,
            steps,
            steps_warning,
        }
    }

    pub fn steps(&self) -> &[StepEntry] {
        &self.steps
    }

    pub fn step(&self, step_id: u64) -> Option<&StepEntry> {
        self.steps.iter().find(|entry| entry.record.id == step_id)
    }

    /// Iterate the persisted step records, for read-only derivations.
    pub fn step_records(&self) -> impl Iterator<Item = &InspectionStep> {
        self.steps.iter().map(|entry| &entry.record)
    }

    /// Replace the inspection record with the server-confirmed one.
    pub fn apply_inspection_update(&mut self, confirmed: Inspection) {
        self.inspection = confirmed;
    }

    /// Replace one step record with the server-confirmed one.
    ///
    /// The draft survives the update unless it matched the previous
    /// committed comment, in which case it follows the confirmed value.
    pub fn apply_step_update(&mut self, confirmed: InspectionStep) {
        let Some(entry) = self
            .steps
            .iter_mut()
            .find(|entry| entry.record.id == confirmed.id)
        else {
            tracing::warn!(step_id = confirmed.id, "confirmed step is not part of this session");
            return;
        };
        let draft_was_clean = !entry.comment.is_dirty();
        entry.comment.committed = confirmed.comment.clone();
        if draft_was_clean {
            entry.comment.draft = confirmed.comment.clone().unwrap_or_default();
        }
        entry.record = confirmed;
    }

    /// Buffer a not-yet-saved comment edit for one step.
    pub fn set_draft(&mut self, step_id: u64, text: &str) -> Result<()> {
        let entry = self
            .steps
            .iter_mut()
            .find(|entry| entry.record.id == step_id)
            .with_context(|| format!("step {step_id} is not part of this inspection"))?;
        entry.comment.draft = text.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StepStatus;

    fn step(id: u64, comment: Option<&str>) -> InspectionStep {
        InspectionStep {
            id,
            status: StepStatus::Passed,
            comment: comment.map(str::to_string),
            photo_path: None,
            checklist_step: None,
        }
    }

    fn store_with(records: Vec<InspectionStep>) -> InspectionStore {
        let inspection = Inspection {
            id: 1,
            title: "Jahresprüfung".to_string(),
            plant_name: "Werk Nord".to_string(),
            status: crate::schema::InspectionStatus::InProgress,
            general_comment: None,
            started_at: None,
            finished_at: None,
        };
        InspectionStore::from_parts(inspection, records, None)
    }

    #[test]
    fn load_seeds_drafts_from_persisted_comments() {
        let store = store_with(vec![step(1, Some("ok")), step(2, None)]);
        assert_eq!(store.step(1).expect("step 1").comment.draft, "ok");
        assert_eq!(store.step(2).expect("step 2").comment.draft, "");
        assert!(!store.step(1).expect("step 1").comment.is_dirty());
    }

    #[test]
    fn dirty_draft_survives_unrelated_step_update() {
        let mut store = store_with(vec![step(1, Some("alt"))]);
        store.set_draft(1, "neuer Text").expect("buffer draft");

        let mut confirmed = step(1, Some("alt"));
        confirmed.status = StepStatus::Failed;
        store.apply_step_update(confirmed);

        let entry = store.step(1).expect("step 1");
        assert_eq!(entry.record.status, StepStatus::Failed);
        assert_eq!(entry.comment.draft, "neuer Text");
        assert_eq!(entry.comment.committed.as_deref(), Some("alt"));
    }

    #[test]
    fn clean_draft_follows_confirmed_comment() {
        let mut store = store_with(vec![step(1, Some("alt"))]);
        store.apply_step_update(step(1, Some("neu")));
        let entry = store.step(1).expect("step 1");
        assert_eq!(entry.comment.draft, "neu");
        assert_eq!(entry.comment.committed.as_deref(), Some("neu"));
    }

    #[test]
    fn draft_for_unknown_step_is_rejected() {
        let mut store = store_with(vec![step(1, None)]);
        assert!(store.set_draft(99, "x").is_err());
    }
}
