//! Step-level mutations gated by the parent inspection status.
//!
//! Every mutation re-derives editability from the inspection's current
//! status; the gate cannot be toggled independently. Local step state is
//! replaced only with server-confirmed records, so a failed write needs no
//! rollback.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::api::InspectionApi;
use crate::schema::{InspectionStatus, StepStatus};
use crate::store::InspectionStore;

/// Editor for the steps of one inspection session.
pub struct StepEditor<'a> {
    api: &'a dyn InspectionApi,
    store: &'a mut InspectionStore,
}

impl<'a> StepEditor<'a> {
    pub fn new(api: &'a dyn InspectionApi, store: &'a mut InspectionStore) -> Self {
        StepEditor { api, store }
    }

    /// Steps are editable only while the inspection is in progress.
    pub fn is_editable(&self) -> bool {
        self.store.inspection.status == InspectionStatus::InProgress
    }

    fn require_editable(&self) -> Result<()> {
        if !self.is_editable() {
            bail!(
                "inspection is {}; steps are read-only",
                self.store.inspection.status.label()
            );
        }
        Ok(())
    }

    fn require_step(&self, step_id: u64) -> Result<()> {
        if self.store.step(step_id).is_none() {
            bail!("step {step_id} is not part of this inspection");
        }
        Ok(())
    }

    /// Set the status of one step through the remote service.
    pub fn set_status(&mut self, step_id: u64, status: StepStatus) -> Result<()> {
        self.require_editable()?;
        self.require_step(step_id)?;
        tracing::info!(step_id, status = status.as_wire(), "updating step status");
        let confirmed = self.api.update_step_status(step_id, &status)?;
        self.store.apply_step_update(confirmed);
        Ok(())
    }

    /// Buffer a comment edit without saving it.
    pub fn edit_comment(&mut self, step_id: u64, text: &str) -> Result<()> {
        self.require_editable()?;
        self.store.set_draft(step_id, text)
    }

    /// Save the buffered comment draft for one step.
    ///
    /// On success the committed comment becomes the draft; on failure both
    /// the committed value and the persisted record stay exactly as before.
    pub fn save_comment(&mut self, step_id: u64) -> Result<()> {
        self.require_editable()?;
        let entry = self
            .store
            .step(step_id)
            .with_context(|| format!("step {step_id} is not part of this inspection"))?;
        if !entry.comment.is_dirty() {
            tracing::debug!(step_id, "saving an unchanged comment");
        }
        let draft = entry.comment.draft.clone();
        tracing::info!(step_id, "saving step comment");
        let confirmed = self.api.update_step_comment(step_id, &draft)?;
        self.store.apply_step_update(confirmed);
        Ok(())
    }

    /// Upload a photo file and attach the returned reference to the step.
    ///
    /// The file is sent as-is; there is no client-side type or size check
    /// beyond it being readable.
    pub fn attach_photo(&mut self, step_id: u64, file: &Path) -> Result<()> {
        self.require_editable()?;
        self.require_step(step_id)?;
        let bytes =
            fs::read(file).with_context(|| format!("read photo file {}", file.display()))?;
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        tracing::info!(step_id, file = %file.display(), size = bytes.len(), "uploading step photo");
        let confirmed = self.api.upload_step_photo(step_id, &file_name, &bytes)?;
        self.store.apply_step_update(confirmed);
        Ok(())
    }
}
