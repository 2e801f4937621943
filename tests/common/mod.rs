//! Shared test infrastructure: an in-memory inspection service.

use anyhow::{bail, Result};
use std::cell::RefCell;
use std::collections::HashSet;

use plantcheck::api::InspectionApi;
use plantcheck::schema::{
    ChecklistStepRef, Inspection, InspectionStatus, InspectionStep, Role, StepStatus, UserRecord,
};

/// In-memory stand-in for the remote service.
///
/// Mutations persist into the mock's own state, mirroring a server that
/// stores the write and echoes the persisted record. Individual operations
/// can be switched to fail to simulate transport errors.
pub struct MockService {
    inspection: RefCell<Inspection>,
    steps: RefCell<Vec<InspectionStep>>,
    failures: RefCell<HashSet<&'static str>>,
    calls: RefCell<Vec<String>>,
}

impl MockService {
    pub fn new(inspection: Inspection, steps: Vec<InspectionStep>) -> Self {
        MockService {
            inspection: RefCell::new(inspection),
            steps: RefCell::new(steps),
            failures: RefCell::new(HashSet::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Make one operation fail until further notice.
    pub fn fail(&self, operation: &'static str) {
        self.failures.borrow_mut().insert(operation);
    }

    pub fn calls_to(&self, operation: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|name| name.as_str() == operation)
            .count()
    }

    fn begin_call(&self, operation: &'static str) -> Result<()> {
        self.calls.borrow_mut().push(operation.to_string());
        if self.failures.borrow().contains(operation) {
            bail!("simulated transport error in {operation}");
        }
        Ok(())
    }
}

impl InspectionApi for MockService {
    fn fetch_inspection(&self, inspection_id: u64) -> Result<Inspection> {
        self.begin_call("fetch_inspection")?;
        let inspection = self.inspection.borrow();
        if inspection.id != inspection_id {
            bail!("inspection {inspection_id} not found");
        }
        Ok(inspection.clone())
    }

    fn fetch_steps(&self, _inspection_id: u64) -> Result<Vec<InspectionStep>> {
        self.begin_call("fetch_steps")?;
        Ok(self.steps.borrow().clone())
    }

    fn update_inspection_status(
        &self,
        inspection_id: u64,
        status: &InspectionStatus,
    ) -> Result<Inspection> {
        self.begin_call("update_inspection_status")?;
        let mut inspection = self.inspection.borrow_mut();
        if inspection.id != inspection_id {
            bail!("inspection {inspection_id} not found");
        }
        inspection.status = status.clone();
        Ok(inspection.clone())
    }

    fn update_step_status(&self, step_id: u64, status: &StepStatus) -> Result<InspectionStep> {
        self.begin_call("update_step_status")?;
        let mut steps = self.steps.borrow_mut();
        let step = steps
            .iter_mut()
            .find(|step| step.id == step_id)
            .ok_or_else(|| anyhow::anyhow!("step {step_id} not found"))?;
        step.status = status.clone();
        Ok(step.clone())
    }

    fn update_step_comment(&self, step_id: u64, comment: &str) -> Result<InspectionStep> {
        self.begin_call("update_step_comment")?;
        let mut steps = self.steps.borrow_mut();
        let step = steps
            .iter_mut()
            .find(|step| step.id == step_id)
            .ok_or_else(|| anyhow::anyhow!("step {step_id} not found"))?;
        step.comment = Some(comment.to_string());
        Ok(step.clone())
    }

    fn upload_step_photo(
        &self,
        step_id: u64,
        file_name: &str,
        _bytes: &[u8],
    ) -> Result<InspectionStep> {
        self.begin_call("upload_step_photo")?;
        let mut steps = self.steps.borrow_mut();
        let step = steps
            .iter_mut()
            .find(|step| step.id == step_id)
            .ok_or_else(|| anyhow::anyhow!("step {step_id} not found"))?;
        step.photo_path = Some(format!("step{step_id}_{file_name}"));
        Ok(step.clone())
    }

    fn login(&self, username: &str, _password: &str) -> Result<UserRecord> {
        self.begin_call("login")?;
        Ok(UserRecord {
            id: 1,
            username: username.to_string(),
            role: Role::Inspector,
        })
    }
}

pub fn inspection(status: InspectionStatus) -> Inspection {
    Inspection {
        id: 12,
        title: "Jahresprüfung Kessel".to_string(),
        plant_name: "Werk Nord".to_string(),
        status,
        general_comment: None,
        started_at: None,
        finished_at: None,
    }
}

pub fn step(id: u64, status: StepStatus, comment: Option<&str>) -> InspectionStep {
    InspectionStep {
        id,
        status,
        comment: comment.map(str::to_string),
        photo_path: None,
        checklist_step: Some(ChecklistStepRef {
            id,
            description: format!("Prüfpunkt {id}"),
        }),
    }
}
