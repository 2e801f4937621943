//! Wire types for the inspection service JSON contract.
//!
//! Field names follow the service's camelCase JSON. Status enums keep
//! unknown wire values verbatim so display code can fall back to the raw
//! string instead of failing the whole decode.

use serde::{Deserialize, Serialize};

/// One inspection record as served by `GET /inspections/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub id: u64,
    pub title: String,
    pub plant_name: String,
    pub status: InspectionStatus,
    #[serde(default)]
    pub general_comment: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
}

/// One step result within an inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionStep {
    pub id: u64,
    pub status: StepStatus,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub photo_path: Option<String>,
    #[serde(default)]
    pub checklist_step: Option<ChecklistStepRef>,
}

impl InspectionStep {
    /// Display description from the originating checklist step.
    pub fn description(&self) -> &str {
        self.checklist_step
            .as_ref()
            .map(|step| step.description.as_str())
            .unwrap_or("")
    }
}

/// Read-only reference to the checklist step a result originates from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistStepRef {
    pub id: u64,
    pub description: String,
}

/// Lifecycle status of an inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InspectionStatus {
    Planned,
    InProgress,
    Completed,
    /// Unknown wire value, kept verbatim for display.
    Other(String),
}

impl InspectionStatus {
    pub fn as_wire(&self) -> &str {
        match self {
            InspectionStatus::Planned => "PLANNED",
            InspectionStatus::InProgress => "IN_PROGRESS",
            InspectionStatus::Completed => "COMPLETED",
            InspectionStatus::Other(raw) => raw,
        }
    }

    /// Fixed display label table; unknown values render verbatim.
    pub fn label(&self) -> &str {
        match self {
            InspectionStatus::Planned => "Geplant",
            InspectionStatus::InProgress => "In Bearbeitung",
            InspectionStatus::Completed => "Abgeschlossen",
            InspectionStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for InspectionStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PLANNED" => InspectionStatus::Planned,
            "IN_PROGRESS" => InspectionStatus::InProgress,
            "COMPLETED" => InspectionStatus::Completed,
            _ => InspectionStatus::Other(raw),
        }
    }
}

impl From<InspectionStatus> for String {
    fn from(status: InspectionStatus) -> Self {
        status.as_wire().to_string()
    }
}

/// Outcome of a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StepStatus {
    Passed,
    Failed,
    NotApplicable,
    /// Unknown wire value, kept verbatim for display.
    Other(String),
}

impl StepStatus {
    pub fn as_wire(&self) -> &str {
        match self {
            StepStatus::Passed => "PASSED",
            StepStatus::Failed => "FAILED",
            StepStatus::NotApplicable => "NOT_APPLICABLE",
            StepStatus::Other(raw) => raw,
        }
    }

    /// Fixed display label table; unknown values render verbatim.
    pub fn label(&self) -> &str {
        match self {
            StepStatus::Passed => "Erfüllt",
            StepStatus::Failed => "Nicht erfüllt",
            StepStatus::NotApplicable => "N.A.",
            StepStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for StepStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PASSED" => StepStatus::Passed,
            "FAILED" => StepStatus::Failed,
            "NOT_APPLICABLE" => StepStatus::NotApplicable,
            _ => StepStatus::Other(raw),
        }
    }
}

impl From<StepStatus> for String {
    fn from(status: StepStatus) -> Self {
        status.as_wire().to_string()
    }
}

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Inspector,
    Admin,
}

/// Authenticated user record returned by the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_status_round_trips_known_values() {
        for wire in ["PASSED", "FAILED", "NOT_APPLICABLE"] {
            let status = StepStatus::from(wire.to_string());
            assert_eq!(status.as_wire(), wire);
        }
    }

    #[test]
    fn unknown_statuses_display_verbatim() {
        let status = StepStatus::from("SKIPPED".to_string());
        assert_eq!(status.label(), "SKIPPED");
        let status = InspectionStatus::from("ARCHIVED".to_string());
        assert_eq!(status.label(), "ARCHIVED");
    }

    #[test]
    fn inspection_decodes_with_optional_fields_absent() {
        let json = r#"{"id":3,"title":"Pumpenhaus","plantName":"Werk Nord","status":"PLANNED"}"#;
        let inspection: Inspection = serde_json::from_str(json).expect("decode inspection");
        assert_eq!(inspection.status, InspectionStatus::Planned);
        assert!(inspection.general_comment.is_none());
    }

    #[test]
    fn step_decodes_checklist_reference() {
        let json = r#"{"id":7,"status":"FAILED","comment":"Leck","checklistStep":{"id":2,"description":"Ventil prüfen"}}"#;
        let step: InspectionStep = serde_json::from_str(json).expect("decode step");
        assert_eq!(step.description(), "Ventil prüfen");
        assert_eq!(step.status.label(), "Nicht erfüllt");
    }
}
