use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use popform_schema::Field;

/// Submission lifecycle for one form session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Submitted,
    Failed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Submitting => "submitting",
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Failed => "failed",
        }
    }
}

/// Mutable per-render state owned by the engine. Created on mount, mutated
/// only through engine operations, discarded on reset.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub values: Map<String, Value>,
    pub errors: BTreeMap<String, String>,
    pub submission: SubmissionStatus,
}

/// Read-only view handed to renderers after every mutating operation.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Visible, renderable fields of the active step, in schema order.
    pub visible_fields: Vec<Field>,
    pub values: Map<String, Value>,
    pub errors: BTreeMap<String, String>,
    pub current_step: usize,
    pub total_steps: usize,
    pub step_title: String,
    pub submission: SubmissionStatus,
}
