use std::rc::Rc;

use serde_json::{Map, Value};
use thiserror::Error;

use popform_schema::{Field, FormSchema, IntegrityWarning, check_integrity, resolve_visibility};

use crate::cookies::{CookieStore, apply_prefills, persist_rules};
use crate::dispatch::{PostSubmitEffect, dispatch};
use crate::session::{SessionState, Snapshot, SubmissionStatus};
use crate::steps::{StepAdvance, StepEngine};

/// Failure reported by the submit transport collaborator.
#[derive(Debug, Clone, Error)]
#[error("submission failed: {0}")]
pub struct TransportError(pub String);

/// Injected network boundary. Owns the real call; the engine only needs
/// the outcome.
pub trait SubmitTransport {
    fn submit(&mut self, values: &Map<String, Value>) -> Result<(), TransportError>;
}

/// Result of asking the engine to start a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStart {
    /// Validation passed; send this payload, then call `complete_submit`.
    Started(Map<String, Value>),
    /// The active step has validation errors, recorded in the session.
    Blocked,
    /// Submission is only available on the last step.
    NotLastStep,
    /// A submission is already in flight; this call is a no-op.
    InFlight,
    /// The session already submitted successfully.
    AlreadySubmitted,
}

/// Composition root for one form session. Owns the mutable state and wires
/// condition evaluation, step navigation, cookie memory, and post-submit
/// dispatch together; renderers consume snapshots and feed events back in.
pub struct FormEngine {
    schema: FormSchema,
    steps: StepEngine,
    session: SessionState,
    cookies: Rc<dyn CookieStore>,
    warnings: Vec<IntegrityWarning>,
}

impl FormEngine {
    /// Builds a session: integrity checks first, then cookie prefills, so
    /// conditions depending on prefilled values resolve before the first
    /// render.
    pub fn new(schema: FormSchema, cookies: Rc<dyn CookieStore>) -> Self {
        let warnings = check_integrity(&schema);
        for warning in &warnings {
            log::warn!("schema integrity: {warning}");
        }
        let mut session = SessionState::default();
        apply_prefills(&schema, cookies.as_ref(), &mut session.values);
        let steps = StepEngine::new(&schema);
        Self {
            schema,
            steps,
            session,
            cookies,
            warnings,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn warnings(&self) -> &[IntegrityWarning] {
        &self.warnings
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.session.values
    }

    pub fn value(&self, field_id: &str) -> Option<&Value> {
        self.session.values.get(field_id)
    }

    pub fn submission(&self) -> SubmissionStatus {
        self.session.submission
    }

    pub fn current_step(&self) -> usize {
        self.steps.current_index()
    }

    pub fn total_steps(&self) -> usize {
        self.steps.total()
    }

    pub fn is_last_step(&self) -> bool {
        self.steps.is_last()
    }

    /// Applies a value edit and clears the field's standing error.
    pub fn set_value(&mut self, field_id: &str, value: Value) {
        self.session.values.insert(field_id.to_string(), value);
        self.session.errors.remove(field_id);
    }

    /// Visible, renderable fields of the active step, in schema order.
    pub fn visible_fields(&self) -> Vec<&Field> {
        let visibility = resolve_visibility(&self.schema, &self.session.values);
        let step = self.steps.current_step();
        self.schema
            .fields
            .iter()
            .filter(|field| step.fields.contains(&field.id))
            .filter(|field| field.kind.is_renderable())
            .filter(|field| visibility.get(&field.id).copied().unwrap_or(true))
            .collect()
    }

    /// Validates the active step and advances on success. Returns whether
    /// the step changed; failures record per-field errors.
    pub fn next(&mut self) -> bool {
        match self.steps.next(&self.schema, &self.session.values) {
            StepAdvance::Moved(_) => true,
            StepAdvance::AtLastStep => false,
            StepAdvance::Blocked(errors) => {
                self.session.errors.extend(errors);
                false
            }
        }
    }

    /// Moves back one step without re-validating. Standing errors for the
    /// step being left are preserved but not blocking.
    pub fn back(&mut self) -> usize {
        self.steps.back()
    }

    /// Starts a submission from the last step. On success the session is
    /// `submitting` until `complete_submit` resolves it; repeated calls
    /// while in flight are no-ops.
    pub fn submit(&mut self) -> SubmitStart {
        match self.session.submission {
            SubmissionStatus::Submitting => return SubmitStart::InFlight,
            SubmissionStatus::Submitted => return SubmitStart::AlreadySubmitted,
            SubmissionStatus::Idle | SubmissionStatus::Failed => {}
        }
        if !self.steps.is_last() {
            return SubmitStart::NotLastStep;
        }
        let errors = self.steps.validate_current(&self.schema, &self.session.values);
        if !errors.is_empty() {
            self.session.errors.extend(errors);
            return SubmitStart::Blocked;
        }
        self.session.submission = SubmissionStatus::Submitting;
        SubmitStart::Started(self.session.values.clone())
    }

    /// Completes the in-flight submission. On success the configured
    /// cookies are written (best effort) and the post-submit effect is
    /// resolved; on failure values are preserved for retry.
    pub fn complete_submit(
        &mut self,
        outcome: Result<(), TransportError>,
    ) -> Option<PostSubmitEffect> {
        if self.session.submission != SubmissionStatus::Submitting {
            return None;
        }
        match outcome {
            Ok(()) => {
                self.session.submission = SubmissionStatus::Submitted;
                persist_rules(&self.schema, self.cookies.as_ref(), &self.session.values);
                Some(dispatch(&self.schema, &self.session.values))
            }
            Err(_) => {
                self.session.submission = SubmissionStatus::Failed;
                None
            }
        }
    }

    /// Drives both submission halves through the injected transport.
    /// Returns the post-submit effect on success; the session status tells
    /// blocked from failed.
    pub fn submit_with(&mut self, transport: &mut dyn SubmitTransport) -> Option<PostSubmitEffect> {
        match self.submit() {
            SubmitStart::Started(values) => {
                let outcome = transport.submit(&values);
                self.complete_submit(outcome)
            }
            _ => None,
        }
    }

    /// Read-only view for renderers; rebuilt after every mutating call.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            visible_fields: self.visible_fields().into_iter().cloned().collect(),
            values: self.session.values.clone(),
            errors: self.session.errors.clone(),
            current_step: self.steps.current_index(),
            total_steps: self.steps.total(),
            step_title: self.steps.current_step().title.clone(),
            submission: self.session.submission,
        }
    }

    /// Discards the session and re-applies cookie prefills, as a fresh
    /// mount would.
    pub fn reset(&mut self) {
        self.session = SessionState::default();
        apply_prefills(&self.schema, self.cookies.as_ref(), &mut self.session.values);
        self.steps.reset();
    }
}
