use std::collections::BTreeMap;

use serde_json::{Map, Value};

use popform_schema::{FormSchema, Step, validate_step};

/// Outcome of a forward navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAdvance {
    /// Moved to the given step index.
    Moved(usize),
    /// Validation passed but there is no further step to move to.
    AtLastStep,
    /// The active step has validation errors; position unchanged.
    Blocked(BTreeMap<String, String>),
}

/// Wizard pagination state machine. Forward navigation is gated on the
/// active step's visible fields validating clean; backward navigation is
/// unconditional.
#[derive(Debug, Clone)]
pub struct StepEngine {
    steps: Vec<Step>,
    current: usize,
}

impl StepEngine {
    pub fn new(schema: &FormSchema) -> Self {
        Self {
            steps: schema.effective_steps(),
            current: 0,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.steps.len()
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.steps.len()
    }

    pub fn current_step(&self) -> &Step {
        &self.steps[self.current]
    }

    /// Validates the active step and advances on success.
    pub fn next(&mut self, schema: &FormSchema, values: &Map<String, Value>) -> StepAdvance {
        let errors = validate_step(schema, self.current_step(), values);
        if !errors.is_empty() {
            return StepAdvance::Blocked(errors);
        }
        if self.is_last() {
            return StepAdvance::AtLastStep;
        }
        self.current += 1;
        StepAdvance::Moved(self.current)
    }

    /// Moves back without re-validating; errors on the step being left are
    /// preserved by the caller, not re-checked here.
    pub fn back(&mut self) -> usize {
        self.current = self.current.saturating_sub(1);
        self.current
    }

    pub fn validate_current(
        &self,
        schema: &FormSchema,
        values: &Map<String, Value>,
    ) -> BTreeMap<String, String> {
        validate_step(schema, self.current_step(), values)
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}
