use std::collections::BTreeSet;

use thiserror::Error;

use crate::schema::{FieldType, FormSchema};

/// Non-fatal schema inconsistencies. The engine reports these and degrades
/// per-field instead of refusing the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityWarning {
    #[error("field '{field}' has a condition referencing unknown field '{reference}'")]
    UnknownConditionField { field: String, reference: String },
    #[error("step '{step}' references unknown field '{reference}'")]
    UnknownStepField { step: String, reference: String },
    #[error("field '{field}' is not assigned to any step")]
    UnassignedField { field: String },
    #[error("choice field '{field}' has no options")]
    MissingOptions { field: String },
    #[error("duplicate field id '{field}'")]
    DuplicateFieldId { field: String },
    #[error("cookie rule '{name}' references unknown field '{reference}'")]
    UnknownCookieField { name: String, reference: String },
}

/// Cross-checks the schema's internal references. Every warning maps to a
/// defined degradation: unknown condition references fail closed, unknown
/// step entries are skipped, unassigned fields are unreachable.
pub fn check_integrity(schema: &FormSchema) -> Vec<IntegrityWarning> {
    let mut warnings = Vec::new();

    let mut seen = BTreeSet::new();
    for field in &schema.fields {
        if !seen.insert(field.id.as_str()) {
            warnings.push(IntegrityWarning::DuplicateFieldId {
                field: field.id.clone(),
            });
        }
    }

    for field in &schema.fields {
        if field.kind.has_options()
            && field.options.as_ref().is_none_or(|options| options.is_empty())
        {
            warnings.push(IntegrityWarning::MissingOptions {
                field: field.id.clone(),
            });
        }
        for condition in &field.conditions {
            if schema.field(&condition.when.field_id).is_none() {
                warnings.push(IntegrityWarning::UnknownConditionField {
                    field: field.id.clone(),
                    reference: condition.when.field_id.clone(),
                });
            }
        }
    }

    let mut assigned = BTreeSet::new();
    for (index, step) in schema.steps.iter().enumerate() {
        let step_name = if step.title.is_empty() {
            format!("step {}", index + 1)
        } else {
            step.title.clone()
        };
        for field_id in &step.fields {
            assigned.insert(field_id.as_str());
            if schema.field(field_id).is_none() {
                warnings.push(IntegrityWarning::UnknownStepField {
                    step: step_name.clone(),
                    reference: field_id.clone(),
                });
            }
        }
    }
    // Without explicit steps every field lands in the synthesized page.
    if !schema.steps.is_empty() {
        for field in &schema.fields {
            if field.kind != FieldType::Hidden && !assigned.contains(field.id.as_str()) {
                warnings.push(IntegrityWarning::UnassignedField {
                    field: field.id.clone(),
                });
            }
        }
    }

    for rule in &schema.cookies {
        if schema.field(&rule.field_id).is_none() {
            warnings.push(IntegrityWarning::UnknownCookieField {
                name: rule.name.clone(),
                reference: rule.field_id.clone(),
            });
        }
    }

    warnings
}
