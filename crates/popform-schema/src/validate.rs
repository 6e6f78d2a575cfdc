use std::collections::BTreeMap;

use regex::Regex;
use serde_json::{Map, Value};

use crate::condition::resolve_visibility;
use crate::schema::{Field, FieldType, FormSchema, Step};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Validates one field value against its declared constraints. Returns the
/// first failing check's message. Check order: required, minLength,
/// maxLength, email format.
pub fn validate_field(field: &Field, value: Option<&Value>) -> Option<String> {
    if field.required && is_empty(value) {
        return Some(format!("{} is required.", field.label));
    }
    if is_empty(value) {
        return None;
    }
    if let Some(Value::String(text)) = value {
        let length = text.chars().count() as u64;
        if let Some(min_length) = field.validations.min_length
            && length < min_length
        {
            return Some(format!(
                "{} must be at least {} characters.",
                field.label, min_length
            ));
        }
        if let Some(max_length) = field.validations.max_length
            && length > max_length
        {
            return Some(format!(
                "{} must be at most {} characters.",
                field.label, max_length
            ));
        }
        if field.kind == FieldType::Email
            && let Ok(email) = Regex::new(EMAIL_PATTERN)
            && !email.is_match(text)
        {
            return Some("Please enter a valid email address.".to_string());
        }
    }
    None
}

fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}

/// Validates every currently visible, renderable field of one step.
/// Fields hidden by conditions never block progression, required or not.
pub fn validate_step(
    schema: &FormSchema,
    step: &Step,
    values: &Map<String, Value>,
) -> BTreeMap<String, String> {
    let visibility = resolve_visibility(schema, values);
    let mut errors = BTreeMap::new();
    for field in &schema.fields {
        if !step.fields.contains(&field.id) {
            continue;
        }
        if !field.kind.is_renderable() {
            continue;
        }
        if !visibility.get(&field.id).copied().unwrap_or(true) {
            continue;
        }
        if let Some(message) = validate_field(field, values.get(&field.id)) {
            errors.insert(field.id.clone(), message);
        }
    }
    errors
}
