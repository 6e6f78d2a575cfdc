use serde_json::{Map, Value};

use crate::schema::{Condition, ConditionAction, ConditionOperator, Field, FormSchema};

pub type VisibilityMap = std::collections::BTreeMap<String, bool>;

/// Coerces a current input value the way the storefront runtime does:
/// absent and null become `""`, `false` is falsy-stringified to `""`, and
/// arrays join their scalar items with commas.
pub fn text_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::Bool(false)) => String::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| text_value(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => String::new(),
    }
}

fn numeric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

fn condition_holds(condition: &Condition, values: &Map<String, Value>) -> bool {
    if condition.action != ConditionAction::Show {
        return false;
    }
    let current = text_value(values.get(&condition.when.field_id));
    let target = text_value(Some(&condition.when.value));
    match condition.when.operator {
        ConditionOperator::Equals => current == target,
        ConditionOperator::NotEquals => current != target,
        ConditionOperator::Contains => current.contains(&target),
        // Ordered comparisons require both sides to parse as numbers.
        ConditionOperator::GreaterThan => match (numeric(&current), numeric(&target)) {
            (Some(current), Some(target)) => current > target,
            _ => false,
        },
        ConditionOperator::LessThan => match (numeric(&current), numeric(&target)) {
            (Some(current), Some(target)) => current < target,
            _ => false,
        },
        ConditionOperator::Unknown => false,
    }
}

/// Visibility contract for a single field: no conditions means always
/// visible; with conditions, any single match shows the field.
pub fn is_visible(field: &Field, values: &Map<String, Value>) -> bool {
    field.conditions.is_empty()
        || field
            .conditions
            .iter()
            .any(|condition| condition_holds(condition, values))
}

/// Resolves visibility for every field of the schema. Conditions that
/// reference a field id the schema does not define evaluate false.
pub fn resolve_visibility(schema: &FormSchema, values: &Map<String, Value>) -> VisibilityMap {
    schema
        .fields
        .iter()
        .map(|field| {
            let visible = field.conditions.is_empty()
                || field.conditions.iter().any(|condition| {
                    schema.field(&condition.when.field_id).is_some()
                        && condition_holds(condition, values)
                });
            (field.id.clone(), visible)
        })
        .collect()
}
