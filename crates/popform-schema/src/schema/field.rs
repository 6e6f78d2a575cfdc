use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input control a field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Tel,
    Number,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
    Hidden,
    /// Unrecognized type labels land here and are never rendered.
    #[serde(other)]
    Unknown,
}

impl FieldType {
    /// Whether the field carries a closed option list.
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Radio | FieldType::Checkbox
        )
    }

    /// Hidden and unknown fields never appear in a step's rendered output.
    pub fn is_renderable(&self) -> bool {
        !matches!(self, FieldType::Hidden | FieldType::Unknown)
    }
}

/// Declared constraints for a field value. `min`, `max`, and `pattern` are
/// reserved keys: parsed so schemas round-trip, not enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Validations {
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<String>,
}

/// Comparison applied by a visibility condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
    /// Unrecognized operators fail closed.
    #[serde(other)]
    Unknown,
}

/// What a matching condition does. Only `show` is defined today; anything
/// else never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConditionAction {
    Show,
    #[default]
    #[serde(other)]
    Unknown,
}

/// The field and comparison a condition tests against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConditionTarget {
    pub field_id: String,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: Value,
}

/// Makes a field's visibility depend on another field's current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Condition {
    #[serde(default)]
    pub action: ConditionAction,
    pub when: ConditionTarget,
}

/// One field of the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Required non-empty for select, radio, and checkbox fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_default")]
    pub validations: Validations,
    /// A field with conditions is hidden until any one of them matches.
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    /// Cookie name to prefill this field from on mount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_read: Option<String>,
}

/// Accepts an explicit JSON `null` where a container default is wanted.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    let value = Option::<T>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
