use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::condition::text_value;

const TOKEN_PATTERN: &str = r"\{([A-Za-z0-9_]+)\}";

/// Replaces every `{field_id}` token with the submitted value for that
/// field. Tokens naming a field with no value substitute an empty string.
pub fn interpolate(template: &str, values: &Map<String, Value>) -> String {
    let Ok(token) = Regex::new(TOKEN_PATTERN) else {
        return template.to_string();
    };
    token
        .replace_all(template, |caps: &Captures<'_>| text_value(values.get(&caps[1])))
        .into_owned()
}
