use serde_json::{Map, Value, json};

use popform_schema::FieldType;

use crate::engine::FormEngine;
use crate::session::SubmissionStatus;

/// Describes a single field for render outputs.
#[derive(Debug, Clone)]
pub struct RenderField {
    pub id: String,
    pub label: String,
    pub kind: FieldType,
    pub required: bool,
    pub placeholder: Option<String>,
    pub options: Option<Vec<String>>,
    pub current_value: Option<Value>,
    pub error: Option<String>,
}

/// Collected payload used by both text and JSON renderers.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub form_title: String,
    pub step_title: String,
    pub current_step: usize,
    pub total_steps: usize,
    pub submit_label: String,
    pub submission: SubmissionStatus,
    pub fields: Vec<RenderField>,
}

impl RenderPayload {
    pub fn is_multi_step(&self) -> bool {
        self.total_steps > 1
    }
}

/// Builds the renderer payload from the engine's current snapshot.
pub fn build_render_payload(engine: &FormEngine) -> RenderPayload {
    let snapshot = engine.snapshot();
    let fields = snapshot
        .visible_fields
        .iter()
        .map(|field| RenderField {
            id: field.id.clone(),
            label: field.label.clone(),
            kind: field.kind,
            required: field.required,
            placeholder: field.placeholder.clone(),
            options: field.options.clone(),
            current_value: snapshot.values.get(&field.id).cloned(),
            error: snapshot.errors.get(&field.id).cloned(),
        })
        .collect::<Vec<_>>();

    RenderPayload {
        form_title: engine.schema().title.clone(),
        step_title: snapshot.step_title,
        current_step: snapshot.current_step,
        total_steps: snapshot.total_steps,
        submit_label: engine.schema().settings.submit_button_text().to_string(),
        submission: snapshot.submission,
        fields,
    }
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json_ui(payload: &RenderPayload) -> Value {
    let fields = payload
        .fields
        .iter()
        .map(|field| {
            let mut map = Map::new();
            map.insert("id".into(), Value::String(field.id.clone()));
            map.insert("label".into(), Value::String(field.label.clone()));
            map.insert(
                "type".into(),
                serde_json::to_value(field.kind).unwrap_or(Value::Null),
            );
            map.insert("required".into(), Value::Bool(field.required));
            if let Some(placeholder) = &field.placeholder {
                map.insert("placeholder".into(), Value::String(placeholder.clone()));
            }
            if let Some(options) = &field.options {
                map.insert(
                    "options".into(),
                    Value::Array(options.iter().cloned().map(Value::String).collect()),
                );
            }
            if let Some(current_value) = &field.current_value {
                map.insert("currentValue".into(), current_value.clone());
            }
            if let Some(error) = &field.error {
                map.insert("error".into(), Value::String(error.clone()));
            }
            Value::Object(map)
        })
        .collect::<Vec<_>>();

    json!({
        "formTitle": payload.form_title,
        "step": {
            "index": payload.current_step,
            "total": payload.total_steps,
            "title": payload.step_title,
        },
        "submitLabel": payload.submit_label,
        "submissionStatus": payload.submission.as_str(),
        "fields": fields,
    })
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &RenderPayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Form: {}", payload.form_title));
    if payload.is_multi_step() {
        let mut step_line = format!(
            "Step {} of {}",
            payload.current_step + 1,
            payload.total_steps
        );
        if !payload.step_title.is_empty() {
            step_line.push_str(&format!(": {}", payload.step_title));
        }
        lines.push(step_line);
    }
    lines.push(format!("Status: {}", payload.submission.as_str()));

    lines.push("Visible fields:".to_string());
    for field in &payload.fields {
        let mut entry = format!(" - {} ({})", field.id, field.label);
        if field.required {
            entry.push_str(" [required]");
        }
        if let Some(current_value) = &field.current_value {
            entry.push_str(&format!(" = {}", value_to_display(current_value)));
        }
        lines.push(entry);
        if let Some(error) = &field.error {
            lines.push(format!("   ! {}", error));
        }
    }

    lines.join("\n")
}

fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}
