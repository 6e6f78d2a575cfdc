use std::collections::BTreeMap;

use serde_json::Value;

use popform_engine::{Listener, PostSubmitEffect};
use popform_schema::{Field, FieldType, FormSchema};

/// Controls which bits of state the wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: prompts only.
    Clean,
    /// Verbose output: step status, trigger simulation notes, field ids.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Prints prompts and progress for the terminal wizard.
pub struct WizardPresenter {
    verbosity: Verbosity,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn show_header(&self, schema: &FormSchema) {
        println!("Form: {}", schema.title);
    }

    /// Reports the display trigger being simulated for this terminal run.
    pub fn show_trigger(&self, label: &str, listener: Listener) {
        println!("Display: {label}");
        if self.verbosity.is_verbose() {
            let event = match listener {
                Listener::Timer => "delay elapsed",
                Listener::Scroll => "scroll threshold crossed",
                Listener::ExitIntent => "exit intent",
            };
            println!("(simulating host event: {event})");
        }
    }

    pub fn show_step(&self, index: usize, total: usize, title: &str) {
        if total <= 1 {
            return;
        }
        let mut line = format!("Step {} of {}", index + 1, total);
        if !title.is_empty() {
            line.push_str(&format!(": {title}"));
        }
        println!("{line}");
    }

    pub fn show_prompt(&self, field: &Field, index: usize, total: usize, current: Option<&Value>) {
        let mut line = format!("{}/{} {}", index, total, field.label);
        if field.required {
            line.push_str(" *");
        }
        if let Some(hint) = kind_hint(field) {
            line.push(' ');
            line.push_str(&hint);
        }
        println!("{line}");
        if let Some(placeholder) = &field.placeholder {
            println!("  e.g. {placeholder}");
        }
        if let Some(current) = current {
            println!("  [current: {}]", popform_schema::text_value(Some(current)));
        }
        if self.verbosity.is_verbose() {
            println!("  [field: {}]", field.id);
        }
    }

    pub fn show_errors(&self, errors: &BTreeMap<String, String>) {
        for message in errors.values() {
            eprintln!("! {message}");
        }
    }

    pub fn show_effect(&self, effect: &PostSubmitEffect) {
        match effect {
            PostSubmitEffect::ShowMessage(text) => println!("{text}"),
            PostSubmitEffect::Redirect { acknowledgment, .. } => println!("{acknowledgment}"),
        }
    }
}

/// Parses terminal input into the value shape the engine stores for the
/// field: checkboxes collect comma-separated selections, everything else
/// stays a string.
pub fn parse_value(field: &Field, input: &str) -> Value {
    match field.kind {
        FieldType::Checkbox => Value::Array(
            input
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        ),
        _ => Value::String(input.to_string()),
    }
}

fn kind_hint(field: &Field) -> Option<String> {
    let options = || {
        field
            .options
            .as_deref()
            .unwrap_or_default()
            .join("/")
    };
    match field.kind {
        FieldType::Select | FieldType::Radio => Some(format!("({})", options())),
        FieldType::Checkbox => Some(format!("(comma-separated: {})", options())),
        FieldType::Email => Some("(email)".to_string()),
        FieldType::Tel => Some("(phone)".to_string()),
        FieldType::Number => Some("(number)".to_string()),
        FieldType::Date => Some("(YYYY-MM-DD)".to_string()),
        _ => None,
    }
}
