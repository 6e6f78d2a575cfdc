mod store;
mod wizard;

use std::collections::BTreeMap;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;
use std::{fs, process};

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value, json};

use popform_engine::{
    DisplayController, FormEngine, Listener, MemoryCookieStore, Navigator, PostSubmitEffect,
    SubmitTransport, TransportError, build_render_payload, display_label, render_json_ui,
    render_text,
};
use popform_schema::{FormSchema, PostSubmitAction, check_integrity, validate_step};
use store::FileCookieStore;
use wizard::{Verbosity, WizardPresenter, parse_value};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Schema-driven form wizard CLI",
    long_about = "Runs, validates, and inspects declarative multi-step form schemas."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Run a form schema as an interactive terminal wizard.
    Wizard {
        /// Path to the form schema JSON.
        #[arg(long, value_name = "SCHEMA")]
        form: PathBuf,
        /// Cookie jar file used for prefill and post-submit memory.
        #[arg(long, value_name = "FILE")]
        cookies: Option<PathBuf>,
        /// Optional JSON file with initial values.
        #[arg(long, value_name = "VALUES")]
        values: Option<PathBuf>,
        /// Show trigger simulation and field ids.
        #[arg(long, alias = "debug")]
        verbose: bool,
    },
    /// Validate a values file against a schema.
    Validate {
        #[arg(long, value_name = "SCHEMA")]
        form: PathBuf,
        #[arg(long, value_name = "VALUES")]
        values: PathBuf,
    },
    /// Summarize a schema: fields, steps, display, post-submit, warnings.
    Inspect {
        #[arg(long, value_name = "SCHEMA")]
        form: PathBuf,
    },
    /// Print the renderer snapshot for a value set.
    Render {
        #[arg(long, value_name = "SCHEMA")]
        form: PathBuf,
        #[arg(long, value_name = "VALUES")]
        values: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Print the JSON Schema for form documents.
    Schema,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Wizard {
            form,
            cookies,
            values,
            verbose,
        } => run_wizard(form, cookies, values, verbose),
        Command::Validate { form, values } => run_validate(form, values),
        Command::Inspect { form } => run_inspect(form),
        Command::Render {
            form,
            values,
            format,
        } => run_render(form, values, format),
        Command::Schema => run_schema(),
    }
}

fn load_schema(path: &Path) -> CliResult<FormSchema> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("failed to read {}: {error}", path.display()))?;
    let schema = serde_json::from_str(&raw)
        .map_err(|error| format!("failed to parse {}: {error}", path.display()))?;
    Ok(schema)
}

fn load_values(path: &Path) -> CliResult<Map<String, Value>> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("failed to read {}: {error}", path.display()))?;
    let values: Value = serde_json::from_str(&raw)
        .map_err(|error| format!("failed to parse {}: {error}", path.display()))?;
    values
        .as_object()
        .cloned()
        .ok_or_else(|| format!("{} must hold a JSON object", path.display()).into())
}

/// Submit transport for terminal runs: accepts every payload. The real
/// storefront transport posts to the form endpoint instead.
struct AcceptingTransport;

impl SubmitTransport for AcceptingTransport {
    fn submit(&mut self, _values: &Map<String, Value>) -> Result<(), TransportError> {
        println!("Submitting…");
        Ok(())
    }
}

/// Navigation collaborator for terminal runs.
struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn redirect_to(&mut self, url: &str) {
        println!("Redirecting to {url}");
    }
}

fn run_wizard(
    form: PathBuf,
    cookies: Option<PathBuf>,
    values: Option<PathBuf>,
    verbose: bool,
) -> CliResult<()> {
    let schema = load_schema(&form)?;
    let cookie_path = cookies.unwrap_or_else(|| PathBuf::from(".popform-cookies.json"));
    let store = Rc::new(FileCookieStore::new(cookie_path));
    let mut engine = FormEngine::new(schema, store);
    if let Some(path) = values {
        for (field_id, value) in load_values(&path)? {
            engine.set_value(&field_id, value);
        }
    }

    let presenter = WizardPresenter::new(Verbosity::from_verbose(verbose));
    presenter.show_header(engine.schema());

    let mut controller = DisplayController::new(engine.schema().display.clone());
    if let Some(listener) = controller.attach() {
        if let Some(label) = display_label(&engine.schema().display) {
            presenter.show_trigger(&label, listener);
        }
        // Feed the host event the listener waits for, so the terminal
        // session proceeds without a browser.
        match listener {
            Listener::Timer => {
                controller.elapsed(Duration::from_secs(engine.schema().display.delay_seconds));
            }
            Listener::Scroll => controller.scrolled(1.0),
            Listener::ExitIntent => controller.exit_intent(),
        }
    }

    let stdin = io::stdin();
    loop {
        let snapshot = engine.snapshot();
        presenter.show_step(snapshot.current_step, snapshot.total_steps, &snapshot.step_title);

        let fields = snapshot.visible_fields;
        let total = fields.len();
        for (index, field) in fields.iter().enumerate() {
            presenter.show_prompt(field, index + 1, total, engine.value(&field.id));
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                return Ok(());
            }
            let input = line.trim();
            if !input.is_empty() {
                engine.set_value(&field.id, parse_value(field, input));
            }
        }

        if engine.is_last_step() {
            let mut transport = AcceptingTransport;
            match engine.submit_with(&mut transport) {
                Some(effect) => {
                    controller.submitted();
                    presenter.show_effect(&effect);
                    if let PostSubmitEffect::Redirect { .. } = effect {
                        effect.execute(&mut StdoutNavigator);
                    }
                    return Ok(());
                }
                None => presenter.show_errors(&engine.snapshot().errors),
            }
        } else if !engine.next() {
            presenter.show_errors(&engine.snapshot().errors);
        }
    }
}

fn run_validate(form: PathBuf, values: PathBuf) -> CliResult<()> {
    let schema = load_schema(&form)?;
    let values = load_values(&values)?;

    let mut errors = BTreeMap::new();
    for step in schema.effective_steps() {
        errors.extend(validate_step(&schema, &step, &values));
    }
    let warnings: Vec<String> = check_integrity(&schema)
        .iter()
        .map(|warning| warning.to_string())
        .collect();

    let report = json!({
        "valid": errors.is_empty(),
        "errors": errors,
        "warnings": warnings,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report["valid"].as_bool().unwrap_or(false) {
        process::exit(1);
    }
    Ok(())
}

fn run_inspect(form: PathBuf) -> CliResult<()> {
    let schema = load_schema(&form)?;
    println!("Form: {}", schema.title);

    let steps = schema.effective_steps();
    println!("Steps: {}", steps.len());
    for (index, step) in steps.iter().enumerate() {
        let title = if step.title.is_empty() {
            "(untitled)"
        } else {
            &step.title
        };
        println!("  {}. {} ({} fields)", index + 1, title, step.fields.len());
    }

    println!("Fields:");
    for field in &schema.fields {
        let mut entry = format!(" - {} ({}) {}", field.id, kind_label(field), field.label);
        if field.required {
            entry.push_str(" [required]");
        }
        if !field.conditions.is_empty() {
            entry.push_str(&format!(" [{} condition(s)]", field.conditions.len()));
        }
        if let Some(cookie) = &field.cookie_read {
            entry.push_str(&format!(" [prefill: {cookie}]"));
        }
        println!("{entry}");
    }

    let display = display_label(&schema.display).unwrap_or_else(|| "Inline".to_string());
    println!("Display: {display}");
    println!("Post-submit: {}", action_label(schema.post_submit.action));
    for rule in &schema.cookies {
        println!(
            "Cookie: {} <- {} ({} days)",
            rule.name, rule.field_id, rule.expires_days
        );
    }
    for warning in check_integrity(&schema) {
        println!("Warning: {warning}");
    }
    Ok(())
}

fn run_render(form: PathBuf, values: Option<PathBuf>, format: RenderMode) -> CliResult<()> {
    let schema = load_schema(&form)?;
    let mut engine = FormEngine::new(schema, Rc::new(MemoryCookieStore::new()));
    if let Some(path) = values {
        for (field_id, value) in load_values(&path)? {
            engine.set_value(&field_id, value);
        }
    }
    let payload = build_render_payload(&engine);
    match format {
        RenderMode::Text => println!("{}", render_text(&payload)),
        RenderMode::Json => println!("{}", serde_json::to_string_pretty(&render_json_ui(&payload))?),
    }
    Ok(())
}

fn run_schema() -> CliResult<()> {
    let schema = schemars::schema_for!(FormSchema);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn kind_label(field: &popform_schema::Field) -> String {
    serde_json::to_value(field.kind)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

fn action_label(action: PostSubmitAction) -> &'static str {
    match action {
        PostSubmitAction::Message | PostSubmitAction::Unknown => "show message",
        PostSubmitAction::Redirect => "redirect",
        PostSubmitAction::RedirectWithData => "redirect with data",
        PostSubmitAction::PersonalizedMessage => "personalized message",
    }
}
