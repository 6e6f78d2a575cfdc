use serde_json::{Map, Value, json};

use popform_schema::{Field, FormSchema, interpolate, validate_field, validate_step};

fn field(value: Value) -> Field {
    serde_json::from_value(value).expect("field json")
}

fn values(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("object")
}

#[test]
fn required_field_reports_label_message() {
    let email = field(json!({ "id": "field_1", "type": "email", "label": "Email", "required": true }));
    assert_eq!(
        validate_field(&email, None),
        Some("Email is required.".to_string())
    );
    assert_eq!(
        validate_field(&email, Some(&json!(""))),
        Some("Email is required.".to_string())
    );
    assert_eq!(
        validate_field(&email, Some(&Value::Null)),
        Some("Email is required.".to_string())
    );
}

#[test]
fn empty_selection_counts_as_missing() {
    let toppings = field(json!({
        "id": "field_1",
        "type": "checkbox",
        "label": "Toppings",
        "required": true,
        "options": ["cheese", "olives"]
    }));
    assert_eq!(
        validate_field(&toppings, Some(&json!([]))),
        Some("Toppings is required.".to_string())
    );
    assert_eq!(validate_field(&toppings, Some(&json!(["cheese"]))), None);
}

#[test]
fn optional_empty_value_passes() {
    let nickname = field(json!({
        "id": "field_1",
        "type": "text",
        "label": "Nickname",
        "validations": { "minLength": 3 }
    }));
    assert_eq!(validate_field(&nickname, None), None);
    assert_eq!(validate_field(&nickname, Some(&json!(""))), None);
}

#[test]
fn length_bounds_use_declared_limits() {
    let name = field(json!({
        "id": "field_1",
        "type": "text",
        "label": "Name",
        "validations": { "minLength": 2, "maxLength": 5 }
    }));
    assert_eq!(
        validate_field(&name, Some(&json!("A"))),
        Some("Name must be at least 2 characters.".to_string())
    );
    assert_eq!(
        validate_field(&name, Some(&json!("Abcdef"))),
        Some("Name must be at most 5 characters.".to_string())
    );
    assert_eq!(validate_field(&name, Some(&json!("Ada"))), None);
}

#[test]
fn required_wins_over_length_checks() {
    let name = field(json!({
        "id": "field_1",
        "type": "text",
        "label": "Name",
        "required": true,
        "validations": { "minLength": 2 }
    }));
    assert_eq!(
        validate_field(&name, Some(&json!(""))),
        Some("Name is required.".to_string())
    );
}

#[test]
fn email_format_is_checked_when_present() {
    let email = field(json!({ "id": "field_1", "type": "email", "label": "Email" }));
    assert_eq!(
        validate_field(&email, Some(&json!("not-an-email"))),
        Some("Please enter a valid email address.".to_string())
    );
    assert_eq!(
        validate_field(&email, Some(&json!("with space@x.com"))),
        Some("Please enter a valid email address.".to_string())
    );
    assert_eq!(validate_field(&email, Some(&json!("a@b.com"))), None);
}

#[test]
fn reserved_validation_keys_are_not_enforced() {
    let age = field(json!({
        "id": "field_1",
        "type": "number",
        "label": "Age",
        "validations": { "min": 18, "max": 99, "pattern": "^[0-9]+$" }
    }));
    assert_eq!(validate_field(&age, Some(&json!("7"))), None);
    assert_eq!(validate_field(&age, Some(&json!("abc"))), None);
}

#[test]
fn hidden_by_condition_fields_never_block_a_step() {
    let schema: FormSchema = serde_json::from_str(include_str!("fixtures/contact_form.json"))
        .expect("fixture parses");
    let steps = schema.effective_steps();

    // Rating 5 hides the required follow-up textarea entirely.
    let happy = values(json!({ "field_3": "5" }));
    assert!(validate_step(&schema, &steps[1], &happy).is_empty());

    // Rating 2 shows it, so required kicks in.
    let unhappy = values(json!({ "field_3": "2" }));
    let errors = validate_step(&schema, &steps[1], &unhappy);
    assert_eq!(
        errors.get("field_4"),
        Some(&"What went wrong? is required.".to_string())
    );
}

#[test]
fn hidden_type_fields_are_never_validated() {
    let schema: FormSchema = serde_json::from_value(json!({
        "title": "With tracking",
        "fields": [
            { "id": "field_1", "type": "text", "label": "Name", "required": true },
            { "id": "utm", "type": "hidden", "label": "Source", "required": true }
        ],
        "steps": [ { "title": "", "fields": ["field_1", "utm"] } ]
    }))
    .expect("schema json");
    let steps = schema.effective_steps();
    let errors = validate_step(&schema, &steps[0], &values(json!({ "field_1": "Ada" })));
    assert!(errors.is_empty());
}

#[test]
fn interpolate_substitutes_submitted_values() {
    let submitted = values(json!({ "field_1": "Ada", "field_2": "a@b.com" }));
    assert_eq!(interpolate("Thanks {field_1}!", &submitted), "Thanks Ada!");
    assert_eq!(
        interpolate("{field_1} <{field_2}> {missing}", &submitted),
        "Ada <a@b.com> "
    );
    assert_eq!(interpolate("No tokens here", &submitted), "No tokens here");
}
