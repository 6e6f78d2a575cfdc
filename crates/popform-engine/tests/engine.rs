use std::rc::Rc;

use serde_json::{Map, Value, json};

use popform_engine::{
    CookieStore, FormEngine, MemoryCookieStore, Navigator, PostSubmitEffect, SubmissionStatus,
    SubmitStart, SubmitTransport, TransportError, build_render_payload, render_json_ui, render_text,
};
use popform_schema::FormSchema;

fn schema(value: Value) -> FormSchema {
    serde_json::from_value(value).expect("schema json")
}

fn engine(value: Value) -> FormEngine {
    FormEngine::new(schema(value), Rc::new(MemoryCookieStore::new()))
}

/// Transport that records payloads and answers from a script.
#[derive(Default)]
struct RecordingTransport {
    calls: Vec<Map<String, Value>>,
    fail: bool,
}

impl SubmitTransport for RecordingTransport {
    fn submit(&mut self, values: &Map<String, Value>) -> Result<(), TransportError> {
        self.calls.push(values.clone());
        if self.fail {
            Err(TransportError("503".into()))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
struct RecordingNavigator {
    urls: Vec<String>,
}

impl Navigator for RecordingNavigator {
    fn redirect_to(&mut self, url: &str) {
        self.urls.push(url.to_string());
    }
}

fn single_email_form() -> Value {
    json!({
        "title": "Newsletter",
        "fields": [
            { "id": "field_1", "type": "email", "label": "Email", "required": true }
        ]
    })
}

fn rating_feedback_form() -> Value {
    json!({
        "title": "Feedback",
        "fields": [
            { "id": "field_2", "type": "select", "label": "Rating", "required": true,
              "options": ["1", "2", "3", "4", "5"] },
            { "id": "field_3", "type": "textarea", "label": "Details", "required": true,
              "conditions": [
                  { "action": "show", "when": { "fieldId": "field_2", "operator": "less_than", "value": "4" } }
              ] }
        ],
        "steps": [
            { "title": "Rate", "fields": ["field_2"] },
            { "title": "Tell us more", "fields": ["field_3"] }
        ]
    })
}

#[test]
fn empty_required_email_blocks_submit() {
    let mut engine = engine(single_email_form());
    assert_eq!(engine.submit(), SubmitStart::Blocked);
    assert_eq!(
        engine.snapshot().errors.get("field_1"),
        Some(&"Email is required.".to_string())
    );
    assert_eq!(engine.submission(), SubmissionStatus::Idle);
}

#[test]
fn editing_a_field_clears_its_error() {
    let mut engine = engine(single_email_form());
    engine.submit();
    assert!(!engine.snapshot().errors.is_empty());
    engine.set_value("field_1", json!("a@b.com"));
    assert!(engine.snapshot().errors.is_empty());
}

#[test]
fn conditional_step_two_field_follows_the_rating() {
    let mut engine = engine(rating_feedback_form());
    engine.set_value("field_2", json!("2"));
    assert!(engine.next());
    assert_eq!(engine.current_step(), 1);
    let visible: Vec<_> = engine.visible_fields().iter().map(|f| f.id.clone()).collect();
    assert_eq!(visible, vec!["field_3"]);

    // A happy rating hides the required follow-up; submit succeeds
    // without it.
    engine.back();
    engine.set_value("field_2", json!("5"));
    assert!(engine.next());
    assert!(engine.visible_fields().is_empty());

    let mut transport = RecordingTransport::default();
    let effect = engine.submit_with(&mut transport);
    assert!(effect.is_some());
    assert_eq!(engine.submission(), SubmissionStatus::Submitted);
    assert_eq!(transport.calls.len(), 1);
}

#[test]
fn hidden_required_field_blocks_when_visible() {
    let mut engine = engine(rating_feedback_form());
    engine.set_value("field_2", json!("2"));
    engine.next();
    assert_eq!(engine.submit(), SubmitStart::Blocked);
    assert_eq!(
        engine.snapshot().errors.get("field_3"),
        Some(&"Details is required.".to_string())
    );
}

#[test]
fn next_on_last_step_does_not_advance() {
    let mut engine = engine(single_email_form());
    engine.set_value("field_1", json!("a@b.com"));
    assert!(!engine.next());
    assert_eq!(engine.current_step(), 0);
}

#[test]
fn submit_is_only_available_on_the_last_step() {
    let mut engine = engine(rating_feedback_form());
    assert_eq!(engine.submit(), SubmitStart::NotLastStep);
}

#[test]
fn double_submit_while_in_flight_is_a_no_op() {
    let mut engine = engine(single_email_form());
    engine.set_value("field_1", json!("a@b.com"));

    let first = engine.submit();
    assert!(matches!(first, SubmitStart::Started(_)));
    assert_eq!(engine.submission(), SubmissionStatus::Submitting);
    assert_eq!(engine.submit(), SubmitStart::InFlight);

    let effect = engine.complete_submit(Ok(()));
    assert!(effect.is_some());
    assert_eq!(engine.submit(), SubmitStart::AlreadySubmitted);
}

#[test]
fn transport_failure_preserves_values_for_retry() {
    let mut engine = engine(single_email_form());
    engine.set_value("field_1", json!("a@b.com"));

    let mut transport = RecordingTransport {
        fail: true,
        ..Default::default()
    };
    assert!(engine.submit_with(&mut transport).is_none());
    assert_eq!(engine.submission(), SubmissionStatus::Failed);
    assert_eq!(engine.value("field_1"), Some(&json!("a@b.com")));

    transport.fail = false;
    let effect = engine.submit_with(&mut transport);
    assert!(effect.is_some());
    assert_eq!(engine.submission(), SubmissionStatus::Submitted);
    assert_eq!(transport.calls.len(), 2);
}

#[test]
fn personalized_message_uses_submitted_values() {
    let mut engine = engine(json!({
        "title": "Hello",
        "fields": [ { "id": "field_1", "type": "text", "label": "Name", "required": true } ],
        "postSubmit": {
            "action": "personalized_message",
            "personalizationTemplate": "Thanks {field_1}!"
        }
    }));
    engine.set_value("field_1", json!("Ada"));
    let mut transport = RecordingTransport::default();
    let effect = engine.submit_with(&mut transport).expect("effect");
    assert_eq!(effect, PostSubmitEffect::ShowMessage("Thanks Ada!".to_string()));
}

#[test]
fn redirect_with_data_navigates_with_encoded_query() {
    let mut engine = engine(json!({
        "title": "Redirect",
        "fields": [
            { "id": "field_1", "type": "text", "label": "Name" },
            { "id": "field_2", "type": "email", "label": "Email" }
        ],
        "postSubmit": {
            "action": "redirect_with_data",
            "redirectUrl": "https://x.com/thanks",
            "appendDataToUrl": true
        }
    }));
    engine.set_value("field_1", json!("Ada"));
    engine.set_value("field_2", json!("a@b.com"));

    let mut transport = RecordingTransport::default();
    let effect = engine.submit_with(&mut transport).expect("effect");
    let mut navigator = RecordingNavigator::default();
    effect.execute(&mut navigator);
    assert_eq!(
        navigator.urls,
        vec!["https://x.com/thanks?field_1=Ada&field_2=a%40b.com"]
    );
}

#[test]
fn cookie_write_failure_does_not_fail_the_submission() {
    struct BrokenStore;

    impl popform_engine::CookieStore for BrokenStore {
        fn get(&self, _name: &str) -> Result<Option<String>, popform_engine::CookieError> {
            Err(popform_engine::CookieError("storage disabled".into()))
        }

        fn set(
            &self,
            _name: &str,
            _value: &str,
            _expires_days: u32,
        ) -> Result<(), popform_engine::CookieError> {
            Err(popform_engine::CookieError("storage disabled".into()))
        }
    }

    let mut engine = FormEngine::new(
        schema(json!({
            "title": "Remembered",
            "fields": [
                { "id": "field_1", "type": "email", "label": "Email", "required": true,
                  "cookieRead": "pf_email" }
            ],
            "cookies": [ { "name": "pf_email", "fieldId": "field_1" } ]
        })),
        Rc::new(BrokenStore),
    );
    engine.set_value("field_1", json!("a@b.com"));
    let mut transport = RecordingTransport::default();
    assert!(engine.submit_with(&mut transport).is_some());
    assert_eq!(engine.submission(), SubmissionStatus::Submitted);
}

#[test]
fn cookie_round_trip_prefills_a_fresh_session() {
    let store = Rc::new(MemoryCookieStore::new());
    let form = json!({
        "title": "Remembered",
        "fields": [
            { "id": "field_1", "type": "email", "label": "Email", "required": true,
              "cookieRead": "pf_email" }
        ],
        "cookies": [
            { "name": "pf_email", "fieldId": "field_1", "expiresDays": 30 }
        ]
    });

    let mut first = FormEngine::new(schema(form.clone()), store.clone());
    first.set_value("field_1", json!("ada@lovelace.dev"));
    let mut transport = RecordingTransport::default();
    assert!(first.submit_with(&mut transport).is_some());

    let second = FormEngine::new(schema(form), store);
    assert_eq!(second.value("field_1"), Some(&json!("ada@lovelace.dev")));
}

#[test]
fn prefilled_values_drive_first_render_visibility() {
    let store = Rc::new(MemoryCookieStore::new());
    store.set("pf_plan", "pro", 30).unwrap();

    let engine = FormEngine::new(
        schema(json!({
            "title": "Plan",
            "fields": [
                { "id": "field_1", "type": "hidden", "label": "Plan", "cookieRead": "pf_plan" },
                { "id": "field_2", "type": "text", "label": "Team name",
                  "conditions": [
                      { "action": "show", "when": { "fieldId": "field_1", "operator": "equals", "value": "pro" } }
                  ] }
            ]
        })),
        store,
    );
    let visible: Vec<_> = engine.visible_fields().iter().map(|f| f.id.clone()).collect();
    assert_eq!(visible, vec!["field_2"]);
}

#[test]
fn integrity_warnings_do_not_prevent_a_session() {
    let engine = engine(json!({
        "title": "Broken",
        "fields": [
            { "id": "field_1", "type": "text", "label": "Name",
              "conditions": [
                  { "action": "show", "when": { "fieldId": "ghost", "operator": "equals", "value": "" } }
              ] }
        ],
        "steps": [ { "title": "Main", "fields": ["field_1", "missing"] } ]
    }));
    assert_eq!(engine.warnings().len(), 2);
    assert!(engine.visible_fields().is_empty());
}

#[test]
fn reset_discards_the_session_and_reapplies_prefills() {
    let store = Rc::new(MemoryCookieStore::new());
    store.set("pf_email", "a@b.com", 30).unwrap();
    let mut engine = FormEngine::new(
        schema(json!({
            "title": "Reset",
            "fields": [
                { "id": "field_1", "type": "email", "label": "Email", "cookieRead": "pf_email" },
                { "id": "field_2", "type": "text", "label": "Name" }
            ]
        })),
        store,
    );
    engine.set_value("field_2", json!("Ada"));
    engine.reset();
    assert_eq!(engine.value("field_2"), None);
    assert_eq!(engine.value("field_1"), Some(&json!("a@b.com")));
    assert_eq!(engine.submission(), SubmissionStatus::Idle);
}

#[test]
fn snapshot_feeds_the_renderers() {
    let mut engine = engine(rating_feedback_form());
    engine.set_value("field_2", json!("3"));

    let payload = build_render_payload(&engine);
    assert_eq!(payload.form_title, "Feedback");
    assert!(payload.is_multi_step());

    let text = render_text(&payload);
    assert!(text.contains("Step 1 of 2: Rate"));
    assert!(text.contains(" - field_2 (Rating) [required] = 3"));

    let ui = render_json_ui(&payload);
    assert_eq!(ui["formTitle"], "Feedback");
    assert_eq!(ui["step"]["total"], 2);
    assert_eq!(ui["fields"][0]["id"], "field_2");
    assert_eq!(ui["fields"][0]["type"], "select");
}
