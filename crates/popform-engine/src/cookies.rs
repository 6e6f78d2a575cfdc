use std::cell::RefCell;
use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

use popform_schema::{FormSchema, text_value};

/// Cookie backend failure. Always swallowed by the engine; never surfaced
/// to the user and never blocks prefill or submission.
#[derive(Debug, Clone, Error)]
#[error("cookie store: {0}")]
pub struct CookieError(pub String);

/// Small named client-side memory with day-granularity expiration. May be
/// backed by browser cookies, local storage, or any key/value store.
pub trait CookieStore {
    fn get(&self, name: &str) -> Result<Option<String>, CookieError>;
    fn set(&self, name: &str, value: &str, expires_days: u32) -> Result<(), CookieError>;
}

/// In-memory store for tests and builder previews. Ignores expirations.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, name: &str) -> Result<Option<String>, CookieError> {
        Ok(self.entries.borrow().get(name).cloned())
    }

    fn set(&self, name: &str, value: &str, _expires_days: u32) -> Result<(), CookieError> {
        self.entries
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// Prefills `values` from each field's `cookieRead` cookie. Runs before the
/// first visibility pass so conditions on prefilled values resolve on
/// mount. Read failures leave the field untouched.
pub fn apply_prefills(schema: &FormSchema, store: &dyn CookieStore, values: &mut Map<String, Value>) {
    for field in &schema.fields {
        let Some(name) = &field.cookie_read else {
            continue;
        };
        match store.get(name) {
            Ok(Some(stored)) => {
                values.insert(field.id.clone(), Value::String(stored));
            }
            Ok(None) => {}
            Err(error) => log::warn!("cookie read '{name}' failed: {error}"),
        }
    }
}

/// Writes every cookie rule from the submitted values. Best effort: a
/// failed write is logged and skipped.
pub fn persist_rules(schema: &FormSchema, store: &dyn CookieStore, values: &Map<String, Value>) {
    for rule in &schema.cookies {
        let value = text_value(values.get(&rule.field_id));
        if let Err(error) = store.set(&rule.name, &value, rule.expires_days) {
            log::warn!("cookie write '{}' failed: {error}", rule.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> FormSchema {
        serde_json::from_value(json!({
            "title": "Memory",
            "fields": [
                { "id": "field_1", "type": "email", "label": "Email", "cookieRead": "pf_email" }
            ],
            "cookies": [
                { "name": "pf_email", "fieldId": "field_1", "expiresDays": 30 }
            ]
        }))
        .expect("schema json")
    }

    struct FailingStore;

    impl CookieStore for FailingStore {
        fn get(&self, _name: &str) -> Result<Option<String>, CookieError> {
            Err(CookieError("storage disabled".into()))
        }

        fn set(&self, _name: &str, _value: &str, _expires_days: u32) -> Result<(), CookieError> {
            Err(CookieError("storage disabled".into()))
        }
    }

    #[test]
    fn prefill_reads_existing_cookie() {
        let store = MemoryCookieStore::new();
        store.set("pf_email", "a@b.com", 30).unwrap();
        let mut values = Map::new();
        apply_prefills(&schema(), &store, &mut values);
        assert_eq!(values.get("field_1"), Some(&json!("a@b.com")));
    }

    #[test]
    fn persist_writes_the_submitted_value() {
        let store = MemoryCookieStore::new();
        let mut values = Map::new();
        values.insert("field_1".to_string(), json!("a@b.com"));
        persist_rules(&schema(), &store, &values);
        assert_eq!(store.get("pf_email").unwrap().as_deref(), Some("a@b.com"));
    }

    #[test]
    fn store_failures_are_swallowed() {
        let mut values = Map::new();
        apply_prefills(&schema(), &FailingStore, &mut values);
        assert!(values.is_empty());
        persist_rules(&schema(), &FailingStore, &values);
    }
}
