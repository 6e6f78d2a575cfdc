use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use popform_engine::{CookieError, CookieStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CookieEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// JSON-file cookie jar standing in for browser cookies between wizard
/// runs. Expired entries read as absent; IO failures surface as
/// `CookieError` and are swallowed upstream.
pub struct FileCookieStore {
    path: PathBuf,
}

impl FileCookieStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, CookieEntry>, CookieError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|error| CookieError(error.to_string())),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(error) => Err(CookieError(error.to_string())),
        }
    }

    fn save(&self, entries: &BTreeMap<String, CookieEntry>) -> Result<(), CookieError> {
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|error| CookieError(error.to_string()))?;
        fs::write(&self.path, raw).map_err(|error| CookieError(error.to_string()))
    }
}

impl CookieStore for FileCookieStore {
    fn get(&self, name: &str) -> Result<Option<String>, CookieError> {
        let entries = self.load()?;
        Ok(entries
            .get(name)
            .filter(|entry| entry.expires_at > Utc::now())
            .map(|entry| entry.value.clone()))
    }

    fn set(&self, name: &str, value: &str, expires_days: u32) -> Result<(), CookieError> {
        let mut entries = self.load()?;
        entries.insert(
            name.to_string(),
            CookieEntry {
                value: value.to_string(),
                expires_at: Utc::now() + Duration::days(i64::from(expires_days)),
            },
        );
        self.save(&entries)
    }
}
