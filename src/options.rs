//! Accessors for the legacy participant-options blob.
//!
//! The blob is loosely typed: booleans may be native or stringified, any
//! field may be null or blank, and multi-value fields were flattened into
//! comma-joined strings. All of that leniency lives here so the statement
//! builders only ever see clean values.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

pub const EXTERNAL_IDENTIFIER: &str = "EXTERNAL_IDENTIFIER";
pub const SHARING_SCOPE: &str = "SHARING_SCOPE";
pub const TIME_ZONE: &str = "TIME_ZONE";
pub const EMAIL_NOTIFICATIONS: &str = "EMAIL_NOTIFICATIONS";
pub const LANGUAGES: &str = "LANGUAGES";
pub const DATA_GROUPS: &str = "DATA_GROUPS";

/// Read-only view over one account's legacy options document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct LegacyOptions {
    fields: Map<String, Value>,
}

impl LegacyOptions {
    /// The document used when no record exists for a health code.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the raw JSON text stored in the record's `data` attribute.
    ///
    /// Genuinely invalid JSON is an error and surfaces as that account's
    /// per-account failure. Valid JSON that is not an object behaves as an
    /// empty document.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(raw).context("Invalid JSON in legacy options record")?;
        Ok(match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        })
    }

    /// The field's text value, or `None` for a missing key, a JSON null, or
    /// a value that is blank after trimming.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// A native JSON boolean is returned as-is. A missing, null, or blank
    /// value yields `default`. Any other string is `true` iff it equals
    /// `"true"` exactly; every other non-empty string is `false`.
    pub fn get_boolean(&self, key: &str, default: bool) -> bool {
        match self.fields.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) if !s.trim().is_empty() => s == "true",
            _ => default,
        }
    }

    /// The field's comma-joined value split into tokens, each trimmed, with
    /// blank tokens dropped. Source order is preserved and duplicates are
    /// kept. Missing or null fields yield an empty list.
    pub fn get_list(&self, key: &str) -> Vec<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|token| !token.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}
