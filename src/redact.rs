//! Masks sensitive fields before they reach any diagnostic output.

use serde_json::{Map, Value};

/// Replacement token for denylisted values.
pub const MASK: &str = "***";

/// Case-insensitive key denylists for redaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedactionRules {
    /// Keys masked inside request/response bodies and query params.
    pub body_keys: Vec<String>,
    /// Keys masked inside header maps.
    pub header_keys: Vec<String>,
}

impl Default for RedactionRules {
    fn default() -> Self {
        Self {
            body_keys: ["api_key", "authorization", "password", "token"]
                .map(str::to_owned)
                .into(),
            header_keys: ["authorization", "cookie", "set-cookie"]
                .map(str::to_owned)
                .into(),
        }
    }
}

fn is_denied(key: &str, denylist: &[String]) -> bool {
    denylist.iter().any(|denied| denied.eq_ignore_ascii_case(key))
}

/// Returns a copy of `value` with every denylisted mapping key masked.
///
/// Walks arrays and objects recursively; scalars pass through unchanged. The
/// input is never mutated.
pub fn redact_value(value: &Value, denylist: &[String]) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| redact_value(item, denylist))
                .collect(),
        ),
        Value::Object(entries) => {
            let mut result = Map::with_capacity(entries.len());
            for (key, entry) in entries {
                if is_denied(key, denylist) {
                    result.insert(key.clone(), Value::String(MASK.to_owned()));
                } else {
                    result.insert(key.clone(), redact_value(entry, denylist));
                }
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

/// Builds a redacted JSON object from a flat header list.
pub fn redact_headers(headers: &[(String, String)], denylist: &[String]) -> Value {
    let mut result = Map::with_capacity(headers.len());
    for (name, value) in headers {
        if is_denied(name, denylist) {
            result.insert(name.clone(), Value::String(MASK.to_owned()));
        } else {
            result.insert(name.clone(), Value::String(value.clone()));
        }
    }
    Value::Object(result)
}
