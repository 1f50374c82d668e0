//! API error types.
//!
//! Error bodies are Django-style objects keyed by field name, for example
//! `{"status": "error", "password": "Invalid password."}`. Values may also be
//! arrays of strings; those are joined with a space.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// Keys that describe the response itself rather than an input field.
const NON_FIELD_KEYS: &[&str] = &["status", "message", "detail"];

/// Per-field error messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Extracts field messages from an error body.
    ///
    /// Non-object bodies and non-string values yield nothing.
    pub fn from_body(body: &Value) -> Self {
        let Some(object) = body.as_object() else {
            return Self::default();
        };

        let fields = object
            .iter()
            .filter(|(key, _)| !NON_FIELD_KEYS.contains(&key.as_str()))
            .filter_map(|(key, value)| message_text(value).map(|msg| (key.clone(), msg)))
            .collect();
        Self(fields)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Reads the general (non-field) message of an error body, if any.
pub(crate) fn general_message(body: &Value) -> Option<String> {
    ["detail", "message"]
        .iter()
        .find_map(|key| body.get(*key).and_then(message_text))
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        }
        _ => None,
    }
}

/// Errors returned by [`crate::api::ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, DNS, TLS).
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned HTTP {status}{}", describe(.message.as_deref(), .fields))]
    Status {
        status: u16,
        fields: FieldErrors,
        message: Option<String>,
    },

    /// A success response whose body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status of the failure, when the server responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Builds a status error from a raw response body.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<Value>(body).unwrap_or(Value::Null);
        ApiError::Status {
            status,
            fields: FieldErrors::from_body(&parsed),
            message: general_message(&parsed),
        }
    }
}

fn describe(message: Option<&str>, fields: &FieldErrors) -> String {
    if let Some(message) = message {
        return format!(": {message}");
    }
    if fields.is_empty() {
        return String::new();
    }
    let joined: Vec<String> = fields.iter().map(|(k, v)| format!("{k}: {v}")).collect();
    format!(" ({})", joined.join("; "))
}
