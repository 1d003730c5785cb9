//! Form submission contract shared by the server handlers and the browser form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A flat list of submitted `name=value` pairs, in submission order.
///
/// Deserializes directly from `application/x-www-form-urlencoded` bodies.
/// A missing key means the field was not submitted at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(Vec<(String, String)>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and clients.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((name.into(), value.into()));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First value submitted under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Field name → ordered list of human-readable violations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    /// Violations for `field`; empty when the field passed.
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Result of running a form action, as seen by the submitting form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ActionState {
    /// One or more fields failed validation.
    FieldErrors { fields: FieldErrors, message: String },

    /// A single form-level message (mismatch, auth failure, storage failure).
    Message { text: String },

    /// The action completed; the client should follow `redirect_to` if present.
    Ok {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        redirect_to: Option<String>,
    },
}

impl ActionState {
    pub fn field_errors(fields: FieldErrors, message: impl Into<String>) -> Self {
        Self::FieldErrors {
            fields,
            message: message.into(),
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self::Message { text: text.into() }
    }

    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Ok {
            redirect_to: Some(to.into()),
        }
    }

    pub fn done() -> Self {
        Self::Ok { redirect_to: None }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Ok { redirect_to } => redirect_to.as_deref(),
            _ => None,
        }
    }
}
