//! Form payloads and field coercions
//!
//! A [`FormPayload`] is the set of field values captured from a form at the
//! moment it is submitted. Every value is a string, exactly as a form field
//! would hold it; coercion to numbers and lists happens when a request body
//! is built (see [`FormKind::build_request`](crate::FormKind::build_request)).

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, StudyBuddyError};

/// Field coerced to an integer by the dataset forms
pub const NUM_SUBJECTS: &str = "num_subjects";
/// Comma-separated field coerced to a list by the raw dataset form
pub const DOMAINS: &str = "domains";

/// Field name to string value mapping captured from a form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    fields: BTreeMap<String, String>,
}

impl FormPayload {
    /// Create an empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field, returning the previous value if any
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(name.into(), value.into())
    }

    /// Get a field value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Flatten a serializable struct into form fields.
    ///
    /// Scalars become their textual form, lists are joined with `", "` (so a
    /// `domains` list survives the round trip through the comma coercion) and
    /// `null` fields are skipped. Nested objects, and list items that contain
    /// a comma, are rejected.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| StudyBuddyError::ParseError(e.to_string()))?;

        let Value::Object(map) = value else {
            return Err(StudyBuddyError::ParseError(
                "form values must serialize to an object".to_string(),
            ));
        };

        let mut payload = Self::new();
        for (name, value) in map {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Array(items) => list_text(&name, &items)?,
                other => scalar_text(&other).ok_or_else(|| {
                    StudyBuddyError::invalid_field(&name, "nested objects are not form values")
                })?,
            };
            payload.insert(name, text);
        }
        Ok(payload)
    }
}

fn list_text(name: &str, items: &[Value]) -> Result<String> {
    let mut texts = Vec::with_capacity(items.len());
    for item in items {
        let text = scalar_text(item)
            .ok_or_else(|| StudyBuddyError::invalid_field(name, "list items must be scalars"))?;
        if text.contains(',') {
            return Err(StudyBuddyError::invalid_field(
                name,
                format!("list item '{}' contains ','", text),
            ));
        }
        texts.push(text);
    }
    Ok(texts.join(", "))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormPayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = Self::new();
        payload.extend(iter);
        payload
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for FormPayload {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

/// Parse a subject count as a base-10 integer.
///
/// Surrounding whitespace is ignored; anything else that is not an integer
/// is rejected rather than sent to the server.
pub fn parse_num_subjects(raw: &str) -> Result<i64> {
    raw.trim().parse::<i64>().map_err(|_| {
        StudyBuddyError::invalid_field(NUM_SUBJECTS, format!("'{}' is not a base-10 integer", raw))
    })
}

/// Split a comma-separated domain list, trimming each entry and dropping
/// empty ones. Order is preserved.
pub fn split_domains(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from)
        .collect()
}
