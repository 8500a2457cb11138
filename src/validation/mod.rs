// Request-schema validation
//
// Each request body is read from a raw JSON object into an explicit, typed
// struct. Every rule that fails records a message against its field, and all
// failures are returned together so a client can show them next to its inputs.

pub mod auth;
pub mod todo;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub use auth::{Credentials, ProfileChanges, Registration};
pub use todo::{NewTodo, TodoChanges};

/// Field name -> messages, in the shape returned under `errors`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: FieldErrors,
    #[serde(skip)]
    first: Option<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        if self.first.is_none() {
            self.first = Some(message.clone());
        }
        self.errors.entry(field.to_string()).or_default().push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn fields(&self) -> &FieldErrors {
        &self.errors
    }

    /// First message, plus how many others were hidden behind it.
    pub fn summary(&self) -> String {
        let first = self.first.clone().unwrap_or_else(|| "The given data was invalid.".to_string());
        match self.len().saturating_sub(1) {
            0 => first,
            1 => format!("{} (and 1 more error)", first),
            n => format!("{} (and {} more errors)", first, n),
        }
    }

    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}

impl std::error::Error for ValidationErrors {}

/// A value read from an optional key. `Null` is distinct from `Missing` so
/// that a partial update can clear a nullable column.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Field<T> {
    Missing,
    Null,
    Present(T),
}

impl<T> Field<T> {
    /// `None` when the key was absent, `Some(None)` when it was null.
    pub(crate) fn into_patch(self) -> Option<Option<T>> {
        match self {
            Field::Missing => None,
            Field::Null => Some(None),
            Field::Present(v) => Some(Some(v)),
        }
    }
}

/// Treats anything other than a JSON object as an empty body.
pub(crate) fn as_object(payload: &Value) -> Map<String, Value> {
    match payload {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    }
}

pub(crate) fn label(field: &str) -> String {
    field.replace('_', " ")
}

/// Reads a string, trimming it and folding empty strings into null.
pub(crate) fn string_field(
    payload: &Map<String, Value>,
    field: &str,
    max_chars: Option<usize>,
    errors: &mut ValidationErrors,
) -> Option<Field<String>> {
    match payload.get(field) {
        None => Some(Field::Missing),
        Some(Value::Null) => Some(Field::Null),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Some(Field::Null);
            }
            if let Some(max) = max_chars {
                if trimmed.chars().count() > max {
                    errors.add(
                        field,
                        format!("The {} field must not be greater than {} characters.", label(field), max),
                    );
                    return None;
                }
            }
            Some(Field::Present(trimmed.to_string()))
        }
        Some(_) => {
            errors.add(field, format!("The {} field must be a string.", label(field)));
            None
        }
    }
}

/// Like `string_field`, but null and missing are both a "required" failure.
pub(crate) fn required_string(
    payload: &Map<String, Value>,
    field: &str,
    max_chars: Option<usize>,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match string_field(payload, field, max_chars, errors)? {
        Field::Present(s) => Some(s),
        Field::Missing | Field::Null => {
            errors.add(field, format!("The {} field is required.", label(field)));
            None
        }
    }
}

pub(crate) fn boolean_field(
    payload: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<Field<bool>> {
    match payload.get(field) {
        None => Some(Field::Missing),
        Some(Value::Null) => Some(Field::Null),
        Some(value) => match parse_bool(value) {
            Some(b) => Some(Field::Present(b)),
            None => {
                errors.add(field, format!("The {} field must be true or false.", label(field)));
                None
            }
        },
    }
}

pub(crate) fn date_field(
    payload: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<Field<NaiveDate>> {
    match payload.get(field) {
        None => Some(Field::Missing),
        Some(Value::Null) => Some(Field::Null),
        Some(Value::String(s)) if s.trim().is_empty() => Some(Field::Null),
        Some(Value::String(s)) => match parse_date(s.trim()) {
            Some(date) => Some(Field::Present(date)),
            None => {
                errors.add(field, format!("The {} field must be a valid date.", label(field)));
                None
            }
        },
        Some(_) => {
            errors.add(field, format!("The {} field must be a valid date.", label(field)));
            None
        }
    }
}

/// Accepts `true`/`false`, `0`/`1` and their string forms.
pub fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.as_str() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Accepts a calendar date or a date-time, keeping only the date part.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_counts_hidden_errors() {
        let mut errors = ValidationErrors::new();
        assert_eq!(errors.summary(), "The given data was invalid.");

        errors.add("title", "The title field is required.");
        assert_eq!(errors.summary(), "The title field is required.");

        errors.add("completed", "The completed field must be true or false.");
        assert_eq!(errors.summary(), "The title field is required. (and 1 more error)");

        errors.add("due_date", "The due date field must be a valid date.");
        assert_eq!(errors.summary(), "The title field is required. (and 2 more errors)");
    }

    #[test]
    fn serializes_as_field_map() {
        let errors = ValidationErrors::single("title", "The title field is required.");
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({ "title": ["The title field is required."] })
        );
    }

    #[test]
    fn bool_forms() {
        assert_eq!(parse_bool(&json!(true)), Some(true));
        assert_eq!(parse_bool(&json!(0)), Some(false));
        assert_eq!(parse_bool(&json!("1")), Some(true));
        assert_eq!(parse_bool(&json!("false")), Some(false));
        assert_eq!(parse_bool(&json!(2)), None);
        assert_eq!(parse_bool(&json!("yes")), None);
        assert_eq!(parse_bool(&json!([])), None);
    }

    #[test]
    fn date_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 8, 15);
        assert_eq!(parse_date("2025-08-15"), expected);
        assert_eq!(parse_date("2025-08-15T10:30:00Z"), expected);
        assert_eq!(parse_date("2025-08-15 10:30:00"), expected);
        assert_eq!(parse_date("2025-02-30"), None);
        assert_eq!(parse_date("next tuesday"), None);
    }

    #[test]
    fn empty_string_reads_as_null() {
        let payload = as_object(&json!({ "description": "   " }));
        let mut errors = ValidationErrors::new();
        assert_eq!(string_field(&payload, "description", None, &mut errors), Some(Field::Null));
        assert!(errors.is_empty());
    }
}
