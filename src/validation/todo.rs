use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::{as_object, boolean_field, date_field, required_string, string_field, Field, ValidationErrors};

pub const TITLE_MAX_CHARS: usize = 255;

/// Validated body of `POST /todos`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            completed: false,
            due_date: None,
        }
    }

    pub fn from_payload(payload: &Value) -> Result<Self, ValidationErrors> {
        let payload = as_object(payload);
        let mut errors = ValidationErrors::new();

        let title = required_string(&payload, "title", Some(TITLE_MAX_CHARS), &mut errors);
        let description = string_field(&payload, "description", None, &mut errors);
        let completed = boolean_field(&payload, "completed", &mut errors);
        let due_date = date_field(&payload, "due_date", &mut errors);

        // `completed` may be omitted but not sent as null
        if completed == Some(Field::Null) {
            errors.add("completed", "The completed field must be true or false.");
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            title: title.unwrap_or_default(),
            description: description.and_then(|f| f.into_patch()).flatten(),
            completed: matches!(completed, Some(Field::Present(true))),
            due_date: due_date.and_then(|f| f.into_patch()).flatten(),
        })
    }
}

/// Validated body of `PUT/PATCH /todos/{id}`. Absent keys are left alone;
/// `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TodoChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
}

impl TodoChanges {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn from_payload(payload: &Value) -> Result<Self, ValidationErrors> {
        let payload = as_object(payload);
        let mut errors = ValidationErrors::new();

        // Only checked when sent, but once sent it is as strict as on create
        let title = if payload.contains_key("title") {
            required_string(&payload, "title", Some(TITLE_MAX_CHARS), &mut errors)
        } else {
            None
        };
        let description = string_field(&payload, "description", None, &mut errors);
        let completed = boolean_field(&payload, "completed", &mut errors);
        let due_date = date_field(&payload, "due_date", &mut errors);

        if completed == Some(Field::Null) {
            errors.add("completed", "The completed field must be true or false.");
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            title,
            description: description.and_then(Field::into_patch),
            completed: completed.and_then(Field::into_patch).flatten(),
            due_date: due_date.and_then(Field::into_patch),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none() && self.due_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_todo_defaults() {
        let todo = NewTodo::from_payload(&json!({ "title": "Buy milk" })).unwrap();
        assert_eq!(todo, NewTodo::new("Buy milk"));
    }

    #[test]
    fn new_todo_reads_every_field() {
        let todo = NewTodo::from_payload(&json!({
            "title": "  Ship release  ",
            "description": "tag and publish",
            "completed": "1",
            "due_date": "2025-08-15",
            "user_id": 999,
            "id": 5,
        }))
        .unwrap();

        assert_eq!(todo.title, "Ship release");
        assert_eq!(todo.description.as_deref(), Some("tag and publish"));
        assert!(todo.completed);
        assert_eq!(todo.due_date, NaiveDate::from_ymd_opt(2025, 8, 15));
    }

    #[test]
    fn new_todo_requires_title() {
        for payload in [json!({}), json!({ "title": null }), json!({ "title": "" }), json!("nope")] {
            let errors = NewTodo::from_payload(&payload).unwrap_err();
            assert_eq!(errors.fields()["title"], vec!["The title field is required."]);
        }
    }

    #[test]
    fn new_todo_title_length() {
        assert!(NewTodo::from_payload(&json!({ "title": "x".repeat(255) })).is_ok());

        let errors = NewTodo::from_payload(&json!({ "title": "x".repeat(256) })).unwrap_err();
        assert!(errors.contains("title"));
    }

    #[test]
    fn new_todo_collects_all_errors() {
        let errors = NewTodo::from_payload(&json!({
            "title": 12,
            "description": false,
            "completed": "maybe",
            "due_date": "soon",
        }))
        .unwrap_err();

        for field in ["title", "description", "completed", "due_date"] {
            assert!(errors.contains(field), "missing error for {}", field);
        }
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn new_todo_rejects_null_completed() {
        let errors = NewTodo::from_payload(&json!({ "title": "x", "completed": null })).unwrap_err();
        assert!(errors.contains("completed"));
    }

    #[test]
    fn changes_only_carry_supplied_keys() {
        let changes = TodoChanges::from_payload(&json!({ "completed": true })).unwrap();
        assert_eq!(changes, TodoChanges::completed(true));
        assert!(!changes.is_empty());

        assert!(TodoChanges::from_payload(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn changes_can_clear_nullable_fields() {
        let changes = TodoChanges::from_payload(&json!({ "description": null, "due_date": null })).unwrap();
        assert_eq!(changes.description, Some(None));
        assert_eq!(changes.due_date, Some(None));
        assert_eq!(changes.title, None);
    }

    #[test]
    fn changes_cannot_blank_title() {
        let errors = TodoChanges::from_payload(&json!({ "title": null })).unwrap_err();
        assert!(errors.contains("title"));

        let errors = TodoChanges::from_payload(&json!({ "title": "x".repeat(256) })).unwrap_err();
        assert!(errors.contains("title"));
    }

    #[test]
    fn changes_serialize_sparse() {
        let changes = TodoChanges {
            description: Some(None),
            completed: Some(false),
            ..TodoChanges::default()
        };
        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            json!({ "description": null, "completed": false })
        );
    }
}
