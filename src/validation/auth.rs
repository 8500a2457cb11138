use serde_json::{Map, Value};

use super::{as_object, required_string, ValidationErrors};

pub const NAME_MAX_CHARS: usize = 255;
pub const EMAIL_MAX_CHARS: usize = 255;
pub const PASSWORD_MIN_CHARS: usize = 8;

/// Validated body of `POST /auth/register`. Email uniqueness needs the
/// user store and is checked by the auth service.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationErrors> {
        let payload = as_object(payload);
        let mut errors = ValidationErrors::new();

        let name = required_string(&payload, "name", Some(NAME_MAX_CHARS), &mut errors);
        let email = required_email(&payload, &mut errors);
        let password = password_field(&payload, &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
        })
    }
}

/// Validated body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationErrors> {
        let payload = as_object(payload);
        let mut errors = ValidationErrors::new();

        let email = required_email(&payload, &mut errors);
        let password = match payload.get("password") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::String(_)) | Some(Value::Null) | None => {
                errors.add("password", "The password field is required.");
                None
            }
            Some(_) => {
                errors.add("password", "The password field must be a string.");
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
        })
    }
}

/// Validated body of `PUT /auth/user`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl ProfileChanges {
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationErrors> {
        let payload = as_object(payload);
        let mut errors = ValidationErrors::new();

        let name = if payload.contains_key("name") {
            required_string(&payload, "name", Some(NAME_MAX_CHARS), &mut errors)
        } else {
            None
        };
        let email = if payload.contains_key("email") {
            required_email(&payload, &mut errors)
        } else {
            None
        };
        let password = match payload.get("password") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(_) => password_field(&payload, &mut errors),
        };

        errors.into_result(Self { name, email, password })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}

/// Lower-cases so that uniqueness does not depend on letter case.
fn required_email(payload: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<String> {
    let email = required_string(payload, "email", Some(EMAIL_MAX_CHARS), errors)?.to_lowercase();
    if !is_valid_email(&email) {
        errors.add("email", "The email field must be a valid email address.");
        return None;
    }
    Some(email)
}

fn password_field(payload: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<String> {
    // Passwords are never trimmed
    let password = match payload.get("password") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::String(_)) | Some(Value::Null) | None => {
            errors.add("password", "The password field is required.");
            return None;
        }
        Some(_) => {
            errors.add("password", "The password field must be a string.");
            return None;
        }
    };

    let mut ok = true;
    if password.chars().count() < PASSWORD_MIN_CHARS {
        errors.add(
            "password",
            format!("The password field must be at least {} characters.", PASSWORD_MIN_CHARS),
        );
        ok = false;
    }
    if payload.get("password_confirmation").and_then(Value::as_str) != Some(password.as_str()) {
        errors.add("password", "The password field confirmation does not match.");
        ok = false;
    }

    ok.then_some(password)
}

pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}
