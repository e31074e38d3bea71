//! Pure payload validation for todo writes.
//!
//! Untrusted JSON in, normalized payload or field-level errors out. No
//! exceptions-as-control-flow: callers get a tagged `Result` and map it to
//! the 400 envelope. Unrecognized fields are ignored, so `ownerId` or
//! timestamps smuggled into a body never reach the store.

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::database::todo::{CreateTodo, UpdateTodo};

pub const TITLE_MAX_LEN: usize = 200;
pub const DESCRIPTION_MAX_LEN: usize = 1000;

#[derive(Debug, Error)]
#[error("invalid input data")]
pub struct ValidationError {
    pub field_errors: HashMap<String, String>,
}

/// Validate a create payload: `title` required, non-empty after trimming,
/// <= 200 chars; `description` optional, <= 1000 chars, defaulted to "".
pub fn validate_create(input: &Value) -> Result<CreateTodo, ValidationError> {
    let mut field_errors = HashMap::new();

    let title = match input.get("title") {
        Some(Value::String(s)) => {
            check_title(s, &mut field_errors);
            s.clone()
        }
        Some(_) => {
            field_errors.insert("title".to_string(), "Title must be a string".to_string());
            String::new()
        }
        None => {
            field_errors.insert("title".to_string(), "Title is required".to_string());
            String::new()
        }
    };

    let description = match input.get("description") {
        Some(Value::String(s)) => {
            check_description(s, &mut field_errors);
            s.clone()
        }
        None => String::new(),
        // Optional means absent, not null; null fails like any wrong type
        Some(_) => {
            field_errors.insert(
                "description".to_string(),
                "Description must be a string".to_string(),
            );
            String::new()
        }
    };

    if !field_errors.is_empty() {
        return Err(ValidationError { field_errors });
    }

    Ok(CreateTodo { title, description })
}

/// Validate an update payload: every field optional, same per-field
/// constraints as create when present. An empty object is valid.
pub fn validate_update(input: &Value) -> Result<UpdateTodo, ValidationError> {
    let mut field_errors = HashMap::new();
    let mut changes = UpdateTodo::default();

    match input.get("title") {
        Some(Value::String(s)) => {
            check_title(s, &mut field_errors);
            changes.title = Some(s.clone());
        }
        Some(_) => {
            field_errors.insert("title".to_string(), "Title must be a string".to_string());
        }
        None => {}
    }

    match input.get("description") {
        Some(Value::String(s)) => {
            check_description(s, &mut field_errors);
            changes.description = Some(s.clone());
        }
        Some(_) => {
            field_errors.insert(
                "description".to_string(),
                "Description must be a string".to_string(),
            );
        }
        None => {}
    }

    match input.get("completed") {
        Some(Value::Bool(b)) => changes.completed = Some(*b),
        Some(_) => {
            field_errors.insert(
                "completed".to_string(),
                "Completed must be a boolean".to_string(),
            );
        }
        None => {}
    }

    if !field_errors.is_empty() {
        return Err(ValidationError { field_errors });
    }

    Ok(changes)
}

fn check_title(title: &str, field_errors: &mut HashMap<String, String>) {
    if title.trim().is_empty() {
        field_errors.insert("title".to_string(), "Title is required".to_string());
    } else if title.chars().count() > TITLE_MAX_LEN {
        field_errors.insert("title".to_string(), "Title too long".to_string());
    }
}

fn check_description(description: &str, field_errors: &mut HashMap<String, String>) {
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        field_errors.insert("description".to_string(), "Description too long".to_string());
    }
}
