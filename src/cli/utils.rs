use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::database::models::{Todo, User};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(fields)) = data {
                if let Some(object) = response.as_object_mut() {
                    object.extend(fields);
                }
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    collection_name: []
                }))?
            );
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Print any serializable value as pretty JSON
pub fn output_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line summary used by `list`
pub fn todo_line(todo: &Todo, today: NaiveDate) -> String {
    let mark = if todo.completed { "[x]" } else { "[ ]" };
    let mut line = format!("{:>4} {} {}", todo.id, mark, todo.title);
    if let Some(due) = todo.due_date {
        line.push_str(&format!("  (due {})", due_label(due, today, todo.completed)));
    }
    line
}

/// Full record used by `show`, `add` and `edit`
pub fn todo_details(todo: &Todo, today: NaiveDate) -> String {
    let mut out = format!("#{} {}\n", todo.id, todo.title);
    out.push_str(&format!(
        "Status:      {}\n",
        if todo.completed { "completed" } else { "pending" }
    ));
    if let Some(description) = &todo.description {
        out.push_str(&format!("Description: {}\n", description));
    }
    if let Some(due) = todo.due_date {
        out.push_str(&format!("Due:         {}\n", due_label(due, today, todo.completed)));
    }
    out.push_str(&format!("Created:     {}\n", todo.created_at.format("%Y-%m-%d %H:%M")));
    out.push_str(&format!("Updated:     {}", todo.updated_at.format("%Y-%m-%d %H:%M")));
    out
}

pub fn user_details(user: &User) -> String {
    format!(
        "Name:         {}\nEmail:        {}\nMember since: {}",
        user.name,
        user.email,
        user.created_at.format("%Y-%m-%d")
    )
}

fn due_label(due: NaiveDate, today: NaiveDate, completed: bool) -> String {
    if !completed && due < today {
        format!("{}, overdue", due)
    } else if due == today {
        format!("{}, today", due)
    } else {
        due.to_string()
    }
}
