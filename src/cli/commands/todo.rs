use std::io::{self, BufRead, Write};

use chrono::{NaiveDate, Utc};
use clap::{Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;

use crate::cli::utils::{output_empty_collection, output_json, output_success, todo_details, todo_line};
use crate::cli::OutputFormat;
use crate::client::ApiClient;
use crate::database::models::Todo;
use crate::validation::{parse_date, NewTodo, TodoChanges};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Filter {
    All,
    Pending,
    Completed,
}

impl Filter {
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Pending => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub all: usize,
    pub pending: usize,
    pub completed: usize,
}

impl Counts {
    pub fn of(todos: &[Todo]) -> Self {
        let completed = todos.iter().filter(|t| t.completed).count();
        Self {
            all: todos.len(),
            pending: todos.len() - completed,
            completed,
        }
    }
}

#[derive(Subcommand)]
pub enum TodoCommands {
    #[command(about = "List your todos")]
    List {
        #[arg(long, value_enum, default_value_t = Filter::All, help = "Which todos to show")]
        filter: Filter,
    },

    #[command(about = "Create a todo")]
    Add {
        #[arg(help = "Title")]
        title: String,
        #[arg(long, help = "Longer description")]
        description: Option<String>,
        #[arg(long, value_parser = parse_due, help = "Due date (YYYY-MM-DD)")]
        due: Option<NaiveDate>,
        #[arg(long, help = "Create it already completed")]
        completed: bool,
    },

    #[command(about = "Show one todo")]
    Show {
        #[arg(help = "Todo ID")]
        id: i64,
    },

    #[command(about = "Change a todo")]
    Edit {
        #[arg(help = "Todo ID")]
        id: i64,
        #[arg(long, help = "New title")]
        title: Option<String>,
        #[arg(long, conflicts_with = "clear_description", help = "New description")]
        description: Option<String>,
        #[arg(long, help = "Remove the description")]
        clear_description: bool,
        #[arg(long, value_parser = parse_due, conflicts_with = "clear_due", help = "New due date (YYYY-MM-DD)")]
        due: Option<NaiveDate>,
        #[arg(long, help = "Remove the due date")]
        clear_due: bool,
    },

    #[command(about = "Mark a todo as completed")]
    Done {
        #[arg(help = "Todo ID")]
        id: i64,
    },

    #[command(about = "Mark a todo as pending again")]
    Undo {
        #[arg(help = "Todo ID")]
        id: i64,
    },

    #[command(about = "Delete a todo")]
    Delete {
        #[arg(help = "Todo ID")]
        id: i64,
        #[arg(long, short, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

pub async fn handle(cmd: TodoCommands, client: &ApiClient, output_format: &OutputFormat) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();

    match cmd {
        TodoCommands::List { filter } => {
            let todos = client.get_todos().await?;
            let counts = Counts::of(&todos);
            let shown: Vec<&Todo> = todos.iter().filter(|t| filter.matches(t)).collect();

            match output_format {
                OutputFormat::Json => output_json(&json!({ "todos": shown, "counts": counts })),
                OutputFormat::Text => {
                    if shown.is_empty() {
                        output_empty_collection(output_format, "todos", empty_message(filter))?;
                    }
                    for todo in &shown {
                        println!("{}", todo_line(todo, today));
                    }
                    println!(
                        "\nAll: {}  Pending: {}  Completed: {}",
                        counts.all, counts.pending, counts.completed
                    );
                    Ok(())
                }
            }
        }
        TodoCommands::Add {
            title,
            description,
            due,
            completed,
        } => {
            let new_todo = NewTodo {
                title,
                description,
                completed,
                due_date: due,
            };
            let todo = client.create_todo(&new_todo).await?;
            output_todo(output_format, &format!("Created todo #{}", todo.id), &todo, today)
        }
        TodoCommands::Show { id } => {
            let todo = client.get_todo(id).await?;
            match output_format {
                OutputFormat::Json => output_json(&todo),
                OutputFormat::Text => {
                    println!("{}", todo_details(&todo, today));
                    Ok(())
                }
            }
        }
        TodoCommands::Edit {
            id,
            title,
            description,
            clear_description,
            due,
            clear_due,
        } => {
            let changes = TodoChanges {
                title,
                description: if clear_description { Some(None) } else { description.map(Some) },
                completed: None,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
            };
            if changes.is_empty() {
                anyhow::bail!("Nothing to change. Pass --title, --description, --due or a --clear-* flag.");
            }

            let todo = client.update_todo(id, &changes).await?;
            output_todo(output_format, &format!("Updated todo #{}", todo.id), &todo, today)
        }
        TodoCommands::Done { id } => {
            let todo = client.toggle_todo(id, true).await?;
            output_todo(output_format, &format!("Completed todo #{}", todo.id), &todo, today)
        }
        TodoCommands::Undo { id } => {
            let todo = client.toggle_todo(id, false).await?;
            output_todo(output_format, &format!("Reopened todo #{}", todo.id), &todo, today)
        }
        TodoCommands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete todo #{}?", id))? {
                println!("Cancelled");
                return Ok(());
            }
            client.delete_todo(id).await?;
            output_success(output_format, &format!("Deleted todo #{}", id), Some(json!({ "id": id })))
        }
    }
}

fn output_todo(output_format: &OutputFormat, message: &str, todo: &Todo, today: NaiveDate) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_success(output_format, message, Some(json!({ "todo": todo }))),
        OutputFormat::Text => {
            output_success(output_format, message, None)?;
            println!("{}", todo_details(todo, today));
            Ok(())
        }
    }
}

fn empty_message(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "No todos yet. Add one with `todo add <title>`.",
        Filter::Pending => "Nothing pending.",
        Filter::Completed => "Nothing completed yet.",
    }
}

fn parse_due(input: &str) -> Result<NaiveDate, String> {
    parse_date(input).ok_or_else(|| format!("'{}' is not a date, expected YYYY-MM-DD", input))
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{} [y/N] ", prompt);
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
