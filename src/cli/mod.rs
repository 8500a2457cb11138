pub mod commands;
pub mod config;
pub mod utils;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::{navigate, ApiClient, Navigation, Route, SessionHandle};
use self::config::StoredSession;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Todo CLI - manage your todo list from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Server URL (remembered for later commands)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Auth(commands::auth::AuthCommands),

    #[command(flatten)]
    Todo(commands::todo::TodoCommands),
}

impl Commands {
    /// Screen this command stands in for. `None` means always allowed.
    pub fn route(&self) -> Option<Route> {
        match self {
            Commands::Auth(cmd) => cmd.route(),
            Commands::Todo(_) => Some(Route::Dashboard),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let mut stored = config::load_session()?;
    if let Some(server) = cli.server {
        stored.server_url = Some(server);
    }
    let server_url = stored
        .server_url
        .clone()
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    let session = SessionHandle::new(stored.session);
    let client = ApiClient::new(&server_url, session.clone()).context("cannot use server URL")?;

    if let Some(route) = cli.command.route() {
        check_route(route, &session)?;
    }

    let result = match cli.command {
        Commands::Auth(cmd) => commands::auth::handle(cmd, &client, &output_format).await,
        Commands::Todo(cmd) => commands::todo::handle(cmd, &client, &output_format).await,
    };

    // Written even when the command failed: logout clears the session regardless
    config::save_session(&StoredSession {
        server_url: Some(server_url),
        session: session.snapshot(),
    })?;

    result
}

fn check_route(route: Route, session: &SessionHandle) -> anyhow::Result<()> {
    let snapshot = session.snapshot();
    let navigation = navigate(route.path(), &snapshot);
    tracing::debug!("{} resolves to {}", route.path(), navigation.destination().path());

    match navigation {
        Navigation::Proceed(_) => Ok(()),
        Navigation::Redirect(Route::Login) => {
            anyhow::bail!("You are not logged in. Run `todo login <email>` or `todo register` first.")
        }
        Navigation::Redirect(_) => {
            let who = snapshot
                .user
                .map(|u| u.email)
                .unwrap_or_else(|| "another account".to_string());
            anyhow::bail!("Already logged in as {}. Run `todo logout` first.", who)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Session;

    #[test]
    fn parses_flattened_commands() {
        let cli = Cli::try_parse_from(["todo", "--json", "list", "--filter", "pending"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.command.route(), Some(Route::Dashboard));

        let cli = Cli::try_parse_from(["todo", "login", "ada@example.com", "--password", "secret123"]).unwrap();
        assert_eq!(cli.command.route(), Some(Route::Login));

        let cli = Cli::try_parse_from(["todo", "logout"]).unwrap();
        assert_eq!(cli.command.route(), None);
    }

    #[test]
    fn guard_blocks_commands_before_any_request() {
        let guest = SessionHandle::default();
        assert!(check_route(Route::Dashboard, &guest).is_err());
        assert!(check_route(Route::Login, &guest).is_ok());

        let signed_in = SessionHandle::new(Session {
            token: Some("token".into()),
            user: None,
        });
        assert!(check_route(Route::Profile, &signed_in).is_ok());
        let err = check_route(Route::Register, &signed_in).unwrap_err();
        assert!(err.to_string().contains("todo logout"));
    }
}
