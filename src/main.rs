use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use todo_api::database::repository::{SqliteTodoRepository, SqliteUserRepository, UserRepository};
use todo_api::database::{seed, DatabaseManager};
use todo_api::{app, config, AppState};

#[derive(Parser)]
#[command(name = "todo-api-rust")]
#[command(about = "Todo API server")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<ServerCommand>,
}

#[derive(Subcommand)]
enum ServerCommand {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Insert the demo todos for an existing user")]
    Seed {
        #[arg(long, help = "Email of the account that will own the todos")]
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let config = config::config();
    init_tracing(config.api.enable_request_logging);
    config.validate().context("invalid configuration")?;

    let args = Args::parse();
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open database")?;

    match args.command.unwrap_or(ServerCommand::Serve) {
        ServerCommand::Serve => {
            info!("Starting Todo API in {:?} mode", config.environment);

            let bind_addr = format!("0.0.0.0:{}", config.api.port);
            let listener = tokio::net::TcpListener::bind(&bind_addr)
                .await
                .with_context(|| format!("failed to bind {}", bind_addr))?;
            info!("Todo API listening on http://{}", bind_addr);

            axum::serve(listener, app(AppState::new(pool.clone(), config)))
                .with_graceful_shutdown(shutdown_signal())
                .await
                .context("server error")?;

            DatabaseManager::close(pool).await;
        }
        ServerCommand::Seed { email } => {
            let users = SqliteUserRepository::new(pool.clone());
            let user = users
                .find_by_email(&email.trim().to_lowercase())
                .await?
                .with_context(|| format!("no user with email {}", email))?;

            let todos = SqliteTodoRepository::new(pool.clone());
            let created = seed::seed_todos(&todos, user.id, chrono::Utc::now().date_naive()).await?;
            println!("Seeded {} todos for {}", created.len(), user.email);
        }
    }

    Ok(())
}

fn init_tracing(request_logging: bool) {
    let default_filter = if request_logging {
        "todo_api=debug,todo_api_rust=debug,tower_http=debug"
    } else {
        "todo_api=info,todo_api_rust=info,tower_http=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
