use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_json, output_success, user_details};
use crate::cli::OutputFormat;
use crate::client::{ApiClient, ProfileUpdate, Route};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Create an account and log in")]
    Register {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (at least 8 characters)")]
        password: String,
        #[arg(long, help = "Password again")]
        password_confirmation: String,
    },

    #[command(about = "Log in and remember the session")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Revoke the session and forget it locally")]
    Logout,

    #[command(about = "Show or change your profile")]
    Profile {
        #[command(subcommand)]
        cmd: ProfileCommands,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "Show the logged in user")]
    Show,

    #[command(about = "Change name, email or password")]
    Update {
        #[arg(long, help = "New display name")]
        name: Option<String>,
        #[arg(long, help = "New email address")]
        email: Option<String>,
        #[arg(long, help = "New password")]
        password: Option<String>,
        #[arg(long, help = "New password again")]
        password_confirmation: Option<String>,
    },
}

impl AuthCommands {
    pub fn route(&self) -> Option<Route> {
        match self {
            AuthCommands::Register { .. } => Some(Route::Register),
            AuthCommands::Login { .. } => Some(Route::Login),
            AuthCommands::Logout => None,
            AuthCommands::Profile { .. } => Some(Route::Profile),
        }
    }
}

pub async fn handle(cmd: AuthCommands, client: &ApiClient, output_format: &OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Register {
            name,
            email,
            password,
            password_confirmation,
        } => {
            let payload = client
                .register(&name, &email, &password, &password_confirmation)
                .await?;
            output_success(
                output_format,
                &format!("Registered and logged in as {}", payload.user.email),
                Some(json!({ "user": payload.user })),
            )
        }
        AuthCommands::Login { email, password } => {
            let payload = client.login(&email, &password).await?;
            output_success(
                output_format,
                &format!("Logged in as {}", payload.user.email),
                Some(json!({ "user": payload.user })),
            )
        }
        AuthCommands::Logout => {
            client.logout().await;
            output_success(output_format, "Logged out", None)
        }
        AuthCommands::Profile { cmd } => handle_profile(cmd, client, output_format).await,
    }
}

async fn handle_profile(cmd: ProfileCommands, client: &ApiClient, output_format: &OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ProfileCommands::Show => {
            let user = client.get_user().await?;
            client.session().set_user(user.clone());
            match output_format {
                OutputFormat::Json => output_json(&user),
                OutputFormat::Text => {
                    println!("{}", user_details(&user));
                    Ok(())
                }
            }
        }
        ProfileCommands::Update {
            name,
            email,
            password,
            password_confirmation,
        } => {
            let update = ProfileUpdate {
                name,
                email,
                password,
                password_confirmation,
            };
            if update.name.is_none() && update.email.is_none() && update.password.is_none() {
                anyhow::bail!("Nothing to update. Pass --name, --email or --password.");
            }

            let user = client.update_profile(&update).await?;
            output_success(output_format, "Profile updated", Some(json!({ "user": user })))
        }
    }
}
