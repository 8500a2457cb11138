#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use todo_api::config::config;
use todo_api::database::DatabaseManager;
use todo_api::{app, AppState};

/// One server per test: its own port, its own in-memory database.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let pool = DatabaseManager::connect_in_memory()
            .await
            .context("failed to open in-memory database")?;
        let router = app(AppState::new(pool, config()));

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Registers `email` with a fixed password and returns (token, user).
    pub async fn register(&self, name: &str, email: &str) -> Result<(String, Value)> {
        let res = self
            .client
            .post(self.url("/auth/register"))
            .json(&json!({
                "name": name,
                "email": email,
                "password": PASSWORD,
                "password_confirmation": PASSWORD,
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

        let body: Value = res.json().await?;
        let token = body["token"].as_str().context("no token in response")?.to_string();
        Ok((token, body["user"].clone()))
    }

    pub async fn create_todo(&self, token: &str, body: Value) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/todos"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());
        Ok(res.json().await?)
    }
}

pub const PASSWORD: &str = "password123";

pub async fn spawn_server() -> Result<TestServer> {
    let server = TestServer::spawn().await?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
