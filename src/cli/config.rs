use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::client::Session;

const SESSION_FILE: &str = "session.json";

/// What the CLI remembers between invocations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub server_url: Option<String>,
    #[serde(flatten)]
    pub session: Session,
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("TODO_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("todo").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .with_context(|| format!("failed to create {}", config_dir.display()))?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<StoredSession> {
    load_session_from(&get_config_dir()?.join(SESSION_FILE))
}

pub fn save_session(stored: &StoredSession) -> anyhow::Result<()> {
    save_session_to(&get_config_dir()?.join(SESSION_FILE), stored)
}

pub fn load_session_from(path: &Path) -> anyhow::Result<StoredSession> {
    if !path.exists() {
        return Ok(StoredSession::default());
    }

    let content = fs::read_to_string(path)?;
    let stored = serde_json::from_str(&content)
        .with_context(|| format!("corrupt session file {}", path.display()))?;
    Ok(stored)
}

pub fn save_session_to(path: &Path, stored: &StoredSession) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(stored)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("todo-cli-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(SESSION_FILE);

        assert_eq!(load_session_from(&path).unwrap(), StoredSession::default());

        let stored = StoredSession {
            server_url: Some("http://localhost:9000".into()),
            session: Session {
                token: Some("abc".into()),
                user: None,
            },
        };
        save_session_to(&path, &stored).unwrap();
        assert_eq!(load_session_from(&path).unwrap(), stored);

        // Flattened, so the token sits at the top level of the file
        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["token"], "abc");

        fs::remove_dir_all(dir).unwrap();
    }
}
