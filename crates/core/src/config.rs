//! Environment-sourced configuration.

use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Default path of the session signing key.
const DEFAULT_SESSION_KEY_PATH: &str = "secrets/session.pem";

/// Database connection parameters.
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    /// Database name.
    pub database: String,
    /// Database host.
    pub host: String,
    /// Database user.
    pub user: String,
    /// Database password.
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database: "default".to_string(),
            host: "postgres".to_string(),
            user: "postgres".to_string(),
            password: "password".to_string(),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Database connection parameters.
    pub database: DatabaseConfig,
    /// Bot credential for the external messaging API. Mandatory.
    pub discord_bot_token: String,
    /// Path of the PEM-encoded session signing key, read once at startup.
    pub session_key_path: PathBuf,
    /// Bind address for the HTTP server.
    pub bind: String,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// Every variable has a default except `DISCORD_BOT_TOKEN`, which is
    /// required for the notification channel to authenticate.
    pub fn from_env() -> Result<Self> {
        let discord_bot_token = env::var("DISCORD_BOT_TOKEN")
            .map_err(|_| Error::Config("DISCORD_BOT_TOKEN is not set".to_string()))?;

        Ok(Self {
            database: DatabaseConfig {
                database: var_or("POSTGRES_DB", "default"),
                host: var_or("POSTGRES_HOST", "postgres"),
                user: var_or("POSTGRES_USER", "postgres"),
                password: var_or("POSTGRES_PASSWORD", "password"),
            },
            discord_bot_token,
            session_key_path: PathBuf::from(var_or(
                "BEACON_SESSION_KEY",
                DEFAULT_SESSION_KEY_PATH,
            )),
            bind: var_or("BEACON_BIND", "0.0.0.0:8000"),
        })
    }

    /// Create a test configuration that does not touch the environment.
    ///
    /// **For testing only.** Points at a local database and a dummy bot token.
    pub fn for_testing() -> Self {
        Self {
            database: DatabaseConfig::default(),
            discord_bot_token: "test-bot-token".to_string(),
            session_key_path: PathBuf::from(DEFAULT_SESSION_KEY_PATH),
            bind: "127.0.0.1:0".to_string(),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
