//! Application state shared across handlers.

use crate::tasks::BackgroundTasks;
use beacon_auth::{CredentialHasher, SessionSigner};
use beacon_core::config::AppConfig;
use beacon_metadata::DatabaseConnector;
use beacon_notify::DiscordClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Bound on waiting for outstanding background tasks during finalize.
const FINALIZE_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared application state.
///
/// One explicitly-constructed context object owns every process-wide
/// collaborator: the connection pool, the credential hasher, the session
/// signer, the messaging client, and the background-task registry. It is
/// injected into every operation through axum's `State`; nothing is
/// ambient.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Connection pool lifecycle owner.
    pub database: Arc<DatabaseConnector>,
    /// Password and device-token hasher.
    pub hasher: Arc<CredentialHasher>,
    /// Session token issuer/validator.
    pub sessions: Arc<SessionSigner>,
    /// Messaging API client.
    pub discord: Arc<DiscordClient>,
    /// Supervised background tasks.
    pub tasks: BackgroundTasks,
    /// Bot avatar, fetched once during initialize.
    bot_avatar_url: Arc<RwLock<Option<String>>>,
}

impl AppState {
    /// Create the application state. No I/O happens until
    /// [`initialize`](Self::initialize).
    pub fn new(config: AppConfig, sessions: SessionSigner) -> Self {
        let database = DatabaseConnector::new(config.database.clone());
        let discord = DiscordClient::new(&config.discord_bot_token);
        Self {
            config: Arc::new(config),
            database: Arc::new(database),
            hasher: Arc::new(CredentialHasher::new()),
            sessions: Arc::new(sessions),
            discord: Arc::new(discord),
            tasks: BackgroundTasks::new(),
            bot_avatar_url: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the messaging client. Meant for tests pointing at a stub
    /// API server.
    pub fn with_discord_client(mut self, client: DiscordClient) -> Self {
        self.discord = Arc::new(client);
        self
    }

    /// Startup lifecycle hook.
    ///
    /// Fetches the bot's avatar for alert thumbnails (best-effort) and
    /// warms the connection pool. Neither failure is fatal: the avatar is
    /// optional and the pool retries on the next acquisition.
    pub async fn initialize(&self) {
        match self.discord.current_user_avatar_url().await {
            Ok(url) => {
                *self.bot_avatar_url.write().await = url;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch bot avatar");
            }
        }

        if self.database.acquire().await.is_none() {
            tracing::warn!("storage unavailable at startup, operations degrade until it recovers");
        }
    }

    /// Shutdown lifecycle hook.
    ///
    /// Drains outstanding background tasks with a bounded wait, then
    /// closes the connection pool.
    pub async fn finalize(&self) {
        self.tasks.shutdown(FINALIZE_DRAIN_TIMEOUT).await;
        self.database.close().await;
    }

    /// The bot's avatar URL, if one was fetched at startup.
    pub async fn bot_avatar_url(&self) -> Option<String> {
        self.bot_avatar_url.read().await.clone()
    }
}
