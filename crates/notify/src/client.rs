//! Authenticated HTTP client for the messaging API.

use crate::embed::Embed;
use crate::error::{NotifyError, NotifyResult};
use serde::{Deserialize, Serialize};

/// Base URL of the messaging API.
const DISCORD_API_URL: &str = "https://discord.com/api/v10";

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct CreateDmRequest {
    recipient_id: String,
}

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    content: Option<&'a str>,
    embeds: &'a [Embed],
}

/// Client for the external messaging API, authenticated with the
/// process-wide bot credential.
#[derive(Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    auth_header: String,
    base_url: String,
}

impl DiscordClient {
    /// Create a client using the given bot token.
    pub fn new(bot_token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_header: format!("Bot {bot_token}"),
            base_url: DISCORD_API_URL.to_string(),
        }
    }

    /// Override the API base URL. Meant for tests against a local stub.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the bot's own avatar URL, if it has one.
    pub async fn current_user_avatar_url(&self) -> NotifyResult<Option<String>> {
        let response = self
            .http
            .get(format!("{}/users/@me", self.base_url))
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Api {
                status: status.as_u16(),
            });
        }

        let user: UserResponse = response
            .json()
            .await
            .map_err(|err| NotifyError::MalformedResponse(err.to_string()))?;

        Ok(user.avatar.map(|avatar| {
            format!(
                "https://cdn.discordapp.com/avatars/{}/{}.png",
                user.id, avatar
            )
        }))
    }

    /// Create (or reuse) the DM channel for an external user ID and return
    /// its channel ID. Any rejection means the recipient ID is unusable.
    pub async fn create_dm_channel(&self, recipient_id: i64) -> NotifyResult<i64> {
        let response = self
            .http
            .post(format!("{}/users/@me/channels", self.base_url))
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .json(&CreateDmRequest {
                recipient_id: recipient_id.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::InvalidRecipient {
                status: status.as_u16(),
            });
        }

        let channel: ChannelResponse = response
            .json()
            .await
            .map_err(|err| NotifyError::MalformedResponse(err.to_string()))?;

        channel
            .id
            .parse::<i64>()
            .map_err(|_| NotifyError::MalformedResponse(format!("channel id: {}", channel.id)))
    }

    /// Post a message to a channel. Any 2xx acknowledgment is success;
    /// everything else is an API error and is not retried.
    pub async fn post_message(
        &self,
        channel_id: i64,
        content: Option<&str>,
        embeds: &[Embed],
    ) -> NotifyResult<()> {
        let response = self
            .http
            .post(format!("{}/channels/{channel_id}/messages", self.base_url))
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .json(&MessageRequest { content, embeds })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Api {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
