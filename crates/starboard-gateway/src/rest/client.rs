//! HTTP client for the platform REST API
//!
//! Implements [`ChatPlatform`] for the engine and adds the calls only the
//! gateway layer needs (command registration and interaction replies).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use starboard_core::{ChatPlatform, PlatformError, PlatformMessage, PlatformResult};
use tracing::{debug, instrument, warn};

use super::commands::CommandDefinition;
use super::models::{ApiMember, ApiMessage};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
/// Rate-limited setup calls are retried in place when the wait is at most this long
const MAX_INLINE_RETRY_WAIT: Duration = Duration::from_secs(5);
const SETUP_RATE_LIMIT_RETRIES: u32 = 2;

/// Interaction response type: reply with a message
const CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;
/// Message flag: only the invoker sees the reply
const EPHEMERAL: u64 = 1 << 6;

/// REST API client
#[derive(Clone)]
pub struct DiscordRestClient {
    http: reqwest::Client,
    api_base: String,
    authorization: String,
}

impl DiscordRestClient {
    pub fn new(api_base: &str, token: &str) -> PlatformResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                "DiscordBot (https://github.com/starboard, ",
                env!("CARGO_PKG_VERSION"),
                ")"
            ))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            authorization: format!("Bot {token}"),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Send a request once; any failure is returned to the caller
    async fn send<F>(&self, build: F) -> PlatformResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        self.send_retrying(build, 0).await
    }

    /// Send a request, retrying up to `max_retries` short rate limits
    async fn send_retrying<F>(&self, build: F, max_retries: u32) -> PlatformResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let response = build()
                .header(header::AUTHORIZATION, &self.authorization)
                .send()
                .await
                .map_err(|e| PlatformError::Transport(e.to_string()))?;

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            let err = error_for_status(status, &body);

            if let PlatformError::RateLimited { retry_after_ms } = err {
                let wait = Duration::from_millis(retry_after_ms);
                if attempt < max_retries && wait <= MAX_INLINE_RETRY_WAIT {
                    attempt += 1;
                    debug!(retry_after_ms, attempt, "Rate limited, retrying");
                    tokio::time::sleep(wait).await;
                    continue;
                }
            }

            return Err(err);
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> PlatformResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| PlatformError::Decode(e.to_string()))
    }

    /// Replace the server's slash commands with `commands`
    #[instrument(skip(self, commands))]
    pub async fn register_guild_commands(
        &self,
        application_id: &str,
        guild_id: &str,
        commands: &[CommandDefinition],
    ) -> PlatformResult<()> {
        let url = self.url(&format!("/applications/{application_id}/guilds/{guild_id}/commands"));
        self.send_retrying(|| self.http.put(&url).json(commands), SETUP_RATE_LIMIT_RETRIES)
            .await?;
        Ok(())
    }

    /// Answer a slash command with a message only the invoker sees
    #[instrument(skip(self, token, content))]
    pub async fn respond_to_interaction(
        &self,
        interaction_id: &str,
        token: &str,
        content: &str,
    ) -> PlatformResult<()> {
        let url = self.url(&format!("/interactions/{interaction_id}/{token}/callback"));
        let body = json!({
            "type": CHANNEL_MESSAGE_WITH_SOURCE,
            "data": {
                "content": content,
                "flags": EPHEMERAL,
                "allowed_mentions": { "parse": [] },
            }
        });
        self.send(|| self.http.post(&url).json(&body)).await?;
        Ok(())
    }
}

/// Engine-facing calls are sent once. A rate limit surfaces as
/// [`PlatformError::RateLimited`] and the event is dropped.
#[async_trait]
impl ChatPlatform for DiscordRestClient {
    #[instrument(skip(self))]
    async fn fetch_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> PlatformResult<PlatformMessage> {
        let url = self.url(&format!("/channels/{channel_id}/messages/{message_id}"));
        let response = self.send(|| self.http.get(&url)).await?;
        let message: ApiMessage = Self::decode(response).await?;
        Ok(message.into())
    }

    #[instrument(skip(self, content))]
    async fn send_message(&self, channel_id: &str, content: &str) -> PlatformResult<String> {
        let url = self.url(&format!("/channels/{channel_id}/messages"));
        let body = json!({
            "content": content,
            "allowed_mentions": { "parse": [] },
        });
        let response = self.send(|| self.http.post(&url).json(&body)).await?;
        let message: ApiMessage = Self::decode(response).await?;
        Ok(message.id)
    }

    #[instrument(skip(self, content))]
    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
    ) -> PlatformResult<()> {
        let url = self.url(&format!("/channels/{channel_id}/messages/{message_id}"));
        let body = json!({
            "content": content,
            "allowed_mentions": { "parse": [] },
        });
        self.send(|| self.http.patch(&url).json(&body)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn member_display_name(
        &self,
        server_id: &str,
        user_id: &str,
    ) -> PlatformResult<Option<String>> {
        let url = self.url(&format!("/guilds/{server_id}/members/{user_id}"));
        match self.send(|| self.http.get(&url)).await {
            Ok(response) => {
                let member: ApiMember = Self::decode(response).await?;
                Ok(member.display_name())
            }
            Err(PlatformError::NotFound(_)) => Ok(None),
            Err(e) => {
                warn!(error = %e, "Failed to resolve member name");
                Err(e)
            }
        }
    }
}

/// Map a non-success response to a platform error
pub(crate) fn error_for_status(status: StatusCode, body: &str) -> PlatformError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| status.to_string());

    match status {
        StatusCode::NOT_FOUND => PlatformError::NotFound(message),
        StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => PlatformError::Forbidden(message),
        StatusCode::TOO_MANY_REQUESTS => PlatformError::RateLimited {
            retry_after_ms: retry_after_ms(body),
        },
        _ => PlatformError::Transport(format!("{}: {message}", status.as_u16())),
    }
}

/// `retry_after` is given in (fractional) seconds
fn retry_after_ms(body: &str) -> u64 {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("retry_after").and_then(serde_json::Value::as_f64))
        .map_or(1_000, |secs| (secs.max(0.0) * 1_000.0).ceil() as u64)
}
