//! Chat platform port - the messaging operations the engine consumes

use async_trait::async_trait;
use thiserror::Error;

use crate::entities::PlatformMessage;

/// Errors returned by the chat platform
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rate limited, retry after {retry_after_ms} ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl PlatformError {
    /// Target message or channel no longer exists
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Failure that might succeed if tried again later
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Transport(_))
    }
}

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Fetch a message by channel and message id
    async fn fetch_message(&self, channel_id: &str, message_id: &str)
        -> PlatformResult<PlatformMessage>;

    /// Send a new message, returning its id
    async fn send_message(&self, channel_id: &str, content: &str) -> PlatformResult<String>;

    /// Replace the content of an existing message
    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
    ) -> PlatformResult<()>;

    /// Display name of a server member, if they are still a member
    async fn member_display_name(
        &self,
        server_id: &str,
        user_id: &str,
    ) -> PlatformResult<Option<String>>;
}
