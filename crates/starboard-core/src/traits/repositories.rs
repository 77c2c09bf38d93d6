//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{
    AnnouncementRef, LeaderboardEntry, MessageKey, ServerSettings, TallyChange, TrackedMessage,
};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Tally Repository
// ============================================================================

#[async_trait]
pub trait TallyRepository: Send + Sync {
    /// Find the tally for a message
    async fn find(&self, key: &MessageKey) -> RepoResult<Option<TrackedMessage>>;

    /// Apply one change as a single atomic read-modify-write.
    ///
    /// An add creates the row if the message was never seen. A remove for
    /// an unknown message changes nothing and returns `None`.
    async fn apply(&self, change: &TallyChange) -> RepoResult<Option<TrackedMessage>>;

    /// Record the announcement for a message if none is recorded yet.
    ///
    /// Returns `false` when an announcement was already recorded (the
    /// existing one is kept).
    async fn record_announcement(
        &self,
        key: &MessageKey,
        announcement: &AnnouncementRef,
    ) -> RepoResult<bool>;

    /// Rank authors in a server by their summed displayed counts
    async fn leaderboard(&self, server_id: &str, limit: i64) -> RepoResult<Vec<LeaderboardEntry>>;
}

// ============================================================================
// Settings Repository
// ============================================================================

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Find settings for a server
    async fn find(&self, server_id: &str) -> RepoResult<Option<ServerSettings>>;

    /// Create a default (unconfigured) row if the server has none
    async fn ensure(&self, server_id: &str) -> RepoResult<()>;

    /// Set the announcement destination and threshold, creating the row if needed
    async fn set_announcement(
        &self,
        server_id: &str,
        channel_id: &str,
        minimum_reactions: i32,
    ) -> RepoResult<ServerSettings>;
}
