//! Tracked message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for reacted_messages table
#[derive(Debug, Clone, FromRow)]
pub struct TrackedMessageModel {
    pub id: i64,
    pub server_id: String,
    pub channel_id: String,
    pub message_id: String,
    pub author_id: String,
    pub reaction_count: i32,
    pub author_reacted: bool,
    /// Generated column, read only
    pub displayed_reaction_count: i32,
    pub announced_message_id: Option<String>,
    pub announcement_channel_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
