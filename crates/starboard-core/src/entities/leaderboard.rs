//! Leaderboard entry - per-author sum of displayed reaction counts

use serde::{Deserialize, Serialize};

/// One ranked author on a server leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub author_id: String,
    pub total_reactions: i64,
    pub message_count: i64,
}

impl LeaderboardEntry {
    pub fn new(author_id: impl Into<String>, total_reactions: i64, message_count: i64) -> Self {
        Self {
            author_id: author_id.into(),
            total_reactions,
            message_count,
        }
    }
}
