//! Leaderboard row (from aggregate query)

use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardModel {
    pub author_id: String,
    pub total_reactions: i64,
    pub message_count: i64,
}
