//! LeaderboardEntry <- model mapper

use starboard_core::entities::LeaderboardEntry;

use crate::models::LeaderboardModel;

impl From<LeaderboardModel> for LeaderboardEntry {
    fn from(model: LeaderboardModel) -> Self {
        LeaderboardEntry {
            author_id: model.author_id,
            total_reactions: model.total_reactions,
            message_count: model.message_count,
        }
    }
}
