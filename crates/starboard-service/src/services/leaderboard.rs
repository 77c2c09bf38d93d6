//! Leaderboard service
//!
//! Ranks authors of a server by the summed displayed counts of their messages.

use starboard_core::LeaderboardEntry;
use tracing::{debug, instrument};

use crate::dto::{LeaderboardLine, LeaderboardResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Entries shown when no limit is given
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
/// Largest accepted limit
pub const MAX_LEADERBOARD_LIMIT: i64 = 25;

/// Leaderboard service
pub struct LeaderboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LeaderboardService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Top authors of a server, best first
    #[instrument(skip(self))]
    pub async fn top(&self, server_id: &str, limit: i64) -> ServiceResult<Vec<LeaderboardEntry>> {
        let limit = limit.clamp(1, MAX_LEADERBOARD_LIMIT);
        Ok(self.ctx.tally_repo().leaderboard(server_id, limit).await?)
    }

    /// Leaderboard with member display names resolved
    ///
    /// Authors whose name cannot be resolved are shown as a mention.
    #[instrument(skip(self))]
    pub async fn render(&self, server_id: &str, limit: i64) -> ServiceResult<LeaderboardResponse> {
        let entries = self.top(server_id, limit).await?;

        let mut lines = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let name = match self
                .ctx
                .platform()
                .member_display_name(server_id, &entry.author_id)
                .await
            {
                Ok(Some(name)) => name,
                Ok(None) => format!("<@{}>", entry.author_id),
                Err(e) => {
                    debug!(author_id = %entry.author_id, error = %e, "Display name lookup failed");
                    format!("<@{}>", entry.author_id)
                }
            };

            lines.push(LeaderboardLine {
                rank: index + 1,
                name,
                total_reactions: entry.total_reactions,
                message_count: entry.message_count,
            });
        }

        Ok(LeaderboardResponse {
            server_id: server_id.to_string(),
            emoji: self.ctx.config().emoji.to_string(),
            lines,
        })
    }
}
