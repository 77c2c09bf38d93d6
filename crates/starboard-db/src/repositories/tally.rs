//! PostgreSQL implementation of TallyRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use starboard_core::entities::{
    AnnouncementRef, LeaderboardEntry, MessageKey, TallyChange, TrackedMessage,
};
use starboard_core::events::ReactionDirection;
use starboard_core::traits::{RepoResult, TallyRepository};

use crate::mappers::TallyUpdate;
use crate::models::{LeaderboardModel, TrackedMessageModel};

use super::error::{map_db_error, tracked_message_not_found};

/// Largest leaderboard page
const MAX_LEADERBOARD_LIMIT: i64 = 25;

/// PostgreSQL implementation of TallyRepository
#[derive(Clone)]
pub struct PgTallyRepository {
    pool: PgPool,
}

impl PgTallyRepository {
    /// Create a new PgTallyRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TallyRepository for PgTallyRepository {
    #[instrument(skip(self, key), fields(key = %key))]
    async fn find(&self, key: &MessageKey) -> RepoResult<Option<TrackedMessage>> {
        let result = sqlx::query_as::<_, TrackedMessageModel>(
            r"
            SELECT id, server_id, channel_id, message_id, author_id, reaction_count,
                   author_reacted, displayed_reaction_count, announced_message_id,
                   announcement_channel_id, created_at, updated_at
            FROM reacted_messages
            WHERE server_id = $1 AND channel_id = $2 AND message_id = $3
            ",
        )
        .bind(&key.server_id)
        .bind(&key.channel_id)
        .bind(&key.message_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(TrackedMessage::from))
    }

    #[instrument(skip(self, change), fields(key = %change.key, direction = %change.direction))]
    async fn apply(&self, change: &TallyChange) -> RepoResult<Option<TrackedMessage>> {
        let key = &change.key;
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Concurrent first adds all land on the same row
        if change.direction == ReactionDirection::Add {
            sqlx::query(
                r"
                INSERT INTO reacted_messages (server_id, channel_id, message_id, author_id)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (server_id, channel_id, message_id) DO NOTHING
                ",
            )
            .bind(&key.server_id)
            .bind(&key.channel_id)
            .bind(&key.message_id)
            .bind(&change.author_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        let current = sqlx::query_as::<_, TrackedMessageModel>(
            r"
            SELECT id, server_id, channel_id, message_id, author_id, reaction_count,
                   author_reacted, displayed_reaction_count, announced_message_id,
                   announcement_channel_id, created_at, updated_at
            FROM reacted_messages
            WHERE server_id = $1 AND channel_id = $2 AND message_id = $3
            FOR UPDATE
            ",
        )
        .bind(&key.server_id)
        .bind(&key.channel_id)
        .bind(&key.message_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some(current) = current else {
            tx.commit().await.map_err(map_db_error)?;
            debug!("Remove for untracked message ignored");
            return Ok(None);
        };

        let mut tally = TrackedMessage::from(current);
        tally.apply(change);
        let update = TallyUpdate::new(&tally);

        let updated = sqlx::query_as::<_, TrackedMessageModel>(
            r"
            UPDATE reacted_messages
            SET reaction_count = $4, author_reacted = $5, updated_at = NOW()
            WHERE server_id = $1 AND channel_id = $2 AND message_id = $3
            RETURNING id, server_id, channel_id, message_id, author_id, reaction_count,
                      author_reacted, displayed_reaction_count, announced_message_id,
                      announcement_channel_id, created_at, updated_at
            ",
        )
        .bind(update.server_id)
        .bind(update.channel_id)
        .bind(update.message_id)
        .bind(update.reaction_count)
        .bind(update.author_reacted)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(Some(TrackedMessage::from(updated)))
    }

    #[instrument(skip(self, key), fields(key = %key))]
    async fn record_announcement(
        &self,
        key: &MessageKey,
        announcement: &AnnouncementRef,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE reacted_messages
            SET announced_message_id = $4, announcement_channel_id = $5, updated_at = NOW()
            WHERE server_id = $1 AND channel_id = $2 AND message_id = $3
              AND announced_message_id IS NULL
            ",
        )
        .bind(&key.server_id)
        .bind(&key.channel_id)
        .bind(&key.message_id)
        .bind(&announcement.message_id)
        .bind(&announcement.channel_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }

        // Either already announced or the row does not exist at all
        match self.find(key).await? {
            Some(_) => Ok(false),
            None => Err(tracked_message_not_found(key)),
        }
    }

    #[instrument(skip(self))]
    async fn leaderboard(&self, server_id: &str, limit: i64) -> RepoResult<Vec<LeaderboardEntry>> {
        let limit = limit.clamp(1, MAX_LEADERBOARD_LIMIT);

        let results = sqlx::query_as::<_, LeaderboardModel>(
            r"
            SELECT author_id,
                   SUM(displayed_reaction_count)::BIGINT AS total_reactions,
                   COUNT(*) AS message_count
            FROM reacted_messages
            WHERE server_id = $1
            GROUP BY author_id
            HAVING SUM(displayed_reaction_count) > 0
            ORDER BY total_reactions DESC, author_id ASC
            LIMIT $2
            ",
        )
        .bind(server_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(LeaderboardEntry::from).collect())
    }
}
