//! PostgreSQL implementation of SettingsRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use starboard_core::entities::ServerSettings;
use starboard_core::traits::{RepoResult, SettingsRepository};

use crate::models::ServerSettingsModel;

use super::error::map_db_error;

/// PostgreSQL implementation of SettingsRepository
#[derive(Clone)]
pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    /// Create a new PgSettingsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    #[instrument(skip(self))]
    async fn find(&self, server_id: &str) -> RepoResult<Option<ServerSettings>> {
        let result = sqlx::query_as::<_, ServerSettingsModel>(
            r"
            SELECT server_id, announcement_channel_id, minimum_reactions
            FROM server_settings
            WHERE server_id = $1
            ",
        )
        .bind(server_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ServerSettings::from))
    }

    #[instrument(skip(self))]
    async fn ensure(&self, server_id: &str) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO server_settings (server_id)
            VALUES ($1)
            ON CONFLICT (server_id) DO NOTHING
            ",
        )
        .bind(server_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_announcement(
        &self,
        server_id: &str,
        channel_id: &str,
        minimum_reactions: i32,
    ) -> RepoResult<ServerSettings> {
        let result = sqlx::query_as::<_, ServerSettingsModel>(
            r"
            INSERT INTO server_settings (server_id, announcement_channel_id, minimum_reactions)
            VALUES ($1, $2, $3)
            ON CONFLICT (server_id) DO UPDATE
            SET announcement_channel_id = EXCLUDED.announcement_channel_id,
                minimum_reactions = EXCLUDED.minimum_reactions
            RETURNING server_id, announcement_channel_id, minimum_reactions
            ",
        )
        .bind(server_id)
        .bind(channel_id)
        .bind(minimum_reactions)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ServerSettings::from(result))
    }
}
