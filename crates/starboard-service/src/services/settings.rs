//! Settings service
//!
//! Reads and writes per-server announcement configuration.

use starboard_core::ServerSettings;
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::SetAnnouncementRequest;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Settings service
pub struct SettingsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SettingsService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Settings for a server; `None` when the server has no row
    pub async fn get(&self, server_id: &str) -> ServiceResult<Option<ServerSettings>> {
        Ok(self.ctx.settings_repo().find(server_id).await?)
    }

    /// Create the default row for a server the bot has joined
    #[instrument(skip(self))]
    pub async fn ensure(&self, server_id: &str) -> ServiceResult<()> {
        Ok(self.ctx.settings_repo().ensure(server_id).await?)
    }

    /// Set where announcements go and how many reactions they need
    ///
    /// # Errors
    /// Returns a validation error for a malformed channel id or threshold
    #[instrument(skip(self))]
    pub async fn set_announcement(
        &self,
        server_id: &str,
        request: SetAnnouncementRequest,
    ) -> ServiceResult<ServerSettings> {
        request.validate()?;

        let settings = self
            .ctx
            .settings_repo()
            .set_announcement(server_id, &request.channel_id, request.minimum_reactions)
            .await?;

        info!(
            server_id,
            channel_id = %request.channel_id,
            minimum_reactions = request.minimum_reactions,
            "Announcement settings updated"
        );

        Ok(settings)
    }
}
