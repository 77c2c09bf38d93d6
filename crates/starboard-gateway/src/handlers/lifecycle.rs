//! READY and guild membership events

use std::sync::Arc;

use starboard_service::SettingsService;
use tracing::{debug, info};

use super::{EventHandler, HandlerResult};
use crate::events::{
    GatewayEventType, GuildCreateEvent, GuildDeleteEvent, ReadyEvent, RoleDeleteEvent, RoleEvent,
};
use crate::rest::bot_commands;

impl EventHandler {
    pub(super) fn on_ready(&self, ready: ReadyEvent) {
        self.context().set_bot_user_id(ready.user.id.clone());

        let mut application_id = self.application_id.write();
        if application_id.is_none() {
            *application_id = Some(ready.application.id);
        }

        info!(user_id = %ready.user.id, username = %ready.user.username, "Bot is ready");
    }

    pub(super) fn on_guild_create(self: &Arc<Self>, guild: GuildCreateEvent) {
        if guild.unavailable {
            debug!(guild_id = %guild.id, "Guild unavailable");
            return;
        }

        self.guilds.insert(&guild);
        self.spawn(GatewayEventType::GuildCreate, move |handler| async move {
            handler.setup_guild(&guild.id).await
        });
    }

    /// Create the server's settings row and register its slash commands
    async fn setup_guild(&self, guild_id: &str) -> HandlerResult<()> {
        SettingsService::new(self.context()).ensure(guild_id).await?;

        match self.application_id() {
            Some(application_id) => {
                self.rest
                    .register_guild_commands(&application_id, guild_id, &bot_commands())
                    .await?;
                debug!(guild_id, "Registered slash commands");
            }
            None => debug!(guild_id, "Application id unknown, skipping command registration"),
        }

        Ok(())
    }

    pub(super) fn on_guild_delete(&self, guild: GuildDeleteEvent) {
        if !guild.unavailable {
            info!(guild_id = %guild.id, "Removed from guild");
        }
        self.guilds.remove(&guild.id);
    }

    pub(super) fn on_role_update(&self, event: RoleEvent) {
        self.guilds.upsert_role(&event.guild_id, &event.role);
    }

    pub(super) fn on_role_delete(&self, event: RoleDeleteEvent) {
        self.guilds.remove_role(&event.guild_id, &event.role_id);
    }
}
