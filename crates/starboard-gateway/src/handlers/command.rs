//! Text commands and slash command interactions

use std::sync::Arc;

use starboard_core::ChatPlatform;
use starboard_service::services::{CommandError, CommandInvoker};
use starboard_service::CommandService;
use tracing::debug;

use super::{EventHandler, HandlerResult};
use crate::events::{
    GatewayEventType, InteractionData, InteractionEvent, MessageCreateEvent, APPLICATION_COMMAND,
};

const GUILD_ONLY: &str = "This command can only be used in a server";

/// A slash command with its options extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Leaderboard { limit: Option<i64> },
    Announcements { channel: String, minimum_reactions: i32 },
    /// Missing or malformed options; holds the reply
    Invalid(String),
    Unknown(String),
}

impl SlashCommand {
    pub fn from_data(data: &InteractionData) -> Self {
        match data.name.as_str() {
            "leaderboard" => Self::Leaderboard {
                limit: data.integer_option("limit"),
            },
            "announcements" => {
                let (Some(channel), Some(minimum)) =
                    (data.string_option("channel"), data.integer_option("minimum"))
                else {
                    return Self::Invalid(CommandError::Usage.to_string());
                };
                match i32::try_from(minimum) {
                    Ok(minimum_reactions) => Self::Announcements {
                        channel,
                        minimum_reactions,
                    },
                    Err(_) => Self::Invalid(CommandError::NotANumber.to_string()),
                }
            }
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl EventHandler {
    pub(super) fn on_message(self: &Arc<Self>, message: MessageCreateEvent) {
        if message.author.bot {
            return;
        }
        let Some(guild_id) = message.guild_id.clone() else {
            return;
        };
        if !message
            .content
            .starts_with(&self.context().config().command_prefix)
        {
            return;
        }

        let permissions =
            self.guilds
                .permissions_for(&guild_id, &message.author.id, message.member_roles());
        let invoker = CommandInvoker::new(message.author.id.clone(), permissions);

        self.spawn(GatewayEventType::MessageCreate, move |handler| async move {
            let reply = CommandService::new(handler.context())
                .handle_text(&guild_id, &invoker, &message.content)
                .await?;

            if let Some(reply) = reply {
                handler
                    .rest
                    .send_message(&message.channel_id, &reply)
                    .await?;
            }
            Ok(())
        });
    }

    pub(super) fn on_interaction(self: &Arc<Self>, interaction: InteractionEvent) {
        if interaction.kind != APPLICATION_COMMAND {
            return;
        }

        self.spawn(GatewayEventType::InteractionCreate, move |handler| async move {
            let reply = handler.interaction_reply(&interaction).await?;
            handler
                .rest
                .respond_to_interaction(&interaction.id, &interaction.token, &reply)
                .await?;
            Ok(())
        });
    }

    async fn interaction_reply(&self, interaction: &InteractionEvent) -> HandlerResult<String> {
        let (Some(guild_id), Some(member), Some(data)) = (
            interaction.guild_id.as_deref(),
            interaction.member.as_ref(),
            interaction.data.as_ref(),
        ) else {
            return Ok(GUILD_ONLY.to_string());
        };

        let service = CommandService::new(self.context());
        let invoker = CommandInvoker::new(member.user.id.clone(), member.permissions);

        let reply = match SlashCommand::from_data(data) {
            SlashCommand::Leaderboard { limit } => service.leaderboard(guild_id, limit).await?,
            SlashCommand::Announcements {
                channel,
                minimum_reactions,
            } => {
                service
                    .set_announcements(guild_id, &invoker, &channel, minimum_reactions)
                    .await?
            }
            SlashCommand::Invalid(reply) => reply,
            SlashCommand::Unknown(name) => {
                debug!(%name, "Unknown slash command");
                CommandError::Unknown(name).to_string()
            }
        };

        Ok(reply)
    }
}
