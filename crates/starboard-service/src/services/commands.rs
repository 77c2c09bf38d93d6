//! Admin commands
//!
//! Text commands look like `rc!announcements <channel> <minimum reactions>`.
//! The same operations back the slash commands.

use std::fmt;

use starboard_core::Permissions;
use tracing::{info, instrument, warn};

use crate::dto::SetAnnouncementRequest;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::leaderboard::{LeaderboardService, DEFAULT_LEADERBOARD_LIMIT};
use super::settings::SettingsService;

/// A parsed admin command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Announcements {
        channel: String,
        minimum_reactions: i32,
    },
}

/// Why a prefixed message is not a valid command; the display text is the reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Usage,
    NotANumber,
    Unknown(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage => f.write_str(
                "This command takes 2 params:\nannouncement channel id\nminimum message reactions",
            ),
            Self::NotANumber => f.write_str("minimum reactions should be a number"),
            Self::Unknown(_) => f.write_str("Unknown config command"),
        }
    }
}

impl AdminCommand {
    /// Parse a message. `None` means the message is not addressed to the bot.
    pub fn parse(prefix: &str, content: &str) -> Option<Result<Self, CommandError>> {
        let rest = content.strip_prefix(prefix)?;
        let mut args = rest.split_whitespace();
        let name = args.next()?;

        Some(match name {
            "announcements" => {
                let (Some(channel), Some(minimum)) = (args.next(), args.next()) else {
                    return Some(Err(CommandError::Usage));
                };
                minimum
                    .parse::<i32>()
                    .map(|minimum_reactions| Self::Announcements {
                        channel: channel.to_string(),
                        minimum_reactions,
                    })
                    .map_err(|_| CommandError::NotANumber)
            }
            other => Err(CommandError::Unknown(other.to_string())),
        })
    }
}

/// Who issued a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvoker {
    pub user_id: String,
    /// Effective server permissions of the invoker
    pub permissions: Permissions,
}

impl CommandInvoker {
    pub fn new(user_id: impl Into<String>, permissions: Permissions) -> Self {
        Self {
            user_id: user_id.into(),
            permissions,
        }
    }
}

const NOT_ALLOWED: &str =
    "You aren't allowed to use config commands, only the bot owner and server admins can use them";

/// Admin command service
pub struct CommandService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommandService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The bot owner, or a member who can administer or manage the server
    pub fn is_authorized(&self, invoker: &CommandInvoker) -> bool {
        self.ctx.config().owner_id.as_deref() == Some(invoker.user_id.as_str())
            || invoker.permissions.can_configure()
    }

    /// Handle a text message; returns the reply, or `None` if it is not a command
    #[instrument(skip(self, content), fields(user_id = %invoker.user_id))]
    pub async fn handle_text(
        &self,
        server_id: &str,
        invoker: &CommandInvoker,
        content: &str,
    ) -> ServiceResult<Option<String>> {
        let Some(parsed) = AdminCommand::parse(&self.ctx.config().command_prefix, content) else {
            return Ok(None);
        };

        if !self.is_authorized(invoker) {
            warn!(server_id, "Unauthorized config command");
            return Ok(Some(NOT_ALLOWED.to_string()));
        }

        let reply = match parsed {
            Ok(AdminCommand::Announcements {
                channel,
                minimum_reactions,
            }) => {
                self.set_announcements(server_id, invoker, &channel, minimum_reactions)
                    .await?
            }
            Err(e) => e.to_string(),
        };

        Ok(Some(reply))
    }

    /// Configure announcements; returns the reply text.
    ///
    /// Invalid input is answered rather than returned as an error.
    #[instrument(skip(self), fields(user_id = %invoker.user_id))]
    pub async fn set_announcements(
        &self,
        server_id: &str,
        invoker: &CommandInvoker,
        channel: &str,
        minimum_reactions: i32,
    ) -> ServiceResult<String> {
        if !self.is_authorized(invoker) {
            return Ok(NOT_ALLOWED.to_string());
        }

        let request = SetAnnouncementRequest::new(channel, minimum_reactions);
        match SettingsService::new(self.ctx)
            .set_announcement(server_id, request)
            .await
        {
            Ok(settings) => {
                info!(server_id, "Announcements configured by command");
                Ok(format!(
                    "Announcements will be posted in <#{}> once a message reaches {} {}",
                    settings.announcement_channel().unwrap_or_default(),
                    settings.threshold(),
                    self.ctx.config().emoji
                ))
            }
            Err(ServiceError::Validation(msg)) => Ok(format!("Invalid settings: {msg}")),
            Err(e) => Err(e),
        }
    }

    /// Leaderboard reply for a server
    pub async fn leaderboard(&self, server_id: &str, limit: Option<i64>) -> ServiceResult<String> {
        let response = LeaderboardService::new(self.ctx)
            .render(server_id, limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT))
            .await?;
        Ok(response.to_message())
    }
}
