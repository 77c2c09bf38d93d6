//! Dispatch payloads
//!
//! Only the fields the bot reads are declared; serde ignores the rest.

use serde::Deserialize;
use serde_json::Value;
use starboard_core::{EmojiRef, Permissions, RawReactionEvent, ReactionDirection};

/// Partial user object
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRef {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationRef {
    pub id: String,
}

/// READY
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyEvent {
    pub user: UserRef,
    pub session_id: String,
    pub resume_gateway_url: String,
    pub application: ApplicationRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuildRole {
    pub id: String,
    pub permissions: Permissions,
}

/// GUILD_CREATE
#[derive(Debug, Clone, Deserialize)]
pub struct GuildCreateEvent {
    pub id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub roles: Vec<GuildRole>,
    #[serde(default)]
    pub unavailable: bool,
}

/// GUILD_DELETE
#[derive(Debug, Clone, Deserialize)]
pub struct GuildDeleteEvent {
    pub id: String,
    /// Set when the guild went down rather than the bot leaving it
    #[serde(default)]
    pub unavailable: bool,
}

/// GUILD_ROLE_CREATE / GUILD_ROLE_UPDATE
#[derive(Debug, Clone, Deserialize)]
pub struct RoleEvent {
    pub guild_id: String,
    pub role: GuildRole,
}

/// GUILD_ROLE_DELETE
#[derive(Debug, Clone, Deserialize)]
pub struct RoleDeleteEvent {
    pub guild_id: String,
    pub role_id: String,
}

/// MESSAGE_REACTION_ADD / MESSAGE_REACTION_REMOVE
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionEvent {
    pub user_id: String,
    pub channel_id: String,
    pub message_id: String,
    #[serde(default)]
    pub guild_id: Option<String>,
    pub emoji: EmojiRef,
}

impl ReactionEvent {
    pub fn into_raw(self, direction: ReactionDirection) -> RawReactionEvent {
        RawReactionEvent {
            guild_id: self.guild_id,
            channel_id: self.channel_id,
            message_id: self.message_id,
            user_id: self.user_id,
            emoji: self.emoji,
            direction,
        }
    }
}

/// Member attached to a guild message
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageMember {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// MESSAGE_CREATE
#[derive(Debug, Clone, Deserialize)]
pub struct MessageCreateEvent {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub guild_id: Option<String>,
    pub author: UserRef,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub member: Option<MessageMember>,
}

impl MessageCreateEvent {
    pub fn member_roles(&self) -> &[String] {
        self.member.as_ref().map_or(&[], |m| m.roles.as_slice())
    }
}

/// Interaction type of slash commands
pub const APPLICATION_COMMAND: u8 = 2;

/// Member that invoked an interaction, with resolved channel permissions
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionMember {
    pub user: UserRef,
    #[serde(default)]
    pub permissions: Permissions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl InteractionData {
    fn option(&self, name: &str) -> Option<&Value> {
        self.options.iter().find(|o| o.name == name).map(|o| &o.value)
    }

    /// Option value as a string; snowflakes arrive as strings, numbers as numbers
    pub fn string_option(&self, name: &str) -> Option<String> {
        match self.option(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn integer_option(&self, name: &str) -> Option<i64> {
        match self.option(name)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

/// INTERACTION_CREATE
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionEvent {
    pub id: String,
    pub token: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub member: Option<InteractionMember>,
    #[serde(default)]
    pub data: Option<InteractionData>,
}
