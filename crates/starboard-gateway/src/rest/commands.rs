//! Slash command definitions registered per server

use serde::Serialize;
use starboard_service::dto::requests::MAX_MINIMUM_REACTIONS;
use starboard_service::services::leaderboard::MAX_LEADERBOARD_LIMIT;

const OPTION_INTEGER: u8 = 4;
const OPTION_CHANNEL: u8 = 7;
/// Text channels only
const CHANNEL_TYPE_GUILD_TEXT: u8 = 0;
/// MANAGE_GUILD, as a decimal string
const MANAGE_GUILD_PERMISSION: &str = "32";

#[derive(Debug, Clone, Serialize)]
pub struct CommandOptionDefinition {
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub channel_types: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOptionDefinition>,
    /// Hide the command from members without these permissions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_member_permissions: Option<&'static str>,
}

/// The commands every server gets
pub fn bot_commands() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition {
            name: "leaderboard",
            description: "Authors with the most reactions in this server",
            options: vec![CommandOptionDefinition {
                kind: OPTION_INTEGER,
                name: "limit",
                description: "How many authors to show",
                required: false,
                min_value: Some(1),
                max_value: Some(MAX_LEADERBOARD_LIMIT),
                channel_types: Vec::new(),
            }],
            default_member_permissions: None,
        },
        CommandDefinition {
            name: "announcements",
            description: "Where to announce popular messages, and from how many reactions",
            options: vec![
                CommandOptionDefinition {
                    kind: OPTION_CHANNEL,
                    name: "channel",
                    description: "Announcement channel",
                    required: true,
                    min_value: None,
                    max_value: None,
                    channel_types: vec![CHANNEL_TYPE_GUILD_TEXT],
                },
                CommandOptionDefinition {
                    kind: OPTION_INTEGER,
                    name: "minimum",
                    description: "Minimum reactions before a message is announced",
                    required: true,
                    min_value: Some(0),
                    max_value: Some(i64::from(MAX_MINIMUM_REACTIONS)),
                    channel_types: Vec::new(),
                },
            ],
            default_member_permissions: Some(MANAGE_GUILD_PERMISSION),
        },
    ]
}
