//! REST response bodies and their mapping to domain types

use serde::Deserialize;
use starboard_core::{MessageAuthor, PlatformMessage, ReactionSummary};

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiAttachment {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEmoji {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiReaction {
    pub count: i32,
    pub emoji: ApiEmoji,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    pub id: String,
    pub channel_id: String,
    pub author: ApiUser,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<ApiAttachment>,
    #[serde(default)]
    pub reactions: Vec<ApiReaction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMember {
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub user: Option<ApiUser>,
}

impl ApiMember {
    /// Server nickname, then global name, then username
    pub fn display_name(&self) -> Option<String> {
        self.nick
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| {
                self.user
                    .as_ref()
                    .map(|u| MessageAuthor::from(u.clone()).display_name().to_string())
            })
    }
}

impl From<ApiUser> for MessageAuthor {
    fn from(user: ApiUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            global_name: user.global_name,
            bot: user.bot,
        }
    }
}

impl From<ApiMessage> for PlatformMessage {
    fn from(message: ApiMessage) -> Self {
        Self {
            id: message.id,
            channel_id: message.channel_id,
            author: message.author.into(),
            content: message.content,
            attachment_urls: message.attachments.into_iter().map(|a| a.url).collect(),
            reactions: message
                .reactions
                .into_iter()
                .map(|r| ReactionSummary {
                    emoji_id: r.emoji.id,
                    emoji_name: r.emoji.name,
                    count: r.count,
                })
                .collect(),
        }
    }
}
