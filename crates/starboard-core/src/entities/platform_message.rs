//! Platform message - a message as fetched from the chat platform

use serde::{Deserialize, Serialize};

use crate::value_objects::QualifyingEmoji;

/// Author of a platform message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAuthor {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl MessageAuthor {
    /// Name shown in announcements
    pub fn display_name(&self) -> &str {
        self.global_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Per-emoji reaction count on a platform message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionSummary {
    pub emoji_id: Option<String>,
    pub emoji_name: Option<String>,
    pub count: i32,
}

/// A message fetched from the chat platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformMessage {
    pub id: String,
    pub channel_id: String,
    pub author: MessageAuthor,
    pub content: String,
    pub attachment_urls: Vec<String>,
    pub reactions: Vec<ReactionSummary>,
}

impl PlatformMessage {
    /// Current platform count for the qualifying emoji (zero if absent)
    pub fn reaction_count(&self, emoji: &QualifyingEmoji) -> i32 {
        self.reactions
            .iter()
            .find(|r| emoji.matches(r.emoji_id.as_deref(), r.emoji_name.as_deref()))
            .map_or(0, |r| r.count.max(0))
    }
}
