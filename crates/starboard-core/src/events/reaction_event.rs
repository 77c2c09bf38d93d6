//! Raw reaction add/remove events
//!
//! Delivery carries no ordering or exactly-once guarantee: events for the same
//! message may arrive duplicated, reordered, or not at all.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::QualifyingEmoji;

/// Whether a reaction was added or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionDirection {
    Add,
    Remove,
}

impl fmt::Display for ReactionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Remove => f.write_str("remove"),
        }
    }
}

/// Emoji as identified by the platform
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmojiRef {
    /// Custom emoji id; absent for unicode emoji
    #[serde(default)]
    pub id: Option<String>,
    /// Unicode character or custom emoji name
    #[serde(default)]
    pub name: Option<String>,
}

impl EmojiRef {
    pub fn unicode(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    pub fn custom(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
        }
    }

    #[inline]
    pub fn is(&self, emoji: &QualifyingEmoji) -> bool {
        emoji.matches(self.id.as_deref(), self.name.as_deref())
    }
}

/// A reaction add/remove notification, before normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReactionEvent {
    /// Absent for reactions outside a server (direct messages)
    pub guild_id: Option<String>,
    pub channel_id: String,
    pub message_id: String,
    pub user_id: String,
    pub emoji: EmojiRef,
    pub direction: ReactionDirection,
}

impl RawReactionEvent {
    /// Create a reaction-add event
    pub fn add(
        guild_id: Option<String>,
        channel_id: impl Into<String>,
        message_id: impl Into<String>,
        user_id: impl Into<String>,
        emoji: EmojiRef,
    ) -> Self {
        Self {
            guild_id,
            channel_id: channel_id.into(),
            message_id: message_id.into(),
            user_id: user_id.into(),
            emoji,
            direction: ReactionDirection::Add,
        }
    }

    /// Create a reaction-remove event
    pub fn remove(
        guild_id: Option<String>,
        channel_id: impl Into<String>,
        message_id: impl Into<String>,
        user_id: impl Into<String>,
        emoji: EmojiRef,
    ) -> Self {
        Self {
            direction: ReactionDirection::Remove,
            ..Self::add(guild_id, channel_id, message_id, user_id, emoji)
        }
    }
}
