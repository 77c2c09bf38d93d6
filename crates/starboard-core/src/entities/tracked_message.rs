//! Tracked message entity - the per-message tally of qualifying reactions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::events::ReactionDirection;

/// Composite identity of a tracked message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageKey {
    pub server_id: String,
    pub channel_id: String,
    pub message_id: String,
}

impl MessageKey {
    /// Create a new MessageKey
    pub fn new(
        server_id: impl Into<String>,
        channel_id: impl Into<String>,
        message_id: impl Into<String>,
    ) -> Self {
        Self {
            server_id: server_id.into(),
            channel_id: channel_id.into(),
            message_id: message_id.into(),
        }
    }

    /// Link back to the original message under the given base url
    pub fn permalink(&self, base: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            base.trim_end_matches('/'),
            self.server_id,
            self.channel_id,
            self.message_id
        )
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.server_id, self.channel_id, self.message_id)
    }
}

/// Location of a posted announcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementRef {
    pub channel_id: String,
    pub message_id: String,
}

impl AnnouncementRef {
    pub fn new(channel_id: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            message_id: message_id.into(),
        }
    }
}

/// A single normalized tally mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyChange {
    pub key: MessageKey,
    pub author_id: String,
    pub direction: ReactionDirection,
    /// The reacting user is the message author
    pub is_self: bool,
    /// Authoritative count reported by the platform, when the snapshot strategy is used
    pub observed_count: Option<i32>,
}

/// Tracked message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedMessage {
    pub key: MessageKey,
    pub author_id: String,
    pub raw_reaction_count: i32,
    pub author_has_reacted: bool,
    pub announcement: Option<AnnouncementRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TrackedMessage {
    /// Create an empty tally for a message seen for the first time
    pub fn new(key: MessageKey, author_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            key,
            author_id: author_id.into(),
            raw_reaction_count: 0,
            author_has_reacted: false,
            announcement: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Publicly shown count: the author's own reaction is excluded
    #[inline]
    pub fn displayed_reaction_count(&self) -> i32 {
        (self.raw_reaction_count - i32::from(self.author_has_reacted)).max(0)
    }

    /// Check if an announcement has been posted for this message
    #[inline]
    pub fn is_announced(&self) -> bool {
        self.announcement.is_some()
    }

    /// Apply one add/remove to the tally.
    ///
    /// With an observed count the raw count is replaced by that snapshot,
    /// otherwise it moves by one and never drops below zero. Only the
    /// author's own add sets `author_has_reacted`; the author's remove
    /// always clears it.
    pub fn apply(&mut self, change: &TallyChange) {
        match change.direction {
            ReactionDirection::Add => {
                self.raw_reaction_count = match change.observed_count {
                    Some(observed) => observed.max(0),
                    None => self.raw_reaction_count.saturating_add(1),
                };
                if change.is_self {
                    self.author_has_reacted = true;
                }
            }
            ReactionDirection::Remove => {
                self.raw_reaction_count = match change.observed_count {
                    Some(observed) => observed.max(0),
                    None => (self.raw_reaction_count - 1).max(0),
                };
                if change.is_self {
                    self.author_has_reacted = false;
                }
            }
        }

        // Nobody, the author included, can be reacting to a message with no reactions
        if self.raw_reaction_count == 0 {
            self.author_has_reacted = false;
        }

        self.updated_at = Utc::now();
    }

    /// Record the announcement once. Returns false if one was already recorded.
    pub fn record_announcement(&mut self, announcement: AnnouncementRef) -> bool {
        if self.announcement.is_some() {
            return false;
        }
        self.announcement = Some(announcement);
        self.updated_at = Utc::now();
        true
    }
}
