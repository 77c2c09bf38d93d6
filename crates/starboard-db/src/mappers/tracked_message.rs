//! TrackedMessage entity <-> model mapper

use starboard_core::entities::{AnnouncementRef, MessageKey, TrackedMessage};

use crate::models::TrackedMessageModel;

/// Convert TrackedMessageModel to TrackedMessage entity
impl From<TrackedMessageModel> for TrackedMessage {
    fn from(model: TrackedMessageModel) -> Self {
        // A recorded id without its channel cannot be edited, so it is
        // only surfaced together with the channel
        let announcement = match (model.announcement_channel_id, model.announced_message_id) {
            (Some(channel_id), Some(message_id)) => Some(AnnouncementRef {
                channel_id,
                message_id,
            }),
            _ => None,
        };

        TrackedMessage {
            key: MessageKey {
                server_id: model.server_id,
                channel_id: model.channel_id,
                message_id: model.message_id,
            },
            author_id: model.author_id,
            raw_reaction_count: model.reaction_count,
            author_has_reacted: model.author_reacted,
            announcement,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Tally fields written back after a change
pub struct TallyUpdate<'a> {
    pub server_id: &'a str,
    pub channel_id: &'a str,
    pub message_id: &'a str,
    pub reaction_count: i32,
    pub author_reacted: bool,
}

impl<'a> TallyUpdate<'a> {
    pub fn new(tally: &'a TrackedMessage) -> Self {
        Self {
            server_id: &tally.key.server_id,
            channel_id: &tally.key.channel_id,
            message_id: &tally.key.message_id,
            reaction_count: tally.raw_reaction_count,
            author_reacted: tally.author_has_reacted,
        }
    }
}
