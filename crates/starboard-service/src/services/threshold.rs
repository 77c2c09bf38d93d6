//! Threshold evaluator
//!
//! Decides what the announcement synchronizer should do after a tally update.

use starboard_core::{AnnouncementRef, ServerSettings, TrackedMessage};

/// Why no announcement is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldReason {
    NotConfigured,
    BelowThreshold,
}

/// What to do with the announcement for a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnouncementPlan {
    /// Post a new announcement to this channel
    Create { channel_id: String },
    /// Update the existing announcement in place
    Edit { announcement: AnnouncementRef },
    Nothing(HoldReason),
}

/// True iff announcements are configured and the displayed count reaches the threshold
pub fn should_announce(tally: &TrackedMessage, settings: Option<&ServerSettings>) -> bool {
    settings.is_some_and(|s| {
        s.is_configured() && tally.displayed_reaction_count() >= s.threshold()
    })
}

/// Plan the announcement step.
///
/// An announced message is always edited, whatever the current settings or
/// count; announcements are never retracted.
pub fn plan(tally: &TrackedMessage, settings: Option<&ServerSettings>) -> AnnouncementPlan {
    if let Some(announcement) = &tally.announcement {
        return AnnouncementPlan::Edit {
            announcement: announcement.clone(),
        };
    }

    let Some(channel_id) = settings.and_then(ServerSettings::announcement_channel) else {
        return AnnouncementPlan::Nothing(HoldReason::NotConfigured);
    };

    if should_announce(tally, settings) {
        AnnouncementPlan::Create {
            channel_id: channel_id.to_string(),
        }
    } else {
        AnnouncementPlan::Nothing(HoldReason::BelowThreshold)
    }
}
