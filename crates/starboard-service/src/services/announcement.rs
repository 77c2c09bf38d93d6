//! Announcement rendering and synchronization
//!
//! An announcement is created once, when a message first crosses its
//! server's threshold, and edited in place on every later event.

use starboard_common::EditMode;
use starboard_core::{AnnouncementRef, PlatformMessage, QualifyingEmoji, TrackedMessage};
use tracing::{debug, error, instrument, warn};

use super::context::ServiceContext;
use super::threshold::{AnnouncementPlan, HoldReason};

/// Longest message body the platform accepts, in characters
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Result of the announcement step for one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnouncementAction {
    Created(AnnouncementRef),
    Edited(AnnouncementRef),
    NotConfigured,
    BelowThreshold,
    /// The platform call or the id write failed; already logged
    Failed,
}

/// Composes announcement bodies
pub struct AnnouncementRenderer<'a> {
    emoji: &'a QualifyingEmoji,
    permalink_base: &'a str,
}

impl<'a> AnnouncementRenderer<'a> {
    pub fn new(emoji: &'a QualifyingEmoji, permalink_base: &'a str) -> Self {
        Self {
            emoji,
            permalink_base,
        }
    }

    /// Render the full announcement for a tally and its source message
    pub fn render(&self, tally: &TrackedMessage, source: &PlatformMessage) -> String {
        let self_react = if tally.author_has_reacted {
            " (self react)"
        } else {
            ""
        };

        let mut body = format!(
            "by {}, {} {}{} (original message: <{}>)\n{}",
            source.author.display_name(),
            tally.displayed_reaction_count(),
            self.emoji,
            self_react,
            tally.key.permalink(self.permalink_base),
            source.content,
        );
        for url in &source.attachment_urls {
            body.push('\n');
            body.push_str(url);
        }

        clamp_chars(body, MAX_CONTENT_CHARS)
    }

    /// Replace only the count in an existing announcement.
    ///
    /// The count is the digit run directly in front of ` {emoji}`. Returns
    /// `None` when the text has no such run.
    pub fn splice(&self, existing: &str, count: i32) -> Option<String> {
        let marker = format!(" {}", self.emoji);

        existing.match_indices(&marker).find_map(|(at, _)| {
            let head = &existing[..at];
            let start = head.trim_end_matches(|c: char| c.is_ascii_digit()).len();
            (start < at).then(|| format!("{}{count}{}", &existing[..start], &existing[at..]))
        })
    }
}

fn clamp_chars(mut text: String, max_chars: usize) -> String {
    if let Some((end, _)) = text.char_indices().nth(max_chars) {
        text.truncate(end);
    }
    text
}

/// Carries out an announcement plan against the platform
pub struct AnnouncementSynchronizer<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AnnouncementSynchronizer<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn renderer(&self) -> AnnouncementRenderer<'a> {
        let config = self.ctx.config();
        AnnouncementRenderer::new(&config.emoji, &config.permalink_base)
    }

    /// Execute the plan. A created announcement is recorded on `tally`.
    #[instrument(skip_all, fields(key = %tally.key))]
    pub async fn sync(
        &self,
        plan: AnnouncementPlan,
        tally: &mut TrackedMessage,
        source: &PlatformMessage,
    ) -> AnnouncementAction {
        match plan {
            AnnouncementPlan::Nothing(HoldReason::NotConfigured) => {
                debug!("Announcements not configured");
                AnnouncementAction::NotConfigured
            }
            AnnouncementPlan::Nothing(HoldReason::BelowThreshold) => {
                debug!(displayed = tally.displayed_reaction_count(), "Below threshold");
                AnnouncementAction::BelowThreshold
            }
            AnnouncementPlan::Create { channel_id } => self.create(&channel_id, tally, source).await,
            AnnouncementPlan::Edit { announcement } => self.edit(announcement, tally, source).await,
        }
    }

    async fn create(
        &self,
        channel_id: &str,
        tally: &mut TrackedMessage,
        source: &PlatformMessage,
    ) -> AnnouncementAction {
        let content = self.renderer().render(tally, source);

        let message_id = match self.ctx.platform().send_message(channel_id, &content).await {
            Ok(id) => id,
            Err(e) => {
                warn!(channel_id, error = %e, "Failed to send announcement");
                return AnnouncementAction::Failed;
            }
        };

        let announcement = AnnouncementRef::new(channel_id, message_id);
        match self
            .ctx
            .tally_repo()
            .record_announcement(&tally.key, &announcement)
            .await
        {
            Ok(true) => {
                tally.record_announcement(announcement.clone());
                debug!(announcement_id = %announcement.message_id, "Announcement created");
                AnnouncementAction::Created(announcement)
            }
            Ok(false) => {
                error!(
                    channel_id,
                    announcement_id = %announcement.message_id,
                    "Orphan announcement: another announcement was already recorded"
                );
                AnnouncementAction::Failed
            }
            Err(e) => {
                error!(
                    channel_id,
                    announcement_id = %announcement.message_id,
                    error = %e,
                    "Orphan announcement: failed to record its id"
                );
                AnnouncementAction::Failed
            }
        }
    }

    async fn edit(
        &self,
        announcement: AnnouncementRef,
        tally: &TrackedMessage,
        source: &PlatformMessage,
    ) -> AnnouncementAction {
        let content = match self.ctx.config().edit_mode {
            EditMode::Render => self.renderer().render(tally, source),
            EditMode::Splice => self.spliced(&announcement, tally, source).await,
        };

        match self
            .ctx
            .platform()
            .edit_message(&announcement.channel_id, &announcement.message_id, &content)
            .await
        {
            Ok(()) => AnnouncementAction::Edited(announcement),
            Err(e) => {
                warn!(
                    channel_id = %announcement.channel_id,
                    announcement_id = %announcement.message_id,
                    error = %e,
                    "Failed to edit announcement"
                );
                AnnouncementAction::Failed
            }
        }
    }

    /// Patch the count in the posted text, falling back to a full render
    async fn spliced(
        &self,
        announcement: &AnnouncementRef,
        tally: &TrackedMessage,
        source: &PlatformMessage,
    ) -> String {
        let renderer = self.renderer();
        let existing = self
            .ctx
            .platform()
            .fetch_message(&announcement.channel_id, &announcement.message_id)
            .await;

        existing
            .ok()
            .and_then(|message| renderer.splice(&message.content, tally.displayed_reaction_count()))
            .unwrap_or_else(|| renderer.render(tally, source))
    }
}
