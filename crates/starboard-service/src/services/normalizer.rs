//! Event normalizer
//!
//! Turns a raw reaction notification into a tally input: filters out
//! reactions that do not count, fetches the reacted message and works out
//! the author and whether the reaction is the author's own.

use std::fmt;

use starboard_core::{MessageKey, PlatformMessage, RawReactionEvent, ReactionDirection};
use tracing::{instrument, trace};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Why an event does not affect any tally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not the qualifying emoji
    EmojiMismatch,
    /// Reaction outside a server, e.g. in a direct message
    OutsideServer,
    /// Reaction on a message the bot itself posted
    OwnMessage,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EmojiMismatch => "emoji mismatch",
            Self::OutsideServer => "outside server",
            Self::OwnMessage => "own message",
        })
    }
}

/// A qualifying reaction, resolved against the fetched message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub key: MessageKey,
    pub author_id: String,
    pub is_self_reaction: bool,
    pub direction: ReactionDirection,
    /// Platform count for the qualifying emoji at fetch time
    pub observed_count: i32,
    /// The reacted message, used to render announcements
    pub source: PlatformMessage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Skip(SkipReason),
    Event(NormalizedEvent),
}

/// Event normalizer
pub struct EventNormalizer<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EventNormalizer<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Filter that needs no I/O
    pub fn qualify(&self, raw: &RawReactionEvent) -> Result<MessageKey, SkipReason> {
        if !raw.emoji.is(&self.ctx.config().emoji) {
            return Err(SkipReason::EmojiMismatch);
        }

        let server_id = raw
            .guild_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(SkipReason::OutsideServer)?;

        Ok(MessageKey::new(server_id, &raw.channel_id, &raw.message_id))
    }

    /// Fetch the reacted message and build the tally input
    ///
    /// # Errors
    /// Returns the platform error when the message cannot be fetched
    #[instrument(skip(self, raw), fields(message_id = %raw.message_id, direction = %raw.direction))]
    pub async fn normalize(&self, raw: &RawReactionEvent) -> ServiceResult<Normalized> {
        let key = match self.qualify(raw) {
            Ok(key) => key,
            Err(reason) => {
                trace!(%reason, "Reaction filtered");
                return Ok(Normalized::Skip(reason));
            }
        };

        let source = self
            .ctx
            .platform()
            .fetch_message(&key.channel_id, &key.message_id)
            .await?;

        if self.ctx.bot_user_id().as_deref() == Some(source.author.id.as_str()) {
            trace!("Reaction on own message filtered");
            return Ok(Normalized::Skip(SkipReason::OwnMessage));
        }

        Ok(Normalized::Event(NormalizedEvent {
            author_id: source.author.id.clone(),
            is_self_reaction: raw.user_id == source.author.id,
            direction: raw.direction,
            observed_count: source.reaction_count(&self.ctx.config().emoji),
            key,
            source,
        }))
    }
}
