//! Reaction engine - per-event orchestration
//!
//! One event runs normalize -> tally -> evaluate -> announce while holding
//! the lock for its message key, so events for the same message never
//! interleave and events for different messages run in parallel.

use std::sync::Arc;

use starboard_core::{RawReactionEvent, TrackedMessage};
use tracing::{debug, error, instrument, warn};

use super::announcement::{AnnouncementAction, AnnouncementSynchronizer};
use super::context::ServiceContext;
use super::error::ServiceError;
use super::locks::KeyedLocks;
use super::normalizer::{EventNormalizer, Normalized, SkipReason};
use super::settings::SettingsService;
use super::tally::TallyService;
use super::threshold;

/// What happened to one reaction event
#[derive(Debug)]
pub enum EngineOutcome {
    /// Filtered before touching any tally
    Skipped(SkipReason),
    /// Fetch or storage failure; the event is lost
    Dropped(ServiceError),
    /// Removal on a message that was never tracked
    Untracked,
    Tallied {
        tally: TrackedMessage,
        action: AnnouncementAction,
    },
}

/// Reaction engine
#[derive(Clone)]
pub struct ReactionEngine {
    ctx: ServiceContext,
    locks: Arc<KeyedLocks>,
}

impl ReactionEngine {
    pub fn new(ctx: ServiceContext) -> Self {
        Self {
            ctx,
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    /// Process one raw reaction event to completion
    #[instrument(skip(self, raw), fields(
        server_id = raw.guild_id.as_deref().unwrap_or("-"),
        message_id = %raw.message_id,
        direction = %raw.direction,
    ))]
    pub async fn handle(&self, raw: RawReactionEvent) -> EngineOutcome {
        let normalizer = EventNormalizer::new(&self.ctx);

        let key = match normalizer.qualify(&raw) {
            Ok(key) => key,
            Err(reason) => return EngineOutcome::Skipped(reason),
        };

        // Held until the announcement step is done
        let _guard = self.locks.lock(&key).await;

        let event = match normalizer.normalize(&raw).await {
            Ok(Normalized::Event(event)) => event,
            Ok(Normalized::Skip(reason)) => return EngineOutcome::Skipped(reason),
            Err(e) => {
                warn!(error = %e, "Failed to fetch reacted message, dropping event");
                return EngineOutcome::Dropped(e);
            }
        };

        let tally = match TallyService::new(&self.ctx).apply(&event).await {
            Ok(Some(tally)) => tally,
            Ok(None) => {
                debug!("Removal on untracked message");
                return EngineOutcome::Untracked;
            }
            Err(e) => {
                error!(error = %e, "Failed to update tally, dropping event");
                return EngineOutcome::Dropped(e);
            }
        };

        let settings = match SettingsService::new(&self.ctx).get(&key.server_id).await {
            Ok(settings) => settings,
            Err(e) => {
                error!(error = %e, "Failed to load server settings, skipping announcement");
                return EngineOutcome::Dropped(e);
            }
        };

        let plan = threshold::plan(&tally, settings.as_ref());
        let mut tally = tally;
        let action = AnnouncementSynchronizer::new(&self.ctx)
            .sync(plan, &mut tally, &event.source)
            .await;

        EngineOutcome::Tallied { tally, action }
    }

    /// Keys with events currently in flight
    pub fn in_flight(&self) -> usize {
        self.locks.len()
    }
}
