//! Tally service
//!
//! Converts normalized events into tally changes and persists them.

use starboard_core::{CountStrategy, TallyChange, TrackedMessage};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::normalizer::NormalizedEvent;

/// Tally service
pub struct TallyService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TallyService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Build the change for an event under the configured count strategy
    pub fn change_for(&self, event: &NormalizedEvent) -> TallyChange {
        let observed_count = match self.ctx.config().count_strategy {
            CountStrategy::Snapshot => Some(event.observed_count.max(0)),
            CountStrategy::Running => None,
        };

        TallyChange {
            key: event.key.clone(),
            author_id: event.author_id.clone(),
            direction: event.direction,
            is_self: event.is_self_reaction,
            observed_count,
        }
    }

    /// Apply an event to its message's tally
    ///
    /// Returns `None` for a removal on a message that was never tracked.
    #[instrument(skip(self, event), fields(key = %event.key))]
    pub async fn apply(&self, event: &NormalizedEvent) -> ServiceResult<Option<TrackedMessage>> {
        let change = self.change_for(event);
        let tally = self.ctx.tally_repo().apply(&change).await?;

        if let Some(tally) = &tally {
            debug!(
                raw = tally.raw_reaction_count,
                displayed = tally.displayed_reaction_count(),
                author_has_reacted = tally.author_has_reacted,
                "Tally updated"
            );
        }

        Ok(tally)
    }
}
