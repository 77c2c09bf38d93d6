//! Reaction add/remove events

use std::sync::Arc;

use starboard_core::ReactionDirection;
use starboard_service::EngineOutcome;
use tracing::{debug, trace};

use super::EventHandler;
use crate::events::{GatewayEventType, ReactionEvent};

impl EventHandler {
    pub(super) fn on_reaction(self: &Arc<Self>, event: ReactionEvent, direction: ReactionDirection) {
        let raw = event.into_raw(direction);
        let event_type = match direction {
            ReactionDirection::Add => GatewayEventType::MessageReactionAdd,
            ReactionDirection::Remove => GatewayEventType::MessageReactionRemove,
        };

        self.spawn(event_type, move |handler| async move {
            match handler.engine.handle(raw).await {
                EngineOutcome::Skipped(reason) => trace!(%reason, "Reaction skipped"),
                EngineOutcome::Dropped(e) => debug!(
                    error = %e,
                    code = e.error_code(),
                    transient = e.is_transient(),
                    storage = e.is_storage(),
                    "Reaction dropped"
                ),
                EngineOutcome::Untracked => trace!("Reaction on untracked message"),
                EngineOutcome::Tallied { tally, action } => debug!(
                    key = %tally.key,
                    count = tally.displayed_reaction_count(),
                    ?action,
                    "Reaction tallied"
                ),
            }
            Ok(())
        });
    }
}
