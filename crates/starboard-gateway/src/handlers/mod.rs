//! Dispatch handlers
//!
//! Routes gateway dispatches to the engine and the command services. Cache
//! and session bookkeeping happens inline, in gateway order; everything that
//! talks to storage or the REST API runs on its own task so a slow event
//! never stalls the connection.

mod command;
mod error;
mod guild_cache;
mod lifecycle;
mod reaction;

pub use command::SlashCommand;
pub use error::{HandlerError, HandlerResult};
pub use guild_cache::GuildCache;

use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use starboard_core::ReactionDirection;
use starboard_service::{ReactionEngine, ServiceContext};
use tracing::{trace, warn};

use crate::events::GatewayEventType;
use crate::rest::DiscordRestClient;

/// Gateway event handler
pub struct EventHandler {
    engine: ReactionEngine,
    rest: Arc<DiscordRestClient>,
    guilds: GuildCache,
    application_id: RwLock<Option<String>>,
}

impl EventHandler {
    pub fn new(
        engine: ReactionEngine,
        rest: Arc<DiscordRestClient>,
        application_id: Option<String>,
    ) -> Self {
        Self {
            engine,
            rest,
            guilds: GuildCache::new(),
            application_id: RwLock::new(application_id),
        }
    }

    pub(crate) fn context(&self) -> &ServiceContext {
        self.engine.context()
    }

    pub fn guilds(&self) -> &GuildCache {
        &self.guilds
    }

    pub fn application_id(&self) -> Option<String> {
        self.application_id.read().clone()
    }

    /// Handle one dispatch
    pub fn dispatch(self: &Arc<Self>, event: &str, data: Value) {
        let Some(event_type) = GatewayEventType::from_str(event) else {
            trace!(event, "Ignoring dispatch");
            return;
        };

        let result = match event_type {
            GatewayEventType::Ready => parse(data).map(|ready| self.on_ready(ready)),
            GatewayEventType::Resumed => {
                tracing::info!("Gateway session resumed");
                Ok(())
            }
            GatewayEventType::GuildCreate => parse(data).map(|guild| self.on_guild_create(guild)),
            GatewayEventType::GuildDelete => parse(data).map(|guild| self.on_guild_delete(guild)),
            GatewayEventType::GuildRoleCreate | GatewayEventType::GuildRoleUpdate => {
                parse(data).map(|role| self.on_role_update(role))
            }
            GatewayEventType::GuildRoleDelete => parse(data).map(|role| self.on_role_delete(role)),
            GatewayEventType::MessageReactionAdd => {
                parse(data).map(|event| self.on_reaction(event, ReactionDirection::Add))
            }
            GatewayEventType::MessageReactionRemove => {
                parse(data).map(|event| self.on_reaction(event, ReactionDirection::Remove))
            }
            GatewayEventType::MessageCreate => parse(data).map(|message| self.on_message(message)),
            GatewayEventType::InteractionCreate => {
                parse(data).map(|interaction| self.on_interaction(interaction))
            }
        };

        if let Err(e) = result {
            warn!(event = %event_type, error = %e, "Failed to handle dispatch");
        }
    }

    /// Run handler work off the gateway task
    fn spawn<F, Fut>(self: &Arc<Self>, event: GatewayEventType, work: F)
    where
        F: FnOnce(Arc<Self>) -> Fut,
        Fut: Future<Output = HandlerResult<()>> + Send + 'static,
    {
        let fut = work(Arc::clone(self));
        tokio::spawn(async move {
            if let Err(e) = fut.await {
                warn!(event = %event, error = %e, "Failed to handle dispatch");
            }
        });
    }
}

fn parse<T: DeserializeOwned>(data: Value) -> HandlerResult<T> {
    Ok(serde_json::from_value(data)?)
}
