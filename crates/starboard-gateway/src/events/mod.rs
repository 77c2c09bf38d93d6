//! Gateway dispatch events the bot consumes

mod event_types;
mod payloads;

pub use event_types::GatewayEventType;
pub use payloads::{
    ApplicationRef, CommandOption, GuildCreateEvent, GuildDeleteEvent, GuildRole,
    InteractionData, InteractionEvent, InteractionMember, MessageCreateEvent, MessageMember,
    ReactionEvent, ReadyEvent, RoleDeleteEvent, RoleEvent, UserRef, APPLICATION_COMMAND,
};
