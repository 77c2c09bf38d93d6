//! REST API client for the chat platform

mod client;
mod commands;
mod models;

pub use client::DiscordRestClient;
pub use commands::{bot_commands, CommandDefinition, CommandOptionDefinition};
pub use models::{ApiAttachment, ApiEmoji, ApiMember, ApiMessage, ApiReaction, ApiUser};
