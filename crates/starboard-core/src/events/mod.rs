//! Inbound events - reaction notifications as delivered by the platform

mod reaction_event;

pub use reaction_event::{EmojiRef, RawReactionEvent, ReactionDirection};
