//! Gateway intents - which event groups the session subscribes to

use bitflags::bitflags;
use serde::{Serialize, Serializer};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Intents: u64 {
        const GUILDS = 1 << 0;
        const GUILD_MESSAGES = 1 << 9;
        const GUILD_MESSAGE_REACTIONS = 1 << 10;
        const DIRECT_MESSAGE_REACTIONS = 1 << 13;
        /// Privileged; needed to read text commands and message bodies
        const MESSAGE_CONTENT = 1 << 15;
    }
}

impl Intents {
    /// Everything the bot listens to
    #[must_use]
    pub const fn bot() -> Self {
        Self::GUILDS
            .union(Self::GUILD_MESSAGES)
            .union(Self::GUILD_MESSAGE_REACTIONS)
            .union(Self::MESSAGE_CONTENT)
    }
}

impl Serialize for Intents {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.bits())
    }
}
