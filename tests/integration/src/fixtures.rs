//! Test fixtures and a ready-wired engine

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use starboard_core::{
    EmojiRef, MessageKey, QualifyingEmoji, RawReactionEvent, ServerSettings, TrackedMessage,
};
use starboard_service::{EngineConfig, EngineOutcome, ReactionEngine, ServiceContextBuilder};

use crate::fakes::{FakePlatform, InMemorySettingsRepository, InMemoryTallyRepository};

pub const SERVER: &str = "1000";
pub const CHANNEL: &str = "2000";
pub const ANNOUNCE_CHANNEL: &str = "9000";
pub const AUTHOR: &str = "3000";
pub const BOT: &str = "9999";
pub const HEART: &str = "💖";

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// A message id no other test uses
pub fn unique_message_id() -> String {
    format!("5{:05}", COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Reactor ids that are never the author or the bot
pub fn user(n: usize) -> String {
    format!("4{n:03}")
}

/// A reaction add with the default emoji, in the test server
pub fn add(message_id: &str, user_id: &str) -> RawReactionEvent {
    RawReactionEvent::add(
        Some(SERVER.to_string()),
        CHANNEL,
        message_id,
        user_id,
        EmojiRef::unicode(HEART),
    )
}

/// A reaction remove with the default emoji, in the test server
pub fn remove(message_id: &str, user_id: &str) -> RawReactionEvent {
    RawReactionEvent::remove(
        Some(SERVER.to_string()),
        CHANNEL,
        message_id,
        user_id,
        EmojiRef::unicode(HEART),
    )
}

pub fn key(message_id: &str) -> MessageKey {
    MessageKey::new(SERVER, CHANNEL, message_id)
}

/// Engine wired to in-memory storage and a fake platform
pub struct Harness {
    pub engine: ReactionEngine,
    pub platform: Arc<FakePlatform>,
    pub tallies: Arc<InMemoryTallyRepository>,
    pub settings: Arc<InMemorySettingsRepository>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let platform = Arc::new(FakePlatform::new(config.emoji.clone(), BOT));
        let tallies = Arc::new(InMemoryTallyRepository::new());
        let settings = Arc::new(InMemorySettingsRepository::new());

        let context = ServiceContextBuilder::new()
            .tally_repo(tallies.clone())
            .settings_repo(settings.clone())
            .platform(platform.clone())
            .config(config)
            .bot_user_id(BOT)
            .build()
            .expect("all dependencies are set");

        Self {
            engine: ReactionEngine::new(context),
            platform,
            tallies,
            settings,
        }
    }

    /// Announce in `ANNOUNCE_CHANNEL` from `minimum_reactions` displayed reactions
    pub fn configure(&self, minimum_reactions: i32) {
        self.settings.insert(ServerSettings::with_announcements(
            SERVER,
            ANNOUNCE_CHANNEL,
            minimum_reactions,
        ));
    }

    /// Post a message by `AUTHOR` and return its id
    pub fn post(&self) -> String {
        let message_id = unique_message_id();
        self.platform
            .post(CHANNEL, &message_id, AUTHOR, "look at this");
        message_id
    }

    /// A user reacts: the platform count goes up, then the event is delivered
    pub async fn react(&self, message_id: &str, user_id: &str) -> EngineOutcome {
        let count = self.platform.count(CHANNEL, message_id);
        self.platform.set_count(CHANNEL, message_id, count + 1);
        self.engine.handle(add(message_id, user_id)).await
    }

    /// A user removes a reaction: the platform count goes down, then the event is delivered
    pub async fn unreact(&self, message_id: &str, user_id: &str) -> EngineOutcome {
        let count = self.platform.count(CHANNEL, message_id);
        self.platform
            .set_count(CHANNEL, message_id, (count - 1).max(0));
        self.engine.handle(remove(message_id, user_id)).await
    }

    pub fn tally(&self, message_id: &str) -> Option<TrackedMessage> {
        self.tallies.get(&key(message_id))
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine config with the running counter instead of platform snapshots
pub fn running_config() -> EngineConfig {
    EngineConfig {
        count_strategy: starboard_core::CountStrategy::Running,
        ..EngineConfig::default()
    }
}

/// Engine config tracking a custom emoji
pub fn custom_emoji_config(raw: &str) -> EngineConfig {
    EngineConfig {
        emoji: QualifyingEmoji::parse(raw),
        ..EngineConfig::default()
    }
}
