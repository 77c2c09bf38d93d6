//! In-memory implementations of the repository and platform traits

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use starboard_core::{
    AnnouncementRef, ChatPlatform, DomainError, LeaderboardEntry, MessageAuthor, MessageKey,
    PlatformError, PlatformMessage, PlatformResult, QualifyingEmoji, ReactionDirection,
    ReactionSummary, RepoResult, ServerSettings, SettingsRepository, TallyChange,
    TallyRepository, TrackedMessage,
};

// ============================================================================
// Tally Repository
// ============================================================================

/// Tally storage; every operation runs under one lock, like a row lock
#[derive(Default)]
pub struct InMemoryTallyRepository {
    tallies: Mutex<HashMap<MessageKey, TrackedMessage>>,
    fail_writes: AtomicBool,
    fail_record_announcement: AtomicBool,
}

impl InMemoryTallyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `apply` and `record_announcement` fail with a storage error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make only `record_announcement` fail; tally updates still succeed
    pub fn fail_record_announcement(&self, fail: bool) {
        self.fail_record_announcement.store(fail, Ordering::SeqCst);
    }

    pub fn get(&self, key: &MessageKey) -> Option<TrackedMessage> {
        self.tallies.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.tallies.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_writable(&self) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("storage unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TallyRepository for InMemoryTallyRepository {
    async fn find(&self, key: &MessageKey) -> RepoResult<Option<TrackedMessage>> {
        Ok(self.get(key))
    }

    async fn apply(&self, change: &TallyChange) -> RepoResult<Option<TrackedMessage>> {
        self.check_writable()?;
        let mut tallies = self.tallies.lock();

        let tally = match change.direction {
            ReactionDirection::Add => tallies
                .entry(change.key.clone())
                .or_insert_with(|| TrackedMessage::new(change.key.clone(), &change.author_id)),
            ReactionDirection::Remove => match tallies.get_mut(&change.key) {
                Some(tally) => tally,
                None => return Ok(None),
            },
        };

        tally.apply(change);
        Ok(Some(tally.clone()))
    }

    async fn record_announcement(
        &self,
        key: &MessageKey,
        announcement: &AnnouncementRef,
    ) -> RepoResult<bool> {
        self.check_writable()?;
        if self.fail_record_announcement.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("announcement write failed".to_string()));
        }
        let mut tallies = self.tallies.lock();
        let tally = tallies
            .get_mut(key)
            .ok_or_else(|| DomainError::TrackedMessageNotFound(key.to_string()))?;
        Ok(tally.record_announcement(announcement.clone()))
    }

    async fn leaderboard(&self, server_id: &str, limit: i64) -> RepoResult<Vec<LeaderboardEntry>> {
        let mut totals: HashMap<String, (i64, i64)> = HashMap::new();
        for tally in self.tallies.lock().values() {
            if tally.key.server_id != server_id {
                continue;
            }
            let entry = totals.entry(tally.author_id.clone()).or_default();
            entry.0 += i64::from(tally.displayed_reaction_count());
            entry.1 += 1;
        }

        let mut entries: Vec<LeaderboardEntry> = totals
            .into_iter()
            .filter(|(_, (total, _))| *total > 0)
            .map(|(author, (total, count))| LeaderboardEntry::new(author, total, count))
            .collect();
        entries.sort_by(|a, b| {
            b.total_reactions
                .cmp(&a.total_reactions)
                .then_with(|| a.author_id.cmp(&b.author_id))
        });
        entries.truncate(limit.clamp(1, 25) as usize);
        Ok(entries)
    }
}

// ============================================================================
// Settings Repository
// ============================================================================

#[derive(Default)]
pub struct InMemorySettingsRepository {
    settings: Mutex<HashMap<String, ServerSettings>>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, settings: ServerSettings) {
        self.settings
            .lock()
            .insert(settings.server_id.clone(), settings);
    }

    pub fn get(&self, server_id: &str) -> Option<ServerSettings> {
        self.settings.lock().get(server_id).cloned()
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn find(&self, server_id: &str) -> RepoResult<Option<ServerSettings>> {
        Ok(self.get(server_id))
    }

    async fn ensure(&self, server_id: &str) -> RepoResult<()> {
        self.settings
            .lock()
            .entry(server_id.to_string())
            .or_insert_with(|| ServerSettings::new(server_id));
        Ok(())
    }

    async fn set_announcement(
        &self,
        server_id: &str,
        channel_id: &str,
        minimum_reactions: i32,
    ) -> RepoResult<ServerSettings> {
        let settings = ServerSettings::with_announcements(server_id, channel_id, minimum_reactions);
        self.insert(settings.clone());
        Ok(settings)
    }
}

// ============================================================================
// Chat Platform
// ============================================================================

/// A message posted or edited through the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel_id: String,
    pub message_id: String,
    pub content: String,
}

/// Fake chat platform
///
/// Holds messages with live reaction counts for the configured emoji and
/// records every send and edit.
pub struct FakePlatform {
    emoji: QualifyingEmoji,
    bot_user_id: String,
    messages: Mutex<HashMap<(String, String), PlatformMessage>>,
    members: Mutex<HashMap<(String, String), String>>,
    sent: Mutex<Vec<SentMessage>>,
    edits: Mutex<Vec<SentMessage>>,
    next_id: AtomicU64,
    fail_fetch: AtomicBool,
    fail_send: AtomicBool,
    fail_edit: AtomicBool,
    latency: Mutex<Option<Duration>>,
}

impl FakePlatform {
    pub fn new(emoji: QualifyingEmoji, bot_user_id: impl Into<String>) -> Self {
        Self {
            emoji,
            bot_user_id: bot_user_id.into(),
            messages: Mutex::new(HashMap::new()),
            members: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            edits: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            fail_fetch: AtomicBool::new(false),
            fail_send: AtomicBool::new(false),
            fail_edit: AtomicBool::new(false),
            latency: Mutex::new(None),
        }
    }

    /// Post a message authored by `author_id`
    pub fn post(&self, channel_id: &str, message_id: &str, author_id: &str, content: &str) {
        let message = PlatformMessage {
            id: message_id.to_string(),
            channel_id: channel_id.to_string(),
            author: MessageAuthor {
                id: author_id.to_string(),
                username: format!("user{author_id}"),
                global_name: None,
                bot: author_id == self.bot_user_id,
            },
            content: content.to_string(),
            attachment_urls: Vec::new(),
            reactions: Vec::new(),
        };
        self.messages
            .lock()
            .insert((channel_id.to_string(), message_id.to_string()), message);
    }

    pub fn add_attachment(&self, channel_id: &str, message_id: &str, url: &str) {
        if let Some(message) = self
            .messages
            .lock()
            .get_mut(&(channel_id.to_string(), message_id.to_string()))
        {
            message.attachment_urls.push(url.to_string());
        }
    }

    /// Set the platform's count of the tracked emoji on a message
    pub fn set_count(&self, channel_id: &str, message_id: &str, count: i32) {
        let mut messages = self.messages.lock();
        let Some(message) = messages.get_mut(&(channel_id.to_string(), message_id.to_string()))
        else {
            return;
        };

        let (emoji_id, emoji_name) = match &self.emoji {
            QualifyingEmoji::Unicode(name) => (None, Some(name.clone())),
            QualifyingEmoji::Custom { id, name, .. } => (Some(id.clone()), name.clone()),
        };
        message
            .reactions
            .retain(|r| !self.emoji.matches(r.emoji_id.as_deref(), r.emoji_name.as_deref()));
        if count > 0 {
            message.reactions.push(ReactionSummary {
                emoji_id,
                emoji_name,
                count,
            });
        }
    }

    pub fn count(&self, channel_id: &str, message_id: &str) -> i32 {
        self.messages
            .lock()
            .get(&(channel_id.to_string(), message_id.to_string()))
            .map_or(0, |m| m.reaction_count(&self.emoji))
    }

    pub fn set_member_name(&self, server_id: &str, user_id: &str, name: &str) {
        self.members
            .lock()
            .insert((server_id.to_string(), user_id.to_string()), name.to_string());
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_send(&self, fail: bool) {
        self.fail_send.store(fail, Ordering::SeqCst);
    }

    pub fn fail_edit(&self, fail: bool) {
        self.fail_edit.store(fail, Ordering::SeqCst);
    }

    /// Delay every platform call, widening race windows
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Some(latency);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    pub fn edits(&self) -> Vec<SentMessage> {
        self.edits.lock().clone()
    }

    /// Current content of a message
    pub fn content(&self, channel_id: &str, message_id: &str) -> Option<String> {
        self.messages
            .lock()
            .get(&(channel_id.to_string(), message_id.to_string()))
            .map(|m| m.content.clone())
    }

    async fn delay(&self) {
        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn fetch_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> PlatformResult<PlatformMessage> {
        self.delay().await;
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(PlatformError::Transport("connection reset".to_string()));
        }
        self.messages
            .lock()
            .get(&(channel_id.to_string(), message_id.to_string()))
            .cloned()
            .ok_or_else(|| PlatformError::NotFound(format!("message {message_id}")))
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> PlatformResult<String> {
        self.delay().await;
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(PlatformError::Forbidden("Missing Access".to_string()));
        }

        let message_id = format!("announcement-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let bot_user_id = self.bot_user_id.clone();
        self.post(channel_id, &message_id, &bot_user_id, content);
        self.sent.lock().push(SentMessage {
            channel_id: channel_id.to_string(),
            message_id: message_id.clone(),
            content: content.to_string(),
        });
        Ok(message_id)
    }

    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
    ) -> PlatformResult<()> {
        self.delay().await;
        if self.fail_edit.load(Ordering::SeqCst) {
            return Err(PlatformError::RateLimited { retry_after_ms: 500 });
        }

        let mut messages = self.messages.lock();
        let message = messages
            .get_mut(&(channel_id.to_string(), message_id.to_string()))
            .ok_or_else(|| PlatformError::NotFound(format!("message {message_id}")))?;
        message.content = content.to_string();
        self.edits.lock().push(SentMessage {
            channel_id: channel_id.to_string(),
            message_id: message_id.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }

    async fn member_display_name(
        &self,
        server_id: &str,
        user_id: &str,
    ) -> PlatformResult<Option<String>> {
        Ok(self
            .members
            .lock()
            .get(&(server_id.to_string(), user_id.to_string()))
            .cloned())
    }
}
