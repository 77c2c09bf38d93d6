//! Service context - dependency container for services
//!
//! Holds the repositories, the chat platform client and the engine settings.

use std::sync::Arc;

use parking_lot::RwLock;
use starboard_common::{BotConfig, EditMode};
use starboard_core::traits::{ChatPlatform, SettingsRepository, TallyRepository};
use starboard_core::{CountStrategy, QualifyingEmoji};

use super::error::{ServiceError, ServiceResult};

/// Behaviour switches for the reaction engine and admin commands
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub emoji: QualifyingEmoji,
    pub count_strategy: CountStrategy,
    pub edit_mode: EditMode,
    pub permalink_base: String,
    pub owner_id: Option<String>,
    pub command_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            emoji: QualifyingEmoji::default(),
            count_strategy: CountStrategy::default(),
            edit_mode: EditMode::default(),
            permalink_base: "https://discord.com/channels".to_string(),
            owner_id: None,
            command_prefix: "rc!".to_string(),
        }
    }
}

impl From<&BotConfig> for EngineConfig {
    fn from(config: &BotConfig) -> Self {
        Self {
            emoji: config.emoji.clone(),
            count_strategy: config.count_strategy,
            edit_mode: config.edit_mode,
            permalink_base: config.permalink_base.clone(),
            owner_id: config.owner_id.clone(),
            command_prefix: config.command_prefix.clone(),
        }
    }
}

/// Service context containing all dependencies
///
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    tally_repo: Arc<dyn TallyRepository>,
    settings_repo: Arc<dyn SettingsRepository>,

    // Chat platform
    platform: Arc<dyn ChatPlatform>,

    config: Arc<EngineConfig>,

    // Learned from the gateway READY payload
    bot_user_id: Arc<RwLock<Option<String>>>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        tally_repo: Arc<dyn TallyRepository>,
        settings_repo: Arc<dyn SettingsRepository>,
        platform: Arc<dyn ChatPlatform>,
        config: EngineConfig,
    ) -> Self {
        Self {
            tally_repo,
            settings_repo,
            platform,
            config: Arc::new(config),
            bot_user_id: Arc::new(RwLock::new(None)),
        }
    }

    // === Repositories ===

    /// Get the tally repository
    pub fn tally_repo(&self) -> &dyn TallyRepository {
        self.tally_repo.as_ref()
    }

    /// Get the settings repository
    pub fn settings_repo(&self) -> &dyn SettingsRepository {
        self.settings_repo.as_ref()
    }

    // === Platform ===

    /// Get the chat platform client
    pub fn platform(&self) -> &dyn ChatPlatform {
        self.platform.as_ref()
    }

    /// Get the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The bot's own user id, once known
    pub fn bot_user_id(&self) -> Option<String> {
        self.bot_user_id.read().clone()
    }

    /// Remember the bot's own user id
    pub fn set_bot_user_id(&self, user_id: impl Into<String>) {
        *self.bot_user_id.write() = Some(user_id.into());
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("platform", &"...")
            .field("config", &self.config)
            .field("bot_user_id", &self.bot_user_id())
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    tally_repo: Option<Arc<dyn TallyRepository>>,
    settings_repo: Option<Arc<dyn SettingsRepository>>,
    platform: Option<Arc<dyn ChatPlatform>>,
    config: EngineConfig,
    bot_user_id: Option<String>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            tally_repo: None,
            settings_repo: None,
            platform: None,
            config: EngineConfig::default(),
            bot_user_id: None,
        }
    }

    pub fn tally_repo(mut self, repo: Arc<dyn TallyRepository>) -> Self {
        self.tally_repo = Some(repo);
        self
    }

    pub fn settings_repo(mut self, repo: Arc<dyn SettingsRepository>) -> Self {
        self.settings_repo = Some(repo);
        self
    }

    pub fn platform(mut self, platform: Arc<dyn ChatPlatform>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn bot_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.bot_user_id = Some(user_id.into());
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let ctx = ServiceContext::new(
            self.tally_repo
                .ok_or_else(|| ServiceError::validation("tally_repo is required"))?,
            self.settings_repo
                .ok_or_else(|| ServiceError::validation("settings_repo is required"))?,
            self.platform
                .ok_or_else(|| ServiceError::validation("platform is required"))?,
            self.config,
        );
        if let Some(user_id) = self.bot_user_id {
            ctx.set_bot_user_id(user_id);
        }
        Ok(ctx)
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
