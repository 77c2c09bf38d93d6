//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use starboard_core::{CountStrategy, QualifyingEmoji};
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub bot: BotConfig,
    pub database: DatabaseConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// How an existing announcement is rewritten on edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    /// Re-render the whole announcement from stored fields
    #[default]
    Render,
    /// Patch only the count inside the existing announcement text
    Splice,
}

impl FromStr for EditMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "render" => Ok(Self::Render),
            "splice" => Ok(Self::Splice),
            other => Err(format!("unknown edit mode: {other}")),
        }
    }
}

/// Chat platform and bot behaviour configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot token used for the gateway and REST API
    pub token: String,
    /// Application id for command registration; learned from READY when absent
    pub application_id: Option<String>,
    /// The reaction that is tallied
    pub emoji: QualifyingEmoji,
    /// User allowed to run admin commands in every server
    pub owner_id: Option<String>,
    /// Prefix of text commands
    pub command_prefix: String,
    pub count_strategy: CountStrategy,
    pub edit_mode: EditMode,
    pub api_base: String,
    pub gateway_url: String,
    /// Base of message links in announcements
    pub permalink_base: String,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

// Default value functions
fn default_app_name() -> String {
    "starboard".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_command_prefix() -> String {
    "rc!".to_string()
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

fn default_permalink_base() -> String {
    "https://discord.com/channels".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            app: AppSettings {
                name: var("APP_NAME").unwrap_or_else(default_app_name),
                env: var("APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            bot: BotConfig {
                token: var("DISCORD_TOKEN").ok_or(ConfigError::MissingVar("DISCORD_TOKEN"))?,
                application_id: var("DISCORD_APPLICATION_ID"),
                emoji: var("TRACKED_EMOJI")
                    .map(|s| QualifyingEmoji::parse(&s))
                    .unwrap_or_default(),
                owner_id: var("BOT_OWNER_ID"),
                command_prefix: var("COMMAND_PREFIX").unwrap_or_else(default_command_prefix),
                count_strategy: var("COUNT_STRATEGY")
                    .map(|s| {
                        s.parse::<CountStrategy>()
                            .map_err(|e| ConfigError::InvalidValue("COUNT_STRATEGY", e))
                    })
                    .transpose()?
                    .unwrap_or_default(),
                edit_mode: var("ANNOUNCEMENT_EDIT_MODE")
                    .map(|s| {
                        s.parse::<EditMode>()
                            .map_err(|e| ConfigError::InvalidValue("ANNOUNCEMENT_EDIT_MODE", e))
                    })
                    .transpose()?
                    .unwrap_or_default(),
                api_base: var("DISCORD_API_BASE").unwrap_or_else(default_api_base),
                gateway_url: var("DISCORD_GATEWAY_URL").unwrap_or_else(default_gateway_url),
                permalink_base: var("PERMALINK_BASE").unwrap_or_else(default_permalink_base),
            },
            database: DatabaseConfig {
                url: var("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: var("DATABASE_MAX_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: var("DATABASE_MIN_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
