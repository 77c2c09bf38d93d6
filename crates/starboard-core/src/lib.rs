//! # starboard-core
//!
//! Domain layer containing tracked-message and settings entities, value objects,
//! repository and platform traits, and the raw inbound reaction events.
//! This crate has zero dependencies on infrastructure (database, HTTP, gateway).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AnnouncementRef, LeaderboardEntry, MessageAuthor, MessageKey, PlatformMessage,
    ReactionSummary, ServerSettings, TallyChange, TrackedMessage,
};
pub use error::DomainError;
pub use events::{EmojiRef, RawReactionEvent, ReactionDirection};
pub use traits::{
    ChatPlatform, PlatformError, PlatformResult, RepoResult, SettingsRepository, TallyRepository,
};
pub use value_objects::{CountStrategy, Permissions, QualifyingEmoji};
