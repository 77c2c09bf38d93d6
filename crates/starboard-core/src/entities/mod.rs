//! Domain entities - core business objects

mod leaderboard;
mod platform_message;
mod server_settings;
mod tracked_message;

pub use leaderboard::LeaderboardEntry;
pub use platform_message::{MessageAuthor, PlatformMessage, ReactionSummary};
pub use server_settings::ServerSettings;
pub use tracked_message::{AnnouncementRef, MessageKey, TallyChange, TrackedMessage};
