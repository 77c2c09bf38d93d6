//! Database models - SQLx-compatible structs for PostgreSQL tables

mod leaderboard;
mod server_settings;
mod tracked_message;

pub use leaderboard::LeaderboardModel;
pub use server_settings::ServerSettingsModel;
pub use tracked_message::TrackedMessageModel;
