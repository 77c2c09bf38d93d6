//! Server settings database model

use sqlx::FromRow;

/// Database model for server_settings table
#[derive(Debug, Clone, FromRow)]
pub struct ServerSettingsModel {
    pub server_id: String,
    pub announcement_channel_id: Option<String>,
    pub minimum_reactions: Option<i32>,
}
