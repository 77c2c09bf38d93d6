//! ServerSettings entity <-> model mapper

use starboard_core::entities::ServerSettings;

use crate::models::ServerSettingsModel;

impl From<ServerSettingsModel> for ServerSettings {
    fn from(model: ServerSettingsModel) -> Self {
        ServerSettings {
            server_id: model.server_id,
            announcement_channel_id: model.announcement_channel_id,
            minimum_reactions: model.minimum_reactions,
        }
    }
}
