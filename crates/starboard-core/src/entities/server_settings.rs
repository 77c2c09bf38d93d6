//! Server settings entity - per-server announcement configuration

use serde::{Deserialize, Serialize};

/// Per-server announcement settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServerSettings {
    pub server_id: String,
    /// Destination for announcements; `None` means announcements are off
    pub announcement_channel_id: Option<String>,
    /// Threshold on the displayed count; `None` or zero announces on any reaction
    pub minimum_reactions: Option<i32>,
}

impl ServerSettings {
    /// Create unconfigured settings for a server
    pub fn new(server_id: impl Into<String>) -> Self {
        Self {
            server_id: server_id.into(),
            announcement_channel_id: None,
            minimum_reactions: None,
        }
    }

    /// Create settings with an announcement destination
    pub fn with_announcements(
        server_id: impl Into<String>,
        channel_id: impl Into<String>,
        minimum_reactions: i32,
    ) -> Self {
        Self {
            server_id: server_id.into(),
            announcement_channel_id: Some(channel_id.into()),
            minimum_reactions: Some(minimum_reactions),
        }
    }

    /// Announcement channel, if announcements are configured
    #[inline]
    pub fn announcement_channel(&self) -> Option<&str> {
        self.announcement_channel_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }

    /// Check if announcements are configured
    #[inline]
    pub fn is_configured(&self) -> bool {
        self.announcement_channel().is_some()
    }

    /// Effective threshold on the displayed count
    #[inline]
    pub fn threshold(&self) -> i32 {
        self.minimum_reactions.unwrap_or(0).max(0)
    }
}
