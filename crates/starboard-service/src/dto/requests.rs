//! Request DTOs for admin commands
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Highest accepted announcement threshold
pub const MAX_MINIMUM_REACTIONS: i32 = 10_000;

/// Configure the announcement channel and threshold of a server
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetAnnouncementRequest {
    #[validate(
        length(min = 1, max = 32, message = "Channel id must be 1-32 characters"),
        custom(function = "validate_snowflake")
    )]
    pub channel_id: String,

    #[validate(range(min = 0, max = 10_000, message = "Minimum reactions must be 0-10000"))]
    pub minimum_reactions: i32,
}

impl SetAnnouncementRequest {
    /// Build a request, accepting a channel mention (`<#123>`) as well as a bare id
    pub fn new(channel: &str, minimum_reactions: i32) -> Self {
        let channel = channel.trim();
        let channel_id = channel
            .strip_prefix("<#")
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or(channel);

        Self {
            channel_id: channel_id.to_string(),
            minimum_reactions,
        }
    }
}

fn validate_snowflake(value: &str) -> Result<(), ValidationError> {
    if value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("snowflake").with_message("Channel id must be numeric".into()))
    }
}
