//! Error handling utilities for repositories

use starboard_core::entities::MessageKey;
use starboard_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Create a "tracked message not found" error
pub fn tracked_message_not_found(key: &MessageKey) -> DomainError {
    DomainError::TrackedMessageNotFound(key.to_string())
}
