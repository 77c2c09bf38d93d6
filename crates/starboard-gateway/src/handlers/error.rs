//! Handler error types

use starboard_core::PlatformError;
use starboard_service::ServiceError;
use thiserror::Error;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Dispatch payload did not match the expected shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Reply or registration call failed
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Result type for handlers
pub type HandlerResult<T> = Result<T, HandlerError>;
