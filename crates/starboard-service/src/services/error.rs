//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use starboard_common::AppError;
use starboard_core::{DomainError, PlatformError};
use std::fmt;
use validator::ValidationErrors;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation or storage failure
    Domain(DomainError),

    /// Application error
    App(AppError),

    /// Chat platform call failed
    Platform(PlatformError),

    /// Validation error
    Validation(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::Platform(e) => write!(f, "{e}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            Self::Platform(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Get the error code for logs
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::Platform(PlatformError::NotFound(_)) => "PLATFORM_NOT_FOUND",
            Self::Platform(PlatformError::Forbidden(_)) => "PLATFORM_FORBIDDEN",
            Self::Platform(PlatformError::RateLimited { .. }) => "PLATFORM_RATE_LIMITED",
            Self::Platform(_) => "PLATFORM_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }

    /// External failure that may succeed later; logged at warn and dropped
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Platform(_))
    }

    /// Persistent store failure; logged at error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_storage())
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<PlatformError> for ServiceError {
    fn from(err: PlatformError) -> Self {
        Self::Platform(err)
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::Platform(e) => AppError::ExternalService(e.to_string()),
            ServiceError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
