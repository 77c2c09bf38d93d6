//! Ports - repository and chat platform traits

mod platform;
mod repositories;

pub use platform::{ChatPlatform, PlatformError, PlatformResult};
pub use repositories::{RepoResult, SettingsRepository, TallyRepository};
