//! Business logic services
//!
//! The reaction pipeline is normalizer -> tally -> threshold -> announcement,
//! driven one event at a time by the engine.

pub mod announcement;
pub mod commands;
pub mod context;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod locks;
pub mod normalizer;
pub mod settings;
pub mod tally;
pub mod threshold;

// Re-export all services for convenience
pub use announcement::{AnnouncementAction, AnnouncementRenderer, AnnouncementSynchronizer};
pub use commands::{AdminCommand, CommandError, CommandInvoker, CommandService};
pub use context::{EngineConfig, ServiceContext, ServiceContextBuilder};
pub use engine::{EngineOutcome, ReactionEngine};
pub use error::{ServiceError, ServiceResult};
pub use leaderboard::LeaderboardService;
pub use locks::{KeyGuard, KeyedLocks};
pub use normalizer::{EventNormalizer, Normalized, NormalizedEvent, SkipReason};
pub use settings::SettingsService;
pub use tally::TallyService;
pub use threshold::{AnnouncementPlan, HoldReason};
