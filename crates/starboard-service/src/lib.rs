//! # starboard-service
//!
//! Application layer: the reaction tally engine and the announcement
//! synchronizer, plus settings, leaderboard and admin command services.

pub mod dto;
pub mod services;

pub use services::{
    AnnouncementAction, CommandService, EngineConfig, EngineOutcome, LeaderboardService,
    ReactionEngine, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    SettingsService, SkipReason,
};
