//! Test doubles and fixtures for end-to-end engine tests
//!
//! The engine runs against in-memory repositories and a fake chat platform
//! that keeps per-message reaction counts the way the real platform does.

pub mod fakes;
pub mod fixtures;

pub use fakes::{FakePlatform, InMemorySettingsRepository, InMemoryTallyRepository, SentMessage};
pub use fixtures::*;
