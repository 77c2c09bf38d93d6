//! Entity to model mappers
//!
//! This module provides conversions between domain entities (starboard-core) and database models.
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - `*Update` structs: Prepare entity data for database writes

mod leaderboard;
mod server_settings;
mod tracked_message;

pub use tracked_message::TallyUpdate;
