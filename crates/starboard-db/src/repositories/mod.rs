//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in starboard-core.

mod error;
mod settings;
mod tally;

pub use settings::PgSettingsRepository;
pub use tally::PgTallyRepository;
