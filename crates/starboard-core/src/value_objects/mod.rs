//! Value objects - immutable types that represent domain concepts

mod count_strategy;
mod emoji;
mod permissions;

pub use count_strategy::CountStrategy;
pub use emoji::QualifyingEmoji;
pub use permissions::Permissions;
