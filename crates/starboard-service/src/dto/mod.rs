//! Data transfer objects for command inputs and replies
//!
//! - Request DTOs with validation for admin inputs
//! - Response DTOs rendered into chat replies

pub mod requests;
pub mod responses;

pub use requests::SetAnnouncementRequest;
pub use responses::{LeaderboardLine, LeaderboardResponse};
