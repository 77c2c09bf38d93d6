//! Response DTOs rendered as chat replies

use serde::Serialize;
use std::fmt;

/// One ranked line of a leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardLine {
    pub rank: usize,
    pub name: String,
    pub total_reactions: i64,
    pub message_count: i64,
}

impl fmt::Display for LeaderboardLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.message_count == 1 { "" } else { "s" };
        write!(
            f,
            "{}. {}: {} ({} message{plural})",
            self.rank, self.name, self.total_reactions, self.message_count
        )
    }
}

/// A server leaderboard ready to post
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardResponse {
    pub server_id: String,
    pub emoji: String,
    pub lines: Vec<LeaderboardLine>,
}

impl LeaderboardResponse {
    /// Reply text; a fixed notice when nobody has reactions yet
    pub fn to_message(&self) -> String {
        if self.lines.is_empty() {
            return "No reactions yet".to_string();
        }

        let mut message = format!("Leaderboard ({})", self.emoji);
        for line in &self.lines {
            message.push('\n');
            message.push_str(&line.to_string());
        }
        message
    }
}
