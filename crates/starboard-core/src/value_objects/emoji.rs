//! Qualifying emoji - the one reaction the tally counts

use serde::{Deserialize, Serialize};
use std::fmt;

/// The configured reaction that counts towards a message's tally
///
/// Accepted configuration forms:
/// - a unicode emoji (`💖`)
/// - a custom emoji mention (`<:blob:123>`, `<a:blob:123>`)
/// - `name:id` or a bare custom emoji id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualifyingEmoji {
    Unicode(String),
    Custom {
        id: String,
        name: Option<String>,
        animated: bool,
    },
}

impl QualifyingEmoji {
    /// Parse a configured emoji
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if let Some(inner) = raw.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
            let (animated, rest) = match inner.strip_prefix("a:") {
                Some(rest) => (true, rest),
                None => (false, inner.trim_start_matches(':')),
            };
            if let Some((name, id)) = rest.rsplit_once(':') {
                if is_id(id) {
                    return Self::Custom {
                        id: id.to_string(),
                        name: Some(name.to_string()).filter(|n| !n.is_empty()),
                        animated,
                    };
                }
            }
        }

        if let Some((name, id)) = raw.rsplit_once(':') {
            if is_id(id) && !name.is_empty() {
                return Self::Custom {
                    id: id.to_string(),
                    name: Some(name.to_string()),
                    animated: false,
                };
            }
        }

        if is_id(raw) {
            return Self::Custom {
                id: raw.to_string(),
                name: None,
                animated: false,
            };
        }

        Self::Unicode(raw.to_string())
    }

    /// Check whether a reaction emoji (as sent by the platform) is this one
    pub fn matches(&self, emoji_id: Option<&str>, emoji_name: Option<&str>) -> bool {
        match self {
            Self::Unicode(expected) => emoji_id.is_none() && emoji_name == Some(expected.as_str()),
            Self::Custom { id, .. } => emoji_id == Some(id.as_str()),
        }
    }
}

impl Default for QualifyingEmoji {
    fn default() -> Self {
        Self::Unicode("💖".to_string())
    }
}

impl fmt::Display for QualifyingEmoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unicode(emoji) => write!(f, "{emoji}"),
            Self::Custom { id, name, animated } => {
                let prefix = if *animated { "a" } else { "" };
                write!(f, "<{prefix}:{}:{id}>", name.as_deref().unwrap_or("emoji"))
            }
        }
    }
}

fn is_id(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
