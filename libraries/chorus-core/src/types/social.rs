//! Social graph types
use serde::{Deserialize, Serialize};

/// What kind of entity a follow edge points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowKind {
    User,
    Artist,
}

impl FollowKind {
    /// String form used for database storage
    pub fn as_str(self) -> &'static str {
        match self {
            FollowKind::User => "user",
            FollowKind::Artist => "artist",
        }
    }

    /// Parse from the stored string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(FollowKind::User),
            "artist" => Some(FollowKind::Artist),
            _ => None,
        }
    }
}
