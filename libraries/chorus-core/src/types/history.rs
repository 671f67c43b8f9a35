//! Play history types
use super::ids::{TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One append-only play event. Never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub id: i64,
    pub user_id: UserId,
    pub track_id: TrackId,
    pub played_at: DateTime<Utc>,
    /// Where playback started from (playlist URI, album URI, ...)
    pub context: Option<String>,
}

/// Play record joined with track data for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayRecordDetail {
    pub track_id: TrackId,
    pub played_at: DateTime<Utc>,
    pub context: Option<String>,
    pub title: Option<String>,
    pub artist_name: Option<String>,
}
