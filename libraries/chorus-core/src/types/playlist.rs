//! Playlist domain types
use super::ids::{PlaylistId, TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Playlist with multi-user support
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub is_collaborative: bool,
    /// Users granted track-insertion rights without owning the playlist
    pub collaborators: Vec<UserId>,
    /// Denormalized follower count, maintained by the follow graph
    pub followers_count: i64,
    /// Bumped on every entry-sequence write; guards read-modify-write cycles
    pub revision: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    /// Whether `user` owns this playlist
    pub fn is_owner(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }

    /// Whether `user` is a collaborator on this playlist
    pub fn is_collaborator(&self, user: &UserId) -> bool {
        self.collaborators.contains(user)
    }
}

/// Data for creating a new playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylist {
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub is_collaborative: bool,
}

/// Partial update of playlist details
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlaylist {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub is_collaborative: Option<bool>,
}

/// One slot in a playlist's ordered track sequence.
///
/// Identity is positional: the same track may appear at several
/// positions, and nothing here is unique per playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub track_id: TrackId,
    pub added_at: DateTime<Utc>,
    pub added_by: UserId,
    pub is_local: bool,
}

impl PlaylistEntry {
    /// Create an entry added now by `added_by`
    pub fn new(track_id: TrackId, added_by: UserId) -> Self {
        Self {
            track_id,
            added_at: Utc::now(),
            added_by,
            is_local: false,
        }
    }
}

/// Playlist entry with denormalized track data for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistEntryDetail {
    pub track_id: TrackId,
    pub position: i64,
    pub added_at: DateTime<Utc>,
    pub added_by: UserId,
    pub is_local: bool,
    pub title: Option<String>,
    pub artist_name: Option<String>,
    pub duration_secs: Option<i64>,
}
