/// Core error types for Chorus
use crate::types::{PlaylistId, TrackId};
use thiserror::Error;

/// Result type alias using `ChorusError`
pub type Result<T> = std::result::Result<T, ChorusError>;

/// Core error type for Chorus
#[derive(Error, Debug)]
pub enum ChorusError {
    /// Malformed or missing parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Authorization denied
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Playlist would exceed the maximum track count
    #[error("Playlist size limit exceeded ({limit} tracks)")]
    SizeExceeded { limit: usize },

    /// Per-user saved-item bound reached
    #[error("Library limit exceeded ({limit} items)")]
    LimitExceeded { limit: usize },

    /// A positioned removal named a slot holding a different track
    #[error("Track {track} is not at position {position}")]
    InvalidPosition { track: TrackId, position: usize },

    /// Removal requested against a playlist with no tracks
    #[error("Playlist has no tracks")]
    EmptyPlaylist,

    /// Reorder target falls inside the moved range
    #[error("Invalid reorder range: {0}")]
    InvalidRange(String),

    /// The caller already follows this playlist
    #[error("Already following playlist: {0}")]
    AlreadyFollowing(PlaylistId),

    /// The caller does not follow this playlist
    #[error("Not following playlist: {0}")]
    NotFollowing(PlaylistId),

    /// The playlist changed between read and write
    #[error("Playlist {0} was modified concurrently")]
    RevisionConflict(PlaylistId),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl ChorusError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for ChorusError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
