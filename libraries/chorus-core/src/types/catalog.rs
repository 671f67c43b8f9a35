//! Catalog types: artists, albums, tracks
use super::ids::{AlbumId, ArtistId, TrackId};
use serde::{Deserialize, Serialize};

/// Artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    /// Denormalized in-edge count, maintained by the follow graph
    pub followers_count: i64,
}

/// Data for creating a new artist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArtist {
    pub name: String,
}

/// Album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    pub artist_id: ArtistId,
}

/// Data for creating a new album
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlbum {
    pub title: String,
    pub artist_id: ArtistId,
}

/// Track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist_id: ArtistId,
    pub album_id: Option<AlbumId>,
    pub duration_secs: i64,
}

/// Data for creating a new track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrack {
    pub title: String,
    pub artist_id: ArtistId,
    pub album_id: Option<AlbumId>,
    pub duration_secs: i64,
}
