//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using real SQLite files (not
//! in-memory) to match production behavior and exercise migrations,
//! constraints, and indexes.

use chorus_core::{
    AlbumId, ArtistId, CreateAlbum, CreateArtist, CreatePlaylist, CreateTrack, CreateUser,
    PlaylistId, TrackId, UserId,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = chorus_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        chorus_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Test fixture: create a user
pub async fn create_test_user(pool: &SqlitePool, username: &str) -> UserId {
    chorus_storage::users::create(
        pool,
        CreateUser {
            username: username.to_string(),
            display_name: username.to_string(),
        },
    )
    .await
    .expect("Failed to create test user")
    .id
}

/// Test fixture: create an artist
pub async fn create_test_artist(pool: &SqlitePool, name: &str) -> ArtistId {
    chorus_storage::artists::create(
        pool,
        CreateArtist {
            name: name.to_string(),
        },
    )
    .await
    .expect("Failed to create test artist")
    .id
}

/// Test fixture: create an album
pub async fn create_test_album(pool: &SqlitePool, title: &str, artist_id: ArtistId) -> AlbumId {
    chorus_storage::albums::create(
        pool,
        CreateAlbum {
            title: title.to_string(),
            artist_id,
        },
    )
    .await
    .expect("Failed to create test album")
    .id
}

/// Test fixture: create a track
pub async fn create_test_track(
    pool: &SqlitePool,
    title: &str,
    artist_id: ArtistId,
    album_id: Option<AlbumId>,
) -> TrackId {
    chorus_storage::tracks::create(
        pool,
        CreateTrack {
            title: title.to_string(),
            artist_id,
            album_id,
            duration_secs: 180,
        },
    )
    .await
    .expect("Failed to create test track")
    .id
}

/// Test fixture: create a private, non-collaborative playlist
pub async fn create_test_playlist(pool: &SqlitePool, name: &str, owner_id: UserId) -> PlaylistId {
    chorus_storage::playlists::create(
        pool,
        CreatePlaylist {
            owner_id,
            name: name.to_string(),
            description: None,
            is_public: false,
            is_collaborative: false,
        },
    )
    .await
    .expect("Failed to create test playlist")
    .id
}
