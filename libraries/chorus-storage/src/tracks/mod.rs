//! Tracks vertical slice
use chorus_core::{CreateTrack, Result, Track, TrackId};
use sqlx::{QueryBuilder, Row, SqlitePool};
use std::collections::HashSet;

/// Create a track with a generated id
pub async fn create(pool: &SqlitePool, track: CreateTrack) -> Result<Track> {
    let id = TrackId::generate();
    sqlx::query(
        "INSERT INTO tracks (id, title, artist_id, album_id, duration_secs) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&track.title)
    .bind(&track.artist_id)
    .bind(&track.album_id)
    .bind(track.duration_secs)
    .execute(pool)
    .await?;

    Ok(Track {
        id,
        title: track.title,
        artist_id: track.artist_id,
        album_id: track.album_id,
        duration_secs: track.duration_secs,
    })
}

/// Get a track by id
pub async fn get(pool: &SqlitePool, id: &TrackId) -> Result<Option<Track>> {
    let row = sqlx::query(
        "SELECT id, title, artist_id, album_id, duration_secs FROM tracks WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| row_to_track(&row)))
}

/// Which of `ids` exist in the catalog
pub async fn resolve_existing(pool: &SqlitePool, ids: &[TrackId]) -> Result<HashSet<TrackId>> {
    if ids.is_empty() {
        return Ok(HashSet::new());
    }

    let mut qb = QueryBuilder::new("SELECT id FROM tracks WHERE id IN (");
    let mut sep = qb.separated(", ");
    for id in ids {
        sep.push_bind(id);
    }
    qb.push(")");

    let rows = qb.build().fetch_all(pool).await?;
    Ok(rows.into_iter().map(|row| row.get("id")).collect())
}

pub(crate) fn row_to_track(row: &sqlx::sqlite::SqliteRow) -> Track {
    Track {
        id: row.get("id"),
        title: row.get("title"),
        artist_id: row.get("artist_id"),
        album_id: row.get("album_id"),
        duration_secs: row.get("duration_secs"),
    }
}
