//! Albums vertical slice
use chorus_core::{Album, AlbumId, CreateAlbum, Result};
use sqlx::{QueryBuilder, Row, SqlitePool};
use std::collections::HashSet;

/// Create an album with a generated id
pub async fn create(pool: &SqlitePool, album: CreateAlbum) -> Result<Album> {
    let id = AlbumId::generate();
    sqlx::query("INSERT INTO albums (id, title, artist_id) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(&album.title)
        .bind(&album.artist_id)
        .execute(pool)
        .await?;

    Ok(Album {
        id,
        title: album.title,
        artist_id: album.artist_id,
    })
}

/// Get an album by id
pub async fn get(pool: &SqlitePool, id: &AlbumId) -> Result<Option<Album>> {
    let row = sqlx::query("SELECT id, title, artist_id FROM albums WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| row_to_album(&row)))
}

/// Which of `ids` exist in the catalog
pub async fn resolve_existing(pool: &SqlitePool, ids: &[AlbumId]) -> Result<HashSet<AlbumId>> {
    if ids.is_empty() {
        return Ok(HashSet::new());
    }

    let mut qb = QueryBuilder::new("SELECT id FROM albums WHERE id IN (");
    let mut sep = qb.separated(", ");
    for id in ids {
        sep.push_bind(id);
    }
    qb.push(")");

    let rows = qb.build().fetch_all(pool).await?;
    Ok(rows.into_iter().map(|row| row.get("id")).collect())
}

pub(crate) fn row_to_album(row: &sqlx::sqlite::SqliteRow) -> Album {
    Album {
        id: row.get("id"),
        title: row.get("title"),
        artist_id: row.get("artist_id"),
    }
}
