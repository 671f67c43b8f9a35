//! Artists vertical slice
use chorus_core::{Artist, ArtistId, CreateArtist, Result};
use sqlx::{Row, SqlitePool};

/// Create an artist with a generated id
pub async fn create(pool: &SqlitePool, artist: CreateArtist) -> Result<Artist> {
    let id = ArtistId::generate();
    sqlx::query("INSERT INTO artists (id, name) VALUES (?, ?)")
        .bind(&id)
        .bind(&artist.name)
        .execute(pool)
        .await?;

    Ok(Artist {
        id,
        name: artist.name,
        followers_count: 0,
    })
}

/// Get an artist by id
pub async fn get(pool: &SqlitePool, id: &ArtistId) -> Result<Option<Artist>> {
    let row = sqlx::query("SELECT id, name, followers_count FROM artists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| Artist {
        id: row.get("id"),
        name: row.get("name"),
        followers_count: row.get("followers_count"),
    }))
}
