//! Play history vertical slice.
//!
//! The log is append-only; nothing here updates or deletes rows.

use chorus_core::{ChorusError, Page, PlayRecord, PlayRecordDetail, Result, TrackId, UserId};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

/// Append one play event
pub async fn record(
    pool: &SqlitePool,
    user: &UserId,
    track_id: &TrackId,
    context: Option<String>,
) -> Result<PlayRecord> {
    let track_exists = crate::tracks::get(pool, track_id).await?.is_some();
    if !track_exists {
        return Err(ChorusError::not_found("Track", track_id));
    }

    let played_at = Utc::now();
    let result = sqlx::query(
        "INSERT INTO play_history (user_id, track_id, played_at, context) VALUES (?, ?, ?, ?)",
    )
    .bind(user)
    .bind(track_id)
    .bind(played_at)
    .bind(&context)
    .execute(pool)
    .await?;

    Ok(PlayRecord {
        id: result.last_insert_rowid(),
        user_id: user.clone(),
        track_id: track_id.clone(),
        played_at,
        context,
    })
}

/// Newest-first page of the user's play history
pub async fn recently_played(
    pool: &SqlitePool,
    user: &UserId,
    limit: usize,
    offset: usize,
) -> Result<Page<PlayRecordDetail>> {
    let total: i64 = sqlx::query("SELECT COUNT(*) AS cnt FROM play_history WHERE user_id = ?")
        .bind(user)
        .fetch_one(pool)
        .await?
        .get("cnt");

    let rows = sqlx::query(
        r#"
        SELECT ph.track_id, ph.played_at, ph.context,
               t.title,
               ar.name AS artist_name
        FROM play_history ph
        LEFT JOIN tracks t ON ph.track_id = t.id
        LEFT JOIN artists ar ON t.artist_id = ar.id
        WHERE ph.user_id = ?
        ORDER BY ph.played_at DESC, ph.id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(user)
    .bind(limit as i64)
    .bind(offset as i64)
    .fetch_all(pool)
    .await?;

    let items = rows
        .into_iter()
        .map(|row| PlayRecordDetail {
            track_id: row.get("track_id"),
            played_at: row.get("played_at"),
            context: row.get("context"),
            title: row.get("title"),
            artist_name: row.get("artist_name"),
        })
        .collect();

    Ok(Page::new(items, total, limit, offset))
}

/// Backdated insert used by statistics fixtures and imports
pub async fn record_at(
    pool: &SqlitePool,
    user: &UserId,
    track_id: &TrackId,
    played_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query("INSERT INTO play_history (user_id, track_id, played_at) VALUES (?, ?, ?)")
        .bind(user)
        .bind(track_id)
        .bind(played_at)
        .execute(pool)
        .await?;
    Ok(())
}
