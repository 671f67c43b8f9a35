//! Playlists vertical slice.
//!
//! The entry sequence is persisted as one row per position and always
//! rewritten wholesale: load, transform in memory via
//! `chorus_core::tracklist`, then replace under a revision check inside
//! a transaction. A request that fails validation therefore never
//! touches the stored sequence.

use chorus_core::{
    access::{self, Intent},
    tracklist::{self, RemoveRequest},
    ChorusError, CreatePlaylist, Page, Playlist, PlaylistEntry, PlaylistEntryDetail, PlaylistId,
    Result, TrackId, UpdatePlaylist, UserId,
};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::collections::{HashMap, HashSet};

/// Create a new playlist.
///
/// A playlist cannot be created both collaborative and public; this is
/// checked here and only here (updates do not re-validate).
pub async fn create(pool: &SqlitePool, playlist: CreatePlaylist) -> Result<Playlist> {
    if playlist.name.trim().is_empty() {
        return Err(ChorusError::invalid_input("playlist name is required"));
    }
    if playlist.is_collaborative && playlist.is_public {
        return Err(ChorusError::invalid_input(
            "a collaborative playlist cannot be public",
        ));
    }

    let id = PlaylistId::generate();
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO playlists
            (id, owner_id, name, description, is_public, is_collaborative, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&playlist.owner_id)
    .bind(&playlist.name)
    .bind(&playlist.description)
    .bind(playlist.is_public)
    .bind(playlist.is_collaborative)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    fetch(pool, &id).await
}

/// Get a playlist the caller may read
pub async fn get(pool: &SqlitePool, id: &PlaylistId, caller: &UserId) -> Result<Playlist> {
    let playlist = fetch(pool, id).await?;
    access::authorize(&playlist, caller, Intent::Read)?;
    Ok(playlist)
}

/// All playlists owned by `user`
pub async fn list_for_user(pool: &SqlitePool, user: &UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, owner_id, name, description, is_public, is_collaborative,
               followers_count, revision, created_at, updated_at
        FROM playlists
        WHERE owner_id = ?
        ORDER BY updated_at DESC
        "#,
    )
    .bind(user)
    .fetch_all(pool)
    .await?;

    let mut playlists = Vec::with_capacity(rows.len());
    for row in rows {
        let mut playlist = row_to_playlist(&row);
        playlist.collaborators = load_collaborators(pool, &playlist.id).await?;
        playlists.push(playlist);
    }
    Ok(playlists)
}

/// Update playlist details (owner only)
pub async fn update_details(
    pool: &SqlitePool,
    id: &PlaylistId,
    caller: &UserId,
    update: UpdatePlaylist,
) -> Result<Playlist> {
    let playlist = fetch(pool, id).await?;
    access::authorize(&playlist, caller, Intent::Edit)?;

    let name = update.name.unwrap_or(playlist.name);
    if name.trim().is_empty() {
        return Err(ChorusError::invalid_input("playlist name is required"));
    }
    let description = update.description.or(playlist.description);
    let is_public = update.is_public.unwrap_or(playlist.is_public);
    let is_collaborative = update.is_collaborative.unwrap_or(playlist.is_collaborative);

    sqlx::query(
        r#"
        UPDATE playlists
        SET name = ?, description = ?, is_public = ?, is_collaborative = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&name)
    .bind(&description)
    .bind(is_public)
    .bind(is_collaborative)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    fetch(pool, id).await
}

/// Replace the collaborator set (owner only).
///
/// Collaborators are only meaningful on a collaborative playlist; a
/// non-empty set on a non-collaborative one is rejected at write time.
pub async fn set_collaborators(
    pool: &SqlitePool,
    id: &PlaylistId,
    caller: &UserId,
    collaborators: &[UserId],
) -> Result<()> {
    let playlist = fetch(pool, id).await?;
    access::authorize(&playlist, caller, Intent::Edit)?;

    if !playlist.is_collaborative && !collaborators.is_empty() {
        return Err(ChorusError::invalid_input(
            "collaborators require a collaborative playlist",
        ));
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM playlist_collaborators WHERE playlist_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    for user in collaborators {
        sqlx::query("INSERT INTO playlist_collaborators (playlist_id, user_id) VALUES (?, ?)")
            .bind(id)
            .bind(user)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    Ok(())
}

/// Delete a playlist (owner only)
pub async fn delete(pool: &SqlitePool, id: &PlaylistId, caller: &UserId) -> Result<()> {
    let playlist = fetch(pool, id).await?;
    access::authorize(&playlist, caller, Intent::Edit)?;

    sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// One page of the entry sequence, joined with track metadata.
///
/// The page is cut from the loaded sequence the same way the mutation
/// path sees it; only the display metadata is fetched per page.
pub async fn entry_page(
    pool: &SqlitePool,
    id: &PlaylistId,
    caller: &UserId,
    offset: usize,
    limit: usize,
) -> Result<Page<PlaylistEntryDetail>> {
    let playlist = fetch(pool, id).await?;
    access::authorize(&playlist, caller, Intent::Read)?;

    let entries = load_entries(pool, id).await?;
    let total = entries.len() as i64;
    let slice = tracklist::page(&entries, offset, limit);

    let meta = track_display_meta(pool, slice).await?;
    let items = slice
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let found = meta.get(&entry.track_id);
            PlaylistEntryDetail {
                track_id: entry.track_id.clone(),
                position: (offset + i) as i64,
                added_at: entry.added_at,
                added_by: entry.added_by.clone(),
                is_local: entry.is_local,
                title: found.map(|m| m.0.clone()),
                artist_name: found.and_then(|m| m.1.clone()),
                duration_secs: found.map(|m| m.2),
            }
        })
        .collect();

    Ok(Page::new(items, total, limit, offset))
}

/// Display metadata (title, artist name, duration) for the tracks on
/// one page
async fn track_display_meta(
    pool: &SqlitePool,
    entries: &[PlaylistEntry],
) -> Result<HashMap<TrackId, (String, Option<String>, i64)>> {
    let distinct: Vec<&TrackId> = {
        let mut seen = HashSet::new();
        entries
            .iter()
            .map(|e| &e.track_id)
            .filter(|t| seen.insert(*t))
            .collect()
    };
    if distinct.is_empty() {
        return Ok(HashMap::new());
    }

    let mut qb = sqlx::QueryBuilder::new(
        r#"
        SELECT t.id, t.title, t.duration_secs, ar.name AS artist_name
        FROM tracks t
        LEFT JOIN artists ar ON t.artist_id = ar.id
        WHERE t.id IN ("#,
    );
    let mut sep = qb.separated(", ");
    for track_id in &distinct {
        sep.push_bind(*track_id);
    }
    qb.push(")");

    let rows = qb.build().fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            (
                row.get("id"),
                (
                    row.get("title"),
                    row.get("artist_name"),
                    row.get("duration_secs"),
                ),
            )
        })
        .collect())
}

/// Insert tracks at `position` (append when `None`).
///
/// Allowed for the owner, and for collaborators when the playlist is
/// collaborative. Returns the new sequence revision.
pub async fn insert_tracks(
    pool: &SqlitePool,
    id: &PlaylistId,
    caller: &UserId,
    track_ids: &[TrackId],
    position: Option<usize>,
) -> Result<i64> {
    if track_ids.is_empty() {
        return Err(ChorusError::invalid_input("no track ids given"));
    }

    let playlist = fetch(pool, id).await?;
    access::authorize(&playlist, caller, Intent::AddTracks)?;

    let known = crate::tracks::resolve_existing(pool, track_ids).await?;
    if let Some(missing) = track_ids.iter().find(|t| !known.contains(*t)) {
        return Err(ChorusError::not_found("Track", missing));
    }

    let mut entries = load_entries(pool, id).await?;
    let new_entries: Vec<PlaylistEntry> = track_ids
        .iter()
        .map(|t| PlaylistEntry::new(t.clone(), caller.clone()))
        .collect();
    tracklist::insert(&mut entries, new_entries, position)?;

    replace_entries(pool, id, playlist.revision, &entries).await
}

/// Remove entries by id or (id, positions) pairs (owner only).
///
/// Returns the new sequence revision.
pub async fn remove_tracks(
    pool: &SqlitePool,
    id: &PlaylistId,
    caller: &UserId,
    requests: &[RemoveRequest],
) -> Result<i64> {
    if requests.is_empty() {
        return Err(ChorusError::invalid_input("no removal requests given"));
    }

    let playlist = fetch(pool, id).await?;
    access::authorize(&playlist, caller, Intent::Edit)?;

    let mut entries = load_entries(pool, id).await?;
    tracklist::remove(&mut entries, requests)?;

    replace_entries(pool, id, playlist.revision, &entries).await
}

/// Move a contiguous block of entries (owner only).
///
/// Returns the new sequence revision.
pub async fn reorder_tracks(
    pool: &SqlitePool,
    id: &PlaylistId,
    caller: &UserId,
    range_start: usize,
    range_length: usize,
    insert_before: usize,
) -> Result<i64> {
    let playlist = fetch(pool, id).await?;
    access::authorize(&playlist, caller, Intent::Edit)?;

    let mut entries = load_entries(pool, id).await?;
    tracklist::reorder(&mut entries, range_start, range_length, insert_before)?;

    replace_entries(pool, id, playlist.revision, &entries).await
}

// Helper functions

/// Load a playlist or fail with `NotFound`. No access check.
async fn fetch(pool: &SqlitePool, id: &PlaylistId) -> Result<Playlist> {
    let row = sqlx::query(
        r#"
        SELECT id, owner_id, name, description, is_public, is_collaborative,
               followers_count, revision, created_at, updated_at
        FROM playlists
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ChorusError::not_found("Playlist", id))?;

    let mut playlist = row_to_playlist(&row);
    playlist.collaborators = load_collaborators(pool, id).await?;
    Ok(playlist)
}

async fn load_collaborators(pool: &SqlitePool, id: &PlaylistId) -> Result<Vec<UserId>> {
    let rows = sqlx::query("SELECT user_id FROM playlist_collaborators WHERE playlist_id = ?")
        .bind(id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|r| r.get("user_id")).collect())
}

async fn load_entries(pool: &SqlitePool, id: &PlaylistId) -> Result<Vec<PlaylistEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT track_id, added_at, added_by, is_local
        FROM playlist_entries
        WHERE playlist_id = ?
        ORDER BY position
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| PlaylistEntry {
            track_id: row.get("track_id"),
            added_at: row.get("added_at"),
            added_by: row.get("added_by"),
            is_local: row.get::<i64, _>("is_local") != 0,
        })
        .collect())
}

/// Replace the whole entry sequence, guarded by the revision the
/// caller read. A concurrent writer bumps the revision first and this
/// write fails with `RevisionConflict` instead of clobbering it.
/// Returns the revision the sequence now carries.
async fn replace_entries(
    pool: &SqlitePool,
    id: &PlaylistId,
    expected_revision: i64,
    entries: &[PlaylistEntry],
) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        "UPDATE playlists SET revision = revision + 1, updated_at = ? WHERE id = ? AND revision = ?",
    )
    .bind(Utc::now())
    .bind(id)
    .bind(expected_revision)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(ChorusError::RevisionConflict(id.clone()));
    }

    sqlx::query("DELETE FROM playlist_entries WHERE playlist_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    for (position, entry) in entries.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO playlist_entries
                (playlist_id, position, track_id, added_at, added_by, is_local)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(position as i64)
        .bind(&entry.track_id)
        .bind(entry.added_at)
        .bind(&entry.added_by)
        .bind(entry.is_local)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(expected_revision + 1)
}

fn row_to_playlist(row: &sqlx::sqlite::SqliteRow) -> Playlist {
    Playlist {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        name: row.get("name"),
        description: row.get("description"),
        is_public: row.get::<i64, _>("is_public") != 0,
        is_collaborative: row.get::<i64, _>("is_collaborative") != 0,
        collaborators: Vec::new(),
        followers_count: row.get("followers_count"),
        revision: row.get("revision"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
