//! Saved-items library vertical slice.
//!
//! Saves are idempotent: ids already present for the user are skipped
//! silently and only the net-new rows are reported back. The per-user
//! bound and the (user, kind, item) uniqueness are both enforced here,
//! not by the schema.

use crate::{albums, tracks};
use chorus_core::{
    AlbumId, ChorusError, ItemKind, Page, Result, SavedItem, SavedItemDetail, TrackId, UserId,
};
use chrono::Utc;
use sqlx::{QueryBuilder, Row, SqlitePool};
use std::collections::HashSet;

/// Maximum saved items per user and kind
pub const MAX_SAVED_PER_KIND: i64 = 10_000;

/// Save items into the user's library.
///
/// Returns only the rows actually created; callers must not assume the
/// result length matches the request.
pub async fn save(
    pool: &SqlitePool,
    user: &UserId,
    kind: ItemKind,
    ids: &[String],
) -> Result<Vec<SavedItem>> {
    if ids.is_empty() {
        return Err(ChorusError::invalid_input("no item ids given"));
    }

    if count(pool, user, kind).await? >= MAX_SAVED_PER_KIND {
        return Err(ChorusError::LimitExceeded {
            limit: MAX_SAVED_PER_KIND as usize,
        });
    }

    let resolved = resolve(pool, kind, ids).await?;
    if resolved.is_empty() {
        return Err(ChorusError::not_found(kind_entity(kind), ids.join(",")));
    }

    let already_saved = saved_subset(pool, user, kind, ids).await?;

    // Request order preserved; request-level duplicates collapse so the
    // uniqueness invariant holds even without a schema constraint.
    let mut seen: HashSet<&String> = HashSet::new();
    let net_new: Vec<&String> = ids
        .iter()
        .filter(|id| resolved.contains(*id) && !already_saved.contains(*id) && seen.insert(*id))
        .collect();

    let mut created = Vec::with_capacity(net_new.len());
    for id in net_new {
        let item = SavedItem {
            user_id: user.clone(),
            kind,
            item_id: id.clone(),
            added_at: Utc::now(),
        };
        sqlx::query(
            "INSERT INTO saved_items (user_id, kind, item_id, added_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&item.user_id)
        .bind(kind.as_str())
        .bind(&item.item_id)
        .bind(item.added_at)
        .execute(pool)
        .await?;
        created.push(item);
    }

    Ok(created)
}

/// Remove items from the user's library.
///
/// Fails with `NotFound` when nothing matched.
pub async fn remove(
    pool: &SqlitePool,
    user: &UserId,
    kind: ItemKind,
    ids: &[String],
) -> Result<u64> {
    if ids.is_empty() {
        return Err(ChorusError::invalid_input("no item ids given"));
    }

    let mut qb =
        QueryBuilder::new("DELETE FROM saved_items WHERE user_id = ");
    qb.push_bind(user);
    qb.push(" AND kind = ");
    qb.push_bind(kind.as_str());
    qb.push(" AND item_id IN (");
    let mut sep = qb.separated(", ");
    for id in ids {
        sep.push_bind(id);
    }
    qb.push(")");

    let deleted = qb.build().execute(pool).await?.rows_affected();
    if deleted == 0 {
        return Err(ChorusError::not_found(kind_entity(kind), ids.join(",")));
    }
    Ok(deleted)
}

/// One flag per input id, order-preserving
pub async fn contains(
    pool: &SqlitePool,
    user: &UserId,
    kind: ItemKind,
    ids: &[String],
) -> Result<Vec<bool>> {
    if ids.is_empty() {
        return Err(ChorusError::invalid_input("no item ids given"));
    }

    let saved = saved_subset(pool, user, kind, ids).await?;
    Ok(ids.iter().map(|id| saved.contains(id)).collect())
}

/// One page of the user's library, joined with the catalog item
pub async fn list(
    pool: &SqlitePool,
    user: &UserId,
    kind: ItemKind,
    limit: usize,
    offset: usize,
) -> Result<Page<SavedItemDetail>> {
    let total = count(pool, user, kind).await?;

    let sql = match kind {
        ItemKind::Track => {
            r#"
            SELECT si.item_id, si.added_at,
                   t.id, t.title, t.artist_id, t.album_id, t.duration_secs
            FROM saved_items si
            LEFT JOIN tracks t ON si.item_id = t.id
            WHERE si.user_id = ? AND si.kind = 'track'
            ORDER BY si.rowid
            LIMIT ? OFFSET ?
            "#
        }
        ItemKind::Album => {
            r#"
            SELECT si.item_id, si.added_at,
                   a.id, a.title, a.artist_id
            FROM saved_items si
            LEFT JOIN albums a ON si.item_id = a.id
            WHERE si.user_id = ? AND si.kind = 'album'
            ORDER BY si.rowid
            LIMIT ? OFFSET ?
            "#
        }
    };

    let rows = sqlx::query(sql)
        .bind(user)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(pool)
        .await?;

    let items = rows
        .into_iter()
        .map(|row| {
            let joined = row.get::<Option<String>, _>("id").is_some();
            SavedItemDetail {
                item_id: row.get("item_id"),
                added_at: row.get("added_at"),
                track: (kind == ItemKind::Track && joined)
                    .then(|| tracks::row_to_track(&row)),
                album: (kind == ItemKind::Album && joined)
                    .then(|| albums::row_to_album(&row)),
            }
        })
        .collect();

    Ok(Page::new(items, total, limit, offset))
}

// Helper functions

async fn count(pool: &SqlitePool, user: &UserId, kind: ItemKind) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS cnt FROM saved_items WHERE user_id = ? AND kind = ?")
        .bind(user)
        .bind(kind.as_str())
        .fetch_one(pool)
        .await?;
    Ok(row.get("cnt"))
}

/// Which of `ids` exist in the catalog for this kind
async fn resolve(pool: &SqlitePool, kind: ItemKind, ids: &[String]) -> Result<HashSet<String>> {
    match kind {
        ItemKind::Track => {
            let typed: Vec<TrackId> = ids.iter().map(TrackId::new).collect();
            Ok(tracks::resolve_existing(pool, &typed)
                .await?
                .into_iter()
                .map(|id| id.as_str().to_string())
                .collect())
        }
        ItemKind::Album => {
            let typed: Vec<AlbumId> = ids.iter().map(AlbumId::new).collect();
            Ok(albums::resolve_existing(pool, &typed)
                .await?
                .into_iter()
                .map(|id| id.as_str().to_string())
                .collect())
        }
    }
}

/// Which of `ids` this user has already saved
async fn saved_subset(
    pool: &SqlitePool,
    user: &UserId,
    kind: ItemKind,
    ids: &[String],
) -> Result<HashSet<String>> {
    let mut qb = QueryBuilder::new("SELECT item_id FROM saved_items WHERE user_id = ");
    qb.push_bind(user);
    qb.push(" AND kind = ");
    qb.push_bind(kind.as_str());
    qb.push(" AND item_id IN (");
    let mut sep = qb.separated(", ");
    for id in ids {
        sep.push_bind(id);
    }
    qb.push(")");

    let rows = qb.build().fetch_all(pool).await?;
    Ok(rows.into_iter().map(|row| row.get("item_id")).collect())
}

fn kind_entity(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Track => "Track",
        ItemKind::Album => "Album",
    }
}
