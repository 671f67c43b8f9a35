//! Follow graph vertical slice.
//!
//! Edges live in their own tables; the followed entity carries a
//! denormalized `followers_count`. Every edge mutation and its counter
//! update commit in one transaction, so the counter cannot drift from
//! the edge set under a crash between the two writes.

use chorus_core::{ChorusError, FollowKind, PlaylistId, Result, UserId};
use chrono::Utc;
use sqlx::{QueryBuilder, Row, SqlitePool};
use std::collections::HashSet;

/// Follow users or artists.
///
/// Targets already followed, unknown targets, and targets whose kind
/// does not match `kind_filter` are skipped. Returns the edges
/// actually created.
pub async fn follow_targets(
    pool: &SqlitePool,
    user: &UserId,
    targets: &[String],
    kind_filter: Option<FollowKind>,
) -> Result<Vec<(String, FollowKind)>> {
    if targets.is_empty() {
        return Err(ChorusError::invalid_input("no target ids given"));
    }

    let already = followed_subset(pool, user, targets, kind_filter).await?;

    let mut seen: HashSet<&String> = HashSet::new();
    let mut new_edges: Vec<(String, FollowKind)> = Vec::new();
    for target in targets {
        if !seen.insert(target) || already.contains(target) {
            continue;
        }
        if let Some(kind) = resolve_kind(pool, target, kind_filter).await? {
            new_edges.push((target.clone(), kind));
        }
    }

    if new_edges.is_empty() {
        return Ok(new_edges);
    }

    let mut tx = pool.begin().await?;
    for (target, kind) in &new_edges {
        sqlx::query(
            "INSERT INTO follows (follower_id, target_id, target_kind, followed_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user)
        .bind(target)
        .bind(kind.as_str())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        sqlx::query(&counter_update(*kind, "+ 1"))
            .bind(target)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    Ok(new_edges)
}

/// Unfollow users or artists; the mirror of [`follow_targets`]
pub async fn unfollow_targets(
    pool: &SqlitePool,
    user: &UserId,
    targets: &[String],
    kind_filter: Option<FollowKind>,
) -> Result<u64> {
    if targets.is_empty() {
        return Err(ChorusError::invalid_input("no target ids given"));
    }

    let edges = existing_edges(pool, user, targets, kind_filter).await?;
    if edges.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    for (target, kind) in &edges {
        sqlx::query(
            "DELETE FROM follows WHERE follower_id = ? AND target_id = ? AND target_kind = ?",
        )
        .bind(user)
        .bind(target)
        .bind(kind.as_str())
        .execute(&mut *tx)
        .await?;

        sqlx::query(&counter_update(*kind, "- 1"))
            .bind(target)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    Ok(edges.len() as u64)
}

/// Everything `user` follows, as `(target, kind)` pairs
pub async fn following(pool: &SqlitePool, user: &UserId) -> Result<Vec<(String, FollowKind)>> {
    let rows = sqlx::query(
        "SELECT target_id, target_kind FROM follows WHERE follower_id = ? ORDER BY followed_at",
    )
    .bind(user)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let kind = FollowKind::parse(row.get("target_kind"))?;
            Some((row.get("target_id"), kind))
        })
        .collect())
}

/// Follow a playlist.
///
/// Fails with `AlreadyFollowing` when an entry exists. The entry and
/// the playlist's counter commit together.
pub async fn follow_playlist(
    pool: &SqlitePool,
    user: &UserId,
    playlist_id: &PlaylistId,
    is_public: bool,
) -> Result<()> {
    let exists = sqlx::query("SELECT 1 AS one FROM playlists WHERE id = ?")
        .bind(playlist_id)
        .fetch_optional(pool)
        .await?
        .is_some();
    if !exists {
        return Err(ChorusError::not_found("Playlist", playlist_id));
    }

    if is_following_playlist(pool, user, playlist_id).await? {
        return Err(ChorusError::AlreadyFollowing(playlist_id.clone()));
    }

    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE playlists SET followers_count = followers_count + 1 WHERE id = ?")
        .bind(playlist_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(
        "INSERT INTO followed_playlists (user_id, playlist_id, is_public, followed_at) VALUES (?, ?, ?, ?)",
    )
    .bind(user)
    .bind(playlist_id)
    .bind(is_public)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(())
}

/// Unfollow a playlist; fails with `NotFollowing` when no entry exists
pub async fn unfollow_playlist(
    pool: &SqlitePool,
    user: &UserId,
    playlist_id: &PlaylistId,
) -> Result<()> {
    if !is_following_playlist(pool, user, playlist_id).await? {
        return Err(ChorusError::NotFollowing(playlist_id.clone()));
    }

    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE playlists SET followers_count = followers_count - 1 WHERE id = ?")
        .bind(playlist_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM followed_playlists WHERE user_id = ? AND playlist_id = ?")
        .bind(user)
        .bind(playlist_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(())
}

// Helper functions

fn counter_update(kind: FollowKind, delta: &str) -> String {
    let table = match kind {
        FollowKind::User => "users",
        FollowKind::Artist => "artists",
    };
    format!("UPDATE {table} SET followers_count = followers_count {delta} WHERE id = ?")
}

/// Which target a bare id resolves to, honoring the kind filter
async fn resolve_kind(
    pool: &SqlitePool,
    target: &str,
    kind_filter: Option<FollowKind>,
) -> Result<Option<FollowKind>> {
    let candidates = match kind_filter {
        Some(kind) => vec![kind],
        None => vec![FollowKind::User, FollowKind::Artist],
    };

    for kind in candidates {
        let table = match kind {
            FollowKind::User => "users",
            FollowKind::Artist => "artists",
        };
        let exists = sqlx::query(&format!("SELECT 1 AS one FROM {table} WHERE id = ?"))
            .bind(target)
            .fetch_optional(pool)
            .await?
            .is_some();
        if exists {
            return Ok(Some(kind));
        }
    }
    Ok(None)
}

/// Which of `targets` this user already follows
async fn followed_subset(
    pool: &SqlitePool,
    user: &UserId,
    targets: &[String],
    kind_filter: Option<FollowKind>,
) -> Result<HashSet<String>> {
    Ok(existing_edges(pool, user, targets, kind_filter)
        .await?
        .into_iter()
        .map(|(target, _)| target)
        .collect())
}

async fn existing_edges(
    pool: &SqlitePool,
    user: &UserId,
    targets: &[String],
    kind_filter: Option<FollowKind>,
) -> Result<Vec<(String, FollowKind)>> {
    let mut qb =
        QueryBuilder::new("SELECT target_id, target_kind FROM follows WHERE follower_id = ");
    qb.push_bind(user);
    if let Some(kind) = kind_filter {
        qb.push(" AND target_kind = ");
        qb.push_bind(kind.as_str());
    }
    qb.push(" AND target_id IN (");
    let mut sep = qb.separated(", ");
    for target in targets {
        sep.push_bind(target);
    }
    qb.push(")");

    let rows = qb.build().fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let kind = FollowKind::parse(row.get("target_kind"))?;
            Some((row.get("target_id"), kind))
        })
        .collect())
}

async fn is_following_playlist(
    pool: &SqlitePool,
    user: &UserId,
    playlist_id: &PlaylistId,
) -> Result<bool> {
    let row = sqlx::query(
        "SELECT 1 AS one FROM followed_playlists WHERE user_id = ? AND playlist_id = ?",
    )
    .bind(user)
    .bind(playlist_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}
