//! Integration tests for the saved-items library vertical slice
//!
//! Covers idempotent saves, the per-user bound, order-preserving
//! contains, and pagination links.

mod test_helpers;

use chorus_core::{ChorusError, ItemKind};
use chrono::Utc;
use sqlx::SqlitePool;
use test_helpers::*;

async fn seed_tracks(pool: &SqlitePool, count: usize) -> Vec<String> {
    let artist = create_test_artist(pool, "Artist").await;
    let mut ids = Vec::new();
    for i in 0..count {
        let track = create_test_track(pool, &format!("Track {i}"), artist.clone(), None).await;
        ids.push(track.as_str().to_string());
    }
    ids
}

#[tokio::test]
async fn test_save_is_idempotent() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "user").await;
    let tracks = seed_tracks(pool, 1).await;

    let created = chorus_storage::library::save(pool, &user, ItemKind::Track, &tracks)
        .await
        .unwrap();
    assert_eq!(created.len(), 1);

    // Saving again is not an error, creates nothing, and returns nothing.
    let created = chorus_storage::library::save(pool, &user, ItemKind::Track, &tracks)
        .await
        .unwrap();
    assert!(created.is_empty());

    let page = chorus_storage::library::list(pool, &user, ItemKind::Track, 50, 0)
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn test_save_skips_already_saved_and_reports_net_new() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "user").await;
    let tracks = seed_tracks(pool, 3).await;

    chorus_storage::library::save(pool, &user, ItemKind::Track, &tracks[..1])
        .await
        .unwrap();

    let created = chorus_storage::library::save(pool, &user, ItemKind::Track, &tracks)
        .await
        .unwrap();
    let created_ids: Vec<&str> = created.iter().map(|s| s.item_id.as_str()).collect();
    assert_eq!(created_ids, [&tracks[1], &tracks[2]]);
}

#[tokio::test]
async fn test_save_unresolved_ids_is_not_found() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "user").await;

    let err = chorus_storage::library::save(
        pool,
        &user,
        ItemKind::Track,
        &["ghost-1".to_string(), "ghost-2".to_string()],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ChorusError::NotFound { .. }));
}

#[tokio::test]
async fn test_save_enforces_per_user_bound() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "hoarder").await;
    let tracks = seed_tracks(pool, 1).await;

    // Fill the library to the bound directly; going through save would
    // need ten thousand catalog rows.
    let mut tx = pool.begin().await.unwrap();
    for i in 0..chorus_storage::library::MAX_SAVED_PER_KIND {
        sqlx::query("INSERT INTO saved_items (user_id, kind, item_id, added_at) VALUES (?, ?, ?, ?)")
            .bind(&user)
            .bind("track")
            .bind(format!("filler-{i}"))
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .unwrap();
    }
    tx.commit().await.unwrap();

    let err = chorus_storage::library::save(pool, &user, ItemKind::Track, &tracks)
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::LimitExceeded { .. }));

    // The bound is per user: someone else can still save.
    let other = create_test_user(pool, "other").await;
    let created = chorus_storage::library::save(pool, &other, ItemKind::Track, &tracks)
        .await
        .unwrap();
    assert_eq!(created.len(), 1);
}

#[tokio::test]
async fn test_remove_deletes_and_reports_missing() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "user").await;
    let tracks = seed_tracks(pool, 2).await;
    chorus_storage::library::save(pool, &user, ItemKind::Track, &tracks)
        .await
        .unwrap();

    let deleted = chorus_storage::library::remove(pool, &user, ItemKind::Track, &tracks[..1])
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    // Removing it again matches nothing.
    let err = chorus_storage::library::remove(pool, &user, ItemKind::Track, &tracks[..1])
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::NotFound { .. }));
}

#[tokio::test]
async fn test_contains_preserves_input_order() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "user").await;
    let tracks = seed_tracks(pool, 3).await;
    chorus_storage::library::save(pool, &user, ItemKind::Track, &tracks[1..2])
        .await
        .unwrap();

    let queried = vec![
        tracks[0].clone(),
        tracks[1].clone(),
        "ghost".to_string(),
        tracks[1].clone(),
    ];
    let flags = chorus_storage::library::contains(pool, &user, ItemKind::Track, &queried)
        .await
        .unwrap();
    assert_eq!(flags, [false, true, false, true]);
}

#[tokio::test]
async fn test_list_pagination_links() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "user").await;
    let tracks = seed_tracks(pool, 25).await;
    chorus_storage::library::save(pool, &user, ItemKind::Track, &tracks)
        .await
        .unwrap();

    let first = chorus_storage::library::list(pool, &user, ItemKind::Track, 10, 0)
        .await
        .unwrap();
    assert_eq!(first.total, 25);
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.next, Some(10));
    assert_eq!(first.previous, None);
    assert!(first.items[0].track.is_some());

    let last = chorus_storage::library::list(pool, &user, ItemKind::Track, 10, 20)
        .await
        .unwrap();
    assert_eq!(last.items.len(), 5);
    assert_eq!(last.next, None);
    assert_eq!(last.previous, Some(10));
}

#[tokio::test]
async fn test_kinds_are_separate_libraries() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "user").await;
    let artist = create_test_artist(pool, "Artist").await;
    let album = create_test_album(pool, "Album", artist.clone()).await;
    let track = create_test_track(pool, "Track", artist, Some(album.clone())).await;

    chorus_storage::library::save(
        pool,
        &user,
        ItemKind::Album,
        &[album.as_str().to_string()],
    )
    .await
    .unwrap();

    // The album save does not make the track saved.
    let flags = chorus_storage::library::contains(
        pool,
        &user,
        ItemKind::Track,
        &[track.as_str().to_string()],
    )
    .await
    .unwrap();
    assert_eq!(flags, [false]);

    let albums = chorus_storage::library::list(pool, &user, ItemKind::Album, 10, 0)
        .await
        .unwrap();
    assert_eq!(albums.total, 1);
    assert!(albums.items[0].album.is_some());
    assert!(albums.items[0].track.is_none());
}
