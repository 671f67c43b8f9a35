/// API integration tests
/// Tests complete HTTP request/response cycles with a real database
mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::*;
use serde_json::json;
use tower::util::ServiceExt;

#[tokio::test]
async fn test_protected_route_requires_token() {
    let test = create_test_app().await;

    let request = Request::builder()
        .uri("/api/me/tracks")
        .body(Body::empty())
        .unwrap();

    let response = test.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_flow() {
    let test = create_test_app().await;
    create_user_with_token(&test, "alice", "password123").await;

    let login_body = json!({
        "username": "alice",
        "password": "password123"
    });
    let request = Request::builder()
        .uri("/api/auth/login")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&login_body).unwrap()))
        .unwrap();

    let response = test.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let login_response = response_json(response).await;
    let access_token = login_response["access_token"].as_str().unwrap();
    assert!(login_response["refresh_token"].is_string());

    // The issued token opens protected routes.
    let response = test
        .app
        .oneshot(auth_request("GET", "/api/me/playlists", access_token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let test = create_test_app().await;
    create_user_with_token(&test, "alice", "correct-password").await;

    let login_body = json!({
        "username": "alice",
        "password": "wrong-password"
    });
    let request = Request::builder()
        .uri("/api/auth/login")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&login_body).unwrap()))
        .unwrap();

    let response = test.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_playlist_track_lifecycle() {
    let test = create_test_app().await;
    let (_user, token) = create_user_with_token(&test, "alice", "pw").await;
    let tracks = seed_tracks(&test.pool, 5).await;
    let ids: Vec<&str> = tracks.iter().map(|t| t.as_str()).collect();

    // Create a playlist.
    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "POST",
            "/api/playlists",
            &token,
            Some(json!({ "name": "Road Trip" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let playlist = response_json(response).await;
    let playlist_id = playlist["id"].as_str().unwrap().to_string();
    assert_eq!(playlist["revision"], 0);

    // Append five tracks.
    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "POST",
            &format!("/api/playlists/{playlist_id}/tracks"),
            &token,
            Some(json!({ "ids": ids })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response_json(response).await["revision"], 1);

    // Move the first two tracks before index 4: [T3, T4, T1, T2, T5].
    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "PUT",
            &format!("/api/playlists/{playlist_id}/tracks/reorder"),
            &token,
            Some(json!({ "range_start": 0, "range_length": 2, "insert_before": 4 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "GET",
            &format!("/api/playlists/{playlist_id}/tracks"),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = response_json(response).await;
    let order: Vec<&str> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["track_id"].as_str().unwrap())
        .collect();
    assert_eq!(order, [ids[2], ids[3], ids[0], ids[1], ids[4]]);

    // Remove one occurrence by position and one track wholesale.
    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "DELETE",
            &format!("/api/playlists/{playlist_id}/tracks"),
            &token,
            Some(json!({
                "tracks": [
                    { "id": ids[2], "positions": [0] },
                    { "id": ids[4] }
                ]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "GET",
            &format!("/api/playlists/{playlist_id}"),
            &token,
            None,
        ))
        .await
        .unwrap();
    let playlist = response_json(response).await;
    let order: Vec<&str> = playlist["tracks"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["track_id"].as_str().unwrap())
        .collect();
    assert_eq!(order, [ids[3], ids[0], ids[1]]);
}

#[tokio::test]
async fn test_remove_with_mismatched_position_is_rejected() {
    let test = create_test_app().await;
    let (_user, token) = create_user_with_token(&test, "alice", "pw").await;
    let tracks = seed_tracks(&test.pool, 3).await;
    let ids: Vec<&str> = tracks.iter().map(|t| t.as_str()).collect();

    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "POST",
            "/api/playlists",
            &token,
            Some(json!({ "name": "Mix" })),
        ))
        .await
        .unwrap();
    let playlist_id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    test.app
        .clone()
        .oneshot(auth_request(
            "POST",
            &format!("/api/playlists/{playlist_id}/tracks"),
            &token,
            Some(json!({ "ids": ids })),
        ))
        .await
        .unwrap();

    // Position 0 holds the first track, not the second.
    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "DELETE",
            &format!("/api/playlists/{playlist_id}/tracks"),
            &token,
            Some(json!({ "tracks": [ { "id": ids[1], "positions": [0] } ] })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown keys in a removal request are rejected too.
    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "DELETE",
            &format!("/api/playlists/{playlist_id}/tracks"),
            &token,
            Some(json!({ "tracks": [ { "id": ids[0], "uri": "spotify:track:x" } ] })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The sequence is untouched.
    let response = test
        .app
        .oneshot(auth_request(
            "GET",
            &format!("/api/playlists/{playlist_id}/tracks"),
            &token,
            None,
        ))
        .await
        .unwrap();
    let page = response_json(response).await;
    assert_eq!(page["total"], 3);
}

#[tokio::test]
async fn test_private_playlist_is_forbidden_not_missing() {
    let test = create_test_app().await;
    let (_owner, owner_token) = create_user_with_token(&test, "owner", "pw").await;
    let (_other, other_token) = create_user_with_token(&test, "other", "pw").await;

    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "POST",
            "/api/playlists",
            &owner_token,
            Some(json!({ "name": "Secret" })),
        ))
        .await
        .unwrap();
    let playlist_id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    // A stranger gets 403, deliberately not 404.
    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "GET",
            &format!("/api/playlists/{playlist_id}"),
            &other_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner reads it fine; a missing playlist is 404.
    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "GET",
            &format!("/api/playlists/{playlist_id}"),
            &owner_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = test
        .app
        .oneshot(auth_request(
            "GET",
            "/api/playlists/does-not-exist",
            &owner_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_library_save_is_idempotent_over_http() {
    let test = create_test_app().await;
    let (_user, token) = create_user_with_token(&test, "alice", "pw").await;
    let tracks = seed_tracks(&test.pool, 2).await;
    let ids = format!("{},{}", tracks[0], tracks[1]);

    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "PUT",
            &format!("/api/me/tracks?ids={ids}"),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response_json(response).await.as_array().unwrap().len(), 2);

    // The second save creates nothing.
    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "PUT",
            &format!("/api/me/tracks?ids={ids}"),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response_json(response).await.as_array().unwrap().is_empty());

    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "GET",
            &format!("/api/me/tracks/contains?ids={},ghost", tracks[0]),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response_json(response).await, json!([true, false]));

    let response = test
        .app
        .oneshot(auth_request("GET", "/api/me/tracks", &token, None))
        .await
        .unwrap();
    let page = response_json(response).await;
    assert_eq!(page["total"], 2);
    assert!(page["next"].is_null());
}

#[tokio::test]
async fn test_follow_playlist_conflicts_over_http() {
    let test = create_test_app().await;
    let (_owner, owner_token) = create_user_with_token(&test, "owner", "pw").await;
    let (_fan, fan_token) = create_user_with_token(&test, "fan", "pw").await;

    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "POST",
            "/api/playlists",
            &owner_token,
            Some(json!({ "name": "Hits", "public": true })),
        ))
        .await
        .unwrap();
    let playlist_id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let follow_uri = format!("/api/playlists/{playlist_id}/followers");

    let response = test
        .app
        .clone()
        .oneshot(auth_request("PUT", &follow_uri, &fan_token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Following twice is a state conflict.
    let response = test
        .app
        .clone()
        .oneshot(auth_request("PUT", &follow_uri, &fan_token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = test
        .app
        .clone()
        .oneshot(auth_request("DELETE", &follow_uri, &fan_token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = test
        .app
        .oneshot(auth_request("DELETE", &follow_uri, &fan_token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listen_stats_over_http() {
    let test = create_test_app().await;
    let (_user, token) = create_user_with_token(&test, "listener", "pw").await;
    let tracks = seed_tracks(&test.pool, 1).await;
    let track_id = tracks[0].as_str();

    for _ in 0..3 {
        let response = test
            .app
            .clone()
            .oneshot(auth_request(
                "POST",
                "/api/me/player/plays",
                &token,
                Some(json!({ "track_id": track_id })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let now = chrono::Utc::now();
    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "POST",
            "/api/stats/tracks/listens",
            &token,
            Some(json!({
                "ids": [track_id],
                "period": "day",
                "start_date": now - chrono::Duration::days(1),
                "end_date": now + chrono::Duration::days(1),
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let buckets = response_json(response).await;
    assert_eq!(buckets.as_array().unwrap().len(), 1);
    assert_eq!(buckets[0]["target_id"], track_id);
    assert_eq!(buckets[0]["count"], 3);

    // A bad period is a validation failure.
    let response = test
        .app
        .oneshot(auth_request(
            "POST",
            "/api/stats/tracks/listens",
            &token,
            Some(json!({
                "ids": [track_id],
                "period": "decade",
                "start_date": now,
                "end_date": now,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_follow_users_over_http() {
    let test = create_test_app().await;
    let (_alice, alice_token) = create_user_with_token(&test, "alice", "pw").await;
    let (bob, _) = create_user_with_token(&test, "bob", "pw").await;

    let response = test
        .app
        .clone()
        .oneshot(auth_request(
            "PUT",
            &format!("/api/me/following?ids={}&type=user", bob.id),
            &alice_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = test
        .app
        .clone()
        .oneshot(auth_request("GET", "/api/me/following", &alice_token, None))
        .await
        .unwrap();
    let following = response_json(response).await;
    assert_eq!(following.as_array().unwrap().len(), 1);
    assert_eq!(following[0]["id"], bob.id.as_str());
    assert_eq!(following[0]["type"], "user");

    let response = test
        .app
        .oneshot(auth_request(
            "DELETE",
            &format!("/api/me/following?ids={}", bob.id),
            &alice_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
