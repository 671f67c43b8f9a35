//! Shared fixtures for API integration tests
use axum::{body::Body, http::Request, Router};
use chorus_core::{CreateArtist, CreateTrack, CreateUser, TrackId, User};
use chorus_server::{create_router, services::AuthService, state::AppState};
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestApp {
    pub app: Router,
    pub auth: Arc<AuthService>,
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

/// Build a router over a fresh temp-file database
pub async fn create_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let pool = chorus_storage::create_pool(&db_url).await.unwrap();
    chorus_storage::run_migrations(&pool).await.unwrap();

    let auth = Arc::new(AuthService::new(
        "test-secret-key".to_string(),
        1, // 1 hour access
        1, // 1 day refresh
    ));

    let app_state = AppState::new(pool.clone(), Arc::clone(&auth));
    let app = create_router(app_state, Arc::clone(&auth));

    TestApp {
        app,
        auth,
        pool,
        _temp_dir: temp_dir,
    }
}

/// Create a user with stored credentials and return it with a valid
/// access token
pub async fn create_user_with_token(test: &TestApp, username: &str, password: &str) -> (User, String) {
    let user = chorus_storage::users::create(
        &test.pool,
        CreateUser {
            username: username.to_string(),
            display_name: username.to_string(),
        },
    )
    .await
    .unwrap();

    let hash = test.auth.hash_password(password).unwrap();
    chorus_storage::users::store_credentials(&test.pool, &user.id, &hash)
        .await
        .unwrap();

    let token = test.auth.issue_access_token(&user.id).unwrap();
    (user, token)
}

/// Seed `count` catalog tracks under one artist
pub async fn seed_tracks(pool: &SqlitePool, count: usize) -> Vec<TrackId> {
    let artist = chorus_storage::artists::create(
        pool,
        CreateArtist {
            name: "Test Artist".to_string(),
        },
    )
    .await
    .unwrap();

    let mut tracks = Vec::new();
    for i in 0..count {
        let track = chorus_storage::tracks::create(
            pool,
            CreateTrack {
                title: format!("Track {i}"),
                artist_id: artist.id.clone(),
                album_id: None,
                duration_secs: 200,
            },
        )
        .await
        .unwrap();
        tracks.push(track.id);
    }
    tracks
}

/// Build an authenticated JSON request
pub fn auth_request(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .uri(uri)
        .method(method)
        .header(axum::http::header::AUTHORIZATION, format!("Bearer {token}"));

    match body {
        Some(json) => builder
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a JSON response body
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
