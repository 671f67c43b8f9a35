/// Router assembly
use crate::{api, middleware, services::AuthService, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full application router
pub fn create_router(app_state: AppState, auth_service: Arc<AuthService>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/refresh", post(api::auth::refresh));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Playlists
        .route("/playlists", post(api::playlists::create_playlist))
        .route("/playlists/:id", get(api::playlists::get_playlist))
        .route("/playlists/:id", put(api::playlists::update_playlist))
        .route("/playlists/:id", delete(api::playlists::delete_playlist))
        .route(
            "/playlists/:id/tracks",
            get(api::playlists::get_playlist_tracks),
        )
        .route(
            "/playlists/:id/tracks",
            post(api::playlists::add_playlist_tracks),
        )
        .route(
            "/playlists/:id/tracks",
            delete(api::playlists::remove_playlist_tracks),
        )
        .route(
            "/playlists/:id/tracks/reorder",
            put(api::playlists::reorder_playlist_tracks),
        )
        .route(
            "/playlists/:id/collaborators",
            put(api::playlists::set_collaborators),
        )
        .route("/playlists/:id/followers", put(api::follows::follow_playlist))
        .route(
            "/playlists/:id/followers",
            delete(api::follows::unfollow_playlist),
        )
        // Library
        .route("/me/playlists", get(api::playlists::list_my_playlists))
        .route("/me/tracks", put(api::library::save_tracks))
        .route("/me/tracks", delete(api::library::remove_tracks))
        .route("/me/tracks", get(api::library::list_tracks))
        .route("/me/tracks/contains", get(api::library::contains_tracks))
        .route("/me/albums", put(api::library::save_albums))
        .route("/me/albums", delete(api::library::remove_albums))
        .route("/me/albums", get(api::library::list_albums))
        .route("/me/albums/contains", get(api::library::contains_albums))
        // Social graph
        .route("/me/following", put(api::follows::follow))
        .route("/me/following", delete(api::follows::unfollow))
        .route("/me/following", get(api::follows::list_following))
        // Play history
        .route("/me/player/plays", post(api::history::record_play))
        .route(
            "/me/player/recently-played",
            get(api::history::recently_played),
        )
        // Statistics
        .route("/stats/tracks/listens", post(api::stats::track_listens))
        .route("/stats/tracks/likes", post(api::stats::track_likes))
        .route("/stats/albums/listens", post(api::stats::album_listens))
        .route("/stats/albums/likes", post(api::stats::album_likes))
        // Admin
        .route("/admin/users", post(api::admin::create_user))
        .route("/admin/users", get(api::admin::list_users))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&auth_service),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
