/// Saved-items library API routes
use crate::{api::split_ids, error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chorus_core::{tracklist::DEFAULT_PAGE_LIMIT, ItemKind, Page, SavedItem, SavedItemDetail};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct IdsQuery {
    pub ids: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

/// PUT /api/me/tracks?ids=
pub async fn save_tracks(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<IdsQuery>,
) -> Result<(StatusCode, Json<Vec<SavedItem>>)> {
    save(app_state, auth, ItemKind::Track, &query.ids).await
}

/// PUT /api/me/albums?ids=
pub async fn save_albums(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<IdsQuery>,
) -> Result<(StatusCode, Json<Vec<SavedItem>>)> {
    save(app_state, auth, ItemKind::Album, &query.ids).await
}

/// DELETE /api/me/tracks?ids=
pub async fn remove_tracks(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<IdsQuery>,
) -> Result<Json<serde_json::Value>> {
    remove(app_state, auth, ItemKind::Track, &query.ids).await
}

/// DELETE /api/me/albums?ids=
pub async fn remove_albums(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<IdsQuery>,
) -> Result<Json<serde_json::Value>> {
    remove(app_state, auth, ItemKind::Album, &query.ids).await
}

/// GET /api/me/tracks
pub async fn list_tracks(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<SavedItemDetail>>> {
    let page = chorus_storage::library::list(
        &app_state.db,
        auth.user_id(),
        ItemKind::Track,
        query.limit,
        query.offset,
    )
    .await?;
    Ok(Json(page))
}

/// GET /api/me/albums
pub async fn list_albums(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<SavedItemDetail>>> {
    let page = chorus_storage::library::list(
        &app_state.db,
        auth.user_id(),
        ItemKind::Album,
        query.limit,
        query.offset,
    )
    .await?;
    Ok(Json(page))
}

/// GET /api/me/tracks/contains?ids=
pub async fn contains_tracks(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<IdsQuery>,
) -> Result<Json<Vec<bool>>> {
    let ids = split_ids(&query.ids)?;
    let flags =
        chorus_storage::library::contains(&app_state.db, auth.user_id(), ItemKind::Track, &ids)
            .await?;
    Ok(Json(flags))
}

/// GET /api/me/albums/contains?ids=
pub async fn contains_albums(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<IdsQuery>,
) -> Result<Json<Vec<bool>>> {
    let ids = split_ids(&query.ids)?;
    let flags =
        chorus_storage::library::contains(&app_state.db, auth.user_id(), ItemKind::Album, &ids)
            .await?;
    Ok(Json(flags))
}

async fn save(
    app_state: AppState,
    auth: AuthenticatedUser,
    kind: ItemKind,
    raw_ids: &str,
) -> Result<(StatusCode, Json<Vec<SavedItem>>)> {
    let ids = split_ids(raw_ids)?;
    let created =
        chorus_storage::library::save(&app_state.db, auth.user_id(), kind, &ids).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn remove(
    app_state: AppState,
    auth: AuthenticatedUser,
    kind: ItemKind,
    raw_ids: &str,
) -> Result<Json<serde_json::Value>> {
    let ids = split_ids(raw_ids)?;
    let removed =
        chorus_storage::library::remove(&app_state.db, auth.user_id(), kind, &ids).await?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}
