/// Playlists API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chorus_core::{
    tracklist::{RemoveRequest, TRACK_PAGE_LIMIT},
    CreatePlaylist, Page, Playlist, PlaylistEntryDetail, PlaylistId, TrackId, UpdatePlaylist,
    UserId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub collaborative: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub public: Option<bool>,
    pub collaborative: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AddTracksRequest {
    pub ids: Vec<String>,
    #[serde(default)]
    pub position: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<RemoveRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub range_start: usize,
    #[serde(default = "default_range_length")]
    pub range_length: usize,
    pub insert_before: usize,
}

fn default_range_length() -> usize {
    1
}

#[derive(Debug, Deserialize)]
pub struct CollaboratorsRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackPageQuery {
    #[serde(default = "default_track_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_track_limit() -> usize {
    TRACK_PAGE_LIMIT
}

/// The sequence revision after a successful mutation; clients pass it
/// around the way they would a snapshot id
#[derive(Debug, Serialize)]
pub struct RevisionResponse {
    pub revision: i64,
}

#[derive(Debug, Serialize)]
pub struct PlaylistWithTracks {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub tracks: Page<PlaylistEntryDetail>,
}

/// GET /api/me/playlists
pub async fn list_my_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Playlist>>> {
    let playlists =
        chorus_storage::playlists::list_for_user(&app_state.db, auth.user_id()).await?;
    Ok(Json(playlists))
}

/// POST /api/playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<Playlist>)> {
    let playlist = chorus_storage::playlists::create(
        &app_state.db,
        CreatePlaylist {
            owner_id: auth.user_id().clone(),
            name: req.name,
            description: req.description,
            is_public: req.public,
            is_collaborative: req.collaborative,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(playlist)))
}

/// GET /api/playlists/:id
/// Playlist details with the first page of tracks embedded
pub async fn get_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PlaylistWithTracks>> {
    let playlist_id = PlaylistId::new(id);
    let playlist =
        chorus_storage::playlists::get(&app_state.db, &playlist_id, auth.user_id()).await?;
    let tracks = chorus_storage::playlists::entry_page(
        &app_state.db,
        &playlist_id,
        auth.user_id(),
        0,
        TRACK_PAGE_LIMIT,
    )
    .await?;

    Ok(Json(PlaylistWithTracks { playlist, tracks }))
}

/// PUT /api/playlists/:id
pub async fn update_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<UpdatePlaylistRequest>,
) -> Result<Json<Playlist>> {
    let playlist = chorus_storage::playlists::update_details(
        &app_state.db,
        &PlaylistId::new(id),
        auth.user_id(),
        UpdatePlaylist {
            name: req.name,
            description: req.description,
            is_public: req.public,
            is_collaborative: req.collaborative,
        },
    )
    .await?;
    Ok(Json(playlist))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    chorus_storage::playlists::delete(&app_state.db, &PlaylistId::new(id), auth.user_id())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/playlists/:id/tracks
pub async fn get_playlist_tracks(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<TrackPageQuery>,
) -> Result<Json<Page<PlaylistEntryDetail>>> {
    let page = chorus_storage::playlists::entry_page(
        &app_state.db,
        &PlaylistId::new(id),
        auth.user_id(),
        query.offset,
        query.limit,
    )
    .await?;
    Ok(Json(page))
}

/// POST /api/playlists/:id/tracks
pub async fn add_playlist_tracks(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<AddTracksRequest>,
) -> Result<(StatusCode, Json<RevisionResponse>)> {
    let track_ids: Vec<TrackId> = req.ids.iter().map(TrackId::new).collect();
    let revision = chorus_storage::playlists::insert_tracks(
        &app_state.db,
        &PlaylistId::new(id),
        auth.user_id(),
        &track_ids,
        req.position,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(RevisionResponse { revision })))
}

/// DELETE /api/playlists/:id/tracks
///
/// The body is deserialized strictly: a request object carrying keys
/// outside `id`/`positions` is rejected as a bad request.
pub async fn remove_playlist_tracks(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<RevisionResponse>> {
    let req: RemoveTracksRequest = serde_json::from_value(body)
        .map_err(|e| ServerError::BadRequest(format!("invalid removal request: {e}")))?;

    let revision = chorus_storage::playlists::remove_tracks(
        &app_state.db,
        &PlaylistId::new(id),
        auth.user_id(),
        &req.tracks,
    )
    .await?;
    Ok(Json(RevisionResponse { revision }))
}

/// PUT /api/playlists/:id/tracks/reorder
pub async fn reorder_playlist_tracks(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<RevisionResponse>> {
    let revision = chorus_storage::playlists::reorder_tracks(
        &app_state.db,
        &PlaylistId::new(id),
        auth.user_id(),
        req.range_start,
        req.range_length,
        req.insert_before,
    )
    .await?;
    Ok(Json(RevisionResponse { revision }))
}

/// PUT /api/playlists/:id/collaborators
pub async fn set_collaborators(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CollaboratorsRequest>,
) -> Result<StatusCode> {
    let collaborators: Vec<UserId> = req.ids.iter().map(UserId::new).collect();
    chorus_storage::playlists::set_collaborators(
        &app_state.db,
        &PlaylistId::new(id),
        auth.user_id(),
        &collaborators,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
