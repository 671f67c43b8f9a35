/// Follow graph API routes
use crate::{
    api::split_ids,
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chorus_core::{FollowKind, PlaylistId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct FollowQuery {
    pub ids: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FollowingEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FollowKind,
}

#[derive(Debug, Deserialize)]
pub struct FollowPlaylistRequest {
    #[serde(default = "default_public")]
    pub public: bool,
}

fn default_public() -> bool {
    true
}

/// PUT /api/me/following?ids=&type=
pub async fn follow(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<FollowQuery>,
) -> Result<StatusCode> {
    let ids = split_ids(&query.ids)?;
    let kind = parse_kind(query.kind.as_deref())?;
    chorus_storage::follows::follow_targets(&app_state.db, auth.user_id(), &ids, kind).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/me/following?ids=&type=
pub async fn unfollow(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<FollowQuery>,
) -> Result<StatusCode> {
    let ids = split_ids(&query.ids)?;
    let kind = parse_kind(query.kind.as_deref())?;
    chorus_storage::follows::unfollow_targets(&app_state.db, auth.user_id(), &ids, kind).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/me/following
pub async fn list_following(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<FollowingEntry>>> {
    let following = chorus_storage::follows::following(&app_state.db, auth.user_id()).await?;
    Ok(Json(
        following
            .into_iter()
            .map(|(id, kind)| FollowingEntry { id, kind })
            .collect(),
    ))
}

/// PUT /api/playlists/:id/followers
pub async fn follow_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    body: Option<Json<FollowPlaylistRequest>>,
) -> Result<StatusCode> {
    let is_public = body.map_or(true, |Json(req)| req.public);
    chorus_storage::follows::follow_playlist(
        &app_state.db,
        auth.user_id(),
        &PlaylistId::new(id),
        is_public,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/playlists/:id/followers
pub async fn unfollow_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    chorus_storage::follows::unfollow_playlist(
        &app_state.db,
        auth.user_id(),
        &PlaylistId::new(id),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_kind(raw: Option<&str>) -> Result<Option<FollowKind>> {
    match raw {
        None => Ok(None),
        Some(s) => FollowKind::parse(s)
            .map(Some)
            .ok_or_else(|| ServerError::BadRequest(format!("unknown follow type: {s}"))),
    }
}
