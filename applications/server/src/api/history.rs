/// Play history API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chorus_core::{tracklist::DEFAULT_PAGE_LIMIT, Page, PlayRecord, PlayRecordDetail, TrackId};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RecordPlayRequest {
    pub track_id: String,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

/// POST /api/me/player/plays
pub async fn record_play(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<RecordPlayRequest>,
) -> Result<(StatusCode, Json<PlayRecord>)> {
    let record = chorus_storage::history::record(
        &app_state.db,
        auth.user_id(),
        &TrackId::new(req.track_id),
        req.context,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/me/player/recently-played
pub async fn recently_played(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Page<PlayRecordDetail>>> {
    let page = chorus_storage::history::recently_played(
        &app_state.db,
        auth.user_id(),
        query.limit,
        query.offset,
    )
    .await?;
    Ok(Json(page))
}
