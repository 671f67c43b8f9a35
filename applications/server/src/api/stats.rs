/// Listen/like statistics API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, Json};
use chorus_core::stats::{EventKind, Period, StatBucket, StatTarget};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Aggregation request. The period is parsed by hand and the dates are
/// optional at the wire level so that bad values surface as 400s, not
/// deserialization rejections.
#[derive(Debug, Deserialize)]
pub struct StatsRequest {
    pub ids: Vec<String>,
    pub period: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// POST /api/stats/tracks/listens
pub async fn track_listens(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<StatsRequest>,
) -> Result<Json<Vec<StatBucket>>> {
    aggregate(app_state, auth, EventKind::Listen, StatTarget::Track, req).await
}

/// POST /api/stats/tracks/likes
pub async fn track_likes(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<StatsRequest>,
) -> Result<Json<Vec<StatBucket>>> {
    aggregate(app_state, auth, EventKind::Like, StatTarget::Track, req).await
}

/// POST /api/stats/albums/listens
pub async fn album_listens(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<StatsRequest>,
) -> Result<Json<Vec<StatBucket>>> {
    aggregate(app_state, auth, EventKind::Listen, StatTarget::Album, req).await
}

/// POST /api/stats/albums/likes
pub async fn album_likes(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<StatsRequest>,
) -> Result<Json<Vec<StatBucket>>> {
    aggregate(app_state, auth, EventKind::Like, StatTarget::Album, req).await
}

async fn aggregate(
    app_state: AppState,
    _auth: AuthenticatedUser,
    kind: EventKind,
    target: StatTarget,
    req: StatsRequest,
) -> Result<Json<Vec<StatBucket>>> {
    let period = req
        .period
        .as_deref()
        .and_then(Period::parse)
        .ok_or_else(|| {
            ServerError::BadRequest("period must be one of year, month, day".to_string())
        })?;
    let start = req
        .start_date
        .ok_or_else(|| ServerError::BadRequest("start_date is required".to_string()))?;
    let end = req
        .end_date
        .ok_or_else(|| ServerError::BadRequest("end_date is required".to_string()))?;

    let buckets = chorus_storage::stats::aggregate(
        &app_state.db,
        kind,
        target,
        &req.ids,
        period,
        start,
        end,
    )
    .await?;
    Ok(Json(buckets))
}
