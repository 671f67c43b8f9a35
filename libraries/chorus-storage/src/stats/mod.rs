//! Listen/like statistics vertical slice.
//!
//! SQL narrows the event log to the window and targets; the calendar
//! bucketing itself happens in `chorus_core::stats`.

use chorus_core::stats::{bucket, EventKind, Period, StatBucket, StatTarget};
use chorus_core::{ChorusError, Result};
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Row, SqlitePool};

/// Count events per `(target, period bucket)` over `[start, end)`.
///
/// `Listen` reads the play log, `Like` reads library saves. Album
/// targets resolve listened tracks to their album before grouping.
pub async fn aggregate(
    pool: &SqlitePool,
    kind: EventKind,
    target: StatTarget,
    ids: &[String],
    period: Period,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<StatBucket>> {
    if ids.is_empty() {
        return Err(ChorusError::invalid_input("no target ids given"));
    }
    if start > end {
        return Err(ChorusError::invalid_input(
            "start date must not be after end date",
        ));
    }

    let events = fetch_events(pool, kind, target, ids, start, end).await?;
    Ok(bucket(&events, period))
}

async fn fetch_events(
    pool: &SqlitePool,
    kind: EventKind,
    target: StatTarget,
    ids: &[String],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<(String, DateTime<Utc>)>> {
    let mut qb = match (kind, target) {
        (EventKind::Listen, StatTarget::Track) => {
            let mut qb = QueryBuilder::new(
                "SELECT track_id AS target, played_at AS ts FROM play_history WHERE played_at >= ",
            );
            qb.push_bind(start);
            qb.push(" AND played_at < ");
            qb.push_bind(end);
            qb.push(" AND track_id IN (");
            qb
        }
        (EventKind::Listen, StatTarget::Album) => {
            // A play belongs to the album of the track that was played.
            let mut qb = QueryBuilder::new(
                r#"
                SELECT t.album_id AS target, ph.played_at AS ts
                FROM play_history ph
                INNER JOIN tracks t ON ph.track_id = t.id
                WHERE t.album_id IS NOT NULL AND ph.played_at >= "#,
            );
            qb.push_bind(start);
            qb.push(" AND ph.played_at < ");
            qb.push_bind(end);
            qb.push(" AND t.album_id IN (");
            qb
        }
        (EventKind::Like, _) => {
            let stored_kind = match target {
                StatTarget::Track => "track",
                StatTarget::Album => "album",
            };
            let mut qb = QueryBuilder::new("SELECT item_id AS target, added_at AS ts FROM saved_items WHERE kind = ");
            qb.push_bind(stored_kind);
            qb.push(" AND added_at >= ");
            qb.push_bind(start);
            qb.push(" AND added_at < ");
            qb.push_bind(end);
            qb.push(" AND item_id IN (");
            qb
        }
    };

    let mut sep = qb.separated(", ");
    for id in ids {
        sep.push_bind(id);
    }
    qb.push(")");

    let rows = qb.build().fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|row| (row.get("target"), row.get("ts")))
        .collect())
}
