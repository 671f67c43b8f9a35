//! Time-bucketed grouping of play and save events.
//!
//! The storage layer fetches the raw `(target, timestamp)` pairs for a
//! window; this module folds them into per-target calendar buckets.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which event log an aggregation reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Play-history events
    Listen,
    /// Saved-item events
    Like,
}

/// What the aggregation targets resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatTarget {
    Track,
    Album,
}

/// Calendar granularity of the grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Year,
    Month,
    Day,
}

impl Period {
    /// Parse the wire form (`year` / `month` / `day`)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "year" => Some(Period::Year),
            "month" => Some(Period::Month),
            "day" => Some(Period::Day),
            _ => None,
        }
    }
}

/// One `(target, calendar bucket)` group with its event count.
///
/// `month` and `day` are populated only at the matching granularity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBucket {
    pub target_id: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    pub count: u64,
}

/// Group events by `(target, year[, month][, day])` and count them.
///
/// No ordering guarantee across the returned groups.
pub fn bucket(events: &[(String, DateTime<Utc>)], period: Period) -> Vec<StatBucket> {
    let mut counts: HashMap<(String, i32, Option<u32>, Option<u32>), u64> = HashMap::new();

    for (target, ts) in events {
        let key = match period {
            Period::Year => (target.clone(), ts.year(), None, None),
            Period::Month => (target.clone(), ts.year(), Some(ts.month()), None),
            Period::Day => (target.clone(), ts.year(), Some(ts.month()), Some(ts.day())),
        };
        *counts.entry(key).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((target_id, year, month, day), count)| StatBucket {
            target_id,
            year,
            month,
            day,
            count,
        })
        .collect()
}
