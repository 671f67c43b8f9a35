//! Saved-items library types
use super::catalog::{Album, Track};
use super::ids::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of catalog item a library row points at.
///
/// A closed variant, resolved once at the boundary; storage dispatches
/// on it instead of inspecting the referenced entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Track,
    Album,
}

impl ItemKind {
    /// String form used for database storage
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Track => "track",
            ItemKind::Album => "album",
        }
    }

    /// Parse from the stored string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "track" => Some(ItemKind::Track),
            "album" => Some(ItemKind::Album),
            _ => None,
        }
    }
}

/// One saved track or album in a user's library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedItem {
    pub user_id: UserId,
    pub kind: ItemKind,
    pub item_id: String,
    pub added_at: DateTime<Utc>,
}

/// Saved item joined with its catalog entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedItemDetail {
    pub item_id: String,
    pub added_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<Track>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<Album>,
}

/// One page of a larger result set, with offsets for the neighbors.
///
/// `next` is absent once `offset + limit` passes the total; `previous`
/// is absent when the current offset cannot step back a full page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: usize,
    pub offset: usize,
    pub next: Option<usize>,
    pub previous: Option<usize>,
}

impl<T> Page<T> {
    /// Assemble a page, deriving the next/previous offsets
    pub fn new(items: Vec<T>, total: i64, limit: usize, offset: usize) -> Self {
        let next = if (offset + limit) as i64 > total {
            None
        } else {
            Some(offset + limit)
        };
        let previous = offset.checked_sub(limit);
        Self {
            items,
            total,
            limit,
            offset,
            next,
            previous,
        }
    }
}
