/// API route modules
pub mod admin;
pub mod auth;
pub mod follows;
pub mod health;
pub mod history;
pub mod library;
pub mod playlists;
pub mod stats;

use crate::error::{Result, ServerError};

/// Split a comma-separated `ids` query value, rejecting empty input
pub(crate) fn split_ids(raw: &str) -> Result<Vec<String>> {
    let ids: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if ids.is_empty() {
        return Err(ServerError::BadRequest("ids must not be empty".to_string()));
    }
    Ok(ids)
}
