//! Ordered playlist track sequences.
//!
//! A playlist's tracks form a positional sequence: entries are not
//! keyed, duplicates are allowed, and every operation here is expressed
//! as an in-memory transform over the full sequence. The storage layer
//! loads the sequence, applies one of these transforms, and writes the
//! result back in a single guarded replace, so a failed validation
//! never leaves a partially-mutated sequence behind.

use crate::error::{ChorusError, Result};
use crate::types::{PlaylistEntry, TrackId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Maximum number of entries a playlist may hold
pub const MAX_TRACKS: usize = 10_000;

/// Default page size for generic listings
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Default page size for playlist track listings
pub const TRACK_PAGE_LIMIT: usize = 100;

/// One removal request: a track id, optionally pinned to positions.
///
/// Without positions, every occurrence of the track is removed. With
/// positions, only those slots are removed, and each named slot must
/// actually hold the named track.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoveRequest {
    #[serde(rename = "id")]
    pub track_id: TrackId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<usize>>,
}

/// Contiguous slice `[offset, offset + limit)` of a sequence.
///
/// Out-of-range offsets yield an empty slice, never an error.
pub fn page<T>(entries: &[T], offset: usize, limit: usize) -> &[T] {
    if offset >= entries.len() {
        return &[];
    }
    let end = entries.len().min(offset.saturating_add(limit));
    &entries[offset..end]
}

/// Splice `new_entries` into the sequence.
///
/// `None` appends; `Some(p)` inserts before index `p`, with positions
/// beyond the current length behaving as append. Fails with
/// `SizeExceeded` when the result would pass [`MAX_TRACKS`].
pub fn insert(
    entries: &mut Vec<PlaylistEntry>,
    new_entries: Vec<PlaylistEntry>,
    position: Option<usize>,
) -> Result<()> {
    if entries.len() + new_entries.len() > MAX_TRACKS {
        return Err(ChorusError::SizeExceeded { limit: MAX_TRACKS });
    }
    let at = position.map_or(entries.len(), |p| p.min(entries.len()));
    entries.splice(at..at, new_entries);
    Ok(())
}

/// Remove entries by id or by (id, position) pairs.
///
/// Runs in two phases: every positioned request is validated against
/// the current sequence before anything is touched, then positioned
/// slots are dropped, then all remaining occurrences of ids named
/// without positions. Removing positioned slots first keeps the
/// validated indices stable under the unpositioned sweep.
pub fn remove(entries: &mut Vec<PlaylistEntry>, requests: &[RemoveRequest]) -> Result<()> {
    if entries.is_empty() {
        return Err(ChorusError::EmptyPlaylist);
    }

    let mut positioned: BTreeSet<usize> = BTreeSet::new();
    for req in requests {
        if let Some(positions) = &req.positions {
            for &p in positions {
                let holds_track = entries
                    .get(p)
                    .is_some_and(|e| e.track_id == req.track_id);
                if !holds_track {
                    return Err(ChorusError::InvalidPosition {
                        track: req.track_id.clone(),
                        position: p,
                    });
                }
                positioned.insert(p);
            }
        }
    }

    let unpositioned: HashSet<&TrackId> = requests
        .iter()
        .filter(|r| r.positions.is_none())
        .map(|r| &r.track_id)
        .collect();

    let mut idx = 0usize;
    entries.retain(|_| {
        let keep = !positioned.contains(&idx);
        idx += 1;
        keep
    });
    entries.retain(|e| !unpositioned.contains(&e.track_id));
    Ok(())
}

/// Move the block `[range_start, range_start + range_length)` to sit
/// just before `insert_before` in the remaining sequence.
///
/// An `insert_before` strictly inside the moved block is rejected with
/// `InvalidRange`. A zero-length range is a no-op. The result is always
/// a permutation of the input.
pub fn reorder(
    entries: &mut Vec<PlaylistEntry>,
    range_start: usize,
    range_length: usize,
    insert_before: usize,
) -> Result<()> {
    if range_length > 0
        && insert_before >= range_start
        && insert_before < range_start + range_length
    {
        return Err(ChorusError::InvalidRange(format!(
            "insert_before {insert_before} falls inside the moved range [{range_start}, {})",
            range_start + range_length
        )));
    }
    if range_length == 0 || range_start >= entries.len() {
        return Ok(());
    }

    let end = entries.len().min(range_start + range_length);
    let block: Vec<PlaylistEntry> = entries.drain(range_start..end).collect();

    // Removal shifted everything after the block down by its length.
    let mut at = insert_before;
    if at >= range_start + range_length {
        at -= block.len();
    }
    let at = at.min(entries.len());
    entries.splice(at..at, block);
    Ok(())
}
