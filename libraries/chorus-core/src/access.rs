//! Playlist access control.
//!
//! The write gate is deliberately asymmetric: only the owner may edit
//! details, remove entries, reorder, or delete the playlist, but
//! collaborators on a collaborative playlist may add tracks. A private
//! playlist that exists is reported as forbidden, not missing.

use crate::error::{ChorusError, Result};
use crate::types::{Playlist, UserId};

/// What the caller wants to do with a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// View the playlist and its tracks
    Read,
    /// Insert tracks into the sequence
    AddTracks,
    /// Rename, change details, remove or reorder tracks, delete
    Edit,
}

/// Check whether `caller` may act on `playlist` with the given intent
pub fn authorize(playlist: &Playlist, caller: &UserId, intent: Intent) -> Result<()> {
    let allowed = match intent {
        Intent::Read => {
            playlist.is_public
                || playlist.is_owner(caller)
                || (playlist.is_collaborative && playlist.is_collaborator(caller))
        }
        Intent::AddTracks => {
            playlist.is_owner(caller)
                || (playlist.is_collaborative && playlist.is_collaborator(caller))
        }
        Intent::Edit => playlist.is_owner(caller),
    };

    if allowed {
        Ok(())
    } else {
        Err(ChorusError::forbidden(format!(
            "no access to playlist {}",
            playlist.id
        )))
    }
}
