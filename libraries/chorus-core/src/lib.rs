//! Chorus Core
//!
//! Domain types, typed identifiers, error handling, and the pure
//! collection algorithms behind the Chorus streaming backend.
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Album`, `Playlist`, `User`, `SavedItem`, etc.
//! - **Pure Algorithms**: ordered playlist sequences ([`tracklist`]),
//!   playlist authorization ([`access`]), and time-bucketed event
//!   grouping ([`stats`])
//! - **Error Handling**: unified [`ChorusError`] and [`Result`] types
//!
//! Everything in this crate is I/O-free; persistence lives in
//! `chorus-storage` and the HTTP surface in `chorus-server`.

#![forbid(unsafe_code)]

pub mod access;
pub mod error;
pub mod stats;
pub mod tracklist;
pub mod types;

// Re-export commonly used types
pub use error::{ChorusError, Result};

pub use types::{
    // Identifiers
    AlbumId, ArtistId, PlaylistId, TrackId, UserId,
    // Catalog
    Album, Artist, CreateAlbum, CreateArtist, CreateTrack, Track,
    // Users
    CreateUser, User,
    // Playlists
    CreatePlaylist, Playlist, PlaylistEntry, PlaylistEntryDetail, UpdatePlaylist,
    // Library
    ItemKind, Page, SavedItem, SavedItemDetail,
    // Social graph
    FollowKind,
    // Play history
    PlayRecord, PlayRecordDetail,
};
