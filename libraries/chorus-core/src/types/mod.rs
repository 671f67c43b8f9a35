mod catalog;
mod history;
mod ids;
mod library;
mod playlist;
mod social;
mod user;

pub use catalog::{Album, Artist, CreateAlbum, CreateArtist, CreateTrack, Track};
pub use history::{PlayRecord, PlayRecordDetail};
pub use ids::{AlbumId, ArtistId, PlaylistId, TrackId, UserId};
pub use library::{ItemKind, Page, SavedItem, SavedItemDetail};
pub use playlist::{
    CreatePlaylist, Playlist, PlaylistEntry, PlaylistEntryDetail, UpdatePlaylist,
};
pub use social::FollowKind;
pub use user::{CreateUser, User};
