//! Chorus Server Library
//!
//! Multi-user music streaming backend: playlists with an ordered track
//! sequence, a per-user saved-items library, listen/like statistics,
//! and a social follow graph, served over HTTP.
//!
//! This library exposes the components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use router::create_router;
pub use services::auth::AuthService;
pub use state::AppState;
