//! Chorus Storage
//!
//! `SQLite` persistence layer for the Chorus streaming backend.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each feature owns its own queries and logic
//! - **Injected Handle**: every function takes the pool explicitly;
//!   there is no process-global connection state
//! - **Guarded Sequence Writes**: playlist entry sequences are replaced
//!   wholesale under a revision check, so concurrent writers conflict
//!   instead of silently losing updates
//!
//! # Example
//!
//! ```rust,no_run
//! use chorus_storage::{create_pool, run_migrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://chorus.db").await?;
//! run_migrations(&pool).await?;
//!
//! let playlists =
//!     chorus_storage::playlists::list_for_user(&pool, &chorus_core::UserId::new("u1")).await?;
//! # Ok(())
//! # }
//! ```

// Vertical slices
pub mod albums;
pub mod artists;
pub mod follows;
pub mod history;
pub mod library;
pub mod playlists;
pub mod stats;
pub mod tracks;
pub mod users;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into the binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations.
///
/// Called once at process start so the schema is up to date before any
/// slice touches the pool.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://chorus.db`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("database pool ready for {}", database_url);

    Ok(pool)
}
