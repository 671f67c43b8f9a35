/// Shared application state
use crate::services::auth::AuthService;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// The pool is the only store handle in the process; every slice call
/// receives it explicitly from here.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(db: SqlitePool, auth_service: Arc<AuthService>) -> Self {
        Self { db, auth_service }
    }
}
