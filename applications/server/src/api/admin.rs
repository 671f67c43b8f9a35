/// Admin API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use chorus_core::{CreateUser, User};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub password: String,
}

/// POST /api/admin/users
pub async fn create_user(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let display_name = req.display_name.unwrap_or_else(|| req.username.clone());
    let user = chorus_storage::users::create(
        &app_state.db,
        CreateUser {
            username: req.username,
            display_name,
        },
    )
    .await?;

    let password_hash = app_state.auth_service.hash_password(&req.password)?;
    chorus_storage::users::store_credentials(&app_state.db, &user.id, &password_hash).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/admin/users
pub async fn list_users(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Vec<User>>> {
    let users = chorus_storage::users::get_all(&app_state.db).await?;
    Ok(Json(users))
}
