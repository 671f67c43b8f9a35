//! Users vertical slice
use chorus_core::{ChorusError, CreateUser, Result, User, UserId};
use chrono::Utc;
use sqlx::{Row, SqlitePool};

/// Create a user with a generated id
pub async fn create(pool: &SqlitePool, user: CreateUser) -> Result<User> {
    if user.username.trim().is_empty() {
        return Err(ChorusError::invalid_input("username is required"));
    }

    let id = UserId::generate();
    sqlx::query("INSERT INTO users (id, username, display_name) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(&user.username)
        .bind(&user.display_name)
        .execute(pool)
        .await?;

    Ok(User {
        id,
        username: user.username,
        display_name: user.display_name,
        followers_count: 0,
    })
}

/// Get a user by id
pub async fn get(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, username, display_name, followers_count FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| row_to_user(&row)))
}

/// Look a user up by username (login path)
pub async fn get_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, username, display_name, followers_count FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| row_to_user(&row)))
}

/// All users (CLI listing)
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(
        "SELECT id, username, display_name, followers_count FROM users ORDER BY username",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_user).collect())
}

/// Store (or replace) a user's password hash
pub async fn store_credentials(
    pool: &SqlitePool,
    user_id: &UserId,
    password_hash: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_credentials (user_id, password_hash, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET password_hash = excluded.password_hash
        "#,
    )
    .bind(user_id)
    .bind(password_hash)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Fetch a user's stored password hash
pub async fn password_hash(pool: &SqlitePool, user_id: &UserId) -> Result<Option<String>> {
    let row = sqlx::query("SELECT password_hash FROM user_credentials WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.get("password_hash")))
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        display_name: row.get("display_name"),
        followers_count: row.get("followers_count"),
    }
}
