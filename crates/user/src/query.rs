//! User storage queries.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use ulid::Ulid;

use crate::error::UserResult;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> UserResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, full_name, password_hash, created_at, updated_at
         FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> UserResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, full_name, password_hash, created_at, updated_at
         FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Insert a new user. A duplicate username surfaces as
/// [`crate::UserError::UsernameTaken`] via the unique index, which also
/// covers the window between a caller's existence check and the insert.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    full_name: &str,
    password_hash: &str,
) -> UserResult<User> {
    let now = Utc::now();
    let user = User {
        id: Ulid::new().to_string(),
        username: username.to_string(),
        full_name: full_name.to_string(),
        password_hash: password_hash.to_string(),
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        "INSERT INTO users (id, username, full_name, password_hash, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.username)
    .bind(&user.full_name)
    .bind(&user.password_hash)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(pool)
    .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user created");

    Ok(user)
}
