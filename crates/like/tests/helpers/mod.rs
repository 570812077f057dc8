#![allow(dead_code)]

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use ulid::Ulid;

/// In-memory database with the likes schema used by the root crate's
/// migrations.
pub async fn setup_like_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::query(
        "CREATE TABLE likes (
            id TEXT PRIMARY KEY,
            post_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (post_id, user_id)
        )",
    )
    .execute(&pool)
    .await
    .unwrap();

    pool
}

/// Insert a like row directly, bypassing the service.
pub async fn seed_like(pool: &SqlitePool, post_id: &str, user_id: &str) {
    sqlx::query("INSERT INTO likes (id, post_id, user_id, created_at) VALUES (?, ?, ?, ?)")
        .bind(Ulid::new().to_string())
        .bind(post_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(pool)
        .await
        .unwrap();
}
