//! Shared SQLite pool: WAL-mode configuration and the process-wide handle.

use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::sync::OnceCell;

use crate::config::DatabaseConfig;

static POOL: OnceCell<SqlitePool> = OnceCell::const_new();

/// Process-wide pool, established once and reused by every request.
/// Concurrent first callers race on a single initialization; losers wait for
/// the winner's pool rather than opening their own connections.
pub async fn pool(config: &DatabaseConfig) -> Result<&'static SqlitePool> {
    POOL.get_or_try_init(|| create_pool(config)).await
}

/// Open a new pool with the PRAGMAs this service relies on. Tests call this
/// directly so each test owns an isolated database.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    configure_pragmas(&pool).await?;

    tracing::info!(
        url = %config.url,
        max_connections = config.max_connections,
        "database pool ready"
    );

    Ok(pool)
}

/// WAL mode allows concurrent readers while a toggle writes; busy_timeout
/// absorbs short write contention instead of failing with SQLITE_BUSY.
async fn configure_pragmas(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys = true")
        .execute(pool)
        .await?;

    Ok(())
}
