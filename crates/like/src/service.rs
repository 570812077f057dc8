//! Server-side like state: reads, the toggle mutation, and the live-count
//! subscription stream.

use std::time::Duration;

use chrono::Utc;
use futures::Stream;
use sqlx::SqlitePool;
use ulid::Ulid;

use crate::error::{LikeError, LikeResult};
use crate::state::{LikeCountUpdate, LikeRecord, LikeState};

/// Like operations over the shared connection pool. Cheap to clone; one
/// instance is shared by all request handlers.
///
/// Concurrency: no locking beyond the storage layer's unique constraint on
/// (post_id, user_id). Two concurrent toggles for the same pair race to a
/// last-write-wins outcome decided by storage ordering.
#[derive(Clone)]
pub struct LikeService {
    pool: SqlitePool,
}

impl LikeService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Current like state for a post, personalized when a user id is given.
    /// Anonymous readers always get `liked: false`. No side effects.
    pub async fn like_state(&self, post_id: &str, user_id: Option<&str>) -> LikeResult<LikeState> {
        if post_id.is_empty() {
            return Err(LikeError::EmptyPostId);
        }

        let likes_count = self.likes_count(post_id).await?;

        let liked = match user_id {
            Some(user_id) => self.pair_exists(post_id, user_id).await?,
            None => false,
        };

        Ok(LikeState { likes_count, liked })
    }

    /// Flip the like for (post_id, user_id): delete the row if it exists,
    /// insert one otherwise, then recount from the record set. The count in
    /// the returned state is always recomputed, never adjusted locally.
    pub async fn toggle(&self, post_id: &str, user_id: &str) -> LikeResult<LikeState> {
        if post_id.is_empty() {
            return Err(LikeError::EmptyPostId);
        }
        if user_id.is_empty() {
            return Err(LikeError::EmptyUserId);
        }

        let existing = sqlx::query_as::<_, LikeRecord>(
            "SELECT id, post_id, user_id, created_at FROM likes WHERE post_id = ? AND user_id = ?",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let liked = match existing {
            Some(record) => {
                sqlx::query("DELETE FROM likes WHERE id = ?")
                    .bind(&record.id)
                    .execute(&self.pool)
                    .await?;
                false
            }
            None => {
                sqlx::query(
                    "INSERT INTO likes (id, post_id, user_id, created_at) VALUES (?, ?, ?, ?)",
                )
                .bind(Ulid::new().to_string())
                .bind(post_id)
                .bind(user_id)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;
                true
            }
        };

        let likes_count = self.likes_count(post_id).await?;

        tracing::debug!(post_id, user_id, liked, likes_count, "like toggled");

        Ok(LikeState { likes_count, liked })
    }

    /// Number of like rows for a post.
    pub async fn likes_count(&self, post_id: &str) -> LikeResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn pair_exists(&self, post_id: &str, user_id: &str) -> LikeResult<bool> {
        let row: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM likes WHERE post_id = ? AND user_id = ?")
                .bind(post_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    /// Live-count subscription: yields the current count immediately, then
    /// once per `period`, each tick backed by a fresh count query. Values are
    /// emitted whether or not the count changed. The stream never ends on its
    /// own; the caller cancels by dropping it, which stops all queries.
    ///
    /// `period` must be non-zero.
    pub fn subscribe(
        &self,
        post_id: String,
        period: Duration,
    ) -> impl Stream<Item = LikeResult<LikeCountUpdate>> + use<> {
        let service = self.clone();

        futures::stream::unfold(tokio::time::interval(period), move |mut ticker| {
            let service = service.clone();
            let post_id = post_id.clone();
            async move {
                ticker.tick().await;
                let item = service
                    .likes_count(&post_id)
                    .await
                    .map(|likes_count| LikeCountUpdate {
                        post_id,
                        likes_count,
                    });
                Some((item, ticker))
            }
        })
    }
}
