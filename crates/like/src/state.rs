use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted fact that a user likes a post. One row per (post_id, user_id)
/// pair, enforced by a unique constraint; rows are inserted and deleted,
/// never updated in place.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LikeRecord {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Derived view of a post's like state, recomputed from the record set on
/// every read. `liked` is false for anonymous requesters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    pub likes_count: i64,
    pub liked: bool,
}

/// One tick of a live-count subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeCountUpdate {
    pub post_id: String,
    pub likes_count: i64,
}
