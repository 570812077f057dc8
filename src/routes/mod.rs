pub mod auth;
pub mod health;
pub mod likes;

pub use auth::{post_login, post_logout, post_register};
pub use health::{health, ready};
pub use likes::{get_likes, post_likes};

use sociable_like::LikeService;
use sqlx::SqlitePool;

use crate::config::Config;

/// Shared application state. Cloned per request; the pool and service are
/// both handle types.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub likes: LikeService,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let likes = LikeService::new(pool.clone());
        Self {
            pool,
            config,
            likes,
        }
    }
}
