pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod observability;
pub mod routes;
pub mod server;

pub use routes::AppState;

use axum::Router;
use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::routes::{
    get_likes, health, post_likes, post_login, post_logout, post_register, ready,
};

/// Build the application router. Used by `server::serve` and by integration
/// tests that drive the router directly.
pub fn create_app(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/likes", post(post_likes))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .with_state(state.pool.clone())
        .merge(
            Router::new()
                .route("/auth/register", post(post_register))
                .route("/auth/login", post(post_login))
                .route("/auth/logout", post(post_logout))
                .route("/likes", get(get_likes))
                .merge(protected_routes)
                .with_state(state),
        )
        .layer(TraceLayer::new_for_http())
}

/// Run the schema migrations against a pool.
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
