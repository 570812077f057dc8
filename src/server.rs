//! Server bootstrap.

use anyhow::Result;

use crate::config::Config;
use crate::routes::AppState;
use crate::{create_app, db};

/// Start the HTTP server. The database pool is the process-wide handle from
/// [`crate::db::pool`], established once before the listener accepts traffic.
pub async fn serve(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    let host = host_override.unwrap_or_else(|| config.server.host.clone());
    let port = port_override.unwrap_or(config.server.port);

    let pool = db::pool(&config.database).await?.clone();

    let state = AppState::new(pool, config);
    let app = create_app(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
