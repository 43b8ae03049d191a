//! # Uroki Server
//!
//! The axum HTTP server for the course-personalization service. This crate
//! wires the `uroki` core library to the outside world: layered
//! configuration, shared application state, the router, and the request
//! handlers.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

use state::AppState;
use tracing::info;

/// Runs the server on the given listener until it is shut down.
pub async fn run(listener: tokio::net::TcpListener, app_state: AppState) -> anyhow::Result<()> {
    let app = router::create_router(app_state);
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
