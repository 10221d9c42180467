//! HTTP server for dentassistd

use crate::config::Config;
use crate::routes;
use crate::upstream::MlServiceClient;
use anyhow::Result;
use axum::{extract::DefaultBodyLimit, Router};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub upstream: MlServiceClient,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let upstream = MlServiceClient::new(&config.upstream)?;
        Ok(Self {
            config,
            upstream,
            start_time: Instant::now(),
        })
    }
}

/// Assemble every route with the shared middleware stack
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let cors = state.config.server.cors_permissive;

    let app = Router::new()
        .merge(routes::predict_routes())
        .merge(routes::model_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http());

    if cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Serve on an already bound listener until ctrl-c
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    let app = router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

/// Run the HTTP server
pub async fn run(state: AppState) -> Result<()> {
    let state = Arc::new(state);

    let addr = state.config.server.listen.clone();
    let listener = TcpListener::bind(&addr).await?;
    info!("  Listening on http://{}", addr);
    info!("  Forwarding to {}", state.upstream.base_url());

    serve(listener, state).await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}
