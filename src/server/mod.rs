//! Preview server -- serves the generated deploy directory locally with a
//! couple of JSON endpoints on top.

use std::path::PathBuf;

use anyhow::Result;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::manifest::Manifest;

#[derive(Clone)]
pub struct AppState {
    pub deploy_dir: PathBuf,
}

impl AppState {
    fn manifest_path(&self) -> PathBuf {
        self.deploy_dir.join("reports").join("manifest.json")
    }
}

/// Build the application router: API routes plus static files from the
/// deploy directory.
pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(state.deploy_dir.clone());

    Router::new()
        .route("/api/health", get(health))
        .route("/api/manifest", get(manifest))
        .with_state(state)
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve the deploy directory at `bind` until the process is stopped.
pub async fn serve(bind: &str, deploy_dir: PathBuf) -> Result<()> {
    let addr: std::net::SocketAddr = bind.parse()?;
    let app = router(AppState { deploy_dir });

    tracing::info!(%addr, "preview server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({
        "data": {
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION")
        },
        "meta": {
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "version": env!("CARGO_PKG_VERSION")
        }
    }))
}

/// The manifest as the dashboard sees it. A missing manifest is the normal
/// pre-first-run state and reports an empty history, not an error.
async fn manifest(State(state): State<AppState>) -> Json<Value> {
    let manifest = Manifest::load(&state.manifest_path());
    let total = manifest.reports.len();
    Json(json!({
        "data": manifest,
        "meta": {
            "reports": total,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }
    }))
}
