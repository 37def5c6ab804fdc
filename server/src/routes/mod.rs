//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the relay socket, a health probe, and the static
//! client bundle. Any path that is not a file in the bundle gets
//! `index.html`, so client-side routes load the app.

pub mod ws;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full relay application: socket, health probe, static bundle.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.config.static_dir.clone();
    let bundle = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/socket", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .fallback_service(bundle)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    clients: usize,
}

async fn healthz(State(state): State<AppState>) -> Json<Health> {
    Json(Health { status: "ok", clients: state.client_count().await })
}
