//! Liveness route.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

/// GET /api/health
async fn health() -> String {
    format!("viewexport {} ok", env!("CARGO_PKG_VERSION"))
}
