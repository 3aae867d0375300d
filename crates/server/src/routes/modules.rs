//! Module catalog endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use dmphq_core::ModuleCatalog;

use crate::state::AppState;

/// GET /api/modules - The configured business modules and their categories.
pub async fn list_modules(State(state): State<Arc<AppState>>) -> Json<ModuleCatalog> {
    Json(state.catalog.clone())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/modules", get(list_modules))
}
