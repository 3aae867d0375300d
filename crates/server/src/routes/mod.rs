//! API route handlers for the dmphq server.

pub mod health;
pub mod metrics;
pub mod modules;
pub mod recommendations;
pub mod score;
pub mod tenants;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined router: API routes under `/api` plus `/metrics`.
///
/// Routes:
/// - GET   /api/health - Health check
/// - GET   /api/modules - Configured module catalog
/// - POST  /api/automation-score - Score posted inputs
/// - GET   /api/tenants - Tenant list with record counts
/// - DELETE /api/tenants/{tenant_id} - Drop a tenant
/// - PUT   /api/tenants/{tenant_id}/inventory - Create or replace a tenant
/// - POST  /api/tenants/{tenant_id}/tools - Add a tool
/// - POST  /api/tenants/{tenant_id}/sops - Add an SOP
/// - POST  /api/tenants/{tenant_id}/integrations - Add an integration
/// - GET   /api/tenants/{tenant_id}/automation-score - Dashboard summary
/// - GET   /api/tenants/{tenant_id}/automation-score/details - Per-module breakdown
/// - PATCH /api/tenants/{tenant_id}/recommendations/{id} - Update progress flags
/// - GET   /metrics - Prometheus metrics
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", modules::router())
        .nest("/api", score::router())
        .nest("/api", tenants::router())
        .nest("/api", recommendations::router())
        .merge(metrics::router())
        .with_state(state)
}
