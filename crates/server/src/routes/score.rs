// crates/server/src/routes/score.rs
//! Automation score endpoints.
//!
//! - `POST /api/automation-score` scores posted inputs without touching any
//!   tenant state.
//! - `GET /api/tenants/{tenant_id}/automation-score` is the dashboard summary.
//! - `GET /api/tenants/{tenant_id}/automation-score/details` is the
//!   per-module breakdown, served from the per-tenant cache.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use dmphq_core::{
    compute_automation_score, compute_automation_score_details, AutomationScoreDetails,
    AutomationScoreResult, DimensionInputs, TenantInventory,
};

use crate::cache::DetailsHandle;
use crate::error::{ApiError, ApiResult};
use crate::metrics::{record_score, RequestTimer};
use crate::state::AppState;

/// Fetch (or compute and cache) a tenant's details.
///
/// Takes the tenant map rather than the lock so callers can keep the read
/// guard for as long as they use the returned handle.
pub(crate) async fn cached_details(
    state: &AppState,
    tenants: &HashMap<String, TenantInventory>,
    tenant_id: &str,
) -> ApiResult<DetailsHandle> {
    let inventory = tenants
        .get(tenant_id)
        .ok_or_else(|| ApiError::TenantNotFound(tenant_id.to_string()))?;

    let handle = state
        .scores
        .get_or_compute(tenant_id, || {
            let details =
                compute_automation_score_details(&inventory.module_inputs(&state.catalog));
            record_score("details", Some(tenant_id), details.overall_score);
            details
        })
        .await;
    Ok(handle)
}

/// POST /api/automation-score - Score posted inputs.
pub async fn score_inputs(
    Json(inputs): Json<DimensionInputs>,
) -> ApiResult<Json<AutomationScoreResult>> {
    let timer = RequestTimer::new("adhoc_score");
    let result = inputs
        .validate()
        .map_err(ApiError::from)
        .map(|()| compute_automation_score(&inputs));
    timer.finish_result(&result);

    let result = result?;
    record_score("adhoc", None, result.score);
    Ok(Json(result))
}

/// GET /api/tenants/{tenant_id}/automation-score - Dashboard summary.
pub async fn tenant_score(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<String>,
) -> ApiResult<Json<AutomationScoreResult>> {
    let timer = RequestTimer::new("tenant_score");
    let result = {
        let tenants = state.tenants.read().await;
        let scored = tenants
            .get(&tenant_id)
            .map(|inventory| compute_automation_score(&inventory.tenant_dimensions(&state.catalog)))
            .ok_or_else(|| ApiError::TenantNotFound(tenant_id.clone()));
        scored
    };
    timer.finish_result(&result);

    let result = result?;
    record_score("summary", Some(&tenant_id), result.score);
    tracing::info!(
        tenant_id = %tenant_id,
        score = result.score,
        recommendations = result.recommendations.len(),
        "Computed automation score"
    );
    Ok(Json(result))
}

/// GET /api/tenants/{tenant_id}/automation-score/details - Per-module breakdown.
pub async fn tenant_score_details(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<String>,
) -> ApiResult<Json<AutomationScoreDetails>> {
    let timer = RequestTimer::new("tenant_score_details");
    let result = {
        let tenants = state.tenants.read().await;
        match cached_details(&state, &tenants, &tenant_id).await {
            Ok(handle) => {
                let details = handle.read().await.clone();
                Ok(details)
            }
            Err(e) => Err(e),
        }
    };
    timer.finish_result(&result);

    Ok(Json(result?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/automation-score", post(score_inputs))
        .route("/tenants/{tenant_id}/automation-score", get(tenant_score))
        .route(
            "/tenants/{tenant_id}/automation-score/details",
            get(tenant_score_details),
        )
}
