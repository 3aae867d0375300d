// crates/server/src/routes/recommendations.rs
//! Recommendation progress endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::patch,
    Json, Router,
};
use dmphq_core::{AutomationRecommendation, RecommendationUpdate};

use crate::error::ApiResult;
use crate::metrics::RequestTimer;
use crate::routes::score::cached_details;
use crate::state::AppState;

/// PATCH /api/tenants/{tenant_id}/recommendations/{id} - Update progress flags.
///
/// The tenant read guard is held until the write lands, so an inventory
/// change cannot swap the cached details out from under the update.
pub async fn update_recommendation(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, id)): Path<(String, String)>,
    Json(update): Json<RecommendationUpdate>,
) -> ApiResult<Json<AutomationRecommendation>> {
    let timer = RequestTimer::new("update_recommendation");
    let result = apply(&state, &tenant_id, &id, update).await;
    timer.finish_result(&result);

    let updated = result?;
    tracing::info!(
        tenant_id = %tenant_id,
        recommendation_id = %id,
        implemented = updated.implemented,
        in_progress = updated.in_progress,
        "Updated recommendation"
    );
    Ok(Json(updated))
}

async fn apply(
    state: &AppState,
    tenant_id: &str,
    id: &str,
    update: RecommendationUpdate,
) -> ApiResult<AutomationRecommendation> {
    let tenants = state.tenants.read().await;
    let handle = cached_details(state, &tenants, tenant_id).await?;
    let mut details = handle.write().await;
    let updated = details.update_recommendation(id, update)?;
    Ok(updated)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/tenants/{tenant_id}/recommendations/{id}",
        patch(update_recommendation),
    )
}
