// crates/server/src/routes/tenants.rs
//! Tenant inventory endpoints.
//!
//! Every mutation validates against the module catalog first and then
//! invalidates the tenant's cached details while still holding the tenant
//! write guard.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use dmphq_core::{IntegrationEdge, Sop, TenantInventory, Tool};
use serde::Serialize;
use ts_rs::TS;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Record counts for one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct TenantSummary {
    pub tenant_id: String,
    #[ts(type = "number")]
    pub tool_count: usize,
    #[ts(type = "number")]
    pub sop_count: usize,
    #[ts(type = "number")]
    pub integration_count: usize,
}

impl TenantSummary {
    fn new(tenant_id: &str, inventory: &TenantInventory) -> Self {
        Self {
            tenant_id: tenant_id.to_string(),
            tool_count: inventory.tools.len(),
            sop_count: inventory.sops.len(),
            integration_count: inventory.integrations.len(),
        }
    }
}

/// GET /api/tenants - All tenants, sorted by id.
pub async fn list_tenants(State(state): State<Arc<AppState>>) -> Json<Vec<TenantSummary>> {
    let tenants = state.tenants.read().await;
    let mut summaries: Vec<TenantSummary> = tenants
        .iter()
        .map(|(id, inventory)| TenantSummary::new(id, inventory))
        .collect();
    summaries.sort_by(|a, b| a.tenant_id.cmp(&b.tenant_id));
    Json(summaries)
}

/// PUT /api/tenants/{tenant_id}/inventory - Create or replace a tenant.
pub async fn put_inventory(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<String>,
    Json(inventory): Json<TenantInventory>,
) -> ApiResult<Json<TenantSummary>> {
    if tenant_id.trim().is_empty() {
        return Err(ApiError::BadRequest("tenant id is empty".to_string()));
    }
    inventory.validate(&state.catalog)?;

    let mut tenants = state.tenants.write().await;
    let summary = TenantSummary::new(&tenant_id, &inventory);
    let replaced = tenants.insert(tenant_id.clone(), inventory).is_some();
    state.scores.invalidate(&tenant_id).await;

    tracing::info!(
        tenant_id = %tenant_id,
        replaced,
        tools = summary.tool_count,
        sops = summary.sop_count,
        integrations = summary.integration_count,
        "Stored tenant inventory"
    );
    Ok(Json(summary))
}

/// DELETE /api/tenants/{tenant_id} - Drop a tenant and its cached details.
pub async fn delete_tenant(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut tenants = state.tenants.write().await;
    if tenants.remove(&tenant_id).is_none() {
        return Err(ApiError::TenantNotFound(tenant_id));
    }
    state.scores.remove(&tenant_id).await;
    tracing::info!(tenant_id = %tenant_id, "Deleted tenant");
    Ok(StatusCode::NO_CONTENT)
}

/// Apply `mutate` to an existing tenant and invalidate its cached details.
async fn mutate_tenant<F>(
    state: &AppState,
    tenant_id: &str,
    mutate: F,
) -> ApiResult<(StatusCode, Json<TenantSummary>)>
where
    F: FnOnce(&mut TenantInventory) -> ApiResult<()>,
{
    let mut tenants = state.tenants.write().await;
    let inventory = tenants
        .get_mut(tenant_id)
        .ok_or_else(|| ApiError::TenantNotFound(tenant_id.to_string()))?;
    mutate(inventory)?;
    let summary = TenantSummary::new(tenant_id, inventory);
    state.scores.invalidate(tenant_id).await;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// POST /api/tenants/{tenant_id}/tools - Add a tool.
pub async fn add_tool(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<String>,
    Json(tool): Json<Tool>,
) -> ApiResult<(StatusCode, Json<TenantSummary>)> {
    mutate_tenant(&state, &tenant_id, |inventory| {
        inventory.validate_new_tool(&tool, &state.catalog)?;
        tracing::info!(tenant_id = %tenant_id, tool = %tool.name, "Added tool");
        inventory.tools.push(tool);
        Ok(())
    })
    .await
}

/// POST /api/tenants/{tenant_id}/sops - Add an SOP.
pub async fn add_sop(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<String>,
    Json(sop): Json<Sop>,
) -> ApiResult<(StatusCode, Json<TenantSummary>)> {
    mutate_tenant(&state, &tenant_id, |inventory| {
        sop.validate(&state.catalog)?;
        tracing::info!(tenant_id = %tenant_id, sop = %sop.title, "Added SOP");
        inventory.sops.push(sop);
        Ok(())
    })
    .await
}

/// POST /api/tenants/{tenant_id}/integrations - Add an integration.
pub async fn add_integration(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<String>,
    Json(edge): Json<IntegrationEdge>,
) -> ApiResult<(StatusCode, Json<TenantSummary>)> {
    mutate_tenant(&state, &tenant_id, |inventory| {
        inventory.validate_integration(&edge)?;
        tracing::info!(
            tenant_id = %tenant_id,
            source = %edge.source_tool,
            target = %edge.target_tool,
            "Added integration"
        );
        inventory.integrations.push(edge);
        Ok(())
    })
    .await
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tenants", get(list_tenants))
        .route("/tenants/{tenant_id}", delete(delete_tenant))
        .route("/tenants/{tenant_id}/inventory", put(put_inventory))
        .route("/tenants/{tenant_id}/tools", post(add_tool))
        .route("/tenants/{tenant_id}/sops", post(add_sop))
        .route("/tenants/{tenant_id}/integrations", post(add_integration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use dmphq_core::ModuleCatalog;
    use tower::ServiceExt;

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn inventory_body() -> serde_json::Value {
        serde_json::json!({
            "tools": [
                { "name": "QuickBooks", "category": "Accounting", "tier": "low-cost" },
                { "name": "Shopify", "category": "E-commerce", "tier": "low-cost" }
            ],
            "sops": [
                { "title": "Month-end close", "category": "Accounting", "steps": 8, "automated": true }
            ],
            "integrations": [
                { "sourceTool": "Shopify", "targetTool": "QuickBooks", "status": "active", "dataFlow": "one-way" }
            ]
        })
    }

    #[tokio::test]
    async fn test_put_then_list() {
        let app = crate::create_app(AppState::new(ModuleCatalog::default()));
        let (status, json) =
            send(app.clone(), "PUT", "/api/tenants/acme/inventory", inventory_body()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["toolCount"], 2);
        assert_eq!(json["integrationCount"], 1);

        let (status, json) = send(app, "GET", "/api/tenants", serde_json::Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        let list: Vec<TenantSummary> = serde_json::from_value(json).unwrap();
        assert_eq!(
            list,
            vec![TenantSummary {
                tenant_id: "acme".to_string(),
                tool_count: 2,
                sop_count: 1,
                integration_count: 1,
            }]
        );
    }

    #[tokio::test]
    async fn test_put_rejects_unknown_integration_tool() {
        let app = crate::create_app(AppState::new(ModuleCatalog::default()));
        let mut body = inventory_body();
        body["integrations"][0]["targetTool"] = "Xero".into();
        let (status, json) = send(app, "PUT", "/api/tenants/acme/inventory", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["details"].as_str().unwrap().contains("Xero"));
    }

    #[tokio::test]
    async fn test_add_records() {
        let state = AppState::new(ModuleCatalog::default());
        let app = crate::create_app(state.clone());
        send(app.clone(), "PUT", "/api/tenants/acme/inventory", inventory_body()).await;

        let (status, json) = send(
            app.clone(),
            "POST",
            "/api/tenants/acme/tools",
            serde_json::json!({ "name": "HubSpot", "category": "CRM", "tier": "enterprise" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["toolCount"], 3);

        let (status, json) = send(
            app.clone(),
            "POST",
            "/api/tenants/acme/sops",
            serde_json::json!({ "title": "Lead triage", "category": "CRM", "steps": 3 }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["sopCount"], 2);

        let (status, json) = send(
            app,
            "POST",
            "/api/tenants/acme/integrations",
            serde_json::json!({
                "sourceTool": "HubSpot",
                "targetTool": "QuickBooks",
                "status": "partial",
                "dataFlow": "bi-directional"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["integrationCount"], 2);

        let tenants = state.tenants.read().await;
        assert!(!tenants["acme"].sops[1].automated);
    }

    #[tokio::test]
    async fn test_add_rejects_duplicates_and_unknowns() {
        let app = crate::create_app(AppState::new(ModuleCatalog::default()));
        send(app.clone(), "PUT", "/api/tenants/acme/inventory", inventory_body()).await;

        let (status, _) = send(
            app.clone(),
            "POST",
            "/api/tenants/acme/tools",
            serde_json::json!({ "name": "quickbooks", "category": "Accounting", "tier": "free" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            app.clone(),
            "POST",
            "/api/tenants/acme/sops",
            serde_json::json!({ "title": "Horoscope", "category": "Astrology", "steps": 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = send(
            app.clone(),
            "POST",
            "/api/tenants/acme/integrations",
            serde_json::json!({
                "sourceTool": "quickbooks",
                "targetTool": "SHOPIFY",
                "status": "active",
                "dataFlow": "one-way"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["details"].as_str().unwrap().contains("Duplicate integration"));

        let (status, json) = send(
            app,
            "POST",
            "/api/tenants/ghost/tools",
            serde_json::json!({ "name": "Xero", "category": "Accounting", "tier": "free" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Tenant not found");
    }

    #[tokio::test]
    async fn test_delete_tenant() {
        let state = AppState::new(ModuleCatalog::default());
        let app = crate::create_app(state.clone());
        send(app.clone(), "PUT", "/api/tenants/acme/inventory", inventory_body()).await;
        send(
            app.clone(),
            "GET",
            "/api/tenants/acme/automation-score/details",
            serde_json::Value::Null,
        )
        .await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/tenants/acme")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(state.tenants.read().await.is_empty());
        assert!(!state.scores.is_cached("acme").await);

        let (status, _) = send(app, "DELETE", "/api/tenants/acme", serde_json::Value::Null).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_mutation_invalidates_details() {
        let state = AppState::new(ModuleCatalog::default());
        let app = crate::create_app(state.clone());
        send(app.clone(), "PUT", "/api/tenants/acme/inventory", inventory_body()).await;
        send(
            app.clone(),
            "GET",
            "/api/tenants/acme/automation-score/details",
            serde_json::Value::Null,
        )
        .await;
        assert!(state.scores.is_cached("acme").await);

        send(
            app,
            "POST",
            "/api/tenants/acme/tools",
            serde_json::json!({ "name": "HubSpot", "category": "CRM", "tier": "enterprise" }),
        )
        .await;
        assert!(!state.scores.is_cached("acme").await);
    }
}
