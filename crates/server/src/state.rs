// crates/server/src/state.rs
//! Application state for the Axum server.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use dmphq_core::{ModuleCatalog, TenantInventory};
use tokio::sync::RwLock;

use crate::cache::AutomationScoreCache;

/// Shared application state accessible from all route handlers.
///
/// Lock order is `tenants` before `scores`: inventory mutations invalidate
/// the cache while still holding the tenant write guard, so a details read
/// never caches a result computed from an inventory that has since changed.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Business modules and the categories they own.
    pub catalog: ModuleCatalog,
    /// Tenant inventories, keyed by tenant id. In memory only.
    pub tenants: RwLock<HashMap<String, TenantInventory>>,
    /// Cached details per tenant.
    pub scores: AutomationScoreCache,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(catalog: ModuleCatalog) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            catalog,
            tenants: RwLock::new(HashMap::new()),
            scores: AutomationScoreCache::new(),
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_state_new() {
        let state = AppState::new(ModuleCatalog::default());
        assert!(state.uptime_secs() < 1);
        assert!(state.tenants.read().await.is_empty());
        assert_eq!(state.catalog.modules.len(), 5);
    }

    #[tokio::test]
    async fn test_app_state_clone_shares_tenants() {
        let state = AppState::new(ModuleCatalog::default());
        let cloned = state.clone();
        cloned
            .tenants
            .write()
            .await
            .insert("acme".to_string(), TenantInventory::default());
        assert!(state.tenants.read().await.contains_key("acme"));
    }
}
