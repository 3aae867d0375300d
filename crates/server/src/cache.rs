// crates/server/src/cache.rs
//! Per-tenant cache of computed score details.
//!
//! Each tenant's details sit behind their own lock so a recommendation
//! update changes the flat and the per-module copy under one write guard.
//! Invalidation only marks an entry stale: the next read recomputes and
//! carries progress flags over from the stale result.

use std::collections::HashMap;
use std::sync::Arc;

use dmphq_core::AutomationScoreDetails;
use tokio::sync::RwLock;

use crate::metrics::record_cache;

/// Shared handle to one tenant's cached details.
pub type DetailsHandle = Arc<RwLock<AutomationScoreDetails>>;

struct CacheEntry {
    details: DetailsHandle,
    stale: bool,
}

#[derive(Default)]
pub struct AutomationScoreCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl AutomationScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached details for `tenant_id`, computing them first when
    /// the entry is missing or stale.
    pub async fn get_or_compute<F>(&self, tenant_id: &str, compute: F) -> DetailsHandle
    where
        F: FnOnce() -> AutomationScoreDetails,
    {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(tenant_id).filter(|e| !e.stale) {
                record_cache("hit");
                return entry.details.clone();
            }
        }

        let mut entries = self.entries.write().await;
        // Another request may have filled the entry while we waited.
        if let Some(entry) = entries.get(tenant_id).filter(|e| !e.stale) {
            record_cache("hit");
            return entry.details.clone();
        }

        let mut fresh = compute();
        match entries.get(tenant_id) {
            Some(previous) => {
                record_cache("stale");
                fresh.carry_over_progress(&*previous.details.read().await);
            }
            None => record_cache("miss"),
        }
        tracing::debug!(
            tenant_id,
            overall_score = fresh.overall_score,
            "Cached automation score details"
        );

        let details = Arc::new(RwLock::new(fresh));
        entries.insert(
            tenant_id.to_string(),
            CacheEntry {
                details: details.clone(),
                stale: false,
            },
        );
        details
    }

    /// Mark a tenant's details stale. Returns `true` if an entry existed.
    pub async fn invalidate(&self, tenant_id: &str) -> bool {
        let mut entries = self.entries.write().await;
        match entries.get_mut(tenant_id) {
            Some(entry) => {
                entry.stale = true;
                tracing::debug!(tenant_id, "Invalidated automation score details");
                true
            }
            None => false,
        }
    }

    /// Drop a tenant's entry entirely, discarding any progress flags.
    pub async fn remove(&self, tenant_id: &str) -> bool {
        self.entries.write().await.remove(tenant_id).is_some()
    }

    pub async fn is_cached(&self, tenant_id: &str) -> bool {
        self.entries
            .read()
            .await
            .get(tenant_id)
            .is_some_and(|e| !e.stale)
    }
}
