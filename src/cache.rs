//! In-memory caching using moka
//!
//! Provides application-level caching for the hot booking-flow reads:
//! operating hours and pricing options. Both change rarely next to how often
//! the public listing and booking screens read them. Writes invalidate
//! eagerly and the TTL bounds staleness either way; a stale read only widens
//! the advisory slot check, never the storage-level uniqueness guard.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::catalog::models::PricingOption;
use crate::models::OperatingHours;

/// Application cache holding operating hours and pricing options
#[derive(Clone)]
pub struct AppCache {
    /// Operating hours (provider id -> weekly windows)
    pub hours: Cache<Uuid, Arc<Vec<OperatingHours>>>,
    /// Pricing options (service id -> option rows)
    pub options: Cache<Uuid, Arc<Vec<PricingOption>>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Operating hours: 1000 providers, 10 min TTL, 5 min idle
            hours: Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(10 * 60))
                .time_to_idle(Duration::from_secs(5 * 60))
                .build(),

            // Pricing options: 5000 services, 10 min TTL, 5 min idle
            options: Cache::builder()
                .max_capacity(5000)
                .time_to_live(Duration::from_secs(10 * 60))
                .time_to_idle(Duration::from_secs(5 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hours_size: self.hours.entry_count(),
            options_size: self.options.entry_count(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.hours.invalidate_all();
        self.options.invalidate_all();
        info!("All caches invalidated");
    }

    /// Drop a provider's cached hours after an hours update
    pub async fn invalidate_provider_hours(&self, provider_id: Uuid) {
        self.hours.invalidate(&provider_id).await;
        info!("Cache invalidated for provider hours: {}", provider_id);
    }

    /// Drop a service's cached options after a catalog write
    pub async fn invalidate_service_options(&self, service_id: Uuid) {
        self.options.invalidate(&service_id).await;
        info!("Cache invalidated for service options: {}", service_id);
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub hours_size: u64,
    pub options_size: u64,
}
