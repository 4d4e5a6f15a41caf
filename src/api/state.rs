//! Shared application state.

use std::sync::Arc;

use tracing::info;

use crate::auth::SessionStore;
use crate::cache::{CacheLayer, MemoryCache, NoopCache};
use crate::config::Config;
use crate::service::{AccountService, FavoritesService, PropertyService, RecommendationService};
use crate::store::MemoryStore;

/// Services and backends shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub properties: Arc<PropertyService>,
    pub accounts: Arc<AccountService>,
    pub favorites: Arc<FavoritesService>,
    pub recommendations: Arc<RecommendationService>,
    pub cache: Arc<dyn CacheLayer>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Wires the services over one store and one cache.
    pub fn new(store: Arc<MemoryStore>, cache: Arc<dyn CacheLayer>, config: &Config) -> Self {
        let sessions = Arc::new(SessionStore::new(config.session_ttl()));
        let timeout = config.request_timeout();

        Self {
            properties: Arc::new(PropertyService::new(
                store.clone(),
                store.clone(),
                cache.clone(),
                config,
            )),
            accounts: Arc::new(AccountService::new(
                store.clone(),
                sessions.clone(),
                timeout,
                config.password_cost(),
            )),
            favorites: Arc::new(FavoritesService::new(store.clone(), store.clone(), timeout)),
            recommendations: Arc::new(RecommendationService::new(
                store.clone(),
                store,
                timeout,
            )),
            cache,
            sessions,
        }
    }

    /// Fresh store, with the cache backend chosen by `CACHE_ENABLED`.
    pub fn from_config(config: &Config) -> Self {
        let cache: Arc<dyn CacheLayer> = if config.cache_enabled {
            info!(
                "Listing cache enabled: max_entries={}, ttl={}s",
                config.cache_max_entries, config.cache_ttl
            );
            Arc::new(MemoryCache::from_config(config))
        } else {
            info!("Listing cache disabled");
            Arc::new(NoopCache)
        };

        Self::new(Arc::new(MemoryStore::new()), cache, config)
    }
}
