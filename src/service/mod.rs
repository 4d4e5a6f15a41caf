//! Service Module
//!
//! Business operations behind the HTTP handlers. Services own their store and
//! cache handles and never hold a lock across a backend call.

mod accounts;
mod favorites;
mod properties;
mod recommendations;

use std::future::Future;
use std::time::Duration;

use crate::error::{CacheError, StoreError};

pub use accounts::AccountService;
pub use favorites::FavoritesService;
pub use properties::PropertyService;
pub use recommendations::RecommendationService;

/// Runs a store call, turning an elapsed deadline into [`StoreError::Timeout`].
pub(crate) async fn store_call<T, F>(limit: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or(Err(StoreError::Timeout))
}

/// Runs a cache call, turning an elapsed deadline into [`CacheError::Timeout`].
pub(crate) async fn cache_call<T, F>(limit: Duration, call: F) -> Result<T, CacheError>
where
    F: Future<Output = Result<T, CacheError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or(Err(CacheError::Timeout))
}
