//! Property Service
//!
//! Listing CRUD with a cache-aside search. Search payloads are cached by the
//! canonical key of their filters; every successful write drops the whole
//! listing namespace.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{cache_call, store_call};
use crate::cache::{list_cache_key, CacheLayer, PROPERTY_LIST_NAMESPACE};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{Property, PropertyDetails, PropertyPatch, PropertyView};
use crate::query::{build_query, FilterParams};
use crate::store::{PropertyStore, UserStore};

pub struct PropertyService {
    properties: Arc<dyn PropertyStore>,
    users: Arc<dyn UserStore>,
    cache: Arc<dyn CacheLayer>,
    cache_ttl: Duration,
    timeout: Duration,
    invalidate_on_create: bool,
}

impl PropertyService {
    pub fn new(
        properties: Arc<dyn PropertyStore>,
        users: Arc<dyn UserStore>,
        cache: Arc<dyn CacheLayer>,
        config: &Config,
    ) -> Self {
        Self {
            properties,
            users,
            cache,
            cache_ttl: config.cache_ttl(),
            timeout: config.request_timeout(),
            invalidate_on_create: config.invalidate_on_create,
        }
    }

    /// Validates `payload` and stores it as a listing owned by `owner`.
    ///
    /// Any `createdBy` in the payload is ignored.
    pub async fn create(&self, owner: Uuid, payload: Value) -> Result<Property> {
        let details = PropertyDetails::from_json(payload)?;

        if store_call(self.timeout, self.users.find_user(owner))
            .await?
            .is_none()
        {
            return Err(ApiError::Validation(
                "createdBy must reference an existing user".to_string(),
            ));
        }

        let property = store_call(
            self.timeout,
            self.properties.insert_property(Property::new(details, owner)),
        )
        .await?;
        info!("Property {} created by {}", property.id, owner);

        if self.invalidate_on_create {
            self.invalidate_listings().await;
        }
        Ok(property)
    }

    /// Runs a search and returns the serialized JSON array.
    ///
    /// A cache hit returns the stored payload byte for byte.
    pub async fn list(&self, params: &FilterParams) -> Result<String> {
        let key = list_cache_key(params);
        if let Some(payload) = self.cached(&key).await {
            debug!("Listing cache hit for {}", key);
            return Ok(payload);
        }

        // Read before the store so a write that lands mid-query voids the result
        let generation = self.listing_generation().await;

        let query = build_query(params);
        let found = store_call(self.timeout, self.properties.find_properties(&query)).await?;
        let views = self.populate(found).await?;

        let payload =
            serde_json::to_string(&views).map_err(|e| ApiError::Unexpected(e.to_string()))?;
        if let Some(generation) = generation {
            self.remember(&key, payload.clone(), generation).await;
        }
        Ok(payload)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<PropertyView> {
        let property = store_call(self.timeout, self.properties.find_property(id))
            .await?
            .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

        let owner = store_call(self.timeout, self.users.find_user(property.created_by)).await?;
        Ok(PropertyView::populate(property, owner.as_ref()))
    }

    /// Applies whitelisted `fields` to a listing `owner` created.
    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: &Map<String, Value>,
    ) -> Result<Property> {
        let mut property = self.owned(owner, id).await?;

        PropertyPatch::from_fields(fields)?.apply(&mut property.details)?;
        property.updated_at = Utc::now();

        let saved = store_call(self.timeout, self.properties.replace_owned(owner, property))
            .await?
            .ok_or(ApiError::NotFoundOrUnauthorized)?;
        info!("Property {} updated by {}", id, owner);

        self.invalidate_listings().await;
        Ok(saved)
    }

    /// Deletes a listing `owner` created and returns it.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<Property> {
        self.owned(owner, id).await?;

        let deleted = store_call(self.timeout, self.properties.delete_owned(owner, id))
            .await?
            .ok_or(ApiError::NotFoundOrUnauthorized)?;
        info!("Property {} deleted by {}", id, owner);

        self.invalidate_listings().await;
        Ok(deleted)
    }

    /// Loads a listing only if `owner` created it. Missing and foreign
    /// listings produce the same error; only the log tells them apart.
    async fn owned(&self, owner: Uuid, id: Uuid) -> Result<Property> {
        match store_call(self.timeout, self.properties.find_property(id)).await? {
            Some(property) if property.created_by == owner => Ok(property),
            Some(property) => {
                info!(
                    "User {} denied write on property {} owned by {}",
                    owner, id, property.created_by
                );
                Err(ApiError::NotFoundOrUnauthorized)
            }
            None => {
                debug!("Write on missing property {} by {}", id, owner);
                Err(ApiError::NotFoundOrUnauthorized)
            }
        }
    }

    async fn populate(&self, found: Vec<Property>) -> Result<Vec<PropertyView>> {
        let owner_ids: Vec<Uuid> = found
            .iter()
            .map(|p| p.created_by)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let owners = store_call(self.timeout, self.users.find_users_by_ids(&owner_ids)).await?;

        Ok(found
            .into_iter()
            .map(|property| {
                let owner = owners.get(&property.created_by);
                PropertyView::populate(property, owner)
            })
            .collect())
    }

    // == Cache access ==
    // Failures here are logged and treated as a miss or a skipped step.

    async fn cached(&self, key: &str) -> Option<String> {
        match cache_call(self.timeout, self.cache.get(key)).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!("Listing cache read skipped: {}", e);
                None
            }
        }
    }

    async fn listing_generation(&self) -> Option<u64> {
        match cache_call(self.timeout, self.cache.generation(PROPERTY_LIST_NAMESPACE)).await {
            Ok(generation) => Some(generation),
            Err(e) => {
                warn!("Listing cache write will be skipped: {}", e);
                None
            }
        }
    }

    async fn remember(&self, key: &str, payload: String, generation: u64) {
        match cache_call(
            self.timeout,
            self.cache.set_if_current(
                PROPERTY_LIST_NAMESPACE,
                key,
                payload,
                self.cache_ttl,
                generation,
            ),
        )
        .await
        {
            Ok(true) => {}
            Ok(false) => debug!("Search result for {} not cached", key),
            Err(e) => warn!("Listing cache write skipped: {}", e),
        }
    }

    async fn invalidate_listings(&self) {
        match cache_call(self.timeout, self.cache.invalidate(PROPERTY_LIST_NAMESPACE)).await {
            Ok(removed) => debug!("Invalidated {} cached listing searches", removed),
            Err(e) => warn!("Listing cache invalidation skipped: {}", e),
        }
    }
}
