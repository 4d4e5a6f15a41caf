//! Favorites Service

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use super::store_call;
use crate::error::{ApiError, Result};
use crate::models::{Property, User};
use crate::store::{PropertyStore, UserChange, UserStore};

pub struct FavoritesService {
    properties: Arc<dyn PropertyStore>,
    users: Arc<dyn UserStore>,
    timeout: Duration,
}

impl FavoritesService {
    pub fn new(
        properties: Arc<dyn PropertyStore>,
        users: Arc<dyn UserStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            properties,
            users,
            timeout,
        }
    }

    /// Adds an existing listing to `user`'s favorites; returns the new id list.
    pub async fn add(&self, user: &User, property_id: Uuid) -> Result<Vec<Uuid>> {
        if store_call(self.timeout, self.properties.find_property(property_id))
            .await?
            .is_none()
        {
            return Err(ApiError::NotFound("Property not found".to_string()));
        }

        match store_call(self.timeout, self.users.push_favorite(user.id, property_id)).await? {
            UserChange::Applied(stored) => {
                debug!("User {} favorited {}", stored.id, property_id);
                Ok(stored.favorites)
            }
            UserChange::Unchanged => Err(ApiError::Validation(
                "Property already in favorites".to_string(),
            )),
            UserChange::Missing => Err(not_authenticated()),
        }
    }

    /// Favorites in insertion order; deleted listings come back as `None`.
    pub async fn list(&self, user: &User) -> Result<Vec<Option<Property>>> {
        let mut found =
            store_call(self.timeout, self.properties.find_properties_by_ids(&user.favorites))
                .await?;

        Ok(user.favorites.iter().map(|id| found.remove(id)).collect())
    }

    /// Removes `property_id` even if the listing itself is gone.
    pub async fn remove(&self, user: &User, property_id: Uuid) -> Result<Vec<Uuid>> {
        match store_call(self.timeout, self.users.pull_favorite(user.id, property_id)).await? {
            UserChange::Applied(stored) => Ok(stored.favorites),
            UserChange::Unchanged => Err(ApiError::NotFound(
                "Property not found in favorites".to_string(),
            )),
            UserChange::Missing => Err(not_authenticated()),
        }
    }
}

fn not_authenticated() -> ApiError {
    ApiError::Authentication("Please authenticate.".to_string())
}
