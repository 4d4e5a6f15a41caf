//! In-memory document store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{ProfileChanges, PropertyStore, StoreResult, UserChange, UserStore};
use crate::error::StoreError;
use crate::models::{Property, Recommendation, User};
use crate::query::PropertyQuery;

#[derive(Debug, Default)]
struct UserTable {
    by_id: HashMap<Uuid, User>,
    /// Unique index: normalized email → user id
    by_email: HashMap<String, Uuid>,
}

impl UserTable {
    /// Applies `change` to the stored document in place. `change` returns
    /// false when it left the document untouched.
    fn modify(&mut self, id: Uuid, change: impl FnOnce(&mut User) -> bool) -> UserChange {
        let Some(doc) = self.by_id.get_mut(&id) else {
            return UserChange::Missing;
        };
        if !change(doc) {
            return UserChange::Unchanged;
        }
        doc.updated_at = Utc::now();
        UserChange::Applied(doc.clone())
    }
}

/// Property and user collections, each behind its own lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    properties: RwLock<HashMap<Uuid, Property>>,
    users: RwLock<UserTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn property_count(&self) -> usize {
        self.properties.read().await.len()
    }
}

#[async_trait]
impl PropertyStore for MemoryStore {
    async fn insert_property(&self, property: Property) -> StoreResult<Property> {
        self.properties
            .write()
            .await
            .insert(property.id, property.clone());
        Ok(property)
    }

    async fn find_property(&self, id: Uuid) -> StoreResult<Option<Property>> {
        Ok(self.properties.read().await.get(&id).cloned())
    }

    async fn find_properties(&self, query: &PropertyQuery) -> StoreResult<Vec<Property>> {
        let mut matched: Vec<Property> = self
            .properties
            .read()
            .await
            .values()
            .filter(|p| query.filter.matches(p))
            .cloned()
            .collect();

        matched.sort_by(|a, b| query.sort.compare(a, b));

        debug!(
            "Property query matched {} documents (skip={}, limit={})",
            matched.len(),
            query.page.skip,
            query.page.limit
        );

        Ok(matched
            .into_iter()
            .skip(query.page.skip)
            .take(query.page.limit)
            .collect())
    }

    async fn find_properties_by_ids(&self, ids: &[Uuid]) -> StoreResult<HashMap<Uuid, Property>> {
        let properties = self.properties.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| properties.get(id).map(|p| (*id, p.clone())))
            .collect())
    }

    async fn replace_owned(
        &self,
        owner: Uuid,
        property: Property,
    ) -> StoreResult<Option<Property>> {
        let mut properties = self.properties.write().await;
        match properties.get_mut(&property.id) {
            Some(existing) if existing.created_by == owner => {
                *existing = property.clone();
                Ok(Some(property))
            }
            _ => Ok(None),
        }
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Property>> {
        let mut properties = self.properties.write().await;
        let owned = properties
            .get(&id)
            .is_some_and(|existing| existing.created_by == owner);

        Ok(if owned { properties.remove(&id) } else { None })
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.by_email.contains_key(&user.email) {
            return Err(StoreError::DuplicateKey {
                field: "email",
                value: user.email,
            });
        }

        users.by_email.insert(user.email.clone(), user.id);
        users.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.by_id.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .by_email
            .get(email)
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<HashMap<Uuid, User>> {
        let users = self.users.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| users.by_id.get(id).map(|u| (*id, u.clone())))
            .collect())
    }

    async fn push_favorite(&self, user: Uuid, property: Uuid) -> StoreResult<UserChange> {
        Ok(self.users.write().await.modify(user, |doc| {
            if doc.favorites.contains(&property) {
                return false;
            }
            doc.favorites.push(property);
            true
        }))
    }

    async fn pull_favorite(&self, user: Uuid, property: Uuid) -> StoreResult<UserChange> {
        Ok(self.users.write().await.modify(user, |doc| {
            let before = doc.favorites.len();
            doc.favorites.retain(|id| *id != property);
            doc.favorites.len() != before
        }))
    }

    async fn push_recommendation(
        &self,
        recipient: Uuid,
        recommendation: Recommendation,
    ) -> StoreResult<UserChange> {
        Ok(self.users.write().await.modify(recipient, |doc| {
            if doc.has_recommendation(recommendation.property, recommendation.from) {
                return false;
            }
            doc.recommendations_received.push(recommendation);
            true
        }))
    }

    async fn pull_recommendation(
        &self,
        user: Uuid,
        recommendation: Uuid,
    ) -> StoreResult<UserChange> {
        Ok(self.users.write().await.modify(user, |doc| {
            let before = doc.recommendations_received.len();
            doc.recommendations_received
                .retain(|rec| rec.id != recommendation);
            doc.recommendations_received.len() != before
        }))
    }

    async fn update_profile_fields(
        &self,
        user: Uuid,
        changes: ProfileChanges,
    ) -> StoreResult<Option<User>> {
        let mut users = self.users.write().await;
        let previous_email = match users.by_id.get(&user) {
            Some(existing) => existing.email.clone(),
            None => return Ok(None),
        };

        if let Some(email) = changes.email.as_ref().filter(|email| **email != previous_email) {
            if users.by_email.contains_key(email) {
                return Err(StoreError::DuplicateKey {
                    field: "email",
                    value: email.clone(),
                });
            }
            users.by_email.remove(&previous_email);
            users.by_email.insert(email.clone(), user);
        }

        let change = users.modify(user, |doc| {
            if let Some(name) = changes.name {
                doc.name = name;
            }
            if let Some(email) = changes.email {
                doc.email = email;
            }
            if let Some(hash) = changes.password_hash {
                doc.password_hash = hash;
            }
            true
        });

        Ok(match change {
            UserChange::Applied(doc) => Some(doc),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::property::tests::sample_details;
    use crate::query::{build_query, FilterParams};

    fn listing(owner: Uuid, price: f64) -> Property {
        let mut details = sample_details();
        details.price = price;
        Property::new(details, owner)
    }

    #[tokio::test]
    async fn test_insert_and_find_property() {
        let store = MemoryStore::new();
        let property = store
            .insert_property(listing(Uuid::new_v4(), 10.0))
            .await
            .unwrap();

        let found = store.find_property(property.id).await.unwrap();
        assert_eq!(found, Some(property));
        assert_eq!(store.property_count().await, 1);
    }

    #[tokio::test]
    async fn test_find_properties_sorts_and_pages() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        for price in [30.0, 10.0, 50.0, 20.0, 40.0] {
            store.insert_property(listing(owner, price)).await.unwrap();
        }

        let params = FilterParams::new()
            .with("sortBy", "price:desc")
            .with("limit", "2")
            .with("skip", "1");
        let page = store.find_properties(&build_query(&params)).await.unwrap();

        let prices: Vec<f64> = page.iter().map(|p| p.details.price).collect();
        assert_eq!(prices, vec![40.0, 30.0]);
    }

    #[tokio::test]
    async fn test_replace_owned_checks_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let mut property = store.insert_property(listing(owner, 10.0)).await.unwrap();
        property.details.price = 99.0;

        let foreign = store
            .replace_owned(Uuid::new_v4(), property.clone())
            .await
            .unwrap();
        assert!(foreign.is_none());

        let owned = store.replace_owned(owner, property.clone()).await.unwrap();
        assert_eq!(owned.map(|p| p.details.price), Some(99.0));
    }

    #[tokio::test]
    async fn test_delete_owned_checks_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let property = store.insert_property(listing(owner, 10.0)).await.unwrap();

        assert!(store
            .delete_owned(Uuid::new_v4(), property.id)
            .await
            .unwrap()
            .is_none());
        assert!(store.delete_owned(owner, property.id).await.unwrap().is_some());
        assert!(store.find_property(property.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_user_enforces_unique_email() {
        let store = MemoryStore::new();
        store
            .insert_user(User::new("a@b.c", "A", String::new()))
            .await
            .unwrap();

        let result = store.insert_user(User::new(" A@B.C ", "B", String::new())).await;
        assert!(matches!(result, Err(StoreError::DuplicateKey { .. })));
    }

    #[tokio::test]
    async fn test_update_profile_fields_reindexes_email() {
        let store = MemoryStore::new();
        let user = store
            .insert_user(User::new("old@b.c", "A", String::new()))
            .await
            .unwrap();
        store
            .insert_user(User::new("taken@b.c", "B", String::new()))
            .await
            .unwrap();

        let taken = ProfileChanges {
            email: Some("taken@b.c".to_string()),
            ..ProfileChanges::default()
        };
        assert!(store.update_profile_fields(user.id, taken).await.is_err());

        let moved = ProfileChanges {
            email: Some("new@b.c".to_string()),
            ..ProfileChanges::default()
        };
        store.update_profile_fields(user.id, moved).await.unwrap();
        assert!(store.find_user_by_email("old@b.c").await.unwrap().is_none());
        assert_eq!(
            store.find_user_by_email("new@b.c").await.unwrap().map(|u| u.id),
            Some(user.id)
        );
    }

    #[tokio::test]
    async fn test_user_edits_keep_concurrent_changes() {
        let store = MemoryStore::new();
        let user = store
            .insert_user(User::new("a@b.c", "A", String::new()))
            .await
            .unwrap();
        let recommendation = Recommendation {
            id: Uuid::new_v4(),
            property: Uuid::new_v4(),
            from: Uuid::new_v4(),
            date: Utc::now(),
        };

        store
            .push_recommendation(user.id, recommendation.clone())
            .await
            .unwrap();
        store.push_favorite(user.id, Uuid::new_v4()).await.unwrap();
        let renamed = ProfileChanges {
            name: Some("Renamed".to_string()),
            ..ProfileChanges::default()
        };
        store.update_profile_fields(user.id, renamed).await.unwrap();

        let stored = store.find_user(user.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.favorites.len(), 1);
        assert_eq!(stored.recommendations_received, vec![recommendation]);
    }

    #[tokio::test]
    async fn test_push_and_pull_report_unchanged() {
        let store = MemoryStore::new();
        let user = store
            .insert_user(User::new("a@b.c", "A", String::new()))
            .await
            .unwrap();
        let property = Uuid::new_v4();

        assert!(matches!(
            store.push_favorite(user.id, property).await.unwrap(),
            UserChange::Applied(_)
        ));
        assert_eq!(
            store.push_favorite(user.id, property).await.unwrap(),
            UserChange::Unchanged
        );
        assert!(matches!(
            store.pull_favorite(user.id, property).await.unwrap(),
            UserChange::Applied(_)
        ));
        assert_eq!(
            store.pull_favorite(user.id, property).await.unwrap(),
            UserChange::Unchanged
        );
        assert_eq!(
            store.push_favorite(Uuid::new_v4(), property).await.unwrap(),
            UserChange::Missing
        );
    }

    #[tokio::test]
    async fn test_find_by_ids_skips_missing() {
        let store = MemoryStore::new();
        let user = store
            .insert_user(User::new("a@b.c", "A", String::new()))
            .await
            .unwrap();

        let found = store
            .find_users_by_ids(&[user.id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.contains_key(&user.id));
    }
}
