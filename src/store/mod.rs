//! Store Module
//!
//! Persistence seam for properties and users. Services only see the traits;
//! [`MemoryStore`] is the document store the server runs on.
//!
//! Every write is atomic per document. Nothing spans documents.

mod memory;

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Property, Recommendation, User};
use crate::query::PropertyQuery;

pub use memory::MemoryStore;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Outcome of an in-place change to a user document.
#[derive(Debug, Clone, PartialEq)]
pub enum UserChange {
    /// The change was applied; carries the document as stored.
    Applied(User),
    /// The document was left untouched: the item was already there, or was
    /// not there to remove.
    Unchanged,
    /// No user with that id.
    Missing,
}

/// Profile fields to overwrite. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    /// Already normalized
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn insert_property(&self, property: Property) -> StoreResult<Property>;

    async fn find_property(&self, id: Uuid) -> StoreResult<Option<Property>>;

    /// Runs a filtered, sorted, paginated read.
    async fn find_properties(&self, query: &PropertyQuery) -> StoreResult<Vec<Property>>;

    /// Looks up many ids at once; missing ids are simply absent from the map.
    async fn find_properties_by_ids(&self, ids: &[Uuid]) -> StoreResult<HashMap<Uuid, Property>>;

    /// Replaces the document only if it still exists and `owner` created it.
    async fn replace_owned(&self, owner: Uuid, property: Property)
        -> StoreResult<Option<Property>>;

    /// Deletes the document only if it exists and `owner` created it.
    /// Returns the deleted document.
    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Property>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user. Fails with `DuplicateKey` when the email is taken.
    async fn insert_user(&self, user: User) -> StoreResult<User>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// `email` must already be normalized.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<HashMap<Uuid, User>>;

    // Every write below edits the stored document under the store's lock, so
    // concurrent edits to other fields of the same user survive.

    /// Appends `property` to favorites. `Unchanged` if already present.
    async fn push_favorite(&self, user: Uuid, property: Uuid) -> StoreResult<UserChange>;

    /// Removes `property` from favorites. `Unchanged` if it was not there.
    async fn pull_favorite(&self, user: Uuid, property: Uuid) -> StoreResult<UserChange>;

    /// Appends a received recommendation. `Unchanged` if the same sender
    /// already recommended the same property to this user.
    async fn push_recommendation(
        &self,
        recipient: Uuid,
        recommendation: Recommendation,
    ) -> StoreResult<UserChange>;

    /// Removes a received recommendation by id. `Unchanged` if absent.
    async fn pull_recommendation(
        &self,
        user: Uuid,
        recommendation: Uuid,
    ) -> StoreResult<UserChange>;

    /// Overwrites the given profile fields, re-checking email uniqueness.
    /// `None` when the user no longer exists.
    async fn update_profile_fields(
        &self,
        user: Uuid,
        changes: ProfileChanges,
    ) -> StoreResult<Option<User>>;
}
