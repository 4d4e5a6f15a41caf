//! User account document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A property recommended to a user by another user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: Uuid,
    pub property: Uuid,
    pub from: Uuid,
    pub date: DateTime<Utc>,
}

/// A registered account.
///
/// The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub favorites: Vec<Uuid>,
    pub recommendations_received: Vec<Recommendation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: &str, name: &str, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            password_hash,
            name: name.trim().to_string(),
            favorites: Vec::new(),
            recommendations_received: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `sender` already recommended `property` to this user.
    pub fn has_recommendation(&self, property: Uuid, sender: Uuid) -> bool {
        self.recommendations_received
            .iter()
            .any(|rec| rec.property == property && rec.from == sender)
    }
}

/// Public projection used when a user is referenced from another document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Emails are compared trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
