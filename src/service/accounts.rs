//! Account Service
//!
//! Registration, login, bearer-token authentication and profile edits.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, info};

use super::store_call;
use crate::auth::{hash_password, verify_password, SessionStore};
use crate::error::{ApiError, Result};
use crate::models::{
    normalize_email, AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, User,
};
use crate::store::{ProfileChanges, UserStore};

const INVALID_CREDENTIALS: &str = "Invalid login credentials";
const PLEASE_AUTHENTICATE: &str = "Please authenticate.";

pub struct AccountService {
    users: Arc<dyn UserStore>,
    sessions: Arc<SessionStore>,
    timeout: Duration,
    /// bcrypt work factor
    password_cost: u32,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<SessionStore>,
        timeout: Duration,
        password_cost: u32,
    ) -> Self {
        Self {
            users,
            sessions,
            timeout,
            password_cost,
        }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse> {
        if let Some(msg) = req.validate() {
            return Err(ApiError::Validation(msg));
        }

        let hash = hash_password(&req.password, self.password_cost).await?;
        let user = User::new(&req.email, &req.name, hash);
        let user = store_call(self.timeout, self.users.insert_user(user)).await?;
        info!("Registered user {}", user.id);

        let token = self.sessions.issue(user.id).await;
        Ok(AuthResponse { user, token })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse> {
        let email = normalize_email(&req.email);
        let found = store_call(self.timeout, self.users.find_user_by_email(&email)).await?;
        let verified = match found {
            Some(user) => verify_password(&req.password, &user.password_hash)
                .await
                .then_some(user),
            None => None,
        };
        let user = verified.ok_or_else(|| {
            debug!("Rejected login for {}", email);
            ApiError::Authentication(INVALID_CREDENTIALS.to_string())
        })?;

        let token = self.sessions.issue(user.id).await;
        Ok(AuthResponse { user, token })
    }

    /// Resolves a bearer token to its user.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let unauthenticated = || ApiError::Authentication(PLEASE_AUTHENTICATE.to_string());

        let user_id = self
            .sessions
            .resolve(token)
            .await
            .ok_or_else(unauthenticated)?;

        store_call(self.timeout, self.users.find_user(user_id))
            .await?
            .ok_or_else(unauthenticated)
    }

    /// Applies `name`, `email` and `password` changes to `user`, leaving the
    /// rest of the stored document as it is now.
    pub async fn update_profile(&self, user: &User, fields: &Map<String, Value>) -> Result<User> {
        let update = ProfileUpdate::from_fields(fields)?;

        let password_hash = match update.password {
            Some(password) => Some(hash_password(&password, self.password_cost).await?),
            None => None,
        };
        let changes = ProfileChanges {
            name: update.name.map(|name| name.trim().to_string()),
            email: update.email.map(|email| normalize_email(&email)),
            password_hash,
        };

        store_call(self.timeout, self.users.update_profile_fields(user.id, changes))
            .await?
            .ok_or_else(|| ApiError::Authentication(PLEASE_AUTHENTICATE.to_string()))
    }
}
