//! Request DTOs for the listing API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Fields a user may change on their own profile.
pub const PROFILE_FIELDS: &[&str] = &["name", "email", "password"];

/// Request body for POST /api/auth/register
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl RegisterRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(msg) = validate_email(&self.email) {
            return Some(msg);
        }
        if let Some(msg) = validate_password(&self.password) {
            return Some(msg);
        }
        if self.name.trim().is_empty() {
            return Some("Name is required".to_string());
        }
        None
    }
}

/// Request body for POST /api/auth/login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for PATCH /api/auth/profile
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl ProfileUpdate {
    /// Builds an update from a raw JSON object, rejecting keys outside
    /// [`PROFILE_FIELDS`].
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ApiError> {
        if !fields
            .keys()
            .all(|key| PROFILE_FIELDS.contains(&key.as_str()))
        {
            return Err(ApiError::Validation("Invalid updates!".to_string()));
        }

        let update: ProfileUpdate = serde_json::from_value(Value::Object(fields.clone()))
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        if let Some(msg) = update.validate() {
            return Err(ApiError::Validation(msg));
        }
        Ok(update)
    }

    fn validate(&self) -> Option<String> {
        if let Some(email) = &self.email {
            if let Some(msg) = validate_email(email) {
                return Some(msg);
            }
        }
        if let Some(password) = &self.password {
            if let Some(msg) = validate_password(password) {
                return Some(msg);
            }
        }
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Some("Name is required".to_string());
        }
        None
    }
}

/// Request body for POST /api/recommendations
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub recipient_email: Option<String>,
    pub property_id: Option<String>,
}

fn validate_email(email: &str) -> Option<String> {
    let email = email.trim();
    if email.is_empty() {
        return Some("Email is required".to_string());
    }
    if !email.contains('@') {
        return Some("Email is invalid".to_string());
    }
    None
}

fn validate_password(password: &str) -> Option<String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Some(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    None
}
