//! bcrypt password hashing.
//!
//! Both operations run on the blocking pool so a slow hash never stalls the
//! async workers.

use tokio::task;

use crate::error::{ApiError, Result};

/// Lowest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Highest work factor bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// Hashes `password` with a fresh salt at the given work factor.
pub async fn hash_password(password: &str, cost: u32) -> Result<String> {
    let password = password.to_owned();
    task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::Unexpected(format!("Password hashing aborted: {e}")))?
        .map_err(|e| ApiError::Unexpected(format!("Password hashing failed: {e}")))
}

/// Checks `password` against a stored bcrypt hash.
///
/// Malformed stored values never verify.
pub async fn verify_password(password: &str, stored: &str) -> bool {
    let (password, stored) = (password.to_owned(), stored.to_owned());
    task::spawn_blocking(move || bcrypt::verify(password, &stored))
        .await
        .map(|verified| verified.unwrap_or(false))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let stored = hash_password("hunter22", MIN_COST).await.unwrap();
        assert!(verify_password("hunter22", &stored).await);
        assert!(!verify_password("hunter23", &stored).await);
    }

    #[tokio::test]
    async fn test_salts_differ() {
        let first = hash_password("same", MIN_COST).await.unwrap();
        let second = hash_password("same", MIN_COST).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_stored_format_carries_cost() {
        let stored = hash_password("pw", MIN_COST).await.unwrap();
        assert!(stored.starts_with("$2b$04$"));
        assert_eq!(stored.len(), 60);
    }

    #[tokio::test]
    async fn test_cost_out_of_range_fails() {
        let result = hash_password("pw", MAX_COST + 1).await;
        assert!(matches!(result, Err(ApiError::Unexpected(_))));
    }

    #[tokio::test]
    async fn test_malformed_stored_value_rejected() {
        assert!(!verify_password("pw", "").await);
        assert!(!verify_password("pw", "no-separator").await);
        assert!(!verify_password("pw", "$2b$04$tooshort").await);
    }
}
