//! Recommendation Service
//!
//! Users push listings to each other by email. Each recipient keeps the
//! entries on their own document; the same sender cannot recommend the same
//! listing to the same recipient twice.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::store_call;
use crate::error::{ApiError, Result};
use crate::models::{
    normalize_email, Recommendation, RecommendRequest, RecommendationView, User, UserSummary,
};
use crate::store::{PropertyStore, UserChange, UserStore};

pub struct RecommendationService {
    properties: Arc<dyn PropertyStore>,
    users: Arc<dyn UserStore>,
    timeout: Duration,
}

impl RecommendationService {
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

    pub async fn recommend(&self, sender: &User, req: RecommendRequest) -> Result<Recommendation> {
        let (email, raw_property) = match (
            req.recipient_email.as_deref().map(str::trim),
            req.property_id.as_deref().map(str::trim),
        ) {
            (Some(email), Some(property)) if !email.is_empty() && !property.is_empty() => {
                (normalize_email(email), property)
            }
            _ => {
                return Err(ApiError::Validation(
                    "Email and property ID are required".to_string(),
                ))
            }
        };

        let recipient = store_call(self.timeout, self.users.find_user_by_email(&email))
            .await?
            .ok_or_else(|| ApiError::NotFound("Recipient not found".to_string()))?;

        let property_missing = || ApiError::NotFound("Property not found".to_string());
        let property_id = Uuid::parse_str(raw_property).map_err(|_| property_missing())?;
        store_call(self.timeout, self.properties.find_property(property_id))
            .await?
            .ok_or_else(property_missing)?;

        let recommendation = Recommendation {
            id: Uuid::new_v4(),
            property: property_id,
            from: sender.id,
            date: Utc::now(),
        };

        match store_call(
            self.timeout,
            self.users
                .push_recommendation(recipient.id, recommendation.clone()),
        )
        .await?
        {
            UserChange::Applied(_) => {}
            UserChange::Unchanged => {
                return Err(ApiError::Validation(
                    "You have already recommended this property to this user".to_string(),
                ))
            }
            UserChange::Missing => {
                return Err(ApiError::NotFound("Recipient not found".to_string()))
            }
        }
        info!(
            "User {} recommended property {} to {}",
            sender.id, property_id, email
        );
        Ok(recommendation)
    }

    /// Received entries in arrival order, references expanded.
    pub async fn received(&self, user: &User) -> Result<Vec<RecommendationView>> {
        let received = &user.recommendations_received;
        let property_ids: Vec<Uuid> = received.iter().map(|rec| rec.property).collect();
        let sender_ids: Vec<Uuid> = received.iter().map(|rec| rec.from).collect();

        let properties = store_call(
            self.timeout,
            self.properties.find_properties_by_ids(&property_ids),
        )
        .await?;
        let senders = store_call(self.timeout, self.users.find_users_by_ids(&sender_ids)).await?;

        Ok(received
            .iter()
            .map(|rec| RecommendationView {
                id: rec.id,
                property: properties.get(&rec.property).cloned(),
                from: senders.get(&rec.from).map(UserSummary::from),
                date: rec.date,
            })
            .collect())
    }

    pub async fn delete_received(&self, user: &User, recommendation_id: Uuid) -> Result<()> {
        match store_call(
            self.timeout,
            self.users.pull_recommendation(user.id, recommendation_id),
        )
        .await?
        {
            UserChange::Applied(_) => Ok(()),
            UserChange::Unchanged => Err(ApiError::NotFound(
                "Recommendation not found".to_string(),
            )),
            UserChange::Missing => Err(ApiError::Authentication(
                "Please authenticate.".to_string(),
            )),
        }
    }
}
