//! Account, favorites and recommendation endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::extract::{parse_id, AuthUser, JsonBody};
use super::AppState;
use crate::error::{ApiError, Result};
use crate::models::{
    AuthResponse, LoginRequest, MessageResponse, Property, RecommendRequest, RecommendationView,
    RegisterRequest, User,
};

// == Auth ==

/// Handler for POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let auth = state.accounts.register(req).await?;
    Ok((StatusCode::CREATED, Json(auth)))
}

/// Handler for POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    Ok(Json(state.accounts.login(req).await?))
}

/// Handler for GET /api/auth/profile
pub async fn profile(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

/// Handler for PATCH /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(fields): JsonBody<Map<String, Value>>,
) -> Result<Json<User>> {
    Ok(Json(state.accounts.update_profile(&user, &fields).await?))
}

// == Favorites ==

/// Handler for POST /api/favorites/:propertyId
pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(property_id): Path<String>,
) -> Result<Json<Vec<Uuid>>> {
    let property_id = parse_id(
        &property_id,
        ApiError::NotFound("Property not found".to_string()),
    )?;
    Ok(Json(state.favorites.add(&user, property_id).await?))
}

/// Handler for GET /api/favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Option<Property>>>> {
    Ok(Json(state.favorites.list(&user).await?))
}

/// Handler for DELETE /api/favorites/:propertyId
pub async fn remove_favorite(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(property_id): Path<String>,
) -> Result<Json<Vec<Uuid>>> {
    let property_id = parse_id(
        &property_id,
        ApiError::NotFound("Property not found in favorites".to_string()),
    )?;
    Ok(Json(state.favorites.remove(&user, property_id).await?))
}

// == Recommendations ==

/// Handler for POST /api/recommendations
pub async fn recommend(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(req): JsonBody<RecommendRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    state.recommendations.recommend(&user, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Recommendation sent successfully")),
    ))
}

/// Handler for GET /api/recommendations/received
pub async fn received_recommendations(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<RecommendationView>>> {
    Ok(Json(state.recommendations.received(&user).await?))
}

/// Handler for DELETE /api/recommendations/received/:recommendationId
pub async fn delete_received_recommendation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(recommendation_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let recommendation_id = parse_id(
        &recommendation_id,
        ApiError::NotFound("Recommendation not found".to_string()),
    )?;
    state
        .recommendations
        .delete_received(&user, recommendation_id)
        .await?;
    Ok(Json(MessageResponse::new(
        "Recommendation deleted successfully",
    )))
}
