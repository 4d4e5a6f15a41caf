//! API Handlers
//!
//! Listing endpoints plus the service endpoints (`/`, `/health`, `/stats`).

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};

use super::extract::{parse_id, AuthUser, JsonBody};
use super::AppState;
use crate::error::{ApiError, Result};
use crate::models::{HealthResponse, Property, PropertyView, StatsResponse};
use crate::query::FilterParams;

/// Handler for GET /
pub async fn root_handler() -> &'static str {
    "Property listing API is running"
}

/// Handler for POST /api/properties
pub async fn create_property(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(payload): JsonBody<Value>,
) -> Result<(StatusCode, Json<Property>)> {
    let property = state.properties.create(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

/// Handler for GET /api/properties
///
/// The body is the service's serialized payload, passed through untouched so
/// cached and fresh responses are byte-identical.
pub async fn list_properties(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Response> {
    let payload = state.properties.list(&params).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], payload).into_response())
}

/// Handler for GET /api/properties/:id
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PropertyView>> {
    let id = parse_id(&id, ApiError::NotFound("Property not found".to_string()))?;
    Ok(Json(state.properties.get_by_id(id).await?))
}

/// Handler for PATCH /api/properties/:id
pub async fn update_property(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    JsonBody(fields): JsonBody<Map<String, Value>>,
) -> Result<Json<Property>> {
    let id = parse_id(&id, ApiError::NotFoundOrUnauthorized)?;
    Ok(Json(state.properties.update(user.id, id, &fields).await?))
}

/// Handler for DELETE /api/properties/:id
pub async fn delete_property(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Property>> {
    let id = parse_id(&id, ApiError::NotFoundOrUnauthorized)?;
    Ok(Json(state.properties.delete(user.id, id).await?))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;
    Json(StatsResponse::new(state.cache.available(), &stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
