//! API Routes
//!
//! Configures the Axum router with every listing, account and health endpoint.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::account_handlers::{
    add_favorite, delete_received_recommendation, list_favorites, login, profile,
    received_recommendations, recommend, register, remove_favorite, update_profile,
};
use super::handlers::{
    create_property, delete_property, get_property, health_handler, list_properties,
    root_handler, stats_handler, update_property,
};
use super::AppState;

/// Creates the main router.
///
/// CORS allows any origin; every request is traced.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .nest("/api", api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/profile", get(profile).patch(update_profile))
        .route("/properties", post(create_property).get(list_properties))
        .route(
            "/properties/:id",
            get(get_property)
                .patch(update_property)
                .delete(delete_property),
        )
        .route("/favorites", get(list_favorites))
        .route(
            "/favorites/:property_id",
            post(add_favorite).delete(remove_favorite),
        )
        .route("/recommendations", post(recommend))
        .route("/recommendations/received", get(received_recommendations))
        .route(
            "/recommendations/received/:recommendation_id",
            delete(delete_received_recommendation),
        )
}
