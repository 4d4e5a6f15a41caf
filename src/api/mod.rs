//! API Module
//!
//! HTTP handlers and routing for the listing server.
//!
//! # Endpoints
//! - `POST|GET /api/properties`, `GET|PATCH|DELETE /api/properties/:id`
//! - `POST /api/auth/register`, `POST /api/auth/login`, `GET|PATCH /api/auth/profile`
//! - `GET /api/favorites`, `POST|DELETE /api/favorites/:property_id`
//! - `POST /api/recommendations`, `GET /api/recommendations/received`,
//!   `DELETE /api/recommendations/received/:recommendation_id`
//! - `GET /`, `GET /health`, `GET /stats`

pub mod account_handlers;
pub mod extract;
pub mod handlers;
pub mod routes;
mod state;

pub use extract::{AuthUser, JsonBody};
pub use routes::create_router;
pub use state::AppState;
