//! Property Listing - a listing search backend with a read-through cache
//!
//! Serves filtered, sorted and paginated listing searches, caches each
//! distinct search for a bounded time and drops every cached search when a
//! listing changes. Accounts, favorites and recommendations ride alongside.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod service;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
