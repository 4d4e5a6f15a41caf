//! Cache key derivation for listing searches.

use serde_json::{Map, Value};

use crate::query::FilterParams;

/// Namespace every listing-search result is registered under.
pub const PROPERTY_LIST_NAMESPACE: &str = "property-list";

/// Derives the cache key for a listing search.
///
/// The key covers the entire incoming mapping, including parameters the query
/// builder ignores. Parameters are serialized in sorted name order, so the
/// same pairs always produce the same key whatever order they arrived in.
pub fn list_cache_key(params: &FilterParams) -> String {
    let canonical: Map<String, Value> = params
        .iter()
        .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
        .collect();

    format!("{}:{}", PROPERTY_LIST_NAMESPACE, Value::Object(canonical))
}
