//! Query Module
//!
//! Turns the loosely-typed filter parameters of a listing search into a
//! predicate, a sort key and a page window the store can execute.

mod builder;
mod params;

#[cfg(test)]
mod property_tests;

pub use builder::{
    build_query, Page, PropertyFilter, PropertyQuery, SortDirection, SortField, SortSpec,
    DEFAULT_LIMIT,
};
pub use params::FilterParams;
