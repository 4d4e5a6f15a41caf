//! Property-Based Tests for the Query Builder

use proptest::prelude::*;
use uuid::Uuid;

use crate::models::property::tests::sample_details;
use crate::models::Property;
use crate::query::{build_query, FilterParams};

// == Strategies ==
fn param_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("type".to_string()),
        Just("minPrice".to_string()),
        Just("maxPrice".to_string()),
        Just("city".to_string()),
        Just("bedrooms".to_string()),
        Just("amenities".to_string()),
        Just("sortBy".to_string()),
        Just("limit".to_string()),
        Just("skip".to_string()),
        "[a-z]{1,8}",
    ]
}

fn param_value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,7}",
        "[a-zA-Z:,]{0,12}",
        Just("price:desc".to_string()),
    ]
}

fn property_with(price: f64, bedrooms: u32) -> Property {
    let mut details = sample_details();
    details.price = price;
    details.bedrooms = bedrooms;
    Property::new(details, Uuid::new_v4())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Building twice from the same pairs, in any order, yields the same query.
    #[test]
    fn prop_build_is_order_independent(
        pairs in prop::collection::btree_map(param_name_strategy(), param_value_strategy(), 0..8)
    ) {
        let forward: FilterParams = pairs.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let reversed: FilterParams = pairs.iter().rev().map(|(k, v)| (k.clone(), v.clone())).collect();

        prop_assert_eq!(build_query(&forward), build_query(&reversed));
    }

    // A price range filter accepts exactly the prices inside the inclusive range.
    #[test]
    fn prop_price_range_is_inclusive(
        min in 0u32..1_000_000,
        span in 0u32..1_000_000,
        price in 0u32..2_000_000,
        bedrooms in 0u32..6,
    ) {
        let max = min + span;
        let params = FilterParams::new()
            .with("minPrice", min.to_string())
            .with("maxPrice", max.to_string())
            .with("bedrooms", "3");
        let filter = build_query(&params).filter;

        let property = property_with(f64::from(price), bedrooms);
        let expected = price >= min && price <= max && bedrooms == 3;
        prop_assert_eq!(filter.matches(&property), expected);
    }

    // Arbitrary junk in numeric parameters never panics and never narrows the page below 1.
    #[test]
    fn prop_numeric_junk_is_tolerated(limit in ".{0,6}", skip in ".{0,6}", min_price in ".{0,6}") {
        let params = FilterParams::new()
            .with("limit", limit)
            .with("skip", skip)
            .with("minPrice", min_price);
        let query = build_query(&params);
        prop_assert!(query.page.limit >= 1);
    }
}
