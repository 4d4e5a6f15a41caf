//! Query Builder
//!
//! Translates raw [`FilterParams`] into a structured predicate, a single sort
//! key and a page window. Pure: no I/O, no clock, no store access.

use std::cmp::Ordering;

use crate::models::Property;
use crate::query::FilterParams;

/// Page size used when `limit` is absent, zero or malformed.
pub const DEFAULT_LIMIT: usize = 10;

// == Filter ==
/// Structured predicate over [`Property`] fields. `None`/empty means
/// "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    pub property_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Lower-cased substring
    pub city: Option<String>,
    /// Lower-cased substring
    pub state: Option<String>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub furnished: Option<String>,
    pub listing_type: Option<String>,
    pub min_rating: Option<f64>,
    /// Every entry must be present
    pub amenities: Vec<String>,
    /// Every entry must be present
    pub tags: Vec<String>,
}

impl PropertyFilter {
    pub fn matches(&self, property: &Property) -> bool {
        let d = &property.details;

        if let Some(t) = &self.property_type {
            if d.property_type.as_str() != t {
                return false;
            }
        }
        if !in_range(d.price, self.min_price, self.max_price) {
            return false;
        }
        if !contains_ci(&d.city, self.city.as_deref()) {
            return false;
        }
        if !contains_ci(&d.state, self.state.as_deref()) {
            return false;
        }
        if matches!(self.bedrooms, Some(n) if f64::from(d.bedrooms) != n) {
            return false;
        }
        if matches!(self.bathrooms, Some(n) if f64::from(d.bathrooms) != n) {
            return false;
        }
        if !in_range(d.area_sq_ft, self.min_area, self.max_area) {
            return false;
        }
        if matches!(&self.furnished, Some(f) if d.furnished.as_str() != f) {
            return false;
        }
        if matches!(&self.listing_type, Some(l) if d.listing_type.as_str() != l) {
            return false;
        }
        if matches!(self.min_rating, Some(min) if d.rating < min) {
            return false;
        }

        self.amenities.iter().all(|a| d.amenities.contains(a))
            && self.tags.iter().all(|t| d.tags.contains(t))
    }
}

fn in_range(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}

fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    needle.map_or(true, |needle| haystack.to_lowercase().contains(needle))
}

// == Sort ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Price,
    AreaSqFt,
    Bedrooms,
    Bathrooms,
    Rating,
    AvailableFrom,
    Title,
    City,
    State,
}

impl SortField {
    /// Maps a camelCase document field name to a sortable field.
    pub fn parse(name: &str) -> Option<Self> {
        let field = match name.trim() {
            "createdAt" => SortField::CreatedAt,
            "updatedAt" => SortField::UpdatedAt,
            "price" => SortField::Price,
            "areaSqFt" => SortField::AreaSqFt,
            "bedrooms" => SortField::Bedrooms,
            "bathrooms" => SortField::Bathrooms,
            "rating" => SortField::Rating,
            "availableFrom" => SortField::AvailableFrom,
            "title" => SortField::Title,
            "city" => SortField::City,
            "state" => SortField::State,
            _ => return None,
        };
        Some(field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

impl SortSpec {
    /// Parses `field:dir`. `desc` sorts descending, any other direction (or
    /// none) ascending. Unknown fields yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (field, dir) = match raw.split_once(':') {
            Some((field, dir)) => (field, dir),
            None => (raw, ""),
        };
        let direction = if dir.trim() == "desc" {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };

        SortField::parse(field).map(|field| Self { field, direction })
    }

    /// Total order: the sort key first, then the id so equal keys still page
    /// deterministically.
    pub fn compare(&self, a: &Property, b: &Property) -> Ordering {
        let (da, db) = (&a.details, &b.details);
        let primary = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Price => da.price.total_cmp(&db.price),
            SortField::AreaSqFt => da.area_sq_ft.total_cmp(&db.area_sq_ft),
            SortField::Bedrooms => da.bedrooms.cmp(&db.bedrooms),
            SortField::Bathrooms => da.bathrooms.cmp(&db.bathrooms),
            SortField::Rating => da.rating.total_cmp(&db.rating),
            SortField::AvailableFrom => da.available_from.cmp(&db.available_from),
            SortField::Title => da.title.cmp(&db.title),
            SortField::City => da.city.cmp(&db.city),
            SortField::State => da.state.cmp(&db.state),
        };
        let primary = match self.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

// == Page ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub skip: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            skip: 0,
        }
    }
}

// == Property Query ==
/// Store-ready query: predicate, ordering and page window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyQuery {
    pub filter: PropertyFilter,
    pub sort: SortSpec,
    pub page: Page,
}

/// Builds a [`PropertyQuery`] from raw parameters.
///
/// Numeric parameters that fail to parse are treated as absent. Unrecognised
/// parameter names are ignored.
pub fn build_query(params: &FilterParams) -> PropertyQuery {
    let filter = PropertyFilter {
        property_type: text(params, "type"),
        min_price: number(params, "minPrice"),
        max_price: number(params, "maxPrice"),
        city: text(params, "city").map(|c| c.to_lowercase()),
        state: text(params, "state").map(|s| s.to_lowercase()),
        bedrooms: number(params, "bedrooms"),
        bathrooms: number(params, "bathrooms"),
        min_area: number(params, "minArea"),
        max_area: number(params, "maxArea"),
        furnished: text(params, "furnished"),
        listing_type: text(params, "listingType"),
        min_rating: number(params, "minRating"),
        amenities: list(params, "amenities"),
        tags: list(params, "tags"),
    };

    let sort = params
        .non_empty("sortBy")
        .and_then(SortSpec::parse)
        .unwrap_or_default();

    let page = Page {
        limit: count(params, "limit")
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_LIMIT),
        skip: count(params, "skip").unwrap_or(0),
    };

    PropertyQuery { filter, sort, page }
}

fn text(params: &FilterParams, name: &str) -> Option<String> {
    params.non_empty(name).map(|v| v.trim().to_string())
}

fn number(params: &FilterParams, name: &str) -> Option<f64> {
    params
        .non_empty(name)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn count(params: &FilterParams, name: &str) -> Option<usize> {
    params
        .non_empty(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
}

fn list(params: &FilterParams, name: &str) -> Vec<String> {
    params
        .non_empty(name)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::property::tests::sample_details;
    use uuid::Uuid;

    fn property() -> Property {
        Property::new(sample_details(), Uuid::new_v4())
    }

    #[test]
    fn test_empty_params_default_query() {
        let query = build_query(&FilterParams::new());
        assert_eq!(query.filter, PropertyFilter::default());
        assert_eq!(query.sort, SortSpec::default());
        assert_eq!(query.page, Page { limit: 10, skip: 0 });
    }

    #[test]
    fn test_price_range_and_bedrooms() {
        let params = FilterParams::new()
            .with("minPrice", "100000")
            .with("maxPrice", "500000")
            .with("bedrooms", "3");
        let query = build_query(&params);

        assert_eq!(query.filter.min_price, Some(100_000.0));
        assert_eq!(query.filter.max_price, Some(500_000.0));
        assert_eq!(query.filter.bedrooms, Some(3.0));
        assert!(query.filter.matches(&property()));
    }

    #[test]
    fn test_malformed_numbers_are_absent() {
        let params = FilterParams::new()
            .with("minPrice", "notanumber")
            .with("bedrooms", "")
            .with("limit", "many")
            .with("skip", "-4");
        let query = build_query(&params);

        assert_eq!(query.filter.min_price, None);
        assert_eq!(query.filter.bedrooms, None);
        assert_eq!(query.page, Page::default());
    }

    #[test]
    fn test_zero_limit_falls_back_to_default() {
        let query = build_query(&FilterParams::new().with("limit", "0"));
        assert_eq!(query.page.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_limit_and_skip() {
        let params = FilterParams::new().with("limit", "5").with("skip", "10");
        assert_eq!(build_query(&params).page, Page { limit: 5, skip: 10 });
    }

    #[test]
    fn test_city_is_case_insensitive_substring() {
        let filter = build_query(&FilterParams::new().with("city", "BENGAL")).filter;
        assert!(filter.matches(&property()));

        let filter = build_query(&FilterParams::new().with("city", "Mumbai")).filter;
        assert!(!filter.matches(&property()));
    }

    #[test]
    fn test_amenities_require_all() {
        let both = build_query(&FilterParams::new().with("amenities", "pool,gym")).filter;
        assert_eq!(both.amenities, vec!["pool", "gym"]);
        assert!(both.matches(&property()));

        let extra = build_query(&FilterParams::new().with("amenities", "pool,sauna")).filter;
        assert!(!extra.matches(&property()));
    }

    #[test]
    fn test_list_drops_blank_entries() {
        let filter = build_query(&FilterParams::new().with("tags", " sea-view , ,")).filter;
        assert_eq!(filter.tags, vec!["sea-view"]);
    }

    #[test]
    fn test_unknown_enum_value_matches_nothing() {
        let filter = build_query(&FilterParams::new().with("type", "Castle")).filter;
        assert!(!filter.matches(&property()));
    }

    #[test]
    fn test_exact_enum_filters() {
        let params = FilterParams::new()
            .with("type", "Apartment")
            .with("furnished", "Semi")
            .with("listingType", "sale");
        assert!(build_query(&params).filter.matches(&property()));

        let params = FilterParams::new().with("listingType", "rent");
        assert!(!build_query(&params).filter.matches(&property()));
    }

    #[test]
    fn test_min_rating_and_area() {
        let params = FilterParams::new()
            .with("minRating", "4")
            .with("minArea", "1200")
            .with("maxArea", "1200");
        assert!(build_query(&params).filter.matches(&property()));

        let params = FilterParams::new().with("minRating", "4.5");
        assert!(!build_query(&params).filter.matches(&property()));
    }

    #[test]
    fn test_sort_parsing() {
        let sort = build_query(&FilterParams::new().with("sortBy", "price:desc")).sort;
        assert_eq!(
            sort,
            SortSpec {
                field: SortField::Price,
                direction: SortDirection::Descending
            }
        );

        let sort = build_query(&FilterParams::new().with("sortBy", "rating")).sort;
        assert_eq!(sort.direction, SortDirection::Ascending);

        let sort = build_query(&FilterParams::new().with("sortBy", "price:up")).sort;
        assert_eq!(sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_unknown_sort_field_uses_default() {
        let sort = build_query(&FilterParams::new().with("sortBy", "colour:desc")).sort;
        assert_eq!(sort, SortSpec::default());
    }

    #[test]
    fn test_compare_breaks_ties_by_id() {
        let a = property();
        let mut b = a.clone();
        b.id = Uuid::new_v4();
        let spec = SortSpec {
            field: SortField::Price,
            direction: SortDirection::Descending,
        };
        assert_eq!(spec.compare(&a, &b), a.id.cmp(&b.id));
    }
}
