//! Property listing document
//!
//! The stored entity, its editable field set and the whitelisted patch applied
//! by owners.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ApiError;

/// Fields an owner may change after creation.
pub const UPDATABLE_FIELDS: &[&str] = &[
    "title",
    "type",
    "price",
    "state",
    "city",
    "areaSqFt",
    "bedrooms",
    "bathrooms",
    "amenities",
    "furnished",
    "availableFrom",
    "tags",
    "rating",
    "listingType",
];

/// Upper bound of the rating scale.
pub const MAX_RATING: f64 = 5.0;

// == Enumerations ==

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    Apartment,
    Villa,
    Bungalow,
    Penthouse,
    Studio,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "Apartment",
            PropertyType::Villa => "Villa",
            PropertyType::Bungalow => "Bungalow",
            PropertyType::Penthouse => "Penthouse",
            PropertyType::Studio => "Studio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Furnished {
    Furnished,
    Semi,
    Unfurnished,
}

impl Furnished {
    pub fn as_str(&self) -> &'static str {
        match self {
            Furnished::Furnished => "Furnished",
            Furnished::Semi => "Semi",
            Furnished::Unfurnished => "Unfurnished",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListedBy {
    Owner,
    Agent,
    Builder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Rent,
    Sale,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Rent => "rent",
            ListingType::Sale => "sale",
        }
    }
}

// == Property Details ==
/// Everything about a listing that its creator supplies.
///
/// This is also the create payload: `createdBy` and timestamps are never read
/// from the request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    pub title: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub price: f64,
    pub state: String,
    pub city: String,
    pub area_sq_ft: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    pub furnished: Furnished,
    #[serde(deserialize_with = "calendar_date::deserialize")]
    pub available_from: NaiveDate,
    pub listed_by: ListedBy,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub color_theme: String,
    pub rating: f64,
    #[serde(default)]
    pub is_verified: bool,
    pub listing_type: ListingType,
}

impl PropertyDetails {
    /// Parses a create payload.
    pub fn from_json(payload: Value) -> Result<Self, ApiError> {
        let mut details: PropertyDetails = serde_json::from_value(payload)
            .map_err(|e| ApiError::Validation(format!("Invalid property: {}", e)))?;
        details.normalize();
        details.validate()?;
        Ok(details)
    }

    /// Trims text fields and drops blank amenities/tags.
    pub fn normalize(&mut self) {
        self.title = self.title.trim().to_string();
        self.state = self.state.trim().to_string();
        self.city = self.city.trim().to_string();
        self.color_theme = self.color_theme.trim().to_string();
        self.amenities = trim_set(std::mem::take(&mut self.amenities));
        self.tags = trim_set(std::mem::take(&mut self.tags));
    }

    /// Enforces required fields and numeric bounds.
    pub fn validate(&self) -> Result<(), ApiError> {
        for (field, value) in [
            ("title", &self.title),
            ("state", &self.state),
            ("city", &self.city),
            ("colorTheme", &self.color_theme),
        ] {
            if value.is_empty() {
                return Err(ApiError::Validation(format!("{} is required", field)));
            }
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ApiError::Validation(
                "price must be a non-negative number".to_string(),
            ));
        }
        if !self.area_sq_ft.is_finite() || self.area_sq_ft < 0.0 {
            return Err(ApiError::Validation(
                "areaSqFt must be a non-negative number".to_string(),
            ));
        }
        if !self.rating.is_finite() || !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(ApiError::Validation(format!(
                "rating must be between 0 and {}",
                MAX_RATING
            )));
        }
        Ok(())
    }
}

fn trim_set(values: BTreeSet<String>) -> BTreeSet<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

// == Property ==
/// A persisted listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    #[serde(flatten)]
    pub details: PropertyDetails,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Creates a new listing owned by `owner`.
    pub fn new(details: PropertyDetails, owner: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            details,
            created_by: owner,
            created_at: now,
            updated_at: now,
        }
    }
}

// == Property Patch ==
/// Partial update restricted to [`UPDATABLE_FIELDS`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertyPatch {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    pub price: Option<f64>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub area_sq_ft: Option<f64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub amenities: Option<BTreeSet<String>>,
    pub furnished: Option<Furnished>,
    #[serde(default, deserialize_with = "calendar_date::deserialize_option")]
    pub available_from: Option<NaiveDate>,
    pub tags: Option<BTreeSet<String>>,
    pub rating: Option<f64>,
    pub listing_type: Option<ListingType>,
}

impl PropertyPatch {
    /// Builds a patch from a raw JSON object.
    ///
    /// Any key outside the whitelist fails the whole request before values are
    /// looked at.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ApiError> {
        if !fields
            .keys()
            .all(|key| UPDATABLE_FIELDS.contains(&key.as_str()))
        {
            return Err(ApiError::Validation("Invalid updates!".to_string()));
        }
        if let Some(key) = fields.iter().find(|(_, value)| value.is_null()).map(|(k, _)| k) {
            return Err(ApiError::Validation(format!("{} cannot be null", key)));
        }

        serde_json::from_value(Value::Object(fields.clone()))
            .map_err(|e| ApiError::Validation(format!("Invalid property: {}", e)))
    }

    /// Applies the patch, then re-checks the document.
    pub fn apply(self, details: &mut PropertyDetails) -> Result<(), ApiError> {
        if let Some(title) = self.title {
            details.title = title;
        }
        if let Some(property_type) = self.property_type {
            details.property_type = property_type;
        }
        if let Some(price) = self.price {
            details.price = price;
        }
        if let Some(state) = self.state {
            details.state = state;
        }
        if let Some(city) = self.city {
            details.city = city;
        }
        if let Some(area) = self.area_sq_ft {
            details.area_sq_ft = area;
        }
        if let Some(bedrooms) = self.bedrooms {
            details.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = self.bathrooms {
            details.bathrooms = bathrooms;
        }
        if let Some(amenities) = self.amenities {
            details.amenities = amenities;
        }
        if let Some(furnished) = self.furnished {
            details.furnished = furnished;
        }
        if let Some(available_from) = self.available_from {
            details.available_from = available_from;
        }
        if let Some(tags) = self.tags {
            details.tags = tags;
        }
        if let Some(rating) = self.rating {
            details.rating = rating;
        }
        if let Some(listing_type) = self.listing_type {
            details.listing_type = listing_type;
        }

        details.normalize();
        details.validate()
    }
}

// == Dates ==
/// `availableFrom` accepts a plain `YYYY-MM-DD` date or an RFC 3339 timestamp;
/// timestamps keep only their UTC calendar date.
mod calendar_date {
    use super::*;

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|ts| ts.with_timezone(&Utc).date_naive())
        })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| invalid(&raw))
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse(&raw).ok_or_else(|| invalid(&raw)))
            .transpose()
    }

    fn invalid<E: de::Error>(raw: &str) -> E {
        E::custom(format!("invalid date `{}`", raw))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn sample_details() -> PropertyDetails {
        PropertyDetails {
            title: "Sea view flat".to_string(),
            property_type: PropertyType::Apartment,
            price: 250_000.0,
            state: "Karnataka".to_string(),
            city: "Bengaluru".to_string(),
            area_sq_ft: 1200.0,
            bedrooms: 3,
            bathrooms: 2,
            amenities: ["pool".to_string(), "gym".to_string()].into(),
            furnished: Furnished::Semi,
            available_from: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            listed_by: ListedBy::Owner,
            tags: ["sea-view".to_string()].into(),
            color_theme: "#ffffff".to_string(),
            rating: 4.2,
            is_verified: false,
            listing_type: ListingType::Sale,
        }
    }

    fn sample_payload() -> Value {
        json!({
            "title": "  Garden villa ",
            "type": "Villa",
            "price": 900000,
            "state": "Goa",
            "city": "Panaji",
            "areaSqFt": 3000,
            "bedrooms": 4,
            "bathrooms": 3,
            "amenities": [" pool ", "garden", ""],
            "furnished": "Furnished",
            "availableFrom": "2025-01-15",
            "listedBy": "Agent",
            "tags": ["luxury"],
            "colorTheme": "green",
            "rating": 4.8,
            "listingType": "sale"
        })
    }

    #[test]
    fn test_details_from_json_normalizes() {
        let details = PropertyDetails::from_json(sample_payload()).unwrap();
        assert_eq!(details.title, "Garden villa");
        assert_eq!(details.property_type, PropertyType::Villa);
        assert!(details.amenities.contains("pool"));
        assert_eq!(details.amenities.len(), 2);
        assert!(!details.is_verified);
    }

    #[test]
    fn test_details_rejects_bad_enum() {
        let mut payload = sample_payload();
        payload["type"] = json!("Castle");
        assert!(matches!(
            PropertyDetails::from_json(payload),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_details_rejects_negative_price() {
        let mut payload = sample_payload();
        payload["price"] = json!(-1);
        assert!(PropertyDetails::from_json(payload).is_err());
    }

    #[test]
    fn test_details_rejects_negative_bedrooms() {
        let mut payload = sample_payload();
        payload["bedrooms"] = json!(-2);
        assert!(PropertyDetails::from_json(payload).is_err());
    }

    #[test]
    fn test_details_rejects_rating_out_of_range() {
        let mut payload = sample_payload();
        payload["rating"] = json!(5.5);
        assert!(PropertyDetails::from_json(payload).is_err());
    }

    #[test]
    fn test_details_rejects_blank_title() {
        let mut payload = sample_payload();
        payload["title"] = json!("   ");
        assert!(PropertyDetails::from_json(payload).is_err());
    }

    #[test]
    fn test_property_serializes_camel_case() {
        let property = Property::new(sample_details(), Uuid::new_v4());
        let json = serde_json::to_value(&property).unwrap();
        assert_eq!(json["type"], "Apartment");
        assert_eq!(json["areaSqFt"], 1200.0);
        assert_eq!(json["listingType"], "sale");
        assert_eq!(json["availableFrom"], "2025-06-01");
        assert!(json.get("createdBy").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["isVerified"], false);
    }

    #[test]
    fn test_patch_rejects_unknown_field() {
        let fields = json!({ "title": "x", "createdBy": "someone" });
        let result = PropertyPatch::from_fields(fields.as_object().unwrap());
        assert_eq!(
            result,
            Err(ApiError::Validation("Invalid updates!".to_string()))
        );
    }

    #[test]
    fn test_patch_rejects_non_whitelisted_known_field() {
        let fields = json!({ "isVerified": true });
        assert!(PropertyPatch::from_fields(fields.as_object().unwrap()).is_err());
    }

    #[test]
    fn test_patch_applies_fields() {
        let mut details = sample_details();
        let fields = json!({ "price": 300000, "city": "Mysuru", "amenities": ["lift"] });
        let patch = PropertyPatch::from_fields(fields.as_object().unwrap()).unwrap();
        patch.apply(&mut details).unwrap();

        assert_eq!(details.price, 300_000.0);
        assert_eq!(details.city, "Mysuru");
        assert_eq!(details.amenities, ["lift".to_string()].into());
        assert_eq!(details.bedrooms, 3);
    }

    #[test]
    fn test_patch_bounds_checked_after_apply() {
        let mut details = sample_details();
        let fields = json!({ "rating": 9 });
        let patch = PropertyPatch::from_fields(fields.as_object().unwrap()).unwrap();
        assert!(patch.apply(&mut details).is_err());
    }

    #[test]
    fn test_patch_rejects_explicit_null() {
        let fields = json!({ "title": null });
        assert_eq!(
            PropertyPatch::from_fields(fields.as_object().unwrap()),
            Err(ApiError::Validation("title cannot be null".to_string()))
        );
    }

    #[test]
    fn test_available_from_accepts_timestamp() {
        let mut payload = sample_payload();
        payload["availableFrom"] = json!("2025-01-15T00:00:00.000Z");
        let details = PropertyDetails::from_json(payload).unwrap();
        assert_eq!(
            details.available_from,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_available_from_timestamp_uses_utc_date() {
        assert_eq!(
            calendar_date::parse("2025-01-15T23:30:00-05:00"),
            NaiveDate::from_ymd_opt(2025, 1, 16)
        );
        assert_eq!(calendar_date::parse("15/01/2025"), None);
    }

    #[test]
    fn test_patch_available_from_accepts_both_forms() {
        let fields = json!({ "availableFrom": "2026-03-01T10:00:00Z" });
        let patch = PropertyPatch::from_fields(fields.as_object().unwrap()).unwrap();
        assert_eq!(patch.available_from, NaiveDate::from_ymd_opt(2026, 3, 1));

        let fields = json!({ "availableFrom": "2026-03-02" });
        let patch = PropertyPatch::from_fields(fields.as_object().unwrap()).unwrap();
        assert_eq!(patch.available_from, NaiveDate::from_ymd_opt(2026, 3, 2));

        let fields = json!({ "availableFrom": "soon" });
        assert!(PropertyPatch::from_fields(fields.as_object().unwrap()).is_err());
    }
}
