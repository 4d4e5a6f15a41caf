//! Domain documents and the request/response DTOs of the listing API

pub mod property;
pub mod requests;
pub mod responses;
pub mod user;

// Re-export commonly used types
pub use property::{
    Furnished, ListedBy, ListingType, Property, PropertyDetails, PropertyPatch, PropertyType,
    UPDATABLE_FIELDS,
};
pub use requests::{LoginRequest, ProfileUpdate, RecommendRequest, RegisterRequest};
pub use responses::{
    AuthResponse, ErrorResponse, HealthResponse, MessageResponse, PropertyView,
    RecommendationView, StatsResponse,
};
pub use user::{normalize_email, Recommendation, User, UserSummary};
