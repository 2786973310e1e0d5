// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    InteractionType, Listing, ListingCategory, ListingSource, Recommendation,
    RecommendationCategory, ScoringRules, UserProfile,
};
pub use requests::{
    InteractionsQuery, RecommendationsRequest, RemoveSavedRequest, SaveListingRequest, SavedQuery,
};
pub use responses::{
    ErrorResponse, HealthResponse, InteractionResponse, RecommendationsResponse,
    SavedListingsResponse,
};
