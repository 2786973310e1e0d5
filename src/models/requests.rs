use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{InteractionType, ListingSource};

/// Request to compute recommendations
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RecommendationsRequest {
    /// Absent for anonymous visitors
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub source: Option<ListingSource>,
    /// Seed for the ranking jitter, for reproducible orderings
    #[serde(default)]
    pub seed: Option<u64>,
    /// Drop cached catalog and profile data before scoring
    #[serde(default)]
    pub refresh: bool,
}

/// Request to record an interaction with a listing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveListingRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "listing_id", rename = "listingId")]
    pub listing_id: String,
    #[serde(default)]
    pub interaction: InteractionType,
}

/// Request to forget an interaction
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RemoveSavedRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "listing_id", rename = "listingId")]
    pub listing_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SavedQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

/// Paging over a user's interaction history
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InteractionsQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(range(min = 1, max = 200))]
    #[serde(default = "default_page_size")]
    pub limit: usize,
    #[validate(range(max = 1_000_000))]
    #[serde(default)]
    pub offset: usize,
}

fn default_page_size() -> usize {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_request_is_valid() {
        let req: RecommendationsRequest = serde_json::from_str("{}").unwrap();
        assert!(req.user_id.is_none());
        assert!(!req.refresh);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_user_id_rejected() {
        let req: RecommendationsRequest = serde_json::from_str(r#"{"userId": ""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_interactions_query_paging() {
        let query: InteractionsQuery = serde_json::from_str(r#"{"userId": "u1"}"#).unwrap();
        assert_eq!(query.limit, 50);
        assert_eq!(query.offset, 0);
        assert!(query.validate().is_ok());

        let too_big: InteractionsQuery =
            serde_json::from_str(r#"{"userId": "u1", "limit": 1000}"#).unwrap();
        assert!(too_big.validate().is_err());

        let far_offset: InteractionsQuery =
            serde_json::from_str(r#"{"userId": "u1", "offset": 18446744073709551615}"#).unwrap();
        assert!(far_offset.validate().is_err());
    }

    #[test]
    fn test_save_request_defaults_to_saved() {
        let req: SaveListingRequest =
            serde_json::from_str(r#"{"userId": "u1", "listing_id": "p1"}"#).unwrap();
        assert_eq!(req.interaction, InteractionType::Saved);
        assert!(req.validate().is_ok());
    }
}
