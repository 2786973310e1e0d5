use serde::{Deserialize, Serialize};
use crate::models::domain::Recommendation;
use crate::services::CacheStats;

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Save/remove interaction response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionResponse {
    pub success: bool,
    #[serde(rename = "requestId")]
    pub request_id: String,
}

/// Saved listings for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedListingsResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "savedListings")]
    pub saved_listings: Vec<String>,
    pub count: usize,
}
