use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Marketplace listing (property or business) as stored in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    #[serde(alias = "asking_price")]
    pub price: f64,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<f32>,
    #[serde(default, alias = "square_feet")]
    pub area_sqft: Option<f64>,
    #[serde(alias = "property_type", default, deserialize_with = "null_as_default")]
    pub category: ListingCategory,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Listing {
    /// Price as a usable number, `None` for NaN/infinite/negative values
    pub fn valid_price(&self) -> Option<f64> {
        if self.price.is_finite() && self.price >= 0.0 {
            Some(self.price)
        } else {
            None
        }
    }
}

/// Backend rows carry explicit nulls for empty columns
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Listing category shared by the catalog model and the scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingCategory {
    /// Single-family house
    #[serde(alias = "single_family")]
    House,
    Condo,
    Townhouse,
    Apartment,
    MultiFamily,
    Land,
    Commercial,
    Business,
    #[default]
    #[serde(other)]
    Other,
}

/// Catalog table a listing comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingSource {
    #[default]
    Properties,
    Businesses,
}

impl ListingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingSource::Properties => "properties",
            ListingSource::Businesses => "businesses",
        }
    }
}

/// A user's stored investment/search preferences
///
/// Every field is optional; a missing field means the matching rule does
/// not contribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preferred_locations: HashSet<String>,
    #[serde(default, alias = "property_types", deserialize_with = "null_as_default")]
    pub preferred_categories: HashSet<ListingCategory>,
    #[serde(default)]
    pub min_bedrooms: Option<u32>,
}

impl UserProfile {
    /// Both budget bounds, if the profile has them
    pub fn budget_range(&self) -> Option<(f64, f64)> {
        match (self.budget_min, self.budget_max) {
            (Some(min), Some(max)) if min.is_finite() && max.is_finite() => Some((min, max)),
            _ => None,
        }
    }
}

/// Kind of user interaction with a listing
///
/// The same lowercase names are used on the wire and in the
/// `interaction_type` database enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "interaction_type", rename_all = "lowercase")]
pub enum InteractionType {
    #[default]
    Saved,
    Viewed,
    Dismissed,
}

/// Recommendation category label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    BudgetMatch,
    LocationPreference,
    Trending,
    SimilarViews,
}

/// Scored recommendation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub listing: Listing,
    pub score: f64,
    pub reasons: Vec<String>,
    pub category: RecommendationCategory,
    #[serde(rename = "formattedPrice")]
    pub formatted_price: String,
    #[serde(rename = "daysListed")]
    pub days_listed: i64,
}

/// Point values and thresholds used by the scorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringRules {
    pub budget_in_range: f64,
    pub budget_near_range: f64,
    pub budget_near_tolerance: f64,
    pub location: f64,
    pub category: f64,
    pub bedrooms: f64,
    pub recency: f64,
    pub recency_days: i64,
    pub new_listing_days: i64,
    pub max_jitter: f64,
    pub max_results: usize,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            budget_in_range: 30.0,
            budget_near_range: 15.0,
            budget_near_tolerance: 50_000.0,
            location: 25.0,
            category: 20.0,
            bedrooms: 10.0,
            recency: 15.0,
            recency_days: 7,
            new_listing_days: 3,
            max_jitter: 10.0,
            max_results: 12,
        }
    }
}
